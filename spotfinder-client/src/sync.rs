use std::{future, sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, oneshot, watch},
    time::{sleep_until, Instant},
};

use crate::{
    api::ReportsApi,
    backoff::Backoff,
    cache::ReportCache,
    json::{LiveCommand, LiveEvent, NewReport, RatingResult, Report},
    live::{LiveChannel, LiveConnector},
    Error, Result,
};

/// The area the client is interested in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchArea {
    pub lat: f64,
    pub lng: f64,
    /// Meters
    pub radius: f64,
}

impl WatchArea {
    fn command(&self) -> LiveCommand {
        LiveCommand::WatchNearby {
            lat: self.lat,
            lng: self.lng,
            radius: Some(self.radius),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Everything a UI needs to render the nearby reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncView {
    pub reports: Vec<Report>,
    pub connection: ConnectionState,
    pub last_error: Option<Error>,
    /// Automatic reconnection has given up, only a manual
    /// refresh will connect again.
    pub reconnect_exhausted: bool,
    pub area: Option<WatchArea>,
}

/// State of the synchronization without any I/O.
#[derive(Debug, Default)]
pub struct SyncEngine {
    cache: ReportCache,
    connection: ConnectionState,
    area: Option<WatchArea>,
    backoff: Backoff,
    auto_reconnect: bool,
    exhausted: bool,
    last_error: Option<Error>,
}

impl SyncEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache(&self) -> &ReportCache {
        &self.cache
    }

    pub const fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub const fn area(&self) -> Option<WatchArea> {
        self.area
    }

    /// Start over with a new area. Re-arms automatic reconnection.
    pub fn begin_refresh(&mut self, area: WatchArea) {
        self.area = Some(area);
        self.connection = ConnectionState::Disconnected;
        self.auto_reconnect = true;
        self.exhausted = false;
        self.backoff.reset();
    }

    pub fn snapshot_loaded(&mut self, reports: Vec<Report>) {
        self.cache.replace_all(reports);
        self.last_error = None;
    }

    /// The cached reports are kept.
    pub fn request_failed(&mut self, err: Error) {
        self.last_error = Some(err);
    }

    pub fn connecting(&mut self) {
        self.connection = ConnectionState::Connecting;
    }

    pub fn connected(&mut self) {
        self.connection = ConnectionState::Connected;
        self.exhausted = false;
        self.backoff.reset();
        if self.last_error.as_ref().is_some_and(Error::is_retryable) {
            self.last_error = None;
        }
    }

    /// Returns `true` if the cached reports changed.
    pub fn apply(&mut self, event: &LiveEvent) -> bool {
        if let LiveEvent::Error(err) = event {
            self.last_error = Some(err.clone().into());
        }
        self.cache.apply(event)
    }

    /// Delay until the next connection attempt, if any.
    pub fn connection_lost(&mut self, err: Option<Error>) -> Option<Duration> {
        self.connection = ConnectionState::Disconnected;
        if let Some(err) = err {
            self.last_error = Some(err);
        }
        if !self.auto_reconnect || self.area.is_none() {
            return None;
        }
        let delay = self.backoff.next_delay();
        if delay.is_none() {
            log::warn!(
                "Giving up to reconnect after {} attempts",
                self.backoff.attempts()
            );
            self.exhausted = true;
        }
        delay
    }

    /// Stay disconnected until the next refresh.
    pub fn disconnect(&mut self) {
        self.auto_reconnect = false;
        self.connection = ConnectionState::Disconnected;
    }

    pub fn submitted(&mut self, report: Report) {
        self.cache.upsert(report);
    }

    pub fn rated(&mut self, rating: &RatingResult) {
        self.cache.update_rating(rating);
    }

    pub fn view(&self) -> SyncView {
        SyncView {
            reports: self.cache.reports().to_vec(),
            connection: self.connection,
            last_error: self.last_error.clone(),
            reconnect_exhausted: self.exhausted,
            area: self.area,
        }
    }
}

enum Command {
    Refresh {
        area: WatchArea,
        reply: oneshot::Sender<Result<()>>,
    },
    Disconnect {
        reply: oneshot::Sender<()>,
    },
    Submitted(Report),
    Rated(RatingResult),
}

const COMMAND_QUEUE_SIZE: usize = 16;

fn stopped() -> Error {
    Error::Transport("The synchronization task has stopped".into())
}

/// Handle of the task that keeps the nearby reports in sync.
///
/// The task owns all state and terminates when the last handle
/// is dropped.
#[derive(Clone)]
pub struct SyncClient {
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<SyncView>,
    reports: Arc<dyn ReportsApi>,
}

impl SyncClient {
    /// Must be called within a Tokio runtime.
    pub fn spawn(reports: Arc<dyn ReportsApi>, live: Arc<dyn LiveConnector>) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_QUEUE_SIZE);
        let (view_tx, view_rx) = watch::channel(SyncView::default());
        let driver = SyncDriver {
            engine: SyncEngine::new(),
            reports: Arc::clone(&reports),
            live,
            commands: commands_rx,
            view: view_tx,
            channel: None,
            reconnect_at: None,
        };
        tokio::spawn(driver.run());
        Self {
            commands: commands_tx,
            view: view_rx,
            reports,
        }
    }

    /// Load the reports around the position and watch for changes.
    pub async fn refresh(&self, lat: f64, lng: f64, radius: f64) -> Result<()> {
        let area = WatchArea { lat, lng, radius };
        let (reply, rx) = oneshot::channel();
        self.send(Command::Refresh { area, reply }).await?;
        rx.await.map_err(|_| stopped())?
    }

    /// Close the live channel without reconnecting. Does nothing
    /// if already disconnected.
    pub async fn disconnect(&self) {
        let (reply, rx) = oneshot::channel();
        if self.send(Command::Disconnect { reply }).await.is_ok() {
            let _ = rx.await;
        }
    }

    pub async fn submit(&self, new_report: NewReport) -> Result<Report> {
        let report = self.reports.submit(&new_report).await?;
        self.send(Command::Submitted(report.clone())).await?;
        Ok(report)
    }

    pub async fn rate(&self, id: &str, is_upvote: bool) -> Result<RatingResult> {
        let rating = self.reports.rate(id, is_upvote).await?;
        self.send(Command::Rated(rating.clone())).await?;
        Ok(rating)
    }

    pub fn view(&self) -> watch::Receiver<SyncView> {
        self.view.clone()
    }

    pub fn current(&self) -> SyncView {
        self.view.borrow().clone()
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands.send(command).await.map_err(|_| stopped())
    }
}

struct SyncDriver {
    engine: SyncEngine,
    reports: Arc<dyn ReportsApi>,
    live: Arc<dyn LiveConnector>,
    commands: mpsc::Receiver<Command>,
    view: watch::Sender<SyncView>,
    channel: Option<Box<dyn LiveChannel>>,
    reconnect_at: Option<Instant>,
}

async fn next_event(channel: &mut Option<Box<dyn LiveChannel>>) -> Option<Result<LiveEvent>> {
    match channel {
        Some(channel) => channel.next_event().await,
        None => future::pending().await,
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}

async fn open_channel(live: &dyn LiveConnector, area: WatchArea) -> Result<Box<dyn LiveChannel>> {
    let mut channel = live.connect().await?;
    channel.send(&area.command()).await?;
    Ok(channel)
}

impl SyncDriver {
    async fn run(mut self) {
        loop {
            let reconnect_at = self.reconnect_at;
            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        break;
                    };
                    self.handle(command).await;
                }
                event = next_event(&mut self.channel) => self.on_event(event),
                () = sleep_until_deadline(reconnect_at) => {
                    self.reconnect_at = None;
                    self.connect(true).await;
                }
            }
            self.publish();
        }
        self.close_channel().await;
        log::debug!("Synchronization stopped");
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::Refresh { area, reply } => {
                let res = self.refresh(area).await;
                self.publish();
                let _ = reply.send(res);
            }
            Command::Disconnect { reply } => {
                self.engine.disconnect();
                self.reconnect_at = None;
                self.close_channel().await;
                self.publish();
                let _ = reply.send(());
            }
            Command::Submitted(report) => self.engine.submitted(report),
            Command::Rated(rating) => self.engine.rated(&rating),
        }
    }

    async fn refresh(&mut self, area: WatchArea) -> Result<()> {
        self.engine.begin_refresh(area);
        self.reconnect_at = None;
        self.close_channel().await;
        self.publish();
        if let Err(err) = self.load_snapshot(area).await {
            // Retry like a lost channel, the reconnect reloads the snapshot
            if err.is_retryable() {
                self.connection_lost(Some(err.clone()));
            }
            return Err(err);
        }
        self.connect(false).await;
        Ok(())
    }

    async fn load_snapshot(&mut self, area: WatchArea) -> Result<()> {
        match self.reports.nearby(area.lat, area.lng, area.radius).await {
            Ok(reports) => {
                self.engine.snapshot_loaded(reports);
                Ok(())
            }
            Err(err) => {
                log::warn!("Failed to load nearby reports: {err}");
                self.engine.request_failed(err.clone());
                Err(err)
            }
        }
    }

    /// Catches up on missed events after a reconnect if `resync` is set.
    async fn connect(&mut self, resync: bool) {
        let Some(area) = self.engine.area() else {
            return;
        };
        self.engine.connecting();
        self.publish();
        match open_channel(&*self.live, area).await {
            Ok(channel) => {
                log::info!("Watching reports around ({}, {})", area.lat, area.lng);
                self.channel = Some(channel);
                self.engine.connected();
                if resync {
                    let _ = self.load_snapshot(area).await;
                }
            }
            Err(err) => {
                log::warn!("Failed to open live channel: {err}");
                self.connection_lost(Some(err));
            }
        }
    }

    fn on_event(&mut self, event: Option<Result<LiveEvent>>) {
        match event {
            Some(Ok(event)) => {
                self.engine.apply(&event);
            }
            Some(Err(err)) if !err.is_retryable() => {
                log::warn!("Ignoring unexpected live message: {err}");
                self.engine.request_failed(err);
            }
            Some(Err(err)) => self.connection_lost(Some(err)),
            None => self.connection_lost(None),
        }
    }

    fn connection_lost(&mut self, err: Option<Error>) {
        self.channel = None;
        self.reconnect_at = self.engine.connection_lost(err).map(|delay| {
            log::info!("Reconnecting in {}s", delay.as_secs());
            Instant::now() + delay
        });
    }

    async fn close_channel(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            channel.close().await;
        }
    }

    fn publish(&self) {
        let view = self.engine.view();
        self.view.send_if_modified(|current| {
            if *current == view {
                return false;
            }
            *current = view;
            true
        });
    }
}
