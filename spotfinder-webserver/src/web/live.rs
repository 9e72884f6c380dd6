use rocket::{
    futures::{SinkExt as _, StreamExt as _},
    get,
    http::Status,
    State,
};
use rocket_ws as ws;
use spotfinder_core::{entities::Timestamp, usecases};
use spotfinder_gateways::hub::{BroadcastHub, ConnectionId, EventReceiver};

use super::Cfg;
use crate::adapters::json::{self, to_json, LiveCommand, LiveEvent};

/// Push channel for report events around a watched position.
#[get("/live")]
pub fn live(socket: ws::WebSocket, hub: &State<BroadcastHub>, cfg: &State<Cfg>) -> ws::Channel<'static> {
    let hub = hub.inner().clone();
    let settings = cfg.reports;
    let capacity = cfg.live_channel_capacity;
    socket.channel(move |stream| {
        Box::pin(async move {
            let (id, events) = hub.open_connection(capacity);
            let res = serve(stream, &hub, id, events, &settings).await;
            hub.disconnect(id);
            if let Err(err) = &res {
                debug!("Live connection {id} failed: {err}");
            }
            res
        })
    })
}

async fn serve(
    mut stream: ws::stream::DuplexStream,
    hub: &BroadcastHub,
    id: ConnectionId,
    mut events: EventReceiver,
    settings: &usecases::ReportSettings,
) -> ws::result::Result<()> {
    loop {
        tokio::select! {
            incoming = stream.next() => {
                let Some(message) = incoming else {
                    break;
                };
                let reply = match message? {
                    ws::Message::Text(text) => handle_command(hub, id, settings, &text),
                    ws::Message::Close(_) => break,
                    _ => None,
                };
                if let Some(reply) = reply {
                    send(&mut stream, &reply).await?;
                }
            }
            Some(event) = events.recv() => {
                let event = to_json::live_event(event, Timestamp::now());
                send(&mut stream, &event).await?;
            }
        }
    }
    Ok(())
}

async fn send(stream: &mut ws::stream::DuplexStream, event: &LiveEvent) -> ws::result::Result<()> {
    match serde_json::to_string(event) {
        Ok(text) => stream.send(ws::Message::text(text)).await,
        Err(err) => {
            error!("Failed to encode live event: {err}");
            Ok(())
        }
    }
}

fn error_event(status: Status, message: impl ToString) -> LiveEvent {
    LiveEvent::Error(json::Error {
        http_status: status.code,
        message: message.to_string(),
    })
}

pub(crate) fn handle_command(
    hub: &BroadcastHub,
    id: ConnectionId,
    settings: &usecases::ReportSettings,
    text: &str,
) -> Option<LiveEvent> {
    let command = match serde_json::from_str::<LiveCommand>(text) {
        Ok(command) => command,
        Err(err) => {
            debug!("Invalid live command on connection {id}: {err}");
            return Some(error_event(Status::BadRequest, err));
        }
    };
    match command {
        LiveCommand::WatchNearby { lat, lng, radius } => {
            match usecases::nearby_query(settings, lat, lng, radius) {
                Ok(subscription) => {
                    let cell = subscription.cell_key();
                    hub.subscribe(id, cell);
                    Some(LiveEvent::Subscribed(cell.into()))
                }
                Err(err) => Some(error_event(Status::BadRequest, err)),
            }
        }
        LiveCommand::Unwatch => {
            hub.unsubscribe(id);
            None
        }
    }
}
