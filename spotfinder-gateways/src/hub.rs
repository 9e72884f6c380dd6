use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use parking_lot::RwLock;
use spotfinder_core::{
    entities::{CellKey, MapPoint},
    gateways::broadcast::{ReportEvent, ReportEventGateway},
};
use tokio::sync::mpsc::{self, error::TrySendError};

pub type ConnectionId = u64;

pub type EventReceiver = mpsc::Receiver<ReportEvent>;

struct Connection {
    tx: mpsc::Sender<ReportEvent>,
    cell: Option<CellKey>,
}

#[derive(Default)]
struct Registry {
    next_id: ConnectionId,
    connections: HashMap<ConnectionId, Connection>,
    cells: HashMap<CellKey, HashSet<ConnectionId>>,
}

impl Registry {
    fn leave_cell(&mut self, id: ConnectionId, cell: CellKey) {
        if let Some(members) = self.cells.get_mut(&cell) {
            members.remove(&id);
            if members.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }

    fn remove(&mut self, id: ConnectionId) -> bool {
        let Some(conn) = self.connections.remove(&id) else {
            return false;
        };
        if let Some(cell) = conn.cell {
            self.leave_cell(id, cell);
        }
        true
    }
}

/// Location scoped fan-out of report events to live connections.
///
/// Every connection owns a bounded queue. Publishing never waits for a
/// receiver: a full queue loses that single event and a closed queue
/// unregisters its connection.
#[derive(Clone, Default)]
pub struct BroadcastHub {
    registry: Arc<RwLock<Registry>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_connection(&self, capacity: usize) -> (ConnectionId, EventReceiver) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let mut registry = self.registry.write();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.connections.insert(id, Connection { tx, cell: None });
        log::debug!("Opened live connection {id}");
        (id, rx)
    }

    /// Join `cell`, leaving the previous one if any.
    ///
    /// Returns `false` if the connection is unknown.
    pub fn subscribe(&self, id: ConnectionId, cell: CellKey) -> bool {
        let mut registry = self.registry.write();
        let Some(conn) = registry.connections.get_mut(&id) else {
            return false;
        };
        let previous = conn.cell.replace(cell);
        if let Some(previous) = previous {
            registry.leave_cell(id, previous);
        }
        registry.cells.entry(cell).or_default().insert(id);
        log::debug!("Live connection {id} joined {cell}");
        true
    }

    pub fn unsubscribe(&self, id: ConnectionId) {
        let mut registry = self.registry.write();
        let cell = registry
            .connections
            .get_mut(&id)
            .and_then(|conn| conn.cell.take());
        if let Some(cell) = cell {
            registry.leave_cell(id, cell);
            log::debug!("Live connection {id} left {cell}");
        }
    }

    pub fn disconnect(&self, id: ConnectionId) {
        if self.registry.write().remove(id) {
            log::debug!("Closed live connection {id}");
        }
    }

    pub fn connection_count(&self) -> usize {
        self.registry.read().connections.len()
    }

    pub fn subscriber_count(&self, cell: &CellKey) -> usize {
        self.registry
            .read()
            .cells
            .get(cell)
            .map(HashSet::len)
            .unwrap_or_default()
    }

    fn deliver(&self, origin: MapPoint, event: &ReportEvent) -> Vec<ConnectionId> {
        let registry = self.registry.read();
        let mut closed = vec![];
        let mut delivered = 0;
        let targets = registry
            .cells
            .iter()
            .filter(|(cell, _)| cell.may_contain(origin))
            .flat_map(|(_, members)| members.iter());
        for id in targets {
            let Some(conn) = registry.connections.get(id) else {
                continue;
            };
            match conn.tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    log::warn!(
                        "Dropped event for report {} on slow live connection {id}",
                        event.report_id()
                    );
                }
                Err(TrySendError::Closed(_)) => closed.push(*id),
            }
        }
        log::debug!(
            "Delivered event for report {} to {delivered} live connection(s)",
            event.report_id()
        );
        closed
    }
}

impl ReportEventGateway for BroadcastHub {
    fn publish(&self, origin: MapPoint, event: ReportEvent) {
        let closed = self.deliver(origin, &event);
        if closed.is_empty() {
            return;
        }
        let mut registry = self.registry.write();
        for id in closed {
            log::info!("Removing closed live connection {id}");
            registry.remove(id);
        }
    }
}
