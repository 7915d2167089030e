use crate::message::StreamEvent;
use crate::sequence::SequenceCounter;
use log::*;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc::{self, error::TrySendError};

/// Unique identifier for a connection (server-generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle of one connection. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConnectionState {
    Open = 0,
    Closing = 1,
    Closed = 2,
}

#[derive(Debug)]
struct ConnectionStatus(AtomicU8);

impl ConnectionStatus {
    fn new() -> Self {
        Self(AtomicU8::new(ConnectionState::Open as u8))
    }

    fn get(&self) -> ConnectionState {
        match self.0.load(Ordering::Acquire) {
            0 => ConnectionState::Open,
            1 => ConnectionState::Closing,
            _ => ConnectionState::Closed,
        }
    }

    fn advance(&self, state: ConnectionState) {
        self.0.fetch_max(state as u8, Ordering::AcqRel);
    }
}

/// Per-connection delivery tuning shared by every set of a broadcaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Events a connection may have queued before new ones are dropped for it.
    pub buffer_capacity: usize,
    /// Consecutive dropped events after which the connection is evicted.
    pub max_rejected_deliveries: u32,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            buffer_capacity: 32,
            max_rejected_deliveries: 3,
        }
    }
}

/// Outcome of one fan-out over a set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub dropped: usize,
    pub evicted: usize,
}

/// Producer side of a registered connection, owned by its set.
struct Connection {
    sender: mpsc::Sender<Arc<StreamEvent>>,
    status: Arc<ConnectionStatus>,
    rejected: AtomicU32,
}

struct SetInner {
    closed: bool,
    connections: HashMap<ConnectionId, Connection>,
}

/// Live subscribers of one group.
///
/// Producers on one set are serialized by the delivery lock, so the order in
/// which ids are drawn is the order every connection receives them. Fan-out
/// holds the read lock; membership changes and `close` take the write lock,
/// which makes `close` atomic with respect to any broadcast on the same set.
pub struct ConnectionSet {
    group: String,
    settings: ConnectionSettings,
    delivery: Mutex<()>,
    inner: RwLock<SetInner>,
}

impl ConnectionSet {
    pub fn new(group: impl Into<String>, settings: ConnectionSettings) -> Self {
        Self {
            group: group.into(),
            settings: ConnectionSettings {
                buffer_capacity: settings.buffer_capacity.max(1),
                max_rejected_deliveries: settings.max_rejected_deliveries.max(1),
            },
            delivery: Mutex::new(()),
            inner: RwLock::new(SetInner {
                closed: false,
                connections: HashMap::new(),
            }),
        }
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Register a new connection and hand back its receiving end.
    ///
    /// Returns `None` once the set has been closed; callers should resolve the
    /// group again from the registry.
    pub fn subscribe(self: &Arc<Self>) -> Option<Subscription> {
        let mut inner = self.inner.write();
        if inner.closed {
            return None;
        }

        let (sender, receiver) = mpsc::channel(self.settings.buffer_capacity);
        let id = ConnectionId::new();
        let status = Arc::new(ConnectionStatus::new());

        inner.connections.insert(
            id.clone(),
            Connection {
                sender,
                status: Arc::clone(&status),
                rejected: AtomicU32::new(0),
            },
        );

        Some(Subscription {
            id,
            group: self.group.clone(),
            receiver,
            status,
            set: Arc::downgrade(self),
        })
    }

    /// Remove a connection. Returns whether it was still registered.
    pub fn unsubscribe(&self, connection_id: &ConnectionId) -> bool {
        let removed = self.inner.write().connections.remove(connection_id);

        match removed {
            Some(connection) => {
                connection.status.advance(ConnectionState::Closing);
                true
            }
            None => false,
        }
    }

    /// Number `payload` with the next id of `sequence` and offer it to every connection.
    ///
    /// The id is drawn while holding the delivery lock, so ids reach each
    /// connection in increasing order even with concurrent producers.
    pub fn publish(&self, sequence: &SequenceCounter, payload: String) -> (u64, DeliveryReport) {
        let _delivery = self.delivery.lock();
        let id = sequence.next_id();
        let report = self.fan_out(Arc::new(StreamEvent::message(id, payload)));
        (id, report)
    }

    /// Offer an already numbered `event` to every connection without waiting on any of them.
    pub fn broadcast(&self, event: Arc<StreamEvent>) -> DeliveryReport {
        let _delivery = self.delivery.lock();
        self.fan_out(event)
    }

    fn fan_out(&self, event: Arc<StreamEvent>) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let mut evict = Vec::new();

        {
            let inner = self.inner.read();
            if inner.closed {
                return report;
            }

            for (connection_id, connection) in inner.connections.iter() {
                match connection.sender.try_send(Arc::clone(&event)) {
                    Ok(()) => {
                        connection.rejected.store(0, Ordering::Relaxed);
                        report.delivered += 1;
                    }
                    Err(TrySendError::Full(_)) => {
                        report.dropped += 1;
                        let streak = connection.rejected.fetch_add(1, Ordering::Relaxed) + 1;
                        if streak >= self.settings.max_rejected_deliveries {
                            evict.push(connection_id.clone());
                        }
                    }
                    Err(TrySendError::Closed(_)) => {
                        report.dropped += 1;
                        evict.push(connection_id.clone());
                    }
                }
            }
        }

        for connection_id in evict {
            if self.unsubscribe(&connection_id) {
                warn!(
                    "Evicting SSE connection {} from group '{}': delivery path is not accepting events",
                    connection_id.as_str(),
                    self.group
                );
                report.evicted += 1;
            }
        }

        report
    }

    /// Close every connection and refuse further subscriptions. Returns how many were open.
    pub fn close(&self) -> usize {
        let mut inner = self.inner.write();
        inner.closed = true;

        let count = inner.connections.len();
        for (_, connection) in inner.connections.drain() {
            connection.status.advance(ConnectionState::Closing);
        }
        count
    }

    pub fn is_closed(&self) -> bool {
        self.inner.read().closed
    }

    pub fn len(&self) -> usize {
        self.inner.read().connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Consumer side of one connection, held by the transport for the life of the stream.
///
/// Dropping it unsubscribes the connection.
pub struct Subscription {
    id: ConnectionId,
    group: String,
    receiver: mpsc::Receiver<Arc<StreamEvent>>,
    status: Arc<ConnectionStatus>,
    set: Weak<ConnectionSet>,
}

impl Subscription {
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn state(&self) -> ConnectionState {
        self.status.get()
    }

    /// Wait for the next event. `None` means the connection is closed for good.
    pub async fn recv(&mut self) -> Option<Arc<StreamEvent>> {
        if self.status.get() != ConnectionState::Open {
            self.finish();
            return None;
        }

        let event = self.receiver.recv().await;
        self.accept(event)
    }

    /// Non-blocking variant of `recv`; `None` also when nothing is queued.
    pub fn try_recv(&mut self) -> Option<Arc<StreamEvent>> {
        if self.status.get() != ConnectionState::Open {
            self.finish();
            return None;
        }

        match self.receiver.try_recv() {
            Ok(event) => self.accept(Some(event)),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => self.accept(None),
        }
    }

    // Events still buffered when the connection left Open are discarded.
    fn accept(&mut self, event: Option<Arc<StreamEvent>>) -> Option<Arc<StreamEvent>> {
        match event {
            Some(event) if self.status.get() == ConnectionState::Open => Some(event),
            _ => {
                self.finish();
                None
            }
        }
    }

    fn finish(&mut self) {
        self.receiver.close();
        self.status.advance(ConnectionState::Closed);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(set) = self.set.upgrade() {
            set.unsubscribe(&self.id);
        }
        self.status.advance(ConnectionState::Closed);
    }
}
