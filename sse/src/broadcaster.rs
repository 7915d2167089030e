use crate::connection::{ConnectionSettings, DeliveryReport, Subscription};
use crate::error::Error;
use crate::message::{Action, Envelope};
use crate::registry::GroupRegistry;
use crate::sequence::SequenceCounter;
use crate::template::FragmentRenderer;
use log::*;
use serde_json::Value;

/// Result of a successful broadcast call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Broadcast {
    pub sequence: u64,
    pub report: DeliveryReport,
}

/// Entry point for producers and the transport: one registry and one
/// sequence space per instance.
pub struct Broadcaster {
    registry: GroupRegistry,
    sequence: SequenceCounter,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::with_settings(ConnectionSettings::default())
    }

    pub fn with_settings(settings: ConnectionSettings) -> Self {
        Self {
            registry: GroupRegistry::new(settings),
            sequence: SequenceCounter::new(),
        }
    }

    /// Register a new connection in `group`
    pub fn subscribe(&self, group: &str) -> Subscription {
        let subscription = self.registry.subscribe(group);
        info!(
            "Registered new SSE connection {} in group '{group}'",
            subscription.id().as_str()
        );
        subscription
    }

    /// Wrap an already rendered fragment in an envelope and fan it out to `group`.
    pub fn broadcast(
        &self,
        group: &str,
        action: Action,
        target: &str,
        fragment_html: &str,
    ) -> Result<Broadcast, Error> {
        let payload = Envelope::new(action, target, fragment_html).render();
        Ok(self.publish(group, payload))
    }

    /// Render `template` with the collaborator, then broadcast the result.
    ///
    /// A render failure is returned before any id is consumed or anything is sent.
    pub fn send_event<R>(
        &self,
        group: &str,
        action: Action,
        target: &str,
        renderer: &R,
        template: &str,
        data: &Value,
    ) -> Result<Broadcast, Error>
    where
        R: FragmentRenderer + ?Sized,
    {
        let fragment_html = renderer.render(template, data)?;
        self.broadcast(group, action, target, &fragment_html)
    }

    fn publish(&self, group: &str, payload: String) -> Broadcast {
        let set = self.registry.get_or_create(group);
        let (sequence, report) = set.publish(&self.sequence, payload);

        debug!(
            "Broadcast event {sequence} to group '{group}': {} delivered, {} dropped, {} evicted",
            report.delivered, report.dropped, report.evicted
        );

        Broadcast { sequence, report }
    }

    /// Close every connection of `group` and forget it. Unknown groups are ignored.
    pub fn close(&self, group: &str) {
        let closed = self.registry.remove(group);
        info!("Closed SSE group '{group}' ({closed} connection(s))");
    }

    /// Close every group, e.g. before shutting the server down.
    pub fn close_all(&self) {
        let closed = self.registry.remove_all();
        info!("Closed all SSE groups ({closed} connection(s))");
    }

    pub fn connection_count(&self, group: &str) -> usize {
        self.registry.get(group).map_or(0, |set| set.len())
    }

    pub fn group_count(&self) -> usize {
        self.registry.len()
    }

    /// Last sequence id issued by this instance.
    pub fn last_sequence(&self) -> u64 {
        self.sequence.current()
    }
}

impl Default for Broadcaster {
    fn default() -> Self {
        Self::new()
    }
}
