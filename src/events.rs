use serde::Serialize;
use std::fmt;
use tokio::sync::broadcast;
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 256;

/// Tables whose changes are published to realtime subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeTable {
    Campaigns,
    Notifications,
    AutomationRules,
}

impl fmt::Display for ChangeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeTable::Campaigns => "campaigns",
            ChangeTable::Notifications => "notifications",
            ChangeTable::AutomationRules => "automation_rules",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// A row change emitted at the service's own write sites. This stands in
/// for the hosted platform's change feed: the store publishes one event
/// per write to a subscribed table, and the SSE route fans them out to
/// connected clients.
#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    pub table: ChangeTable,
    pub op: ChangeOp,
    pub user_id: Uuid,
    pub row: serde_json::Value,
}

/// In-process publish/subscribe channel for [`ChangeEvent`]s. Subscribers
/// that fall behind skip missed events (broadcast semantics); delivery is
/// best effort, like the toast notifications it feeds.
#[derive(Clone)]
pub struct EventHub {
    tx: broadcast::Sender<ChangeEvent>,
}

impl EventHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Publish an event. A send with no live subscribers is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("change event dropped: no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let hub = EventHub::new();
        let mut rx = hub.subscribe();

        let user_id = Uuid::new_v4();
        hub.publish(ChangeEvent {
            table: ChangeTable::Notifications,
            op: ChangeOp::Insert,
            user_id,
            row: json!({"title": "Budget limit reached"}),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.table, ChangeTable::Notifications);
        assert_eq!(event.op, ChangeOp::Insert);
        assert_eq!(event.user_id, user_id);
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let hub = EventHub::new();
        hub.publish(ChangeEvent {
            table: ChangeTable::Campaigns,
            op: ChangeOp::Update,
            user_id: Uuid::new_v4(),
            row: json!({}),
        });
    }

    #[test]
    fn events_serialize_with_table_and_op_names() {
        let event = ChangeEvent {
            table: ChangeTable::AutomationRules,
            op: ChangeOp::Update,
            user_id: Uuid::nil(),
            row: json!({"is_active": true}),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["table"], "automation_rules");
        assert_eq!(value["op"], "UPDATE");
    }
}
