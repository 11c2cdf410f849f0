use super::{keys, Matcher, SubscriberIdentity};
use serde::{Deserialize, Serialize};

/// Registration record read by the ResqueBus driver
///
/// Stored as JSON in the applications hash under its [`key`](Subscription::key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Queue the driver enqueues matching events into
    pub queue_name: String,
    /// Unique field name within the applications hash
    pub key: String,
    /// Job class the driver enqueues matching events with
    pub class: String,
    /// Criteria an event has to satisfy
    pub matcher: Matcher,
}

impl Subscription {
    /// Derives key and class name from the identity and the matchers event type
    pub fn new(
        queue_name: String,
        identity: &SubscriberIdentity,
        matcher: Matcher,
        marker: &str,
    ) -> Self {
        let event_type = matcher.event_type();

        Self {
            queue_name,
            key: keys::subscription_key(identity, event_type, marker),
            class: keys::class_name(identity, event_type),
            matcher,
        }
    }

    /// Event type the subscription listens for
    pub fn event_type(&self) -> &str {
        self.matcher.event_type()
    }
}
