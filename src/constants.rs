//! Wire-level constants shared with the ResqueBus driver
//!
//! Changing any of these breaks interoperability with existing drivers. They are used as defaults
//! for [`BusConfig`](crate::domain::BusConfig) and [`RedisEngineConfig`](crate::library::worker::implementation::redis::RedisEngineConfig).

/// Namespace prefix prepended to every key by Resque
pub const DEFAULT_NAMESPACE: &str = "resque:";

/// Set containing every application with an active registration
pub const APP_LIST_KEY: &str = "resquebus_apps";

/// Prefix of the hash storing all subscriptions of one application
pub const APP_SINGLE_KEY: &str = "resquebus_app";

/// Marker separating the identity prefix from the subscriber name in subscription keys
pub const SUBSCRIBER_MARKER: &str = "__busSubscriber__";

/// Matcher criterion and payload field naming the event type
pub const BUS_EVENT_TYPE: &str = "bus_event_type";

/// Prefix of all sentinel matcher values
pub const SPECIAL_VALUE_PREFIX: &str = "bus_special_value_";
