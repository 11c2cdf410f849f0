use crate::constants::{APP_LIST_KEY, APP_SINGLE_KEY, SUBSCRIBER_MARKER};

/// Immutable key naming configuration of a [`Bus`](super::Bus)
///
/// The defaults match the ResqueBus driver and should only be changed when talking to a driver
/// that has been configured differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusConfig {
    /// Name of the set listing all registered applications
    pub app_list_key: String,
    /// Prefix of the hash holding the subscriptions of an application
    pub app_single_key: String,
    /// Marker embedded in subscription keys between identity prefix and name
    pub subscriber_marker: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            app_list_key: APP_LIST_KEY.to_string(),
            app_single_key: APP_SINGLE_KEY.to_string(),
            subscriber_marker: SUBSCRIBER_MARKER.to_string(),
        }
    }
}
