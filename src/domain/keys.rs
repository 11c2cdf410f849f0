//! Redis keys and routing identifiers
//!
//! All functions in here are pure and only depend on their arguments so that every process
//! registering the same subscriber arrives at the same keys.

use super::SubscriberIdentity;

/// Field name under which a subscription is stored inside its applications hash
///
/// Format: `{prefix}.{marker}{name}__{event_type}`
pub fn subscription_key(identity: &SubscriberIdentity, event_type: &str, marker: &str) -> String {
    format!(
        "{}.{}{}__{}",
        identity.prefix(),
        marker,
        identity.name(),
        event_type
    )
}

/// Job class the driver enqueues matching events with and the worker engine dispatches on
///
/// Format: `{path}-{event_type}`
pub fn class_name(identity: &SubscriberIdentity, event_type: &str) -> String {
    format!("{}-{}", identity.path(), event_type)
}

/// Hash containing all subscriptions of an application
///
/// Format: `{namespace}{app_single_key}:{application}`
pub fn application_key(namespace: &str, app_single_key: &str, application: &str) -> String {
    format!("{}{}:{}", namespace, app_single_key, application)
}

/// Set containing the names of all registered applications
///
/// Format: `{namespace}{app_list_key}`
pub fn application_list_key(namespace: &str, app_list_key: &str) -> String {
    format!("{}{}", namespace, app_list_key)
}

#[cfg(test)]
mod does {
    use super::*;
    use crate::constants::{APP_LIST_KEY, APP_SINGLE_KEY, SUBSCRIBER_MARKER};

    fn identity() -> SubscriberIdentity {
        SubscriberIdentity::new("main.handlers.cb").unwrap()
    }

    #[test]
    fn build_subscription_key() {
        assert_eq!(
            subscription_key(&identity(), "evtA", SUBSCRIBER_MARKER),
            "main.handlers.__busSubscriber__cb__evtA"
        );
    }

    #[test]
    fn build_subscription_key_without_prefix() {
        let identity = SubscriberIdentity::new("cb").unwrap();

        assert_eq!(
            subscription_key(&identity, "evtA", SUBSCRIBER_MARKER),
            ".__busSubscriber__cb__evtA"
        );
    }

    #[test]
    fn build_class_name() {
        assert_eq!(class_name(&identity(), "evtA"), "main.handlers.cb-evtA");
    }

    #[test]
    fn derive_identical_keys_for_identical_input() {
        assert_eq!(
            subscription_key(&identity(), "evtA", SUBSCRIBER_MARKER),
            subscription_key(&identity(), "evtA", SUBSCRIBER_MARKER)
        );
        assert_eq!(class_name(&identity(), "evtA"), class_name(&identity(), "evtA"));
    }

    #[test]
    fn separate_event_types() {
        assert_ne!(class_name(&identity(), "evtA"), class_name(&identity(), "evtB"));
        assert_ne!(
            subscription_key(&identity(), "evtA", SUBSCRIBER_MARKER),
            subscription_key(&identity(), "evtB", SUBSCRIBER_MARKER)
        );
    }

    #[test]
    fn build_application_keys() {
        assert_eq!(
            application_key("resque:", APP_SINGLE_KEY, "app1"),
            "resque:resquebus_app:app1"
        );
        assert_eq!(application_key("", APP_SINGLE_KEY, "app1"), "resquebus_app:app1");
        assert_eq!(
            application_list_key("resque:", APP_LIST_KEY),
            "resque:resquebus_apps"
        );
    }
}
