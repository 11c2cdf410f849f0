use super::{keys, BusConfig};
use crate::library::worker::EngineConnection;
use crate::library::EmptyResult;
use tracing::trace;

/// Writes subscriptions to the store read by the ResqueBus driver
///
/// Methods only queue commands on the passed connection, the caller is responsible for flushing
/// them in one batch and returning the connection afterwards.
pub struct SubscriptionStore<'a> {
    config: &'a BusConfig,
    namespace: &'a str,
}

impl<'a> SubscriptionStore<'a> {
    /// Creates a new instance for keys within the given namespace
    pub fn new(config: &'a BusConfig, namespace: &'a str) -> Self {
        Self { config, namespace }
    }

    /// Key of the hash holding all subscriptions of an application
    pub fn application_key(&self, application: &str) -> String {
        keys::application_key(self.namespace, &self.config.app_single_key, application)
    }

    /// Key of the set listing all registered applications
    pub fn application_list_key(&self) -> String {
        keys::application_list_key(self.namespace, &self.config.app_list_key)
    }

    /// Stores a serialized subscription as a field of the applications hash, creating it if necessary
    pub fn put<C: EngineConnection>(
        &self,
        con: &mut C,
        application_key: &str,
        subscription_key: &str,
        serialized: &str,
    ) -> EmptyResult {
        trace!(application_key, subscription_key, "Queueing HSET");
        con.queue_command("HSET", &[application_key, subscription_key, serialized])
    }

    /// Adds an application to the set of known applications so that the driver can find its subscriptions
    pub fn register_application<C: EngineConnection>(
        &self,
        con: &mut C,
        application: &str,
    ) -> EmptyResult {
        let list_key = self.application_list_key();
        trace!(%list_key, application, "Queueing SADD");
        con.queue_command("SADD", &[&list_key, application])
    }

    /// Removes an application from the set of known applications and deletes all its subscriptions
    pub fn remove_application<C: EngineConnection>(
        &self,
        con: &mut C,
        application: &str,
    ) -> EmptyResult {
        let list_key = self.application_list_key();
        let application_key = self.application_key(application);

        trace!(%list_key, %application_key, "Queueing SREM and DEL");
        con.queue_command("SREM", &[&list_key, application])?;
        con.queue_command("DEL", &[&application_key])
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use crate::library::worker::implementation::mock::MockWorkerEngine;
    use crate::library::worker::WorkerEngine;

    #[tokio::test]
    async fn write_subscription_and_application() {
        let engine = MockWorkerEngine::default();
        let config = BusConfig::default();
        let store = SubscriptionStore::new(&config, engine.namespace());
        let application_key = store.application_key("app1");

        let mut con = engine.acquire_connection().await.unwrap();
        store
            .put(&mut con, &application_key, "main.__busSubscriber__cb__evtA", "{}")
            .unwrap();
        store.register_application(&mut con, "app1").unwrap();
        con.flush().await.unwrap();
        engine.release_connection(con).await;

        let hash = engine.hash("resque:resquebus_app:app1").unwrap();
        assert_eq!(hash.get("main.__busSubscriber__cb__evtA").unwrap(), "{}");
        assert!(engine
            .set("resque:resquebus_apps")
            .unwrap()
            .contains("app1"));
        assert_eq!(engine.flushes(), 1);
    }

    #[tokio::test]
    async fn remove_application_and_subscriptions() {
        let engine = MockWorkerEngine::default();
        let config = BusConfig::default();
        let store = SubscriptionStore::new(&config, engine.namespace());
        let application_key = store.application_key("app1");

        let mut con = engine.acquire_connection().await.unwrap();
        store.put(&mut con, &application_key, "field", "{}").unwrap();
        store.register_application(&mut con, "app1").unwrap();
        store.register_application(&mut con, "app2").unwrap();
        con.flush().await.unwrap();

        store.remove_application(&mut con, "app1").unwrap();
        con.flush().await.unwrap();
        engine.release_connection(con).await;

        assert!(engine.hash("resque:resquebus_app:app1").is_none());

        let applications = engine.set("resque:resquebus_apps").unwrap();
        assert!(!applications.contains("app1"));
        assert!(applications.contains("app2"));
    }

    #[test]
    fn honor_configured_keys() {
        let config = BusConfig {
            app_list_key: "apps".into(),
            app_single_key: "app".into(),
            ..BusConfig::default()
        };
        let store = SubscriptionStore::new(&config, "ns:");

        assert_eq!(store.application_key("app1"), "ns:app:app1");
        assert_eq!(store.application_list_key(), "ns:apps");
    }
}
