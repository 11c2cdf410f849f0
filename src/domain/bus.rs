use super::{
    BusConfig, Criteria, IdentityError, Matcher, Subscriber, SubscriberIdentity, SubscriberJob,
    Subscription, SubscriptionStore,
};
use crate::library::worker::{EngineConnection, WorkerEngine};
use crate::library::{BoxedError, EmptyResult};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

/// Errors raised while (un-)registering subscriptions
#[derive(Debug, Error)]
pub enum BusError {
    /// Subscriber identity is malformed
    #[error("invalid subscriber identity")]
    Identity(#[from] IdentityError),
    /// Subscription could not be encoded
    #[error("unable to serialize subscription")]
    Serialization(#[from] serde_json::Error),
    /// No connection could be acquired from the engine
    #[error("unable to acquire connection")]
    Connection(#[source] BoxedError),
    /// Commands were rejected by or could not be sent to the store
    #[error("unable to write to subscription store")]
    Store(#[source] BoxedError),
}

/// Entry point for registering subscribers with the ResqueBus driver and processing their events
pub struct Bus<E: WorkerEngine> {
    engine: Arc<E>,
    config: BusConfig,
}

impl<E: WorkerEngine> Bus<E> {
    /// Creates a new instance using the given engine for storage and job processing
    pub fn new(engine: Arc<E>, config: BusConfig) -> Self {
        Self { engine, config }
    }

    /// Engine backing this bus
    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Key naming configuration
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Registers a subscriber for events matching the given criteria
    ///
    /// The subscription is written to the applications hash and the application is added to the
    /// list of known applications. Afterwards, the subscriber is registered with the engine so
    /// that jobs routed into `queue` reach it. When no event type is part of the criteria, the
    /// last segment of the identity is used instead.
    ///
    /// Subscribing the same identity to the same event type again overwrites the previous
    /// subscription.
    #[instrument(skip(self, subscriber, criteria))]
    pub async fn subscribe<S: Subscriber + 'static>(
        &self,
        application: &str,
        queue: &str,
        identity: &str,
        subscriber: S,
        criteria: Option<Criteria>,
    ) -> Result<Subscription, BusError> {
        let identity = SubscriberIdentity::new(identity)?;
        let matcher = Matcher::encode(criteria, identity.name());
        let subscription = Subscription::new(
            queue.to_string(),
            &identity,
            matcher,
            &self.config.subscriber_marker,
        );
        let serialized = serde_json::to_string(&subscription)?;

        let store = SubscriptionStore::new(&self.config, self.engine.namespace());
        let application_key = store.application_key(application);

        debug!(
            %application_key,
            key = %subscription.key,
            class = %subscription.class,
            "Writing subscription"
        );

        self.with_connection(|con| {
            store.put(con, &application_key, &subscription.key, &serialized)?;
            store.register_application(con, application)
        })
        .await?;

        self.engine.register_job_class(
            subscription.class.clone(),
            Arc::new(SubscriberJob::new(
                Arc::new(subscriber),
                identity,
                application.to_string(),
            )),
        );

        info!(
            class = %subscription.class,
            event = subscription.event_type(),
            "Subscribed"
        );

        Ok(subscription)
    }

    /// Removes an application and all of its subscriptions from the store
    ///
    /// Handlers registered with the engine stay in place.
    #[instrument(skip(self))]
    pub async fn unsubscribe(&self, application: &str) -> Result<(), BusError> {
        let store = SubscriptionStore::new(&self.config, self.engine.namespace());

        self.with_connection(|con| store.remove_application(con, application))
            .await?;

        info!("Unsubscribed");

        Ok(())
    }

    /// Processes jobs until the engine gives up
    pub async fn work(&self) -> EmptyResult {
        self.engine.run_work_loop().await
    }

    /// Queues commands on a borrowed connection and flushes them, releasing the connection afterwards
    async fn with_connection<F>(&self, queue_commands: F) -> Result<(), BusError>
    where
        F: FnOnce(&mut E::Connection) -> EmptyResult,
    {
        let mut con = self.engine.acquire_connection().await.map_err(|e| {
            error!(error = %e, "Unable to acquire connection");
            BusError::Connection(e)
        })?;

        let result = match queue_commands(&mut con) {
            Ok(_) => con.flush().await,
            Err(e) => Err(e),
        };

        self.engine.release_connection(con).await;

        result.map_err(|e| {
            error!(error = %e, "Unable to write to subscription store");
            BusError::Store(e)
        })
    }
}
