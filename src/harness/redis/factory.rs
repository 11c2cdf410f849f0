use super::RedisResource;
use crate::library::worker::implementation::redis::{RedisConnectionVariant, RedisFactory};
use crate::library::BoxedError;
use async_trait::async_trait;
use jatsl::{TaskManager, TaskResourceHandle};
use redis::aio::Connection;
use std::sync::Arc;

/// [`RedisFactory`] implementation providing [`jatsl`] interop
///
/// Every connection is tied to a resource handle so that a job using it is restarted when
/// the connection drops.
pub struct MonitoredRedisFactory {
    url: String,
    handle_provider: BoxedResourceHandleProvider,
    logging_enabled: bool,
}

impl MonitoredRedisFactory {
    /// Creates a new factory opening connections to the given URL
    pub fn new(url: String, handle_provider: BoxedResourceHandleProvider) -> Self {
        Self {
            url,
            handle_provider,
            logging_enabled: false,
        }
    }

    /// Creates a factory for the same server which obtains its handles from a different provider
    pub fn with_handle_provider(&self, handle_provider: BoxedResourceHandleProvider) -> Self {
        Self {
            url: self.url.clone(),
            handle_provider,
            logging_enabled: self.logging_enabled,
        }
    }

    /// Enables trace logging of every command sent through connections created afterwards
    pub fn set_logging(&mut self, enabled: bool) {
        self.logging_enabled = enabled;
    }

    /// URL connections are opened to
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RedisFactory for MonitoredRedisFactory {
    type Connection = RedisResource<Connection>;

    async fn connection(
        &self,
        _variant: RedisConnectionVariant,
    ) -> Result<Self::Connection, BoxedError> {
        let handle = self.handle_provider.create_handle();
        let mut resource = RedisResource::connect(&self.url, handle).await?;
        resource.set_logging(self.logging_enabled);

        Ok(resource)
    }
}

/// Factory to provide [`TaskResourceHandle`] instances
pub trait ResourceHandleProvider {
    /// Instantiates a new [`TaskResourceHandle`]
    fn create_handle(&self) -> TaskResourceHandle;
}

/// Stub resource handle provider
///
/// Creates new instances using [`TaskResourceHandle::stub()`] for situations where you do not need redundancy or task management
pub struct DummyResourceHandleProvider {}

impl DummyResourceHandleProvider {
    /// Creates a new instance wrapped in an [`Arc`]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {})
    }
}

impl ResourceHandleProvider for DummyResourceHandleProvider {
    fn create_handle(&self) -> TaskResourceHandle {
        TaskResourceHandle::stub()
    }
}

impl<C> ResourceHandleProvider for TaskManager<C> {
    fn create_handle(&self) -> TaskResourceHandle {
        self.create_resource_handle()
    }
}

/// Dynamic dispatch version of [`ResourceHandleProvider`]
pub type BoxedResourceHandleProvider = Arc<dyn ResourceHandleProvider + Send + Sync>;
