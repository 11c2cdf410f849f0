mod factory;
mod resource;

pub use factory::*;
pub use resource::RedisResource;
