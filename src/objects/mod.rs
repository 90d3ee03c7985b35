//! Object storage for uploaded session audio.

mod local;

pub use local::LocalObjectStore;

use crate::error::Result;

#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Remove the object at `key`. Removing a missing object succeeds.
    async fn delete_object(&self, key: &str) -> Result<()>;
}
