//! The `EventSource` trait: the query function a poller consumes.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::event::{GetEventsRequest, GetEventsResponse};

/// Anything that can answer a `getEvents` query.
///
/// Implementations must be `Send + Sync` so a poller task can own them
/// behind an `Arc<dyn EventSource>`.
#[async_trait]
pub trait EventSource: Send + Sync + 'static {
    /// Run one event query.
    async fn get_events(&self, req: GetEventsRequest) -> Result<GetEventsResponse, TransportError>;

    /// Identifier used in logs (endpoint URL or a test name).
    fn name(&self) -> &str {
        "event-source"
    }
}
