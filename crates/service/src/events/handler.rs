use async_trait::async_trait;

use super::container::Scope;
use super::event::IntegrationEvent;

/// Reacts to one integration event type.
///
/// Errors are reported to the bus, which logs them and moves on to the next
/// handler; they never reach the publisher.
#[async_trait]
pub trait IntegrationEventHandler<E: IntegrationEvent>: Send + Sync + 'static {
    async fn handle(&self, event: &E) -> anyhow::Result<()>;
}

/// Builds a handler out of the dependencies available in a resolution scope.
///
/// `None` means the handler cannot be resolved in this scope; the bus then
/// skips it for the current dispatch.
pub trait FromScope: Sized {
    fn from_scope(scope: &Scope) -> Option<Self>;
}
