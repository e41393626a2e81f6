use async_trait::async_trait;

use crate::badge::PrintRequest;
use crate::error::DomainError;

/// Queue of incoming badge print requests.
///
/// A request is removed from the queue only once it is acknowledged; requests
/// that are never acknowledged may be delivered again.
#[async_trait]
pub trait PrintRequestSource: Send {
    /// Handle needed to acknowledge one delivery
    type Receipt: Send + Sync;

    /// Wait for the next request. Returns None once the source is closed.
    async fn receive(&mut self) -> Option<(PrintRequest, Self::Receipt)>;

    /// Confirm that the request behind `receipt` was handled
    async fn acknowledge(&mut self, receipt: Self::Receipt) -> Result<(), DomainError>;
}
