use async_trait::async_trait;

use mentor_common::error::AppError;
use mentor_common::types::MentorshipRequest;

/// Read access to the requests visible to the signed-in account.
#[async_trait]
pub trait RequestDirectory: Send + Sync {
    /// Requests where the signed-in account is the receiver.
    async fn incoming(&self) -> Result<Vec<MentorshipRequest>, AppError>;

    /// Requests where the signed-in account is the sender.
    async fn outgoing(&self) -> Result<Vec<MentorshipRequest>, AppError>;
}
