use async_trait::async_trait;

use crate::events::DomainEvent;

/// Best-effort delivery to the message bus. One call per committed write;
/// a failed publish must not undo the write.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, topic: &str, event: &DomainEvent) -> anyhow::Result<()>;
}
