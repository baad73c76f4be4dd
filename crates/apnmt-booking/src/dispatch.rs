use serde::Serialize;
use tracing::error;

use apnmt_core::events::{DomainEvent, DomainEventKind};
use apnmt_core::publish::EventPublisher;

/// Assemble and publish the change event for a committed write.
/// Best-effort: assembly and delivery failures are logged and swallowed,
/// never rolled back into the caller.
pub(crate) async fn dispatch_event<P, T>(publisher: &P, kind: DomainEventKind, entity: &T)
where
    P: EventPublisher,
    T: Serialize,
{
    let event = match DomainEvent::assemble(kind, entity) {
        Ok(event) => event,
        Err(err) => {
            error!("failed to assemble {kind:?} event: {err}");
            return;
        }
    };

    if let Err(err) = publisher.publish(event.kind.topic(), &event).await {
        error!(
            "failed to publish {kind:?} event to {}: {err}",
            event.kind.topic()
        );
    }
}
