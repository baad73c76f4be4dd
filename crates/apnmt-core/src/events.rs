use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const APPOINTMENT_CHANGED_TOPIC: &str = "appointment.changed";
pub const CUSTOMER_CHANGED_TOPIC: &str = "customer.changed";
pub const SERVICE_CHANGED_TOPIC: &str = "service.changed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainEventKind {
    AppointmentCreated,
    AppointmentUpdated,
    AppointmentDeleted,
    CustomerCreated,
    CustomerUpdated,
    CustomerDeleted,
    ServiceCreated,
    ServiceUpdated,
    ServiceDeleted,
}

impl DomainEventKind {
    /// Topic the event is delivered on. One fixed topic per entity type.
    pub fn topic(self) -> &'static str {
        match self {
            Self::AppointmentCreated | Self::AppointmentUpdated | Self::AppointmentDeleted => {
                APPOINTMENT_CHANGED_TOPIC
            }
            Self::CustomerCreated | Self::CustomerUpdated | Self::CustomerDeleted => {
                CUSTOMER_CHANGED_TOPIC
            }
            Self::ServiceCreated | Self::ServiceUpdated | Self::ServiceDeleted => {
                SERVICE_CHANGED_TOPIC
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    pub id: Uuid,
    pub kind: DomainEventKind,
    pub occurred_at: DateTime<Utc>,
    pub payload: Value,
}

impl DomainEvent {
    /// Snapshot the persisted entity into an event of the given kind,
    /// stamped with the current time. The payload carries the entity's
    /// public fields, assigned identifier included.
    pub fn assemble<T: Serialize>(kind: DomainEventKind, entity: &T) -> serde_json::Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            occurred_at: Utc::now(),
            payload: serde_json::to_value(entity)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Service;
    use rust_decimal::Decimal;

    #[test]
    fn topics_are_fixed_per_entity_type() {
        assert_eq!(DomainEventKind::AppointmentCreated.topic(), "appointment.changed");
        assert_eq!(DomainEventKind::AppointmentDeleted.topic(), "appointment.changed");
        assert_eq!(DomainEventKind::CustomerUpdated.topic(), "customer.changed");
        assert_eq!(DomainEventKind::ServiceDeleted.topic(), "service.changed");
    }

    #[test]
    fn assemble_snapshots_entity_fields() {
        let service = Service {
            id: Uuid::new_v4(),
            name: "Haircut".to_string(),
            description: "Wash and cut".to_string(),
            duration: 30,
            cost: Decimal::new(200, 1),
            organization_id: 1,
        };

        let event = DomainEvent::assemble(DomainEventKind::ServiceCreated, &service).unwrap();

        assert_eq!(event.kind, DomainEventKind::ServiceCreated);
        assert_eq!(event.payload, serde_json::to_value(&service).unwrap());
        assert_eq!(
            event.payload["id"],
            serde_json::to_value(service.id).unwrap()
        );
    }
}
