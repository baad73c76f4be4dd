pub mod availability;
pub mod error;
pub mod events;
pub mod models;
pub mod publish;
pub mod storage;

pub use availability::is_slot_available;
pub use error::{BookingError, FieldError};
pub use events::{
    APPOINTMENT_CHANGED_TOPIC, CUSTOMER_CHANGED_TOPIC, DomainEvent, DomainEventKind,
    SERVICE_CHANGED_TOPIC,
};
pub use models::{
    Appointment, AppointmentDraft, Customer, CustomerDraft, Service, ServiceDraft,
};
pub use publish::EventPublisher;
pub use storage::{AppointmentStore, CustomerStore, ServiceStore};
