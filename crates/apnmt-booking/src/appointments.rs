use chrono::{DateTime, Utc};
use uuid::Uuid;

use apnmt_core::availability;
use apnmt_core::error::BookingError;
use apnmt_core::events::DomainEventKind;
use apnmt_core::models::{Appointment, AppointmentDraft};
use apnmt_core::publish::EventPublisher;
use apnmt_core::storage::AppointmentStore;

use crate::dispatch::dispatch_event;
use crate::validate;

/// Coordinates appointment writes: validate, check the slot, persist, then
/// publish the change event best-effort.
#[derive(Clone)]
pub struct AppointmentService<S, P> {
    store: S,
    publisher: P,
}

impl<S, P> AppointmentService<S, P>
where
    S: AppointmentStore,
    P: EventPublisher,
{
    pub fn new(store: S, publisher: P) -> Self {
        Self { store, publisher }
    }

    pub async fn create(&self, draft: AppointmentDraft) -> Result<Appointment, BookingError> {
        if draft.id.is_some() {
            return Err(BookingError::BadRequest(
                "a new appointment cannot already have an id".to_string(),
            ));
        }

        let appointment = validate::appointment(&draft, Uuid::new_v4())?;
        self.ensure_slot_available(&appointment, None).await?;

        let appointment = self.store.save(appointment).await?;
        dispatch_event(
            &self.publisher,
            DomainEventKind::AppointmentCreated,
            &appointment,
        )
        .await;

        Ok(appointment)
    }

    pub async fn get(&self, id: Uuid) -> Result<Appointment, BookingError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(BookingError::NotFound {
                entity: "appointment",
                id,
            })
    }

    pub async fn list(&self) -> Result<Vec<Appointment>, BookingError> {
        Ok(self.store.find_all().await?)
    }

    /// Full replace: every field of the draft is validated and overwrites
    /// the persisted appointment.
    pub async fn update(
        &self,
        id: Uuid,
        draft: AppointmentDraft,
    ) -> Result<Appointment, BookingError> {
        validate::body_id("appointment", id, draft.id)?;
        self.get(id).await?;

        let appointment = validate::appointment(&draft, id)?;
        self.ensure_slot_available(&appointment, Some(id)).await?;

        let appointment = self.store.save(appointment).await?;
        dispatch_event(
            &self.publisher,
            DomainEventKind::AppointmentUpdated,
            &appointment,
        )
        .await;

        Ok(appointment)
    }

    /// Partial merge: fields absent from the draft retain their persisted
    /// values; the merged result is re-validated in full.
    pub async fn patch(
        &self,
        id: Uuid,
        draft: AppointmentDraft,
    ) -> Result<Appointment, BookingError> {
        validate::body_id("appointment", id, draft.id)?;
        let current = self.get(id).await?;

        let merged = AppointmentDraft {
            id: Some(id),
            start_at: draft.start_at.or(Some(current.start_at)),
            end_at: draft.end_at.or(Some(current.end_at)),
            organization_id: draft.organization_id.or(Some(current.organization_id)),
            employee_id: draft.employee_id.or(Some(current.employee_id)),
            customer_id: draft.customer_id.or(current.customer_id),
        };

        let appointment = validate::appointment(&merged, id)?;
        self.ensure_slot_available(&appointment, Some(id)).await?;

        let appointment = self.store.save(appointment).await?;
        dispatch_event(
            &self.publisher,
            DomainEventKind::AppointmentUpdated,
            &appointment,
        )
        .await;

        Ok(appointment)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), BookingError> {
        let appointment = self.get(id).await?;
        self.store.delete(id).await?;

        dispatch_event(
            &self.publisher,
            DomainEventKind::AppointmentDeleted,
            &appointment,
        )
        .await;

        Ok(())
    }

    /// Whether [candidate_start, candidate_end) is free for the employee
    /// within the organization, optionally ignoring one appointment id.
    pub async fn is_slot_available(
        &self,
        candidate_start: DateTime<Utc>,
        candidate_end: DateTime<Utc>,
        employee_id: i64,
        organization_id: i64,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, BookingError> {
        let existing = self
            .store
            .find_for_employee(employee_id, organization_id)
            .await?;

        Ok(availability::is_slot_available(
            candidate_start,
            candidate_end,
            &existing,
            exclude_id,
        ))
    }

    async fn ensure_slot_available(
        &self,
        appointment: &Appointment,
        exclude_id: Option<Uuid>,
    ) -> Result<(), BookingError> {
        let available = self
            .is_slot_available(
                appointment.start_at,
                appointment.end_at,
                appointment.employee_id,
                appointment.organization_id,
                exclude_id,
            )
            .await?;

        if !available {
            return Err(BookingError::SlotUnavailable {
                start_at: appointment.start_at,
                end_at: appointment.end_at,
                employee_id: appointment.employee_id,
            });
        }

        Ok(())
    }
}
