use uuid::Uuid;

use apnmt_core::error::BookingError;
use apnmt_core::events::DomainEventKind;
use apnmt_core::models::{Service, ServiceDraft};
use apnmt_core::publish::EventPublisher;
use apnmt_core::storage::ServiceStore;

use crate::dispatch::dispatch_event;
use crate::validate;

/// The bookable offerings of an organization.
#[derive(Clone)]
pub struct ServiceCatalog<S, P> {
    store: S,
    publisher: P,
}

impl<S, P> ServiceCatalog<S, P>
where
    S: ServiceStore,
    P: EventPublisher,
{
    pub fn new(store: S, publisher: P) -> Self {
        Self { store, publisher }
    }

    pub async fn create(&self, draft: ServiceDraft) -> Result<Service, BookingError> {
        if draft.id.is_some() {
            return Err(BookingError::BadRequest(
                "a new service cannot already have an id".to_string(),
            ));
        }

        let service = validate::service(&draft, Uuid::new_v4())?;
        let service = self.store.save(service).await?;

        dispatch_event(&self.publisher, DomainEventKind::ServiceCreated, &service).await;
        Ok(service)
    }

    pub async fn get(&self, id: Uuid) -> Result<Service, BookingError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(BookingError::NotFound {
                entity: "service",
                id,
            })
    }

    pub async fn list(&self) -> Result<Vec<Service>, BookingError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn list_for_organization(
        &self,
        organization_id: i64,
    ) -> Result<Vec<Service>, BookingError> {
        Ok(self.store.find_by_organization(organization_id).await?)
    }

    pub async fn update(&self, id: Uuid, draft: ServiceDraft) -> Result<Service, BookingError> {
        validate::body_id("service", id, draft.id)?;
        self.get(id).await?;

        let service = validate::service(&draft, id)?;
        let service = self.store.save(service).await?;

        dispatch_event(&self.publisher, DomainEventKind::ServiceUpdated, &service).await;
        Ok(service)
    }

    pub async fn patch(&self, id: Uuid, draft: ServiceDraft) -> Result<Service, BookingError> {
        validate::body_id("service", id, draft.id)?;
        let current = self.get(id).await?;

        let merged = ServiceDraft {
            id: Some(id),
            name: draft.name.or(Some(current.name)),
            description: draft.description.or(Some(current.description)),
            duration: draft.duration.or(Some(current.duration)),
            cost: draft.cost.or(Some(current.cost)),
            organization_id: draft.organization_id.or(Some(current.organization_id)),
        };

        let service = validate::service(&merged, id)?;
        let service = self.store.save(service).await?;

        dispatch_event(&self.publisher, DomainEventKind::ServiceUpdated, &service).await;
        Ok(service)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), BookingError> {
        let service = self.get(id).await?;
        self.store.delete(id).await?;

        dispatch_event(&self.publisher, DomainEventKind::ServiceDeleted, &service).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apnmt_core::events::SERVICE_CHANGED_TOPIC;
    use apnmt_memstore::{InMemoryServiceStore, RecordingPublisher};
    use rust_decimal::Decimal;

    fn draft(name: &str, organization_id: i64) -> ServiceDraft {
        ServiceDraft {
            name: Some(name.to_string()),
            description: Some("Wash and cut".to_string()),
            duration: Some(30),
            cost: Some(Decimal::new(200, 1)),
            organization_id: Some(organization_id),
            ..ServiceDraft::default()
        }
    }

    fn catalog() -> (
        ServiceCatalog<InMemoryServiceStore, RecordingPublisher>,
        InMemoryServiceStore,
        RecordingPublisher,
    ) {
        let store = InMemoryServiceStore::default();
        let publisher = RecordingPublisher::default();
        let catalog = ServiceCatalog::new(store.clone(), publisher.clone());
        (catalog, store, publisher)
    }

    #[tokio::test]
    async fn created_event_carries_the_persisted_id() {
        let (catalog, _store, publisher) = catalog();

        let service = catalog.create(draft("Haircut", 1)).await.unwrap();

        let published = publisher.published_to(SERVICE_CHANGED_TOPIC).await;
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].event.kind, DomainEventKind::ServiceCreated);
        assert_eq!(
            published[0].event.payload["id"],
            serde_json::to_value(service.id).unwrap()
        );
    }

    #[tokio::test]
    async fn list_for_organization_filters_other_organizations_out() {
        let (catalog, _store, _publisher) = catalog();

        catalog.create(draft("Haircut", 1)).await.unwrap();
        catalog.create(draft("Beard trim", 1)).await.unwrap();
        catalog.create(draft("Massage", 2)).await.unwrap();

        let services = catalog.list_for_organization(1).await.unwrap();
        assert_eq!(services.len(), 2);
        assert!(services.iter().all(|service| service.organization_id == 1));
    }

    #[tokio::test]
    async fn patch_keeps_fields_absent_from_the_body() {
        let (catalog, _store, _publisher) = catalog();
        let created = catalog.create(draft("Haircut", 1)).await.unwrap();

        let patch = ServiceDraft {
            id: Some(created.id),
            duration: Some(45),
            ..ServiceDraft::default()
        };

        let patched = catalog.patch(created.id, patch).await.unwrap();

        assert_eq!(patched.duration, 45);
        assert_eq!(patched.name, created.name);
        assert_eq!(patched.description, created.description);
        assert_eq!(patched.cost, created.cost);
        assert_eq!(patched.organization_id, created.organization_id);
    }

    #[tokio::test]
    async fn update_of_unknown_service_is_not_found() {
        let (catalog, _store, _publisher) = catalog();

        let id = Uuid::new_v4();
        let mut body = draft("Haircut", 1);
        body.id = Some(id);

        let err = catalog.update(id, body).await.unwrap_err();
        assert!(matches!(err, BookingError::NotFound { .. }));
    }
}
