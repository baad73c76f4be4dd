use uuid::Uuid;

use apnmt_core::error::BookingError;
use apnmt_core::events::DomainEventKind;
use apnmt_core::models::{Customer, CustomerDraft};
use apnmt_core::publish::EventPublisher;
use apnmt_core::storage::CustomerStore;

use crate::dispatch::dispatch_event;
use crate::validate;

#[derive(Clone)]
pub struct CustomerService<S, P> {
    store: S,
    publisher: P,
}

impl<S, P> CustomerService<S, P>
where
    S: CustomerStore,
    P: EventPublisher,
{
    pub fn new(store: S, publisher: P) -> Self {
        Self { store, publisher }
    }

    pub async fn create(&self, draft: CustomerDraft) -> Result<Customer, BookingError> {
        if draft.id.is_some() {
            return Err(BookingError::BadRequest(
                "a new customer cannot already have an id".to_string(),
            ));
        }

        let customer = validate::customer(&draft, Uuid::new_v4())?;
        let customer = self.store.save(customer).await?;

        dispatch_event(&self.publisher, DomainEventKind::CustomerCreated, &customer).await;
        Ok(customer)
    }

    pub async fn get(&self, id: Uuid) -> Result<Customer, BookingError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(BookingError::NotFound {
                entity: "customer",
                id,
            })
    }

    pub async fn list(&self) -> Result<Vec<Customer>, BookingError> {
        Ok(self.store.find_all().await?)
    }

    pub async fn update(&self, id: Uuid, draft: CustomerDraft) -> Result<Customer, BookingError> {
        validate::body_id("customer", id, draft.id)?;
        self.get(id).await?;

        let customer = validate::customer(&draft, id)?;
        let customer = self.store.save(customer).await?;

        dispatch_event(&self.publisher, DomainEventKind::CustomerUpdated, &customer).await;
        Ok(customer)
    }

    pub async fn patch(&self, id: Uuid, draft: CustomerDraft) -> Result<Customer, BookingError> {
        validate::body_id("customer", id, draft.id)?;
        let current = self.get(id).await?;

        let merged = CustomerDraft {
            id: Some(id),
            last_name: draft.last_name.or(Some(current.last_name)),
            first_name: draft.first_name.or(Some(current.first_name)),
            mail: draft.mail.or(Some(current.mail)),
            phone: draft.phone.or(Some(current.phone)),
            birthday: draft.birthday.or(Some(current.birthday)),
            organization_id: draft.organization_id.or(Some(current.organization_id)),
        };

        let customer = validate::customer(&merged, id)?;
        let customer = self.store.save(customer).await?;

        dispatch_event(&self.publisher, DomainEventKind::CustomerUpdated, &customer).await;
        Ok(customer)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), BookingError> {
        let customer = self.get(id).await?;
        self.store.delete(id).await?;

        dispatch_event(&self.publisher, DomainEventKind::CustomerDeleted, &customer).await;
        Ok(())
    }
}
