use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use apnmt_core::events::DomainEvent;
use apnmt_core::models::{Appointment, Customer, Service};
use apnmt_core::publish::EventPublisher;
use apnmt_core::storage::{AppointmentStore, CustomerStore, ServiceStore};

#[derive(Clone, Default)]
pub struct InMemoryAppointmentStore {
    rows: Arc<RwLock<HashMap<Uuid, Appointment>>>,
}

impl InMemoryAppointmentStore {
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn find_all(&self) -> anyhow::Result<Vec<Appointment>> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn find_for_employee(
        &self,
        employee_id: i64,
        organization_id: i64,
    ) -> anyhow::Result<Vec<Appointment>> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|appointment| {
                appointment.employee_id == employee_id
                    && appointment.organization_id == organization_id
            })
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Appointment>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn save(&self, appointment: Appointment) -> anyhow::Result<Appointment> {
        self.rows
            .write()
            .await
            .insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryCustomerStore {
    rows: Arc<RwLock<HashMap<Uuid, Customer>>>,
}

impl InMemoryCustomerStore {
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn find_all(&self) -> anyhow::Result<Vec<Customer>> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Customer>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn save(&self, customer: Customer) -> anyhow::Result<Customer> {
        self.rows.write().await.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryServiceStore {
    rows: Arc<RwLock<HashMap<Uuid, Service>>>,
}

impl InMemoryServiceStore {
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl ServiceStore for InMemoryServiceStore {
    async fn find_all(&self) -> anyhow::Result<Vec<Service>> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn find_by_organization(&self, organization_id: i64) -> anyhow::Result<Vec<Service>> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|service| service.organization_id == organization_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Service>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn save(&self, service: Service) -> anyhow::Result<Service> {
        self.rows.write().await.insert(service.id, service.clone());
        Ok(service)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.rows.write().await.remove(&id).is_some())
    }
}

#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub topic: String,
    pub event: DomainEvent,
}

/// Keeps every published event so tests can assert on delivery.
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    published: Arc<RwLock<Vec<PublishedEvent>>>,
}

impl RecordingPublisher {
    pub async fn published(&self) -> Vec<PublishedEvent> {
        self.published.read().await.clone()
    }

    pub async fn published_to(&self, topic: &str) -> Vec<PublishedEvent> {
        self.published
            .read()
            .await
            .iter()
            .filter(|published| published.topic == topic)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, topic: &str, event: &DomainEvent) -> anyhow::Result<()> {
        self.published.write().await.push(PublishedEvent {
            topic: topic.to_string(),
            event: event.clone(),
        });
        Ok(())
    }
}

/// Swallows every event. Test-only stand-in, never wired into production.
#[derive(Clone, Default)]
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, _topic: &str, _event: &DomainEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Fails every publish, for exercising the best-effort contract.
#[derive(Clone, Default)]
pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, topic: &str, _event: &DomainEvent) -> anyhow::Result<()> {
        anyhow::bail!("bus unreachable while publishing to {topic}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn appointment(employee_id: i64, organization_id: i64) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            start_at: Utc.with_ymd_and_hms(2021, 12, 24, 10, 0, 0).unwrap(),
            end_at: Utc.with_ymd_and_hms(2021, 12, 24, 11, 0, 0).unwrap(),
            organization_id,
            employee_id,
            customer_id: None,
        }
    }

    #[tokio::test]
    async fn save_then_find_round_trips() {
        let store = InMemoryAppointmentStore::default();
        let saved = store.save(appointment(1, 1)).await.unwrap();

        let found = store.find_by_id(saved.id).await.unwrap();
        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn find_for_employee_scopes_by_employee_and_organization() {
        let store = InMemoryAppointmentStore::default();
        store.save(appointment(1, 1)).await.unwrap();
        store.save(appointment(2, 1)).await.unwrap();
        store.save(appointment(1, 2)).await.unwrap();

        let scoped = store.find_for_employee(1, 1).await.unwrap();
        assert_eq!(scoped.len(), 1);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_existed() {
        let store = InMemoryAppointmentStore::default();
        let saved = store.save(appointment(1, 1)).await.unwrap();

        assert!(store.delete(saved.id).await.unwrap());
        assert!(!store.delete(saved.id).await.unwrap());
    }
}
