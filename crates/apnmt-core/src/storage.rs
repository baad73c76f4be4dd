use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Appointment, Customer, Service};

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<Appointment>>;

    /// Appointments booked for one employee within one organization, the
    /// scope the availability check searches.
    async fn find_for_employee(
        &self,
        employee_id: i64,
        organization_id: i64,
    ) -> anyhow::Result<Vec<Appointment>>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Appointment>>;

    async fn save(&self, appointment: Appointment) -> anyhow::Result<Appointment>;

    /// Returns whether a row was actually removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<Customer>>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Customer>>;

    async fn save(&self, customer: Customer) -> anyhow::Result<Customer>;

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait ServiceStore: Send + Sync {
    async fn find_all(&self) -> anyhow::Result<Vec<Service>>;

    async fn find_by_organization(&self, organization_id: i64) -> anyhow::Result<Vec<Service>>;

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Service>>;

    async fn save(&self, service: Service) -> anyhow::Result<Service>;

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}
