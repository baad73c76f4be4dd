use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub organization_id: i64,
    pub employee_id: i64,
    pub customer_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub last_name: String,
    pub first_name: String,
    pub mail: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub organization_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub duration: i32,
    pub cost: Decimal,
    pub organization_id: i64,
}

/// Request-shaped appointment with every field optional. The same draft
/// serves create, full update and partial merge; validation decides which
/// absences are errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentDraft {
    pub id: Option<Uuid>,
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub organization_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub customer_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub id: Option<Uuid>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub mail: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub organization_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceDraft {
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub duration: Option<i32>,
    pub cost: Option<Decimal>,
    pub organization_id: Option<i64>,
}
