use std::net::SocketAddr;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::{error, info};
use uuid::Uuid;

use apnmt_booking::{AppointmentService, CustomerService, ServiceCatalog};
use apnmt_core::error::BookingError;
use apnmt_core::events::DomainEvent;
use apnmt_core::models::{
    Appointment, AppointmentDraft, Customer, CustomerDraft, Service, ServiceDraft,
};
use apnmt_core::publish::EventPublisher;
use apnmt_core::storage::{AppointmentStore, CustomerStore, ServiceStore};
use apnmt_platform::{RedisBus, ServiceConfig, connect_database};

#[derive(Clone)]
struct AppState {
    appointments: AppointmentService<PgAppointmentStore, RedisPublisher>,
    customers: CustomerService<PgCustomerStore, RedisPublisher>,
    services: ServiceCatalog<PgServiceStore, RedisPublisher>,
}

#[tokio::main]
async fn main() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "apnmt_server=info".to_string()),
        )
        .init();

    let config = ServiceConfig::from_env("0.0.0.0:8080")?;
    let pool = connect_database(&config.database_url).await?;
    let redis = RedisBus::connect(&config.redis_url)?;
    let publisher = RedisPublisher { bus: redis };

    let state = AppState {
        appointments: AppointmentService::new(
            PgAppointmentStore { pool: pool.clone() },
            publisher.clone(),
        ),
        customers: CustomerService::new(PgCustomerStore { pool: pool.clone() }, publisher.clone()),
        services: ServiceCatalog::new(PgServiceStore { pool }, publisher),
    };

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route(
            "/api/appointments",
            get(list_appointments).post(create_appointment),
        )
        .route(
            "/api/appointments/{id}",
            get(get_appointment)
                .put(update_appointment)
                .patch(patch_appointment)
                .delete(delete_appointment),
        )
        .route("/api/customers", get(list_customers).post(create_customer))
        .route(
            "/api/customers/{id}",
            get(get_customer)
                .put(update_customer)
                .patch(patch_customer)
                .delete(delete_customer),
        )
        .route("/api/services", get(list_services).post(create_service))
        .route(
            "/api/services/{id}",
            get(get_service)
                .put(update_service)
                .patch(patch_service)
                .delete(delete_service),
        )
        .route(
            "/api/services/organization/{organization_id}",
            get(list_services_for_organization),
        )
        .with_state(state);

    let addr: SocketAddr = config.http_addr.parse()?;
    info!("appointment service listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn create_appointment(
    State(state): State<AppState>,
    Json(draft): Json<AppointmentDraft>,
) -> Result<(StatusCode, Json<Appointment>), (StatusCode, String)> {
    let appointment = state
        .appointments
        .create(draft)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

async fn list_appointments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Appointment>>, (StatusCode, String)> {
    state
        .appointments
        .list()
        .await
        .map(Json)
        .map_err(error_response)
}

async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, (StatusCode, String)> {
    state
        .appointments
        .get(id)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<AppointmentDraft>,
) -> Result<Json<Appointment>, (StatusCode, String)> {
    state
        .appointments
        .update(id, draft)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn patch_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<AppointmentDraft>,
) -> Result<Json<Appointment>, (StatusCode, String)> {
    state
        .appointments
        .patch(id, draft)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .appointments
        .delete(id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

async fn create_customer(
    State(state): State<AppState>,
    Json(draft): Json<CustomerDraft>,
) -> Result<(StatusCode, Json<Customer>), (StatusCode, String)> {
    let customer = state
        .customers
        .create(draft)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<Customer>>, (StatusCode, String)> {
    state
        .customers
        .list()
        .await
        .map(Json)
        .map_err(error_response)
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Customer>, (StatusCode, String)> {
    state
        .customers
        .get(id)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<CustomerDraft>,
) -> Result<Json<Customer>, (StatusCode, String)> {
    state
        .customers
        .update(id, draft)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn patch_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<CustomerDraft>,
) -> Result<Json<Customer>, (StatusCode, String)> {
    state
        .customers
        .patch(id, draft)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .customers
        .delete(id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

async fn create_service(
    State(state): State<AppState>,
    Json(draft): Json<ServiceDraft>,
) -> Result<(StatusCode, Json<Service>), (StatusCode, String)> {
    let service = state
        .services
        .create(draft)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(service)))
}

async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<Service>>, (StatusCode, String)> {
    state.services.list().await.map(Json).map_err(error_response)
}

async fn list_services_for_organization(
    State(state): State<AppState>,
    Path(organization_id): Path<i64>,
) -> Result<Json<Vec<Service>>, (StatusCode, String)> {
    state
        .services
        .list_for_organization(organization_id)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Service>, (StatusCode, String)> {
    state.services.get(id).await.map(Json).map_err(error_response)
}

async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<ServiceDraft>,
) -> Result<Json<Service>, (StatusCode, String)> {
    state
        .services
        .update(id, draft)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn patch_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<ServiceDraft>,
) -> Result<Json<Service>, (StatusCode, String)> {
    state
        .services
        .patch(id, draft)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    state
        .services
        .delete(id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

fn error_response(err: BookingError) -> (StatusCode, String) {
    match &err {
        BookingError::Validation(_) | BookingError::BadRequest(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        BookingError::SlotUnavailable { .. } => (StatusCode::CONFLICT, err.to_string()),
        BookingError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        BookingError::Store(inner) => {
            error!("storage failure: {inner}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal storage failure".to_string(),
            )
        }
    }
}

#[derive(Clone)]
struct RedisPublisher {
    bus: RedisBus,
}

#[async_trait]
impl EventPublisher for RedisPublisher {
    async fn publish(&self, topic: &str, event: &DomainEvent) -> anyhow::Result<()> {
        self.bus.publish_json(topic, event).await
    }
}

#[derive(Clone)]
struct PgAppointmentStore {
    pool: PgPool,
}

fn appointment_from_row(row: &PgRow) -> AnyResult<Appointment> {
    Ok(Appointment {
        id: row.try_get("id")?,
        start_at: row.try_get("start_at")?,
        end_at: row.try_get("end_at")?,
        organization_id: row.try_get("organization_id")?,
        employee_id: row.try_get("employee_id")?,
        customer_id: row.try_get("customer_id")?,
    })
}

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    async fn find_all(&self) -> AnyResult<Vec<Appointment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, start_at, end_at, organization_id, employee_id, customer_id
            FROM appointments
            ORDER BY start_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(appointment_from_row).collect()
    }

    async fn find_for_employee(
        &self,
        employee_id: i64,
        organization_id: i64,
    ) -> AnyResult<Vec<Appointment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, start_at, end_at, organization_id, employee_id, customer_id
            FROM appointments
            WHERE employee_id = $1
              AND organization_id = $2
            ORDER BY start_at
            "#,
        )
        .bind(employee_id)
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(appointment_from_row).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> AnyResult<Option<Appointment>> {
        let row = sqlx::query(
            r#"
            SELECT id, start_at, end_at, organization_id, employee_id, customer_id
            FROM appointments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(appointment_from_row).transpose()
    }

    async fn save(&self, appointment: Appointment) -> AnyResult<Appointment> {
        sqlx::query(
            r#"
            INSERT INTO appointments (
                id, start_at, end_at, organization_id, employee_id, customer_id
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id)
            DO UPDATE SET
                start_at = EXCLUDED.start_at,
                end_at = EXCLUDED.end_at,
                organization_id = EXCLUDED.organization_id,
                employee_id = EXCLUDED.employee_id,
                customer_id = EXCLUDED.customer_id
            "#,
        )
        .bind(appointment.id)
        .bind(appointment.start_at)
        .bind(appointment.end_at)
        .bind(appointment.organization_id)
        .bind(appointment.employee_id)
        .bind(appointment.customer_id)
        .execute(&self.pool)
        .await?;

        Ok(appointment)
    }

    async fn delete(&self, id: Uuid) -> AnyResult<bool> {
        let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
struct PgCustomerStore {
    pool: PgPool,
}

fn customer_from_row(row: &PgRow) -> AnyResult<Customer> {
    Ok(Customer {
        id: row.try_get("id")?,
        last_name: row.try_get("last_name")?,
        first_name: row.try_get("first_name")?,
        mail: row.try_get("mail")?,
        phone: row.try_get("phone")?,
        birthday: row.try_get("birthday")?,
        organization_id: row.try_get("organization_id")?,
    })
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn find_all(&self) -> AnyResult<Vec<Customer>> {
        let rows = sqlx::query(
            r#"
            SELECT id, last_name, first_name, mail, phone, birthday, organization_id
            FROM customers
            ORDER BY last_name, first_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(customer_from_row).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> AnyResult<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, last_name, first_name, mail, phone, birthday, organization_id
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(customer_from_row).transpose()
    }

    async fn save(&self, customer: Customer) -> AnyResult<Customer> {
        sqlx::query(
            r#"
            INSERT INTO customers (
                id, last_name, first_name, mail, phone, birthday, organization_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id)
            DO UPDATE SET
                last_name = EXCLUDED.last_name,
                first_name = EXCLUDED.first_name,
                mail = EXCLUDED.mail,
                phone = EXCLUDED.phone,
                birthday = EXCLUDED.birthday,
                organization_id = EXCLUDED.organization_id
            "#,
        )
        .bind(customer.id)
        .bind(&customer.last_name)
        .bind(&customer.first_name)
        .bind(&customer.mail)
        .bind(&customer.phone)
        .bind(customer.birthday)
        .bind(customer.organization_id)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn delete(&self, id: Uuid) -> AnyResult<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
struct PgServiceStore {
    pool: PgPool,
}

fn service_from_row(row: &PgRow) -> AnyResult<Service> {
    Ok(Service {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        duration: row.try_get("duration")?,
        cost: row.try_get("cost")?,
        organization_id: row.try_get("organization_id")?,
    })
}

#[async_trait]
impl ServiceStore for PgServiceStore {
    async fn find_all(&self) -> AnyResult<Vec<Service>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, duration, cost, organization_id
            FROM services
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(service_from_row).collect()
    }

    async fn find_by_organization(&self, organization_id: i64) -> AnyResult<Vec<Service>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, duration, cost, organization_id
            FROM services
            WHERE organization_id = $1
            ORDER BY name
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(service_from_row).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> AnyResult<Option<Service>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, duration, cost, organization_id
            FROM services
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(service_from_row).transpose()
    }

    async fn save(&self, service: Service) -> AnyResult<Service> {
        sqlx::query(
            r#"
            INSERT INTO services (
                id, name, description, duration, cost, organization_id
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id)
            DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                duration = EXCLUDED.duration,
                cost = EXCLUDED.cost,
                organization_id = EXCLUDED.organization_id
            "#,
        )
        .bind(service.id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.duration)
        .bind(service.cost)
        .bind(service.organization_id)
        .execute(&self.pool)
        .await?;

        Ok(service)
    }

    async fn delete(&self, id: Uuid) -> AnyResult<bool> {
        let result = sqlx::query("DELETE FROM services WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
