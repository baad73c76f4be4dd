use rust_decimal::Decimal;
use uuid::Uuid;

use apnmt_core::error::{BookingError, FieldError};
use apnmt_core::models::{
    Appointment, AppointmentDraft, Customer, CustomerDraft, Service, ServiceDraft,
};

/// Structural validation. Each function collects every field failure before
/// rejecting, so a caller sees the full list at once, and on success returns
/// the fully-populated entity under the given id.
pub fn appointment(draft: &AppointmentDraft, id: Uuid) -> Result<Appointment, BookingError> {
    let mut errors = Vec::new();

    let start_at = required(&mut errors, "start_at", draft.start_at);
    let end_at = required(&mut errors, "end_at", draft.end_at);
    let organization_id = required(&mut errors, "organization_id", draft.organization_id);
    let employee_id = required(&mut errors, "employee_id", draft.employee_id);

    if let (Some(start_at), Some(end_at)) = (start_at, end_at) {
        if start_at >= end_at {
            errors.push(FieldError::new("start_at", "must be before end_at"));
        }
    }

    match (start_at, end_at, organization_id, employee_id) {
        (Some(start_at), Some(end_at), Some(organization_id), Some(employee_id))
            if errors.is_empty() =>
        {
            Ok(Appointment {
                id,
                start_at,
                end_at,
                organization_id,
                employee_id,
                customer_id: draft.customer_id,
            })
        }
        _ => Err(BookingError::Validation(errors)),
    }
}

pub fn customer(draft: &CustomerDraft, id: Uuid) -> Result<Customer, BookingError> {
    let mut errors = Vec::new();

    let last_name = required_text(&mut errors, "last_name", draft.last_name.as_deref());
    let first_name = required_text(&mut errors, "first_name", draft.first_name.as_deref());
    let mail = required_text(&mut errors, "mail", draft.mail.as_deref());
    let phone = required_text(&mut errors, "phone", draft.phone.as_deref());
    let birthday = required(&mut errors, "birthday", draft.birthday);
    let organization_id = required(&mut errors, "organization_id", draft.organization_id);

    match (last_name, first_name, mail, phone, birthday, organization_id) {
        (
            Some(last_name),
            Some(first_name),
            Some(mail),
            Some(phone),
            Some(birthday),
            Some(organization_id),
        ) if errors.is_empty() => Ok(Customer {
            id,
            last_name,
            first_name,
            mail,
            phone,
            birthday,
            organization_id,
        }),
        _ => Err(BookingError::Validation(errors)),
    }
}

pub fn service(draft: &ServiceDraft, id: Uuid) -> Result<Service, BookingError> {
    let mut errors = Vec::new();

    let name = required_text(&mut errors, "name", draft.name.as_deref());
    let description = required_text(&mut errors, "description", draft.description.as_deref());
    let duration = required(&mut errors, "duration", draft.duration);
    let cost = required(&mut errors, "cost", draft.cost);
    let organization_id = required(&mut errors, "organization_id", draft.organization_id);

    if let Some(duration) = duration {
        if duration <= 0 {
            errors.push(FieldError::new("duration", "must be positive"));
        }
    }
    if let Some(cost) = cost {
        if cost < Decimal::ZERO {
            errors.push(FieldError::new("cost", "must not be negative"));
        }
    }

    match (name, description, duration, cost, organization_id) {
        (Some(name), Some(description), Some(duration), Some(cost), Some(organization_id))
            if errors.is_empty() =>
        {
            Ok(Service {
                id,
                name,
                description,
                duration,
                cost,
                organization_id,
            })
        }
        _ => Err(BookingError::Validation(errors)),
    }
}

/// Updates must carry the entity id in the body and it must match the path.
pub fn body_id(entity: &str, path_id: Uuid, body_id: Option<Uuid>) -> Result<(), BookingError> {
    match body_id {
        None => Err(BookingError::BadRequest(format!(
            "{entity} id is required in the request body"
        ))),
        Some(body_id) if body_id != path_id => Err(BookingError::BadRequest(format!(
            "{entity} id in path and body do not match"
        ))),
        Some(_) => Ok(()),
    }
}

fn required<T>(errors: &mut Vec<FieldError>, field: &'static str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.push(FieldError::new(field, "must not be null"));
    }
    value
}

fn required_text(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: Option<&str>,
) -> Option<String> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Some(text.to_string()),
        _ => {
            errors.push(FieldError::new(field, "must not be blank"));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn appointment_reports_all_missing_fields_at_once() {
        let err = appointment(&AppointmentDraft::default(), Uuid::new_v4()).unwrap_err();

        match err {
            BookingError::Validation(errors) => {
                let fields: Vec<_> = errors.iter().map(|error| error.field).collect();
                assert_eq!(
                    fields,
                    vec!["start_at", "end_at", "organization_id", "employee_id"]
                );
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn appointment_rejects_inverted_time_window() {
        let draft = AppointmentDraft {
            start_at: Some(Utc.with_ymd_and_hms(2021, 12, 24, 11, 0, 0).unwrap()),
            end_at: Some(Utc.with_ymd_and_hms(2021, 12, 24, 10, 0, 0).unwrap()),
            organization_id: Some(1),
            employee_id: Some(1),
            ..AppointmentDraft::default()
        };

        let err = appointment(&draft, Uuid::new_v4()).unwrap_err();
        match err {
            BookingError::Validation(errors) => {
                assert_eq!(errors, vec![FieldError::new("start_at", "must be before end_at")]);
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn customer_rejects_blank_strings() {
        let draft = CustomerDraft {
            last_name: Some("  ".to_string()),
            first_name: Some("Jane".to_string()),
            mail: Some("jane@example.com".to_string()),
            phone: Some("12345".to_string()),
            birthday: Some(Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap().date_naive()),
            organization_id: Some(1),
            ..CustomerDraft::default()
        };

        let err = customer(&draft, Uuid::new_v4()).unwrap_err();
        match err {
            BookingError::Validation(errors) => {
                assert_eq!(errors, vec![FieldError::new("last_name", "must not be blank")]);
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn service_rejects_zero_duration_and_negative_cost() {
        let draft = ServiceDraft {
            name: Some("Haircut".to_string()),
            description: Some("Wash and cut".to_string()),
            duration: Some(0),
            cost: Some(Decimal::new(-100, 2)),
            organization_id: Some(1),
            ..ServiceDraft::default()
        };

        let err = service(&draft, Uuid::new_v4()).unwrap_err();
        match err {
            BookingError::Validation(errors) => {
                assert_eq!(
                    errors,
                    vec![
                        FieldError::new("duration", "must be positive"),
                        FieldError::new("cost", "must not be negative"),
                    ]
                );
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn body_id_must_be_present_and_match_path() {
        let id = Uuid::new_v4();

        assert!(body_id("appointment", id, Some(id)).is_ok());
        assert!(matches!(
            body_id("appointment", id, None),
            Err(BookingError::BadRequest(_))
        ));
        assert!(matches!(
            body_id("appointment", id, Some(Uuid::new_v4())),
            Err(BookingError::BadRequest(_))
        ));
    }
}
