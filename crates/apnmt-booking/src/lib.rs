pub mod appointments;
pub mod customers;
pub mod services;
pub mod validate;

mod dispatch;

pub use appointments::AppointmentService;
pub use customers::CustomerService;
pub use services::ServiceCatalog;
