pub mod backend;
pub mod dates;
pub mod model;
pub mod notify;
pub mod rut;
pub mod seatmap;
pub mod session;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Authentication required: {0}")]
    Auth(String),
    #[error("Backend unreachable: {0}")]
    Network(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Reservation rejected: {0}")]
    Reservation(String),
    #[error("Confirmation failed: {0}")]
    Confirmation(String),
}

pub type BookingResult<T> = Result<T, BookingError>;
