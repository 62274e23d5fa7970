pub mod orchestrator;
pub mod session_store;

pub use orchestrator::ReservationSession;
pub use session_store::MemorySession;
