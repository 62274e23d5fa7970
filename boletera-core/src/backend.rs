use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::model::{Passenger, ServiceCandidate};
use crate::BookingResult;

/// Origin name to destination names. Ordering carries no meaning.
pub type RouteMap = HashMap<String, Vec<String>>;

/// Step-1 response of the reserve→confirm sequence. A missing id is a
/// protocol violation by the backend, surfaced by the committer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationReceipt {
    pub reservation_id: Option<String>,
}

/// The REST backend the orchestrator calls. The contract is consumed, not
/// owned; implementations map transport failures into the error taxonomy.
#[async_trait]
pub trait ReservationBackend: Send + Sync {
    async fn route_map(&self) -> BookingResult<RouteMap>;

    /// Looks up passengers by an already-normalized rut. An empty list is a
    /// valid response; the resolver turns it into `NotFound`.
    async fn search_passengers(&self, rut: &str) -> BookingResult<Vec<Passenger>>;

    async fn find_services(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> BookingResult<Vec<ServiceCandidate>>;

    async fn reserve_seat(
        &self,
        user_id: &str,
        service_id: &str,
        seat_number: &str,
    ) -> BookingResult<ReservationReceipt>;

    async fn confirm_reservation(&self, reservation_id: &str) -> BookingResult<()>;
}
