use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Passenger {
    pub id: String,
    pub name: String,
    pub rut: String,
    pub email: String,
}

/// Search criteria for a service lookup. Destination is only meaningful
/// within the destination set loaded for the chosen origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteQuery {
    pub origin: String,
    pub destination: String,
    pub date: Option<NaiveDate>,
}

impl RouteQuery {
    pub fn is_complete(&self) -> bool {
        !self.origin.is_empty() && !self.destination.is_empty() && self.date.is_some()
    }
}

/// Two independent floor grids. A cell is either empty (aisle), a seat
/// label, or the bathroom marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeatLayout {
    pub floor1: Vec<Vec<String>>,
    pub floor2: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeatState {
    pub seat_number: String,
    pub reserved: bool,
    pub confirmed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceCandidate {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub name: String,
    pub service_number: String,
    pub time: String,
    pub company: String,
    pub seat_layout: SeatLayout,
    pub seats: Vec<SeatState>,
}

impl ServiceCandidate {
    /// Seat state by exact label match. A seat with no record is available.
    pub fn seat_state(&self, seat_number: &str) -> Option<&SeatState> {
        self.seats.iter().find(|s| s.seat_number == seat_number)
    }
}

/// Derived per render from a ServiceCandidate; never persisted or mutated
/// in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectableSeat {
    pub number: String,
    pub is_available: bool,
    pub is_bathroom: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    Reserving,
    Confirming,
    Done,
}

/// One in-flight reserve→confirm attempt. Dropped once the outcome has been
/// reported; the attempt id only exists for log correlation.
#[derive(Debug, Clone)]
pub struct ReservationAttempt {
    pub attempt_id: Uuid,
    pub passenger_id: String,
    pub service_id: String,
    pub seat_number: String,
    pub phase: AttemptPhase,
}

impl ReservationAttempt {
    pub fn new(passenger_id: &str, service_id: &str, seat_number: &str) -> Self {
        Self {
            attempt_id: Uuid::new_v4(),
            passenger_id: passenger_id.to_string(),
            service_id: service_id.to_string(),
            seat_number: seat_number.to_string(),
            phase: AttemptPhase::Reserving,
        }
    }
}
