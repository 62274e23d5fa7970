//! Wire shapes for the ticketing backend. Mongo-style documents: `_id`
//! identifiers, camelCase field names.

use boletera_core::model::{Passenger, SeatLayout, SeatState, ServiceCandidate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct UserSearchRequest<'a> {
    pub rut: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct UserSearchResponse {
    pub data: Vec<UserRecord>,
}

#[derive(Debug, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub rut: String,
    pub email: String,
}

impl From<UserRecord> for Passenger {
    fn from(record: UserRecord) -> Self {
        Passenger {
            id: record.id,
            name: record.name,
            rut: record.rut,
            email: record.email,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub name: String,
    pub service_number: String,
    pub time: String,
    pub company: String,
    pub seat_layout: SeatLayoutRecord,
    #[serde(default)]
    pub seats: Vec<SeatStateRecord>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SeatLayoutRecord {
    #[serde(default)]
    pub floor1: Vec<Vec<String>>,
    #[serde(default)]
    pub floor2: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatStateRecord {
    pub seat_number: String,
    #[serde(default)]
    pub reserved: bool,
    #[serde(default)]
    pub confirmed: bool,
}

impl From<ServiceRecord> for ServiceCandidate {
    fn from(record: ServiceRecord) -> Self {
        ServiceCandidate {
            id: record.id,
            origin: record.origin,
            destination: record.destination,
            name: record.name,
            service_number: record.service_number,
            time: record.time,
            company: record.company,
            seat_layout: SeatLayout {
                floor1: record.seat_layout.floor1,
                floor2: record.seat_layout.floor2,
            },
            seats: record
                .seats
                .into_iter()
                .map(|s| SeatState {
                    seat_number: s.seat_number,
                    reserved: s.reserved,
                    confirmed: s.confirmed,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveRequest<'a> {
    pub user_id: &'a str,
    pub service_id: &'a str,
    pub seat_number: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ReserveResponse {
    #[serde(default)]
    pub reservation: Option<ReservationRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ReservationRecord {
    #[serde(rename = "_id")]
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest<'a> {
    pub reservation_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmResponse {
    pub status: String,
}

/// Non-2xx payload. The `error` field, when present, is surfaced verbatim.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
}
