use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode, Url};
use tracing::{info, warn};

use boletera_core::backend::{ReservationBackend, ReservationReceipt, RouteMap};
use boletera_core::dates::format_travel_date;
use boletera_core::model::{Passenger, ServiceCandidate};
use boletera_core::session::SessionProvider;
use boletera_core::{BookingError, BookingResult};

use crate::app_config::BackendConfig;
use crate::dto::{
    ConfirmRequest, ConfirmResponse, ErrorBody, ReserveRequest, ReserveResponse, ServiceRecord,
    UserSearchRequest, UserSearchResponse,
};

/// `ReservationBackend` over HTTP/JSON. Every call carries the bearer
/// credential from the injected session; a missing credential fails before
/// any request is built.
pub struct HttpBackend {
    http: Client,
    base_url: Url,
    session: Arc<dyn SessionProvider>,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig, session: Arc<dyn SessionProvider>) -> BookingResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            BookingError::Validation(format!("invalid backend url {:?}: {}", config.base_url, e))
        })?;

        Ok(Self {
            http: Client::new(),
            base_url,
            session,
        })
    }

    fn endpoint(&self, path: &str) -> BookingResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| BookingError::Validation(format!("invalid endpoint {:?}: {}", path, e)))
    }

    fn bearer(&self) -> BookingResult<String> {
        self.session
            .credential()
            .ok_or_else(|| BookingError::Auth("no active session credential".to_string()))
    }

    /// Extracts a human-readable reason from a non-2xx body: the JSON
    /// `error` field verbatim when present, the raw text otherwise.
    async fn error_reason(response: Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
            if let Some(error) = parsed.error {
                return error;
            }
        }
        if !body.is_empty() {
            return body;
        }
        format!("backend returned {}", status)
    }

    /// Default taxonomy for a failed response. Domain-specific endpoints
    /// (reserve, confirm) override the non-auth branch.
    async fn fail(response: Response) -> BookingError {
        let status = response.status();
        let reason = Self::error_reason(response).await;
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BookingError::Auth(reason),
            StatusCode::NOT_FOUND => BookingError::NotFound(reason),
            _ => BookingError::Network(reason),
        }
    }

    fn transport(e: reqwest::Error) -> BookingError {
        BookingError::Network(e.to_string())
    }
}

#[async_trait]
impl ReservationBackend for HttpBackend {
    async fn route_map(&self) -> BookingResult<RouteMap> {
        let token = self.bearer()?;
        let response = self
            .http
            .get(self.endpoint("/cities")?)
            .bearer_auth(token)
            .send()
            .await
            .map_err(Self::transport)?;

        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }
        response.json().await.map_err(Self::transport)
    }

    async fn search_passengers(&self, rut: &str) -> BookingResult<Vec<Passenger>> {
        let token = self.bearer()?;
        let response = self
            .http
            .post(self.endpoint("/users/search")?)
            .bearer_auth(token)
            .json(&UserSearchRequest { rut })
            .send()
            .await
            .map_err(Self::transport)?;

        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }

        let body: UserSearchResponse = response.json().await.map_err(Self::transport)?;
        Ok(body.data.into_iter().map(Passenger::from).collect())
    }

    async fn find_services(
        &self,
        origin: &str,
        destination: &str,
        date: NaiveDate,
    ) -> BookingResult<Vec<ServiceCandidate>> {
        let token = self.bearer()?;
        let date = format_travel_date(date);
        info!("Searching services {} -> {} on {}", origin, destination, date);

        let response = self
            .http
            .get(self.endpoint("/bus-services")?)
            .bearer_auth(token)
            .query(&[
                ("origin", origin),
                ("destination", destination),
                ("date", date.as_str()),
            ])
            .send()
            .await
            .map_err(Self::transport)?;

        if !response.status().is_success() {
            return Err(Self::fail(response).await);
        }

        let records: Vec<ServiceRecord> = response.json().await.map_err(Self::transport)?;
        Ok(records.into_iter().map(ServiceCandidate::from).collect())
    }

    async fn reserve_seat(
        &self,
        user_id: &str,
        service_id: &str,
        seat_number: &str,
    ) -> BookingResult<ReservationReceipt> {
        let token = self.bearer()?;
        let response = self
            .http
            .post(self.endpoint("/reservations/reserve")?)
            .bearer_auth(token)
            .json(&ReserveRequest {
                user_id,
                service_id,
                seat_number,
            })
            .send()
            .await
            .map_err(Self::transport)?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(BookingError::Auth(Self::error_reason(response).await));
            }
            let reason = Self::error_reason(response).await;
            warn!("Reserve rejected for seat {}: {}", seat_number, reason);
            return Err(BookingError::Reservation(reason));
        }

        let body: ReserveResponse = response.json().await.map_err(Self::transport)?;
        Ok(ReservationReceipt {
            reservation_id: body.reservation.and_then(|r| r.id),
        })
    }

    async fn confirm_reservation(&self, reservation_id: &str) -> BookingResult<()> {
        let token = self.bearer()?;
        let response = self
            .http
            .post(self.endpoint("/reservations/confirm")?)
            .bearer_auth(token)
            .json(&ConfirmRequest { reservation_id })
            .send()
            .await
            .map_err(Self::transport)?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(BookingError::Auth(Self::error_reason(response).await));
            }
            let reason = Self::error_reason(response).await;
            warn!("Confirm rejected for reservation {}: {}", reservation_id, reason);
            return Err(BookingError::Confirmation(reason));
        }

        let body: ConfirmResponse = response.json().await.map_err(Self::transport)?;
        info!(
            "Reservation {} confirmed with status {:?}",
            reservation_id, body.status
        );
        Ok(())
    }
}
