use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{error, info, warn};

use boletera_client::{BackendConfig, HttpBackend};
use boletera_core::backend::{ReservationBackend, RouteMap};
use boletera_core::dates::is_past_travel_date;
use boletera_core::model::{
    AttemptPhase, Passenger, ReservationAttempt, RouteQuery, SeatState, SelectableSeat,
    ServiceCandidate,
};
use boletera_core::notify::{Notice, Notifier};
use boletera_core::rut::normalized_rut;
use boletera_core::seatmap::{layout_seats, presentation_rows};
use boletera_core::session::{SessionEvent, SessionProvider, SessionUser};
use boletera_core::{BookingError, BookingResult};

/// The reservation workflow, end to end: route selection, passenger
/// resolution, service search, seat selection, and the reserve→confirm
/// commit. Owns all mutable workflow state; the presentation layer binds
/// user events to these operations and renders the accessors.
///
/// Operations serialize their own network calls through `&mut self`; the
/// commit additionally exposes an in-flight flag so the triggering control
/// can stay disabled while reserving/confirming. Every failure is converted
/// into a notice at the operation boundary, never a panic.
pub struct ReservationSession {
    backend: Arc<dyn ReservationBackend>,
    session: Arc<dyn SessionProvider>,
    notifier: Arc<dyn Notifier>,
    route_map: RouteMap,
    query: RouteQuery,
    passenger: Option<Passenger>,
    services: Vec<ServiceCandidate>,
    selected_service: Option<String>,
    selected_seat: Option<String>,
    commit_in_flight: bool,
}

impl ReservationSession {
    pub fn new(
        backend: Arc<dyn ReservationBackend>,
        session: Arc<dyn SessionProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            session,
            notifier,
            route_map: RouteMap::new(),
            query: RouteQuery::default(),
            passenger: None,
            services: Vec::new(),
            selected_service: None,
            selected_seat: None,
            commit_in_flight: false,
        }
    }

    /// Wires the orchestrator to the HTTP backend.
    pub fn over_http(
        config: &BackendConfig,
        session: Arc<dyn SessionProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> BookingResult<Self> {
        let backend = Arc::new(HttpBackend::new(config, Arc::clone(&session))?);
        Ok(Self::new(backend, session, notifier))
    }

    fn report(&self, err: &BookingError) {
        self.notifier.notify(Notice::from(err));
    }

    // --- city/route selector ---

    /// Loads the origin→destinations map. On failure the map is left empty
    /// so the caller renders an empty state.
    pub async fn load_route_map(&mut self) -> BookingResult<()> {
        match self.backend.route_map().await {
            Ok(map) => {
                self.route_map = map;
                Ok(())
            }
            Err(err) => {
                self.route_map.clear();
                self.report(&err);
                Err(err)
            }
        }
    }

    pub fn origins(&self) -> Vec<&str> {
        self.route_map.keys().map(String::as_str).collect()
    }

    /// Picks an origin (or clears with an empty string). A destination that
    /// is no longer valid for the new origin is reset.
    pub fn select_origin(&mut self, origin: &str) -> BookingResult<()> {
        if origin.is_empty() {
            self.query.origin.clear();
            self.query.destination.clear();
            return Ok(());
        }

        if !self.route_map.contains_key(origin) {
            let err = BookingError::Validation(format!("unknown origin {:?}", origin));
            self.report(&err);
            return Err(err);
        }

        self.query.origin = origin.to_string();
        let destinations = &self.route_map[origin];
        if !self.query.destination.is_empty() && !destinations.contains(&self.query.destination) {
            self.query.destination.clear();
        }
        Ok(())
    }

    pub fn destination_options(&self) -> &[String] {
        self.route_map
            .get(&self.query.origin)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// False when no origin is chosen or the origin has no destinations;
    /// the destination control is disabled rather than accepting free text.
    pub fn destination_enabled(&self) -> bool {
        !self.destination_options().is_empty()
    }

    pub fn select_destination(&mut self, destination: &str) -> BookingResult<()> {
        if destination.is_empty() {
            self.query.destination.clear();
            return Ok(());
        }

        if !self.destination_options().contains(&destination.to_string()) {
            let err = BookingError::Validation(format!(
                "destination {:?} not reachable from {:?}",
                destination, self.query.origin
            ));
            self.report(&err);
            return Err(err);
        }

        self.query.destination = destination.to_string();
        Ok(())
    }

    /// Accepts a travel date. Past dates are rejected against the calendar
    /// day in the fixed reference timezone, not the host zone.
    pub fn select_date(&mut self, date: NaiveDate) -> BookingResult<()> {
        if is_past_travel_date(date, Utc::now()) {
            let err = BookingError::Validation(format!("travel date {} is in the past", date));
            self.report(&err);
            return Err(err);
        }
        self.query.date = Some(date);
        Ok(())
    }

    // --- passenger resolver ---

    /// Resolves a passenger by raw rut. The identifier is normalized before
    /// transmission; too-short identifiers never reach the network. An empty
    /// backend result is an expected `NotFound`, not a crash.
    pub async fn resolve_passenger(&mut self, raw_rut: &str) -> BookingResult<()> {
        let rut = match normalized_rut(raw_rut) {
            Ok(rut) => rut,
            Err(err) => {
                self.report(&err);
                return Err(err);
            }
        };

        let candidates = match self.backend.search_passengers(&rut).await {
            Ok(candidates) => candidates,
            Err(err) => {
                self.report(&err);
                return Err(err);
            }
        };

        if candidates.is_empty() {
            let err = BookingError::NotFound(format!("no passenger found for rut {}", rut));
            self.report(&err);
            return Err(err);
        }

        if candidates.len() > 1 {
            // First match wins; flagged for product clarification.
            warn!(
                "Passenger lookup for rut {} returned {} candidates, using the first",
                rut,
                candidates.len()
            );
        }

        self.passenger = candidates.into_iter().next();
        Ok(())
    }

    pub fn passenger(&self) -> Option<&Passenger> {
        self.passenger.as_ref()
    }

    pub fn query(&self) -> &RouteQuery {
        &self.query
    }

    // --- service finder ---

    /// Searches services for the current criteria. Origin, destination and
    /// date must all be set and the passenger resolved, or the request is
    /// never issued. A successful search clears any previously selected
    /// service and seat; stale selections never survive a new search.
    pub async fn find_services(&mut self) -> BookingResult<usize> {
        if !self.query.is_complete() {
            let err = BookingError::Validation(
                "origin, destination and travel date are all required".to_string(),
            );
            self.report(&err);
            return Err(err);
        }
        if self.passenger.is_none() {
            let err = BookingError::Validation("resolve the passenger first".to_string());
            self.report(&err);
            return Err(err);
        }

        let Some(date) = self.query.date else {
            let err = BookingError::Validation("travel date is required".to_string());
            self.report(&err);
            return Err(err);
        };

        match self
            .backend
            .find_services(&self.query.origin, &self.query.destination, date)
            .await
        {
            Ok(services) => {
                let count = services.len();
                self.services = services;
                self.selected_service = None;
                self.selected_seat = None;
                Ok(count)
            }
            Err(err) => {
                self.report(&err);
                Err(err)
            }
        }
    }

    pub fn services(&self) -> &[ServiceCandidate] {
        &self.services
    }

    pub fn selected_service(&self) -> Option<&ServiceCandidate> {
        let id = self.selected_service.as_deref()?;
        self.services.iter().find(|s| s.id == id)
    }

    /// Picks a service from the current results. Switching services always
    /// drops the seat selection; a seat belongs to exactly one service.
    pub fn select_service(&mut self, service_id: &str) -> BookingResult<()> {
        if !self.services.iter().any(|s| s.id == service_id) {
            let err = BookingError::Validation(format!("unknown service {:?}", service_id));
            self.report(&err);
            return Err(err);
        }

        if self.selected_service.as_deref() != Some(service_id) {
            self.selected_seat = None;
        }
        self.selected_service = Some(service_id.to_string());
        Ok(())
    }

    // --- seat map ---

    /// Fresh selectable-seat list for the selected service. Empty when no
    /// service is selected.
    pub fn seats(&self) -> Vec<SelectableSeat> {
        self.selected_service()
            .map(layout_seats)
            .unwrap_or_default()
    }

    /// The flat seat list chunked for presentation.
    pub fn seat_rows(&self) -> Vec<Vec<SelectableSeat>> {
        presentation_rows(&self.seats())
    }

    pub fn selected_seat(&self) -> Option<&str> {
        self.selected_seat.as_deref()
    }

    /// Seat click. Selecting an available seat replaces the current
    /// selection; clicking the selected seat deselects it; unavailable and
    /// bathroom seats are a no-op.
    pub fn toggle_seat(&mut self, seat_number: &str) {
        let Some(seat) = self
            .seats()
            .into_iter()
            .find(|s| s.number == seat_number)
        else {
            return;
        };

        if seat.is_bathroom || !seat.is_available {
            return;
        }

        if self.selected_seat.as_deref() == Some(seat_number) {
            self.selected_seat = None;
        } else {
            self.selected_seat = Some(seat_number.to_string());
        }
    }

    // --- reservation committer ---

    pub fn commit_in_flight(&self) -> bool {
        self.commit_in_flight
    }

    /// The reserve→confirm sequence. Local seat-state flips only after both
    /// steps succeed; any failure leaves the seat list untouched so the
    /// operator can retry with another seat.
    pub async fn commit(&mut self) -> BookingResult<()> {
        if self.commit_in_flight {
            return Err(BookingError::Validation(
                "a commit is already in progress".to_string(),
            ));
        }

        let attempt = match self.build_attempt() {
            Ok(attempt) => attempt,
            Err(err) => {
                self.report(&err);
                return Err(err);
            }
        };

        self.commit_in_flight = true;
        let result = self.run_attempt(attempt).await;
        self.commit_in_flight = false;

        match &result {
            Ok(()) => self
                .notifier
                .notify(Notice::success("Seat reserved and confirmed")),
            Err(err) => self.report(err),
        }
        result
    }

    fn build_attempt(&self) -> BookingResult<ReservationAttempt> {
        let passenger = self
            .passenger
            .as_ref()
            .ok_or_else(|| BookingError::Validation("no passenger resolved".to_string()))?;
        let service = self
            .selected_service()
            .ok_or_else(|| BookingError::Validation("no service selected".to_string()))?;
        let seat = self
            .selected_seat
            .as_deref()
            .ok_or_else(|| BookingError::Validation("no seat selected".to_string()))?;

        Ok(ReservationAttempt::new(&passenger.id, &service.id, seat))
    }

    async fn run_attempt(&mut self, mut attempt: ReservationAttempt) -> BookingResult<()> {
        info!(
            "Attempt {}: reserving seat {} on service {} for passenger {}",
            attempt.attempt_id, attempt.seat_number, attempt.service_id, attempt.passenger_id
        );

        let receipt = self
            .backend
            .reserve_seat(
                &attempt.passenger_id,
                &attempt.service_id,
                &attempt.seat_number,
            )
            .await?;

        let Some(reservation_id) = receipt.reservation_id else {
            // Backend accepted the reserve but sent no id back. The seat may
            // now be held server-side with nothing to confirm against.
            error!(
                "Attempt {}: reserve succeeded without a reservation id",
                attempt.attempt_id
            );
            return Err(BookingError::Confirmation(
                "backend returned no reservation id".to_string(),
            ));
        };

        attempt.phase = AttemptPhase::Confirming;
        self.backend.confirm_reservation(&reservation_id).await?;
        attempt.phase = AttemptPhase::Done;

        info!(
            "Attempt {}: reservation {} confirmed",
            attempt.attempt_id, reservation_id
        );

        self.apply_committed_seat(&attempt.service_id, &attempt.seat_number);
        self.selected_service = None;
        self.selected_seat = None;
        Ok(())
    }

    /// Marks the committed seat reserved+confirmed by replacing the service's
    /// seat-state list wholesale, never by partial field mutation.
    fn apply_committed_seat(&mut self, service_id: &str, seat_number: &str) {
        let Some(service) = self.services.iter_mut().find(|s| s.id == service_id) else {
            return;
        };

        let mut seats: Vec<SeatState> = service
            .seats
            .iter()
            .filter(|s| s.seat_number != seat_number)
            .cloned()
            .collect();
        seats.push(SeatState {
            seat_number: seat_number.to_string(),
            reserved: true,
            confirmed: true,
        });
        service.seats = seats;
    }

    // --- session collaborator ---

    pub fn current_operator(&self) -> Option<SessionUser> {
        self.session.current_user()
    }

    /// Hook for session events from the provider's expiry watcher. Logout or
    /// expiry discards the whole workflow.
    pub fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::LoggedOut | SessionEvent::Expired => self.reset(),
            SessionEvent::LoggedIn => {}
        }
    }

    /// Restarts the search: everything except the loaded route map is
    /// discarded, the resolved passenger included.
    pub fn reset(&mut self) {
        self.query = RouteQuery::default();
        self.passenger = None;
        self.services.clear();
        self.selected_service = None;
        self.selected_seat = None;
    }
}
