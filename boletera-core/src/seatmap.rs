use crate::model::{SelectableSeat, ServiceCandidate};

/// Bathroom cells match this marker case-insensitively. They are rendered
/// but never selectable, with or without a seat-state record.
pub const BATHROOM_MARKER: &str = "WC";

/// Presentation chunk width. Layout-only: carries no domain meaning and
/// must not affect numbering or availability.
pub const SEATS_PER_ROW: usize = 4;

pub fn is_bathroom(label: &str) -> bool {
    label.eq_ignore_ascii_case(BATHROOM_MARKER)
}

/// Derives the flat selectable-seat list for a service: walks the floor-1
/// grid row by row, skips empty cells, and overlays the live seat states by
/// exact label match. Pure over the service; a fresh list every call.
pub fn layout_seats(service: &ServiceCandidate) -> Vec<SelectableSeat> {
    let mut seats = Vec::new();

    for row in &service.seat_layout.floor1 {
        for cell in row {
            if cell.is_empty() {
                continue;
            }

            let bathroom = is_bathroom(cell);
            let taken = service
                .seat_state(cell)
                .map(|s| s.reserved || s.confirmed)
                .unwrap_or(false);

            seats.push(SelectableSeat {
                number: cell.clone(),
                is_available: !taken && !bathroom,
                is_bathroom: bathroom,
            });
        }
    }

    seats
}

/// Chunks the flat seat list into fixed-width rows for presentation.
pub fn presentation_rows(seats: &[SelectableSeat]) -> Vec<Vec<SelectableSeat>> {
    seats
        .chunks(SEATS_PER_ROW)
        .map(|chunk| chunk.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SeatLayout, SeatState};

    fn service(floor1: Vec<Vec<&str>>, seats: Vec<SeatState>) -> ServiceCandidate {
        ServiceCandidate {
            id: "svc-1".to_string(),
            origin: "Santiago".to_string(),
            destination: "Valparaíso".to_string(),
            name: "Expreso Costa".to_string(),
            service_number: "101".to_string(),
            time: "08:30".to_string(),
            company: "Buses del Pacífico".to_string(),
            seat_layout: SeatLayout {
                floor1: floor1
                    .into_iter()
                    .map(|row| row.into_iter().map(String::from).collect())
                    .collect(),
                floor2: vec![],
            },
            seats,
        }
    }

    fn taken(seat: &str, reserved: bool, confirmed: bool) -> SeatState {
        SeatState {
            seat_number: seat.to_string(),
            reserved,
            confirmed,
        }
    }

    #[test]
    fn test_grid_walk_skips_empty_cells() {
        let svc = service(
            vec![vec!["1", "2"], vec!["WC", ""]],
            vec![taken("1", true, true)],
        );

        let seats = layout_seats(&svc);
        assert_eq!(
            seats,
            vec![
                SelectableSeat {
                    number: "1".to_string(),
                    is_available: false,
                    is_bathroom: false
                },
                SelectableSeat {
                    number: "2".to_string(),
                    is_available: true,
                    is_bathroom: false
                },
                SelectableSeat {
                    number: "WC".to_string(),
                    is_available: false,
                    is_bathroom: true
                },
            ]
        );
    }

    #[test]
    fn test_reserved_without_confirmed_is_unavailable() {
        let svc = service(vec![vec!["1"]], vec![taken("1", true, false)]);
        assert!(!layout_seats(&svc)[0].is_available);

        let svc = service(vec![vec!["1"]], vec![taken("1", false, true)]);
        assert!(!layout_seats(&svc)[0].is_available);
    }

    #[test]
    fn test_seat_without_state_record_is_available() {
        let svc = service(vec![vec!["5"]], vec![]);
        assert!(layout_seats(&svc)[0].is_available);
    }

    #[test]
    fn test_bathroom_marker_case_insensitive() {
        let svc = service(vec![vec!["wc", "Wc"]], vec![]);
        let seats = layout_seats(&svc);
        assert!(seats.iter().all(|s| s.is_bathroom && !s.is_available));
    }

    #[test]
    fn test_layout_is_idempotent() {
        let svc = service(
            vec![vec!["1", "2", "3"], vec!["4", "WC", "5"]],
            vec![taken("3", true, true)],
        );
        assert_eq!(layout_seats(&svc), layout_seats(&svc));
    }

    #[test]
    fn test_presentation_chunking_preserves_order() {
        let svc = service(vec![vec!["1", "2", "3", "4", "5", "6"]], vec![]);
        let seats = layout_seats(&svc);
        let rows = presentation_rows(&seats);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 4);
        assert_eq!(rows[1].len(), 2);

        let flattened: Vec<_> = rows.into_iter().flatten().collect();
        assert_eq!(flattened, seats);
    }
}
