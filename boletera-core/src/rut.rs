use crate::{BookingError, BookingResult};

/// Anything shorter than this after normalization is rejected locally,
/// before a lookup is issued.
pub const MIN_RUT_LEN: usize = 3;

/// Strips grouping punctuation (dots, dashes, spaces) from a raw rut,
/// keeping digits and the `K` check character.
pub fn normalize_rut(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, 'k' | 'K'))
        .collect()
}

/// Normalizes and validates a rut for transmission.
pub fn normalized_rut(raw: &str) -> BookingResult<String> {
    let rut = normalize_rut(raw);
    if rut.len() < MIN_RUT_LEN {
        return Err(BookingError::Validation(format!(
            "rut too short to look up: {:?}",
            raw
        )));
    }
    Ok(rut)
}
