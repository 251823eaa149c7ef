//! Rotation classification.

use crate::models::PresenceCode;

/// Classifies a free-text rotation description into the code written to the grid.
///
/// A description containing "vacation" (any case) is paid time off; everything
/// else, including an empty description, counts as present.
///
/// # Example
///
/// ```
/// use ears_fill::mapping::classify_rotation;
/// use ears_fill::models::PresenceCode;
///
/// assert_eq!(classify_rotation("Vacation - Week 2"), PresenceCode::PaidTimeOff);
/// assert_eq!(classify_rotation("Inpatient Medicine"), PresenceCode::Present);
/// ```
pub fn classify_rotation(rotation: &str) -> PresenceCode {
    if rotation.to_lowercase().contains("vacation") {
        PresenceCode::PaidTimeOff
    } else {
        PresenceCode::Present
    }
}

/// Classifies an optional rotation; a record without one counts as present.
pub fn classify_optional(rotation: Option<&str>) -> PresenceCode {
    rotation.map_or(PresenceCode::Present, classify_rotation)
}
