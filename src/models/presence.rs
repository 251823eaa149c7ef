//! Presence codes written into attendance cells.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The value written into an attendance cell.
///
/// Writing a code overwrites whatever the cell held before.
///
/// # Example
///
/// ```
/// use ears_fill::models::PresenceCode;
///
/// assert_eq!(PresenceCode::Present.code(), "P");
/// assert_eq!(PresenceCode::PaidTimeOff.code(), "PTO");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceCode {
    /// The trainee attended.
    Present,
    /// The trainee was on paid time off.
    PaidTimeOff,
}

impl PresenceCode {
    /// Returns the short code stored in the cell.
    pub fn code(&self) -> &'static str {
        match self {
            PresenceCode::Present => "P",
            PresenceCode::PaidTimeOff => "PTO",
        }
    }
}

impl fmt::Display for PresenceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
