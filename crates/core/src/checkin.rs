//! Reservation check-in code and the server's outcome enumeration.
//!
//! A check-in code is what a reservation's QR image encodes:
//! `YUP_RES-` followed by thirteen characters, 21 in total, uppercase.
//! Anything that does not have this shape after normalisation is
//! rejected before it reaches the network.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

/// Required prefix of every check-in code.
pub const CODE_PREFIX: &str = "YUP_RES-";

/// Exact length of a check-in code, in characters.
pub const CODE_LENGTH: usize = 21;

/// Alert shown when scanned or typed text is not a check-in code.
pub const INVALID_CODE_MESSAGE: &str = "This is not a valid reservation code of YUP!";

/// Alert shown for transport failures and unmapped outcomes.
pub const GENERIC_ERROR_MESSAGE: &str = "Generic error!";

/// Server response codes of `POST /reservation/checkQrCode`.
pub const RESPONSE_NOT_FOUND: i64 = -2;
pub const RESPONSE_ALREADY_VALIDATED: i64 = -1;
pub const RESPONSE_SUCCESS: i64 = 0;

// ---------------------------------------------------------------------------
// CheckInCode
// ---------------------------------------------------------------------------

/// A normalised, shape-checked reservation code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CheckInCode(String);

impl CheckInCode {
    /// Trim and uppercase raw scanner or keyboard input.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_uppercase()
    }

    /// Normalise `raw` and accept it iff it is exactly [`CODE_LENGTH`]
    /// characters long and starts with [`CODE_PREFIX`].
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let normalized = Self::normalize(raw);
        let length = normalized.chars().count();

        if length != CODE_LENGTH {
            return Err(CoreError::Validation(format!(
                "Check-in code must be {CODE_LENGTH} characters (got {length})"
            )));
        }
        if !normalized.starts_with(CODE_PREFIX) {
            return Err(CoreError::Validation(format!(
                "Check-in code must start with {CODE_PREFIX}"
            )));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for CheckInCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CheckInCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// CheckInOutcome
// ---------------------------------------------------------------------------

/// What the server decided about a submitted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInOutcome {
    /// No reservation carries this code.
    NotFound,
    /// The reservation was already checked in.
    AlreadyValidated,
    /// Presence recorded.
    Success,
    /// Any response outside the three known codes.
    UnknownError,
}

impl CheckInOutcome {
    /// Map a numeric server response to an outcome.
    pub fn from_code(code: i64) -> Self {
        match code {
            RESPONSE_NOT_FOUND => Self::NotFound,
            RESPONSE_ALREADY_VALIDATED => Self::AlreadyValidated,
            RESPONSE_SUCCESS => Self::Success,
            _ => Self::UnknownError,
        }
    }

    /// Map a raw 2xx response body. Bodies that are not a bare JSON
    /// integer are [`CheckInOutcome::UnknownError`].
    pub fn from_response_body(body: &str) -> Self {
        match serde_json::from_str::<serde_json::Value>(body.trim()) {
            Ok(serde_json::Value::Number(n)) => n.as_i64().map_or(Self::UnknownError, Self::from_code),
            _ => Self::UnknownError,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }

    /// The alert to surface for this outcome, `None` on success.
    pub fn alert_message(self) -> Option<&'static str> {
        match self {
            Self::NotFound => Some("Reservation not found!"),
            Self::AlreadyValidated => Some("Reservation already validated!"),
            Self::Success => None,
            Self::UnknownError => Some(GENERIC_ERROR_MESSAGE),
        }
    }
}
