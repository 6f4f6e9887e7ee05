//! Domain logic for the YUP event check-in client.
//!
//! Pure functions and types with no I/O: input sanitisation, the
//! reservation check-in code and its outcome enumeration, event date
//! formatting and the event popup card renderer.

pub mod checkin;
pub mod date_format;
pub mod error;
pub mod event_card;
pub mod sanitize;
pub mod types;
