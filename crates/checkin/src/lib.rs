//! Check-in desk client for YUP events.
//!
//! Scans reservation QR codes from a camera (or accepts them typed),
//! validates their shape, submits them to the YUP server and reports the
//! outcome to the organiser.

pub mod api;
pub mod camera;
pub mod config;
pub mod decoder;
pub mod feedback;
pub mod scanner;
pub mod submitter;
