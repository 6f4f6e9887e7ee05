use std::time::Duration;

use yup_core::types::EventId;

/// Default HTTP timeout for a single check-in request.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Default scan tick: one refresh of a 60 Hz display.
const DEFAULT_SCAN_TICK_MS: u64 = 16;

const DEFAULT_FRAME_WIDTH: u32 = 640;
const DEFAULT_FRAME_HEIGHT: u32 = 480;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Timing and raster geometry of the scan loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Delay between two capture-and-decode attempts.
    pub tick: Duration,
    /// Raster buffer width in pixels.
    pub frame_width: u32,
    /// Raster buffer height in pixels.
    pub frame_height: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(DEFAULT_SCAN_TICK_MS),
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

/// Check-in client configuration.
#[derive(Debug, Clone)]
pub struct CheckInConfig {
    /// Server origin, e.g. `http://localhost:8080`. No trailing slash.
    pub base_url: String,
    /// Event whose reservations are being checked in.
    pub event_id: EventId,
    /// Organiser JWT, sent as the `JWT` cookie.
    pub auth_token: Option<String>,
    pub request_timeout: Duration,
    pub scan: ScanConfig,
}

impl CheckInConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                    | Default |
    /// |----------------------------|---------|
    /// | `YUP_BASE_URL`             | --      |
    /// | `YUP_EVENT_ID`             | --      |
    /// | `YUP_AUTH_TOKEN`           | none    |
    /// | `YUP_REQUEST_TIMEOUT_SECS` | `10`    |
    /// | `YUP_SCAN_TICK_MS`         | `16`    |
    /// | `YUP_FRAME_WIDTH`          | `640`   |
    /// | `YUP_FRAME_HEIGHT`         | `480`   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("YUP_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("YUP_BASE_URL"))?
            .trim()
            .trim_end_matches('/')
            .to_string();

        let event_id = lookup("YUP_EVENT_ID")
            .ok_or(ConfigError::Missing("YUP_EVENT_ID"))?
            .trim()
            .parse::<EventId>()
            .map_err(|e| ConfigError::Invalid {
                var: "YUP_EVENT_ID",
                reason: e.to_string(),
            })?;

        let auth_token = lookup("YUP_AUTH_TOKEN").filter(|v| !v.trim().is_empty());

        let request_timeout_secs = parse_or(
            &lookup,
            "YUP_REQUEST_TIMEOUT_SECS",
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;
        let tick_ms = parse_or(&lookup, "YUP_SCAN_TICK_MS", DEFAULT_SCAN_TICK_MS)?;
        let frame_width = parse_or(&lookup, "YUP_FRAME_WIDTH", DEFAULT_FRAME_WIDTH)?;
        let frame_height = parse_or(&lookup, "YUP_FRAME_HEIGHT", DEFAULT_FRAME_HEIGHT)?;

        for (var, value) in [
            ("YUP_FRAME_WIDTH", frame_width),
            ("YUP_FRAME_HEIGHT", frame_height),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    var,
                    reason: "frame dimensions must be non-zero".to_string(),
                });
            }
        }

        Ok(Self {
            base_url,
            event_id,
            auth_token,
            request_timeout: Duration::from_secs(request_timeout_secs),
            scan: ScanConfig {
                tick: Duration::from_millis(tick_ms),
                frame_width,
                frame_height,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
    }
}
