//! Event map features and the popup card shown when hovering a marker.
//!
//! The server publishes events as a GeoJSON `FeatureCollection`. Each
//! feature's properties drive one popup card whose availability badge is
//! picked from the ratio of remaining seats to capacity.

use serde::Deserialize;

use crate::date_format::{format_date, DateParts};
use crate::error::CoreError;
use crate::sanitize::truncate_string;
use crate::types::EventId;

/// Remaining-seat share at or below which an event shows "FEW LEFT".
pub const FEW_LEFT_RATIO: f64 = 0.15;

/// Character budget for the name and location lines of a card.
pub const CARD_TEXT_MAX_LEN: usize = 25;

/// Image used when an event has none of its own.
pub const DEFAULT_EVENT_IMAGE: &str = "/images/default-image.jpg";

// ---------------------------------------------------------------------------
// GeoJSON wire types
// ---------------------------------------------------------------------------

/// Body of `GET /event/api/geo/all`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventFeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<EventFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventFeature {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: PointGeometry,
    pub properties: EventProperties,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    /// `[longitude, latitude]`.
    pub coordinates: [f64; 2],
}

/// Server-rendered event properties. Read-only input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventProperties {
    pub id: EventId,
    pub name: String,
    pub location: String,
    pub tag: String,
    #[serde(default)]
    pub base64_image: Option<String>,
    pub start_date_time: DateParts,
    /// Seats still available, not seats taken.
    pub participants: i32,
    pub participants_max_number: i32,
}

impl EventFeature {
    pub fn longitude(&self) -> f64 {
        self.geometry.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.geometry.coordinates[1]
    }
}

// ---------------------------------------------------------------------------
// Availability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Full,
    FewLeft,
    Available,
}

impl Availability {
    pub fn classify(participants: i32, participants_max_number: i32) -> Self {
        if participants == 0 {
            Self::Full
        } else if participants > 0
            && f64::from(participants) <= FEW_LEFT_RATIO * f64::from(participants_max_number)
        {
            Self::FewLeft
        } else {
            Self::Available
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::FewLeft => "FEW LEFT",
            Self::Available => "AVAILABLE",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Full => "zero-participants-class",
            Self::FewLeft => "low-participants-class",
            Self::Available => "high-participants-class",
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the hover popup card for one event.
pub fn render_event_popup(props: &EventProperties) -> Result<String, CoreError> {
    let availability = Availability::classify(props.participants, props.participants_max_number);
    let date = format_date(&props.start_date_time)?;

    let image_src = match props.base64_image.as_deref() {
        Some(data) if !data.is_empty() => format!("data:image/jpeg;base64,{}", escape_html(data)),
        _ => DEFAULT_EVENT_IMAGE.to_string(),
    };

    let name = escape_html(&truncate_string(&props.name, CARD_TEXT_MAX_LEN));
    let location = escape_html(&truncate_string(&props.location, CARD_TEXT_MAX_LEN));
    let tag = escape_html(&props.tag);

    Ok(format!(
        concat!(
            r#"<div class="card"><div class="{css}"><span>{label}</span></div>"#,
            r#"<div class="card-image"> <img src="{image_src}" alt="Event Image" class="img-fluid"> </div> "#,
            r#"<div class="card-body"> <div class="badges"> <div>{tag}</div> </div> "#,
            r#"<h6> <span>{name}</span> </h6> "#,
            r#"<div> <p> <span>{location}</span> </p> </div> "#,
            r#"<div> <p> <span>{date}</span> </p> </div> </div> "#,
            r#"<div class="card-footer"> <div><span><a href="/event/{id}">MORE</a></span></div> </div> </div>"#,
        ),
        css = availability.css_class(),
        label = availability.label(),
        image_src = image_src,
        tag = tag,
        name = name,
        location = location,
        date = date,
        id = props.id,
    ))
}

/// Shift `feature_lng` by whole turns until it lies within 180 degrees of
/// `pointer_lng`, so a popup anchors on the marker copy under the cursor
/// when the map is zoomed out far enough to repeat the world.
pub fn wrap_longitude(pointer_lng: f64, feature_lng: f64) -> f64 {
    if !pointer_lng.is_finite() || !feature_lng.is_finite() {
        return feature_lng;
    }

    // Fewest whole turns that bring the gap to at most 180 degrees.
    let gap = pointer_lng - feature_lng;
    let turns = if gap > 180.0 {
        ((gap - 180.0) / 360.0).ceil()
    } else if gap < -180.0 {
        ((gap + 180.0) / 360.0).floor()
    } else {
        0.0
    };
    feature_lng + 360.0 * turns
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
