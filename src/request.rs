//! Request parsing for the control endpoint.
//!
//! The client side is a plain HTML page, so the "protocol" is three literal
//! markers searched for anywhere in the raw request buffer. Matching stays
//! substring-based on purpose: truncated or otherwise malformed requests
//! should still trigger whatever markers survived.

/// Marker for `GET /?fan=on`.
const ON_QUERY: &str = "/?fan=on";
/// Marker for `GET /?fan=off`.
const OFF_QUERY: &str = "/?fan=off";
/// Marker carrying a speed value, e.g. `/set?speed=75`.
const SPEED_QUERY: &str = "/set?speed=";
/// Request-line prefix of the slider's fetch() calls. Deliberately not the
/// same check as [`SPEED_QUERY`]: any request whose line starts this way gets
/// no page back, even when the speed value itself fails to parse.
const AJAX_MARKER: &str = "GET /set?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
}

/// Intents extracted from one raw request. The switch and speed markers are
/// independent; a single request may carry both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedRequest {
    pub switch: Option<Switch>,
    /// Clamped to 0..=100. `None` when the marker is absent or the value
    /// does not parse; the caller ignores the failure and keeps the previous
    /// speed.
    pub speed: Option<u8>,
    /// Suppress the full-page response (slider AJAX call).
    pub suppress_page: bool,
}

pub fn parse(raw: &str) -> ParsedRequest {
    // On wins over off when both markers are somehow present.
    let switch = if raw.contains(ON_QUERY) {
        Some(Switch::On)
    } else if raw.contains(OFF_QUERY) {
        Some(Switch::Off)
    } else {
        None
    };

    ParsedRequest {
        switch,
        speed: parse_speed(raw),
        suppress_page: raw.contains(AJAX_MARKER),
    }
}

/// Best-effort extraction of the value after the speed marker, up to the
/// next whitespace boundary. Out-of-range values are clamped, not rejected.
fn parse_speed(raw: &str) -> Option<u8> {
    let (_, rest) = raw.split_once(SPEED_QUERY)?;
    let value: i64 = rest.split_whitespace().next()?.parse().ok()?;
    Some(value.clamp(0, 100) as u8)
}
