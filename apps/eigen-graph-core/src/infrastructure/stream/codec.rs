//! Price Frame Codec
//!
//! Decodes and validates the JSON price frames delivered on the stream
//! endpoint. Each frame carries its price and timestamp as strings;
//! validation and the monotonicity gate live here so the rest of the
//! pipeline only ever sees clean, strictly-ordered points.

use chrono::DateTime;
use serde::Deserialize;

use crate::domain::streaming::StreamPoint;

/// Raw price frame as sent by the stream endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceFrame {
    /// Price as a decimal string.
    pub price: String,
    /// Observation time, RFC 3339.
    pub time: String,
}

/// Codec errors.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// JSON decoding failed.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode one text frame into a point, applying the validation gate.
///
/// `watermark` is the timestamp of the last accepted point. Returns
/// `Ok(None)` for frames that decode but fail validation: a non-finite
/// price, an unparseable timestamp, or a timestamp at or below the
/// watermark. Only malformed JSON is an error; the caller treats both
/// rejection classes as drop-and-continue, never as connection failures.
///
/// # Errors
///
/// Returns an error if the frame is not valid JSON for a price frame.
pub fn decode_point(text: &str, watermark: i64) -> Result<Option<StreamPoint>, CodecError> {
    let frame: PriceFrame = serde_json::from_str(text)?;
    Ok(validate_frame(&frame, watermark))
}

fn validate_frame(frame: &PriceFrame, watermark: i64) -> Option<StreamPoint> {
    let timestamp_millis = DateTime::parse_from_rfc3339(&frame.time)
        .ok()?
        .timestamp_millis();
    let price: f64 = frame.price.trim().parse().ok()?;
    if !price.is_finite() {
        return None;
    }
    if timestamp_millis <= watermark {
        return None;
    }
    Some(StreamPoint {
        timestamp_millis,
        price,
    })
}
