//! Delay extraction from Transport API live departure boards.

use serde_json::Value;
use tracing::{debug, error};

use crate::error::DelayError;

pub const LATE: &str = "LATE";

/// Counts departures under `departures.all` whose `status` is `"LATE"`.
///
/// A payload that never mentions `departures` is rejected before parsing.
/// A missing `all` list counts as zero departures, but every listed departure
/// must carry a `status` field.
///
/// # Errors
///
/// Returns [`DelayError::Malformed`] when the text lacks `departures`,
/// [`DelayError::Formatting`] when it is not JSON, and
/// [`DelayError::MissingFields`] when the board has an unexpected shape.
pub fn extract(text: &str) -> Result<usize, DelayError> {
    if !text.contains("departures") {
        error!(payload = text, "FORMATTING ERROR. Malformed JSON response");
        return Err(DelayError::Malformed(text.to_string()));
    }

    let board: Value = serde_json::from_str(text)
        .inspect_err(|e| error!(error = %e, "FORMATTING ERROR. Response is not JSON"))?;

    count_late(&board)
        .inspect(|late| debug!(late, "Delay count extracted"))
        .inspect_err(|e| {
            error!(error = %e, "FORMATTING ERROR. JSON response missing transport status fields")
        })
}

fn count_late(board: &Value) -> Result<usize, DelayError> {
    let departures = board
        .get("departures")
        .and_then(Value::as_object)
        .ok_or_else(|| missing("departures"))?;

    match departures.get("all") {
        None => Ok(0),
        Some(Value::Array(all)) => all.iter().try_fold(0usize, |late, departure| -> Result<usize, DelayError> {
            let status = departure
                .as_object()
                .and_then(|d| d.get("status"))
                .ok_or_else(|| missing("departures.all[].status"))?;
            Ok(late + usize::from(status.as_str() == Some(LATE)))
        }),
        Some(Value::String(s)) if s.is_empty() => Ok(0),
        Some(Value::Object(o)) if o.is_empty() => Ok(0),
        Some(_) => Err(missing("departures.all")),
    }
}

fn missing(field: &str) -> DelayError {
    DelayError::MissingFields(field.to_string())
}
