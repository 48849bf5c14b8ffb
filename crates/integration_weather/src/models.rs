//! Open-Meteo wire models

use serde::Deserialize;

/// Error body returned by Open-Meteo for rejected requests
///
/// Example: `{"error": true, "reason": "Latitude must be in range of -90 to 90°."}`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub error: bool,
    pub reason: String,
}

impl ApiErrorBody {
    /// Extract the reason from a response body, if it is an Open-Meteo error body
    pub(crate) fn reason_from(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .filter(|b| b.error)
            .map(|b| b.reason)
    }
}
