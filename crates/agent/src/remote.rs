//! HTTP client for the Guardpost API.
//!
//! [`RemoteRecordStore`] implements [`RecordStore`] over the `/api/v1`
//! endpoints, so a guard-side session submits through the same trait the
//! server uses. Structured rejection bodies (`{ error, code, details }`) are
//! decoded back into [`Rejection`] values; anything else becomes
//! [`StoreError::Backend`].

use async_trait::async_trait;
use chrono::NaiveDate;
use guardpost_core::checkpoint::CheckpointSnapshot;
use guardpost_core::store::{
    CheckInCandidate, GuardProfile, PatrolRecord, RecordStore, Rejection, StoreError,
};
use guardpost_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// `{ "data": ... }` envelope wrapping every successful API response.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// Error body returned by the API on every non-2xx response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub code: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct IncompleteDetails {
    missing: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OutOfRangeDetails {
    distance_m: f64,
    radius_m: f64,
}

/// Errors from the lookup endpoints.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}, {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

/// HTTP client for one API instance.
#[derive(Debug, Clone)]
pub struct RemoteRecordStore {
    client: reqwest::Client,
    api_url: String,
}

impl RemoteRecordStore {
    /// * `api_url` - Base URL, e.g. `http://host:3000`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.api_url)
    }

    /// Fetch the checkpoint a session will be started against.
    ///
    /// Sends `GET /api/v1/checkpoints/{id}`.
    pub async fn fetch_checkpoint(&self, id: DbId) -> Result<CheckpointSnapshot, RemoteError> {
        self.get_data(&self.endpoint(&format!("/checkpoints/{id}")))
            .await
    }

    /// Fetch the guard the agent acts for.
    ///
    /// Sends `GET /api/v1/guards/{id}`.
    pub async fn fetch_guard(&self, id: DbId) -> Result<GuardProfile, RemoteError> {
        self.get_data(&self.endpoint(&format!("/guards/{id}"))).await
    }

    async fn get_data<T: DeserializeOwned>(&self, url: &str) -> Result<T, RemoteError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let (code, message) = match serde_json::from_str::<ApiErrorBody>(&body) {
                Ok(parsed) => (parsed.code, parsed.error),
                Err(_) => ("UNKNOWN".to_string(), body),
            };
            return Err(RemoteError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }
        let envelope: DataEnvelope<T> = response.json().await?;
        Ok(envelope.data)
    }

    async fn list(
        &self,
        date: NaiveDate,
        guard_id: Option<DbId>,
    ) -> Result<Vec<PatrolRecord>, StoreError> {
        let mut query = vec![("date", date.format("%Y-%m-%d").to_string())];
        if let Some(guard_id) = guard_id {
            query.push(("guard_id", guard_id.to_string()));
        }

        let response = self
            .client
            .get(self.endpoint("/patrols"))
            .query(&query)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Backend(format!(
                "listing patrols failed ({status}): {body}"
            )));
        }
        let envelope: DataEnvelope<Vec<PatrolRecord>> =
            response.json().await.map_err(transport)?;
        Ok(envelope.data)
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    tracing::warn!(error = %err, "Record store request failed");
    StoreError::Backend(err.to_string())
}

/// Turn an API error response to a submission back into a [`StoreError`].
///
/// Not-found codes carry the ids from `candidate`, since the body only
/// holds the rendered message. Unknown codes and 5xx responses are backend
/// failures.
pub fn decode_submit_error(
    status: u16,
    body: &str,
    candidate: &CheckInCandidate,
) -> StoreError {
    let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) else {
        return StoreError::Backend(format!("unexpected response ({status}): {body}"));
    };
    let details = parsed.details.clone().unwrap_or(serde_json::Value::Null);

    let rejection = match parsed.code.as_str() {
        "INVALID_COORDINATE" => Some(Rejection::InvalidCoordinate),
        "CHECKPOINT_NOT_FOUND" => Some(Rejection::CheckpointNotFound(candidate.checkpoint_id)),
        "GUARD_NOT_FOUND" => Some(Rejection::GuardNotFound(candidate.guard_id)),
        "INCOMPLETE_CHECKLIST" => serde_json::from_value::<IncompleteDetails>(details)
            .ok()
            .map(|d| Rejection::IncompleteChecklist { missing: d.missing }),
        "OUT_OF_RANGE" => serde_json::from_value::<OutOfRangeDetails>(details)
            .ok()
            .map(|d| Rejection::OutOfRange {
                distance_m: d.distance_m,
                radius_m: d.radius_m,
            }),
        _ => None,
    };

    match rejection {
        Some(rejection) => StoreError::Rejected(rejection),
        None => StoreError::Backend(format!("{} ({status}): {}", parsed.code, parsed.error)),
    }
}

#[async_trait]
impl RecordStore for RemoteRecordStore {
    /// Sends `POST /api/v1/patrols`.
    async fn append(&self, candidate: CheckInCandidate) -> Result<PatrolRecord, StoreError> {
        let response = self
            .client
            .post(self.endpoint("/patrols"))
            .json(&candidate)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(transport)?;
            return Err(decode_submit_error(status.as_u16(), &body, &candidate));
        }

        let envelope: DataEnvelope<PatrolRecord> = response.json().await.map_err(transport)?;
        Ok(envelope.data)
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<PatrolRecord>, StoreError> {
        self.list(date, None).await
    }

    async fn list_by_guard_and_date(
        &self,
        guard_id: DbId,
        date: NaiveDate,
    ) -> Result<Vec<PatrolRecord>, StoreError> {
        self.list(date, Some(guard_id)).await
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use guardpost_core::geo::Coordinate;

    use super::*;

    fn candidate() -> CheckInCandidate {
        CheckInCandidate {
            guard_id: 2,
            checkpoint_id: 7,
            position: Coordinate::new(40.7128, -74.0060),
            checklist: Default::default(),
            photo_url: None,
        }
    }

    #[test]
    fn out_of_range_body_round_trips_to_rejection() {
        let body = r#"{
            "error": "You must be within 50 meters of the checkpoint. Current distance: 200m",
            "code": "OUT_OF_RANGE",
            "details": { "distance_m": 200.1, "radius_m": 50.0 }
        }"#;
        assert_eq!(
            decode_submit_error(422, body, &candidate()),
            StoreError::Rejected(Rejection::OutOfRange {
                distance_m: 200.1,
                radius_m: 50.0,
            })
        );
    }

    #[test]
    fn incomplete_checklist_keeps_missing_labels() {
        let body = r#"{"error":"...","code":"INCOMPLETE_CHECKLIST",
                       "details":{"missing":["Lights off"]}}"#;
        assert_eq!(
            decode_submit_error(422, body, &candidate()),
            StoreError::Rejected(Rejection::IncompleteChecklist {
                missing: vec!["Lights off".to_string()],
            })
        );
    }

    #[test]
    fn not_found_codes_use_candidate_ids() {
        let body = r#"{"error":"Checkpoint 7 not found","code":"CHECKPOINT_NOT_FOUND"}"#;
        assert_eq!(
            decode_submit_error(400, body, &candidate()),
            StoreError::Rejected(Rejection::CheckpointNotFound(7))
        );

        let body = r#"{"error":"Guard 2 not found","code":"GUARD_NOT_FOUND"}"#;
        assert_eq!(
            decode_submit_error(400, body, &candidate()),
            StoreError::Rejected(Rejection::GuardNotFound(2))
        );
    }

    #[test]
    fn server_errors_and_garbage_are_backend_failures() {
        let body = r#"{"error":"An internal error occurred","code":"INTERNAL_ERROR"}"#;
        assert_matches!(
            decode_submit_error(500, body, &candidate()),
            StoreError::Backend(msg) if msg.contains("INTERNAL_ERROR")
        );

        assert_matches!(
            decode_submit_error(502, "<html>Bad Gateway</html>", &candidate()),
            StoreError::Backend(_)
        );
    }

    #[test]
    fn out_of_range_without_details_is_not_a_rejection() {
        let body = r#"{"error":"too far","code":"OUT_OF_RANGE"}"#;
        assert_matches!(
            decode_submit_error(422, body, &candidate()),
            StoreError::Backend(_)
        );
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let store = RemoteRecordStore::new("http://localhost:3000/");
        assert_eq!(
            store.endpoint("/patrols"),
            "http://localhost:3000/api/v1/patrols"
        );
    }
}
