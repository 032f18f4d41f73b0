//! Reqwest-backed record service.
//!
//! This adapter owns transport details only: URL building, JSON bodies, HTTP
//! error mapping and decoding. Each call is one attempt with no timeout or
//! retry. Failures are logged here and handed back to the caller unchanged.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use careflow_core::service::{require_assigned, RecordService, ServiceError, ServiceResult};
use careflow_core::{NewPatient, Patient, PatientId};

use crate::config::ApiConfig;

/// Record service adapter for a `/patients` HTTP collection.
pub struct HttpRecordService {
    client: Client,
    config: ApiConfig,
}

impl HttpRecordService {
    /// Build an adapter with a default reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: ApiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, config))
    }

    /// Build an adapter around an existing client.
    pub fn with_client(client: Client, config: ApiConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn fetch_all(&self) -> ServiceResult<Vec<Patient>> {
        let url = self.config.collection_url();
        debug!(%url, "listing patients");
        let body = send(self.client.get(url)).await?;
        decode(&body)
    }

    async fn post_new(&self, patient: &NewPatient) -> ServiceResult<Patient> {
        let url = self.config.collection_url();
        debug!(%url, "creating patient");
        let body = send(self.client.post(url).json(patient)).await?;
        decode(&body)
    }

    async fn put_record(&self, id: &PatientId, patient: &Patient) -> ServiceResult<()> {
        let url = self.config.record_url(require_assigned(id)?);
        debug!(%url, "updating patient");
        send(self.client.put(url).json(patient)).await?;
        Ok(())
    }

    async fn delete_record(&self, id: &PatientId) -> ServiceResult<()> {
        let url = self.config.record_url(require_assigned(id)?);
        debug!(%url, "deleting patient");
        send(self.client.delete(url)).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordService for HttpRecordService {
    async fn list(&self) -> ServiceResult<Vec<Patient>> {
        logged("list", self.fetch_all().await)
    }

    async fn create(&self, patient: &NewPatient) -> ServiceResult<Patient> {
        logged("create", self.post_new(patient).await)
    }

    async fn update(&self, id: &PatientId, patient: &Patient) -> ServiceResult<()> {
        logged("update", self.put_record(id, patient).await)
    }

    async fn delete(&self, id: &PatientId) -> ServiceResult<()> {
        logged("delete", self.delete_record(id).await)
    }
}

fn logged<T>(operation: &'static str, result: ServiceResult<T>) -> ServiceResult<T> {
    if let Err(failure) = &result {
        error!(operation, error = %failure, "record service call failed");
    }
    result
}

/// Send a request and return the body of a successful response.
async fn send(request: RequestBuilder) -> ServiceResult<Vec<u8>> {
    let response = request
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(map_transport_error)?;

    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    Ok(body.to_vec())
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> ServiceResult<T> {
    serde_json::from_slice(body).map_err(|error| {
        ServiceError::Decode(format!(
            "invalid patient JSON payload: {error} (first {BODY_EXCERPT_CHARS} chars: {})",
            body_preview(body)
        ))
    })
}

fn map_transport_error(error: reqwest::Error) -> ServiceError {
    ServiceError::Transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ServiceError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        preview
    };

    ServiceError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Longest body excerpt carried in error messages, in characters.
const BODY_EXCERPT_CHARS: usize = 160;

/// Whitespace-collapsed excerpt of a response body for error messages.
fn body_preview(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut excerpt = String::new();
    for (count, word) in text.split_whitespace().enumerate() {
        if count > 0 {
            excerpt.push(' ');
        }
        excerpt.push_str(word);
    }

    match excerpt.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &excerpt[..cut]),
        None => excerpt,
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network mapping helpers.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::not_found(StatusCode::NOT_FOUND, 404)]
    #[case::bad_request(StatusCode::BAD_REQUEST, 400)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, 500)]
    #[case::unavailable(StatusCode::SERVICE_UNAVAILABLE, 503)]
    fn test_status_codes_map_to_status_errors(#[case] status: StatusCode, #[case] expected: u16) {
        let error = map_status_error(status, b"{\"error\": \"backend unavailable\"}");
        assert_eq!(
            error,
            ServiceError::Status {
                status: expected,
                message: "{\"error\": \"backend unavailable\"}".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_body_uses_reason_phrase() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"  \n ");
        assert_eq!(
            error,
            ServiceError::Status {
                status: 502,
                message: "Bad Gateway".to_string(),
            }
        );
    }

    #[test]
    fn test_body_preview_compacts_and_truncates() {
        assert_eq!(body_preview(b"a \n\t b"), "a b");

        let long = "é".repeat(200);
        let preview = body_preview(long.as_bytes());
        assert_eq!(preview.chars().count(), BODY_EXCERPT_CHARS + 3);
        assert!(preview.ends_with("..."));

        let exact = "y".repeat(BODY_EXCERPT_CHARS);
        assert_eq!(body_preview(exact.as_bytes()), exact);
    }

    #[test]
    fn test_decode_patient_list() {
        let body = br#"[
            {"id": 1, "name": "Anita", "condition": "Asthma", "priority": "Stable",
             "doctor": "Dr. Sharma", "lastVisit": "2024-01-01"},
            {"id": "b7", "name": "Ravi", "condition": "Fracture", "priority": "Critical",
             "doctor": "Dr. Rao", "lastVisit": "2024-02-01",
             "createdAt": "2024-02-01T08:00:00Z", "updatedAt": "2024-02-01T08:00:00Z"}
        ]"#;

        let patients: Vec<Patient> = decode(body).unwrap();
        assert_eq!(patients.len(), 2);
        assert_eq!(patients[0].id, PatientId::assigned("1"));
        assert_eq!(patients[1].id, PatientId::assigned("b7"));
    }

    #[test]
    fn test_decode_rejects_non_json() {
        let result: ServiceResult<Vec<Patient>> = decode(b"<html>oops</html>");
        assert!(matches!(result, Err(ServiceError::Decode(_))));
    }
}
