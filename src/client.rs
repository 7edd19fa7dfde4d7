use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    Incident, IncidentListResponse, IncidentReport, IncidentResponse, Notification,
    NotificationListResponse, StatusAck, StatusUpdateRequest, SubmitAck,
};

/// HTTP client for the incident API. One logical operation per endpoint;
/// no retry, no input validation (the server is the source of truth).
#[derive(Clone, Debug)]
pub struct IncidentApi {
    http: reqwest::Client,
    base_url: String,
}

impl IncidentApi {
    pub fn new(cfg: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn submit_incident(&self, report: &IncidentReport) -> Result<SubmitAck, ApiError> {
        let res = self
            .http
            .post(self.url("/receive"))
            .json(report)
            .send()
            .await?;
        let (status, ack): (_, SubmitAck) = decode(res).await?;
        if !ack.success || !status.is_success() {
            return Err(ApiError::rejected(status, ack.error));
        }
        Ok(ack)
    }

    pub async fn list_incidents(&self) -> Result<Vec<Incident>, ApiError> {
        let res = self.http.get(self.url("/incidents")).send().await?;
        let (status, body): (_, IncidentListResponse) = decode(res).await?;
        if !body.success || !status.is_success() {
            return Err(ApiError::rejected(status, body.error));
        }
        Ok(body.incidents)
    }

    pub async fn get_incident(&self, incident_id: &str) -> Result<Incident, ApiError> {
        let res = self
            .http
            .get(self.url(&format!("/incidents/{incident_id}")))
            .send()
            .await?;
        let (status, body): (_, IncidentResponse) = decode(res).await?;
        if !body.success || !status.is_success() {
            return Err(ApiError::rejected(status, body.error));
        }
        body.incident.ok_or(ApiError::Decode {
            reason: "success response without an incident".to_string(),
            body: String::new(),
        })
    }

    pub async fn update_status(&self, incident_id: &str, status: &str) -> Result<StatusAck, ApiError> {
        let res = self
            .http
            .put(self.url(&format!("/incidents/{incident_id}/status")))
            .json(&StatusUpdateRequest {
                status: status.to_string(),
            })
            .send()
            .await?;
        let (http_status, ack): (_, StatusAck) = decode(res).await?;
        if !ack.success || !http_status.is_success() {
            return Err(ApiError::rejected(http_status, ack.error));
        }
        Ok(ack)
    }

    pub async fn list_notifications(&self) -> Result<Vec<Notification>, ApiError> {
        let res = self.http.get(self.url("/notifications")).send().await?;
        let (status, body): (_, NotificationListResponse) = decode(res).await?;
        if !body.success || !status.is_success() {
            return Err(ApiError::rejected(status, body.error));
        }
        Ok(body.notifications)
    }
}

/// Reads the full body, then decodes. A body that does not match the
/// expected envelope is a `Decode` error on a 2xx response; on a non-2xx
/// response the status wins and we only scrape the error message out of
/// whatever the server sent.
async fn decode<T: DeserializeOwned>(res: Response) -> Result<(StatusCode, T), ApiError> {
    let status = res.status();
    let body = res.text().await?;
    match serde_json::from_str::<T>(&body) {
        Ok(v) => Ok((status, v)),
        Err(_) if !status.is_success() => Err(ApiError::rejected(status, scrape_error(&body))),
        Err(e) => Err(ApiError::decode(e, &body)),
    }
}

fn scrape_error(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrape_error_reads_flat_error_field() {
        assert_eq!(
            scrape_error(r#"{"error":"ID de siniestro no encontrado"}"#),
            Some("ID de siniestro no encontrado".to_string())
        );
        assert_eq!(scrape_error("not json"), None);
        assert_eq!(scrape_error(r#"{"success":false}"#), None);
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let cfg = Config {
            api_base_url: "http://localhost:8081/api/angular/".to_string(),
            poll_interval: std::time::Duration::from_secs(30),
            request_timeout: std::time::Duration::from_secs(10),
        };
        let api = IncidentApi::new(&cfg).unwrap();
        assert_eq!(
            api.url("/incidents"),
            "http://localhost:8081/api/angular/incidents"
        );
    }
}
