use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageType {
    #[default]
    Frontal,
    Lateral,
    Trasero,
    #[serde(rename = "Múltiple")]
    Multiple,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    Leve,
    Moderado,
    Grave,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentInfo {
    pub description: String,
    pub date: DateTime<Utc>,
    pub damage_type: DamageType,
    pub severity: Severity,
}

impl Default for IncidentInfo {
    fn default() -> Self {
        Self {
            description: String::new(),
            date: Utc::now(),
            damage_type: DamageType::default(),
            severity: Severity::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleInfo {
    pub make: String,
    pub model: String,
    pub year: String,
    pub plate: String,
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsuranceInfo {
    pub policy_number: String,
    pub card_number: String,
    pub expiration_date: String,
    pub holder_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// An attached image. `analysis_results` has no fixed schema upstream, so
/// it is carried as raw JSON instead of a typed struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_results: Option<serde_json::Value>,
}

/// The draft report the form edits and submits. The server assigns the
/// identifier and status; nothing here is validated client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentReport {
    pub incident_info: IncidentInfo,
    pub vehicle_info: VehicleInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insurance_info: Option<InsuranceInfo>,
    pub location: Location,
    #[serde(default)]
    pub images: Vec<ImageAttachment>,
}

impl Default for IncidentReport {
    fn default() -> Self {
        // The upstream form starts with an empty-but-present insurance
        // section, so a fresh draft does too.
        Self {
            incident_info: IncidentInfo::default(),
            vehicle_info: VehicleInfo::default(),
            insurance_info: Some(InsuranceInfo::default()),
            location: Location::default(),
            images: Vec::new(),
        }
    }
}

/// A stored incident as the server returns it: the submitted report plus
/// the server-assigned id, status and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    pub incident_id: String,
    /// Free-form; the server uses values like "received", "processing",
    /// "completed".
    pub status: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub report: IncidentReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// Response envelopes. Every endpoint reports logical failure through
// `success:false` plus an `error` message; callers must check `success`
// before trusting the payload.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAck {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub incident_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentListResponse {
    pub success: bool,
    #[serde(default)]
    pub incidents: Vec<Incident>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentResponse {
    pub success: bool,
    #[serde(default)]
    pub incident: Option<Incident>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusAck {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub incident: Option<Incident>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub success: bool,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&DamageType::Multiple).unwrap(),
            "\"Múltiple\""
        );
        assert_eq!(
            serde_json::from_str::<DamageType>("\"Trasero\"").unwrap(),
            DamageType::Trasero
        );
    }

    #[test]
    fn default_report_is_empty() {
        let report = IncidentReport::default();
        assert_eq!(report.incident_info.description, "");
        assert_eq!(report.incident_info.damage_type, DamageType::Frontal);
        assert_eq!(report.incident_info.severity, Severity::Leve);
        assert_eq!(report.location.latitude, 0.0);
        assert_eq!(report.location.longitude, 0.0);
        assert!(report.images.is_empty());
        assert_eq!(report.insurance_info, Some(InsuranceInfo::default()));
    }

    #[test]
    fn image_attachment_uses_type_on_the_wire() {
        let img: ImageAttachment = serde_json::from_str(
            r#"{"url":"http://example.com/1.jpg","type":"damage","analysis_results":{"score":0.9}}"#,
        )
        .unwrap();
        assert_eq!(img.kind, "damage");
        assert!(img.analysis_results.is_some());

        let bare: ImageAttachment =
            serde_json::from_str(r#"{"url":"http://example.com/2.jpg","type":"card"}"#).unwrap();
        assert!(bare.analysis_results.is_none());
    }

    #[test]
    fn incident_flattens_report_fields() {
        let raw = r#"{
            "incident_id": "abc-123",
            "status": "received",
            "timestamp": "2024-01-01T00:00:00Z",
            "incident_info": {
                "description": "Choque leve",
                "date": "2024-01-01T00:00:00Z",
                "damage_type": "Frontal",
                "severity": "Leve"
            },
            "vehicle_info": {"make":"Seat","model":"Ibiza","year":"2019","plate":"ABC123","color":"rojo"},
            "location": {"latitude": 19.4326, "longitude": -99.1332, "address": "CDMX"}
        }"#;
        let incident: Incident = serde_json::from_str(raw).unwrap();
        assert_eq!(incident.incident_id, "abc-123");
        assert_eq!(incident.report.vehicle_info.make, "Seat");
        assert!(incident.report.insurance_info.is_none());
        assert!(incident.status_updated_at.is_none());
    }

    #[test]
    fn notification_minimal_shape_decodes() {
        let n: Notification =
            serde_json::from_str(r#"{"timestamp":"2024-01-01T00:00:00Z","message":"Test"}"#)
                .unwrap();
        assert_eq!(n.message, "Test");
        assert!(n.incident_id.is_none());
    }
}
