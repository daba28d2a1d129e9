use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Kind of account on either end of a mentorship request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    User,
    Mentor,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::User => write!(f, "user"),
            EntityType::Mentor => write!(f, "mentor"),
        }
    }
}

impl std::str::FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(EntityType::User),
            "mentor" => Ok(EntityType::Mentor),
            other => Err(format!("unknown entity type '{other}'")),
        }
    }
}

/// Lifecycle status of a mentorship request.
///
/// Moves from `Pending` to either `Accepted` or `Rejected` and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn is_pending(self) -> bool {
        self == RequestStatus::Pending
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Accepted => write!(f, "accepted"),
            RequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Public profile summary embedded in a request for the other party.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartySummary {
    pub id: i64,
    #[serde(default)]
    pub login: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub telegram_link: Option<String>,
}

/// A directed mentorship proposal as returned by the request directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorshipRequest {
    pub id: i64,
    pub sender_id: i64,
    pub sender_type: EntityType,
    pub receiver_id: i64,
    pub receiver_type: EntityType,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
    pub status: RequestStatus,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<PartySummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<PartySummary>,
}

impl MentorshipRequest {
    /// Sender name from the embedded summary, or a placeholder built from the id.
    pub fn sender_display_name(&self) -> String {
        match &self.sender {
            Some(s) if !s.name.is_empty() => s.name.clone(),
            _ => format!("Sender {}", self.sender_id),
        }
    }

    /// Receiver name from the embedded summary, or a placeholder built from the id.
    pub fn receiver_display_name(&self) -> String {
        match &self.receiver {
            Some(r) if !r.name.is_empty() => r.name.clone(),
            _ => format!("Receiver {}", self.receiver_id),
        }
    }
}

/// Body of `POST /requests/send`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest {
    pub receiver_id: i64,
    pub message: String,
    pub receiver_type: EntityType,
}

/// Contact details revealed to the receiver once a request is approved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telegram_link: Option<String>,
}

/// Response of `POST /requests/approve/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproveResponse {
    pub message: String,
    pub contact_info: ContactInfo,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339 as well as the backend's offset-less form
/// (`2025-03-01T10:00:00.123456`), which is read as UTC.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_request_with_embedded_sender() {
        let raw = serde_json::json!({
            "id": 12,
            "sender_id": 3,
            "sender_type": "user",
            "receiver_id": 9,
            "receiver_type": "mentor",
            "message": "Could you help me with olympiad prep?",
            "status": "pending",
            "created_at": "2025-03-01T10:00:00Z",
            "updated_at": "2025-03-01T10:00:00Z",
            "sender": {
                "id": 3,
                "login": "anna",
                "name": "Anna",
                "description": "11th grade",
                "email": "anna@example.com"
            }
        });

        let req: MentorshipRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(req.id, 12);
        assert_eq!(req.sender_type, EntityType::User);
        assert_eq!(req.receiver_type, EntityType::Mentor);
        assert_eq!(req.status, RequestStatus::Pending);
        assert!(req.created_at.is_some());
        assert_eq!(req.sender_display_name(), "Anna");
        assert!(req.receiver.is_none());
    }

    #[test]
    fn test_null_message_decodes_as_empty() {
        let raw = serde_json::json!({
            "id": 1,
            "sender_id": 2,
            "sender_type": "mentor",
            "receiver_id": 4,
            "receiver_type": "user",
            "message": null,
            "status": "rejected"
        });

        let req: MentorshipRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(req.message, "");
        assert_eq!(req.status, RequestStatus::Rejected);
        assert!(req.created_at.is_none());
    }

    #[test]
    fn test_naive_timestamps_decode_as_utc() {
        let raw = serde_json::json!({
            "id": 7,
            "sender_id": 2,
            "sender_type": "user",
            "receiver_id": 4,
            "receiver_type": "mentor",
            "message": "hi",
            "status": "pending",
            "created_at": "2025-03-01T10:00:00.123456",
            "updated_at": "2025-03-01T10:05:00"
        });

        let req: MentorshipRequest = serde_json::from_value(raw).unwrap();
        let created = req.created_at.unwrap();
        assert_eq!(created.to_rfc3339(), "2025-03-01T10:00:00.123456+00:00");
        assert_eq!(
            req.updated_at.unwrap(),
            "2025-03-01T10:05:00Z".parse::<DateTime<Utc>>().unwrap()
        );
    }

    #[test]
    fn test_garbage_timestamp_is_rejected() {
        let raw = serde_json::json!({
            "id": 7,
            "sender_id": 2,
            "sender_type": "user",
            "receiver_id": 4,
            "receiver_type": "mentor",
            "status": "pending",
            "created_at": "yesterday"
        });

        assert!(serde_json::from_value::<MentorshipRequest>(raw).is_err());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let raw = serde_json::json!({
            "id": 1,
            "sender_id": 2,
            "sender_type": "mentor",
            "receiver_id": 4,
            "receiver_type": "user",
            "status": "accepted"
        });

        let req: MentorshipRequest = serde_json::from_value(raw).unwrap();
        assert_eq!(req.sender_display_name(), "Sender 2");
        assert_eq!(req.receiver_display_name(), "Receiver 4");
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let raw = serde_json::json!({
            "id": 1,
            "sender_id": 2,
            "sender_type": "mentor",
            "receiver_id": 4,
            "receiver_type": "user",
            "status": "archived"
        });

        assert!(serde_json::from_value::<MentorshipRequest>(raw).is_err());
    }

    #[test]
    fn test_entity_type_parse() {
        assert_eq!("Mentor".parse::<EntityType>().unwrap(), EntityType::Mentor);
        assert_eq!(" user ".parse::<EntityType>().unwrap(), EntityType::User);
        assert!("admin".parse::<EntityType>().is_err());
        assert_eq!(RequestStatus::Accepted.to_string(), "accepted");
    }
}
