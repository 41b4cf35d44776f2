//! Repair request model and its status lifecycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use super::{ids, Applicant, Mechanic, ServiceCenter, Transport};

/// Request status. The three known values drive `closedAt`; anything else a
/// caller sends is kept verbatim and treated as "in progress".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequestStatus {
    /// "новая"
    New,
    /// "отклонена"
    Rejected,
    /// "завершена"
    Completed,
    /// Free-form status
    Other(String),
}

/// What a status transition does to `closedAt`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedAtRule {
    /// Set to the time of the transition
    Stamp,
    /// Reset to null (request reopened)
    Clear,
    /// Leave the stored value alone
    Keep,
}

impl RequestStatus {
    pub fn as_str(&self) -> &str {
        match self {
            RequestStatus::New => "новая",
            RequestStatus::Rejected => "отклонена",
            RequestStatus::Completed => "завершена",
            RequestStatus::Other(s) => s.as_str(),
        }
    }

    /// Transition table. A new well-known status needs its own arm here.
    pub fn closed_at_rule(&self) -> ClosedAtRule {
        match self {
            RequestStatus::Rejected | RequestStatus::Completed => ClosedAtRule::Stamp,
            RequestStatus::New => ClosedAtRule::Clear,
            RequestStatus::Other(_) => ClosedAtRule::Keep,
        }
    }

    /// Resolve the `closedAt` change for a transition into this status.
    ///
    /// `explicit` is the caller-supplied `closedAt` (outer `Some` = key was
    /// present) and wins over the rule. Returns `None` when the column must not
    /// be touched.
    pub fn closed_at_change(
        &self,
        explicit: Option<Option<DateTime<Utc>>>,
        now: DateTime<Utc>,
    ) -> Option<Option<DateTime<Utc>>> {
        if explicit.is_some() {
            return explicit;
        }
        match self.closed_at_rule() {
            ClosedAtRule::Stamp => Some(Some(now)),
            ClosedAtRule::Clear => Some(None),
            ClosedAtRule::Keep => None,
        }
    }
}

impl Default for RequestStatus {
    fn default() -> Self {
        RequestStatus::New
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "новая" => RequestStatus::New,
            "отклонена" => RequestStatus::Rejected,
            "завершена" => RequestStatus::Completed,
            other => RequestStatus::Other(other.to_string()),
        })
    }
}

impl From<String> for RequestStatus {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl Serialize for RequestStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RequestStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().is_empty() {
            return Err(serde::de::Error::custom("status must not be empty"));
        }
        Ok(RequestStatus::from(raw))
    }
}

// SQLx conversion for RequestStatus (stored as TEXT)
impl sqlx::Type<Postgres> for RequestStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for RequestStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        Ok(RequestStatus::from(s))
    }
}

impl Encode<'_, Postgres> for RequestStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Request row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: i32,
    pub problem: String,
    #[schema(value_type = String)]
    pub status: RequestStatus,
    pub submitted_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub transport_id: i32,
    pub applicant_id: i32,
    pub mechanic_id: Option<i32>,
    pub service_id: Option<i32>,
}

/// Request with its related rows expanded
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetails {
    #[serde(flatten)]
    pub request: Request,
    pub applicant: Option<Applicant>,
    pub mechanic: Option<Mechanic>,
    pub transport: Option<Transport>,
    pub service: Option<ServiceCenter>,
}

/// Create request payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    #[validate(length(min = 1, message = "problem must not be empty"))]
    pub problem: String,
    #[serde(deserialize_with = "ids::required")]
    #[schema(value_type = i32)]
    pub transport_id: i32,
    #[serde(deserialize_with = "ids::required")]
    #[schema(value_type = i32)]
    pub applicant_id: i32,
    #[serde(default, deserialize_with = "ids::optional")]
    #[schema(value_type = Option<i32>)]
    pub mechanic_id: Option<i32>,
    #[serde(default, deserialize_with = "ids::optional")]
    #[schema(value_type = Option<i32>)]
    pub service_id: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub status: Option<RequestStatus>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl CreateRequest {
    /// Status and `closedAt` a new request is stored with. Only a terminal
    /// initial status closes the request, at the sent `closedAt` or `now`.
    pub fn initial_state(&self, now: DateTime<Utc>) -> (RequestStatus, Option<DateTime<Utc>>) {
        let status = self.status.clone().unwrap_or_default();
        let closed_at = match status.closed_at_rule() {
            ClosedAtRule::Stamp => Some(self.closed_at.unwrap_or(now)),
            ClosedAtRule::Clear | ClosedAtRule::Keep => None,
        };
        (status, closed_at)
    }
}

/// Partial update payload. For the nullable columns the outer `Option` tells
/// whether the key was sent at all; the inner one carries `null`.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub problem: Option<String>,
    #[schema(value_type = Option<String>)]
    pub status: Option<RequestStatus>,
    #[serde(default, deserialize_with = "ids::patch")]
    #[schema(value_type = Option<i32>)]
    pub mechanic_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "ids::patch")]
    #[schema(value_type = Option<i32>)]
    pub service_id: Option<Option<i32>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub closed_at: Option<Option<DateTime<Utc>>>,
}

/// Column changes resolved from an `UpdateRequest`, ready for the repository
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestChanges {
    pub problem: Option<String>,
    pub status: Option<RequestStatus>,
    pub mechanic_id: Option<Option<i32>>,
    pub service_id: Option<Option<i32>>,
    pub closed_at: Option<Option<DateTime<Utc>>>,
}

impl RequestChanges {
    /// Apply the status transition table to a patch at time `now`
    pub fn resolve(patch: UpdateRequest, now: DateTime<Utc>) -> Self {
        let closed_at = match &patch.status {
            Some(status) => status.closed_at_change(patch.closed_at, now),
            None => patch.closed_at,
        };
        Self {
            problem: patch.problem,
            status: patch.status,
            mechanic_id: patch.mechanic_id,
            service_id: patch.service_id,
            closed_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.problem.is_none()
            && self.status.is_none()
            && self.mechanic_id.is_none()
            && self.service_id.is_none()
            && self.closed_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    #[test]
    fn known_statuses_round_trip_through_text() {
        for status in [RequestStatus::New, RequestStatus::Rejected, RequestStatus::Completed] {
            assert_eq!(RequestStatus::from(status.to_string()), status);
        }
        assert_eq!(
            RequestStatus::from("в работе".to_string()),
            RequestStatus::Other("в работе".to_string())
        );
    }

    #[test]
    fn transition_table() {
        assert_eq!(RequestStatus::Rejected.closed_at_rule(), ClosedAtRule::Stamp);
        assert_eq!(RequestStatus::Completed.closed_at_rule(), ClosedAtRule::Stamp);
        assert_eq!(RequestStatus::New.closed_at_rule(), ClosedAtRule::Clear);
        assert_eq!(
            RequestStatus::Other("diagnostics".into()).closed_at_rule(),
            ClosedAtRule::Keep
        );
    }

    #[test]
    fn terminal_statuses_stamp_closed_at() {
        let change = RequestStatus::Completed.closed_at_change(None, now());
        assert_eq!(change, Some(Some(now())));
    }

    #[test]
    fn reopening_clears_closed_at() {
        assert_eq!(RequestStatus::New.closed_at_change(None, now()), Some(None));
    }

    #[test]
    fn free_form_status_leaves_closed_at_alone() {
        let status = RequestStatus::Other("ждёт запчасти".into());
        assert_eq!(status.closed_at_change(None, now()), None);
    }

    #[test]
    fn explicit_closed_at_overrides_the_rule() {
        let earlier = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            RequestStatus::Rejected.closed_at_change(Some(Some(earlier)), now()),
            Some(Some(earlier))
        );
        assert_eq!(
            RequestStatus::Completed.closed_at_change(Some(None), now()),
            Some(None)
        );
    }

    #[test]
    fn empty_status_is_rejected() {
        let parsed: Result<UpdateRequest, _> = serde_json::from_value(json!({ "status": "  " }));
        assert!(parsed.is_err());
    }

    #[test]
    fn update_payload_keeps_absent_and_null_apart() {
        let patch: UpdateRequest = serde_json::from_value(json!({
            "mechanicId": null,
            "serviceId": "3",
            "closedAt": null
        }))
        .unwrap();
        assert_eq!(patch.problem, None);
        assert_eq!(patch.status, None);
        assert_eq!(patch.mechanic_id, Some(None));
        assert_eq!(patch.service_id, Some(Some(3)));
        assert_eq!(patch.closed_at, Some(None));
    }

    #[test]
    fn resolve_touches_only_supplied_fields() {
        let patch: UpdateRequest = serde_json::from_value(json!({ "problem": "X" })).unwrap();
        let changes = RequestChanges::resolve(patch, now());
        assert_eq!(
            changes,
            RequestChanges {
                problem: Some("X".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn resolve_applies_the_rule_when_status_is_sent() {
        let patch: UpdateRequest =
            serde_json::from_value(json!({ "status": "отклонена", "mechanicId": 2 })).unwrap();
        let changes = RequestChanges::resolve(patch, now());
        assert_eq!(changes.status, Some(RequestStatus::Rejected));
        assert_eq!(changes.closed_at, Some(Some(now())));
        assert_eq!(changes.mechanic_id, Some(Some(2)));
        assert_eq!(changes.service_id, None);
    }

    #[test]
    fn resolve_without_status_writes_closed_at_verbatim() {
        let patch: UpdateRequest = serde_json::from_value(json!({ "closedAt": null })).unwrap();
        let changes = RequestChanges::resolve(patch, now());
        assert_eq!(changes.closed_at, Some(None));
        assert!(changes.status.is_none());
        assert!(!changes.is_empty());
        assert!(RequestChanges::default().is_empty());
    }

    fn create(body: serde_json::Value) -> CreateRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn new_requests_start_open() {
        let data = create(json!({ "problem": "brakes", "transportId": 1, "applicantId": "1" }));
        assert_eq!(data.initial_state(now()), (RequestStatus::New, None));
    }

    #[test]
    fn terminal_status_at_creation_stamps_closed_at() {
        let data = create(json!({
            "problem": "brakes",
            "transportId": 1,
            "applicantId": 1,
            "status": "завершена"
        }));
        assert_eq!(data.initial_state(now()), (RequestStatus::Completed, Some(now())));
    }

    #[test]
    fn closed_at_is_ignored_while_the_request_is_open() {
        let data = create(json!({
            "problem": "brakes",
            "transportId": 1,
            "applicantId": 1,
            "closedAt": "2025-01-01T00:00:00Z"
        }));
        assert_eq!(data.initial_state(now()), (RequestStatus::New, None));
    }

    #[test]
    fn explicit_closed_at_at_creation_wins_for_terminal_status() {
        let earlier = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let data = create(json!({
            "problem": "brakes",
            "transportId": 1,
            "applicantId": 1,
            "status": "отклонена",
            "closedAt": "2025-01-01T00:00:00Z"
        }));
        assert_eq!(data.initial_state(now()), (RequestStatus::Rejected, Some(earlier)));
    }

    #[test]
    fn stamp_is_taken_at_call_time() {
        let before = Utc::now();
        let patch: UpdateRequest = serde_json::from_value(json!({ "status": "завершена" })).unwrap();
        let changes = RequestChanges::resolve(patch, Utc::now());
        let stamped = changes.closed_at.flatten().unwrap();
        assert!(stamped >= before);
        assert!(stamped <= Utc::now());
    }

    #[test]
    fn request_serializes_camel_case() {
        let request = Request {
            id: 1,
            problem: "brakes".into(),
            status: RequestStatus::New,
            submitted_at: now(),
            closed_at: None,
            transport_id: 2,
            applicant_id: 3,
            mechanic_id: None,
            service_id: Some(4),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["status"], "новая");
        assert_eq!(value["transportId"], 2);
        assert_eq!(value["serviceId"], 4);
        assert!(value["closedAt"].is_null());
    }
}
