//! Task and account records as the backend API serializes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The three wire values a task status can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// The exact string sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown task status: {0}")]
pub struct UnknownStatus(String);

impl std::str::FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// An account as embedded in task responses. Owned entirely by the backend;
/// the dashboard only ever reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A task record. The embedded accounts and audit timestamps are optional
/// because the backend omits them in some responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub deadline: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "accounts_id")]
    pub account_id: u64,
    #[serde(rename = "accounts", default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
    #[serde(rename = "create_accounts_id")]
    pub created_by: u64,
    #[serde(
        rename = "create_accounts",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub creator: Option<Account>,
    #[serde(rename = "update_accounts_id", default)]
    pub updated_by: Option<u64>,
    #[serde(
        rename = "update_accounts",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub updater: Option<Account>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub deadline: DateTime<Utc>,
    pub account_id: u64,
}

/// Partial update; absent fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

/// Filtered-list response. `page` and `limit` are strings on the wire, and
/// a body without a `data` array must still deserialize to an empty listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskListResponse {
    #[serde(default)]
    pub data: Vec<Task>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub limit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload of a successful login envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    #[serde(default)]
    pub account: Option<Account>,
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// The backend's login response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<LoginData>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_round_trips_through_wire_names() {
        for status in TaskStatus::ALL {
            let encoded = serde_json::to_string(&status).unwrap();
            assert_eq!(encoded, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
        assert!("urgent".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn task_deserializes_with_bare_backend_fields() {
        let task: Task = serde_json::from_value(json!({
            "id": 7,
            "title": "Write report",
            "description": "Quarterly numbers",
            "status": "in_progress",
            "deadline": "2025-06-30T17:00:00Z",
            "accounts_id": 3,
            "create_accounts_id": 3,
            "update_accounts_id": null
        }))
        .unwrap();

        assert_eq!(task.id, 7);
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.account_id, 3);
        assert!(task.account.is_none());
        assert!(task.updated_by.is_none());
    }

    #[test]
    fn list_response_tolerates_missing_data_array() {
        let listing: TaskListResponse = serde_json::from_value(json!({})).unwrap();
        assert!(listing.data.is_empty());
        assert_eq!(listing.total, 0);

        let listing: TaskListResponse = serde_json::from_value(json!({
            "data": [],
            "total": 12,
            "page": "2",
            "limit": "5"
        }))
        .unwrap();
        assert_eq!(listing.total, 12);
        assert_eq!(listing.page, "2");
    }

    #[test]
    fn update_request_omits_absent_fields() {
        let req = UpdateTaskRequest {
            title: Some("New title".to_string()),
            status: Some(TaskStatus::Done),
            ..Default::default()
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, json!({"title": "New title", "status": "done"}));
    }
}
