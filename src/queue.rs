//! Background job queue stand-in
//!
//! Jobs are logged and acknowledged with a synthetic id; nothing is
//! persisted or executed. Queue health is a fixed snapshot.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::info;

use crate::chat::ChatModel;

pub const ANALYTICS_QUEUE: &str = "analytics";
pub const EMAIL_QUEUE: &str = "email";

/// Total failed jobs above which the queues are unhealthy
pub const UNHEALTHY_FAILED_THRESHOLD: u64 = 50;
/// Total failed jobs above which the queues need attention
pub const WARNING_FAILED_THRESHOLD: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPriority {
    Critical,
    High,
    #[default]
    Normal,
    Low,
}

impl JobPriority {
    /// Numeric rank; lower runs first
    pub fn rank(&self) -> u8 {
        match self {
            JobPriority::Critical => 1,
            JobPriority::High => 2,
            JobPriority::Normal => 3,
            JobPriority::Low => 4,
        }
    }
}

/// Job payloads by job type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "jobType", content = "data", rename_all = "kebab-case")]
pub enum JobPayload {
    #[serde(rename_all = "camelCase")]
    SendEmail {
        to: String,
        subject: String,
        template: String,
        data: Map<String, Value>,
        workspace_id: String,
    },
    #[serde(rename_all = "camelCase")]
    AiGeneration {
        prompt: String,
        model: ChatModel,
        workspace_id: String,
        user_id: Option<String>,
        response_webhook: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    UsageAnalytics {
        event: String,
        user_id: String,
        workspace_id: String,
        properties: Map<String, Value>,
    },
}

impl JobPayload {
    pub fn job_type(&self) -> &'static str {
        match self {
            JobPayload::SendEmail { .. } => "send-email",
            JobPayload::AiGeneration { .. } => "ai-generation",
            JobPayload::UsageAnalytics { .. } => "usage-analytics",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JobOptions {
    pub priority: JobPriority,
    /// Delay before the job becomes runnable, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedJob {
    pub id: String,
    #[serde(flatten)]
    pub payload: JobPayload,
    pub options: JobOptions,
}

/// Acknowledge a job on `queue` with a `mock-<epoch ms>` id
pub async fn add_job(queue: &str, payload: JobPayload, options: JobOptions) -> QueuedJob {
    info!(
        "Mock queue [{}]: adding job {} (priority {})",
        queue,
        payload.job_type(),
        options.priority.rank()
    );

    QueuedJob {
        id: format!("mock-{}", chrono::Utc::now().timestamp_millis()),
        payload,
        options,
    }
}

pub async fn track_analytics(
    event: &str,
    user_id: &str,
    workspace_id: &str,
    properties: Map<String, Value>,
) -> QueuedJob {
    add_job(
        ANALYTICS_QUEUE,
        JobPayload::UsageAnalytics {
            event: event.to_string(),
            user_id: user_id.to_string(),
            workspace_id: workspace_id.to_string(),
            properties,
        },
        JobOptions::default(),
    )
    .await
}

pub async fn send_email(
    to: &str,
    subject: &str,
    template: &str,
    data: Map<String, Value>,
    workspace_id: &str,
    priority: JobPriority,
) -> QueuedJob {
    add_job(
        EMAIL_QUEUE,
        JobPayload::SendEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            template: template.to_string(),
            data,
            workspace_id: workspace_id.to_string(),
        },
        JobOptions {
            priority,
            delay: None,
        },
    )
    .await
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub waiting: u64,
    pub active: u64,
    pub completed: u64,
    pub failed: u64,
    pub healthy: bool,
}

impl QueueStats {
    const fn healthy(waiting: u64, active: u64, completed: u64, failed: u64) -> Self {
        Self {
            waiting,
            active,
            completed,
            failed,
            healthy: true,
        }
    }
}

/// Snapshot of every queue, keyed by queue name
pub async fn queue_health() -> BTreeMap<String, QueueStats> {
    BTreeMap::from([
        (EMAIL_QUEUE.to_string(), QueueStats::healthy(0, 0, 5, 0)),
        ("ai".to_string(), QueueStats::healthy(1, 2, 12, 0)),
        (ANALYTICS_QUEUE.to_string(), QueueStats::healthy(0, 0, 25, 1)),
        ("general".to_string(), QueueStats::healthy(0, 0, 3, 0)),
    ])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueStatus {
    Healthy,
    Warning,
    Unhealthy,
}

impl QueueStatus {
    pub fn from_failed(total_failed: u64) -> Self {
        if total_failed > UNHEALTHY_FAILED_THRESHOLD {
            QueueStatus::Unhealthy
        } else if total_failed > WARNING_FAILED_THRESHOLD {
            QueueStatus::Warning
        } else {
            QueueStatus::Healthy
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueOverview {
    pub status: QueueStatus,
    pub total_queues: usize,
    pub total_active: u64,
    pub total_waiting: u64,
    pub total_failed: u64,
    pub last_checked: String,
}

impl QueueOverview {
    pub fn from_stats(stats: &BTreeMap<String, QueueStats>) -> Self {
        let total_failed = stats.values().map(|q| q.failed).sum();
        Self {
            status: QueueStatus::from_failed(total_failed),
            total_queues: stats.len(),
            total_active: stats.values().map(|q| q.active).sum(),
            total_waiting: stats.values().map(|q| q.waiting).sum(),
            total_failed,
            last_checked: crate::iso_timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ranks() {
        let ranks: Vec<u8> = [
            JobPriority::Critical,
            JobPriority::High,
            JobPriority::Normal,
            JobPriority::Low,
        ]
        .iter()
        .map(JobPriority::rank)
        .collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(QueueStatus::from_failed(0), QueueStatus::Healthy);
        assert_eq!(QueueStatus::from_failed(10), QueueStatus::Healthy);
        assert_eq!(QueueStatus::from_failed(11), QueueStatus::Warning);
        assert_eq!(QueueStatus::from_failed(50), QueueStatus::Warning);
        assert_eq!(QueueStatus::from_failed(51), QueueStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_overview_of_mock_stats() {
        let stats = queue_health().await;
        let overview = QueueOverview::from_stats(&stats);

        assert_eq!(overview.status, QueueStatus::Healthy);
        assert_eq!(overview.total_queues, 4);
        assert_eq!(overview.total_active, 2);
        assert_eq!(overview.total_waiting, 1);
        assert_eq!(overview.total_failed, 1);
    }

    #[tokio::test]
    async fn test_analytics_job_shape() {
        let job = track_analytics("ai_chat_requested", "user_1", "default", Map::new()).await;

        assert!(job.id.starts_with("mock-"));
        assert_eq!(job.payload.job_type(), "usage-analytics");
        assert_eq!(job.options.priority, JobPriority::Normal);

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["jobType"], "usage-analytics");
        assert_eq!(value["data"]["workspaceId"], "default");
        assert_eq!(value["options"]["priority"], "normal");
    }

    #[tokio::test]
    async fn test_email_job_priority() {
        let job = send_email(
            "ops@example.com",
            "Welcome",
            "welcome",
            Map::new(),
            "ws-1",
            JobPriority::High,
        )
        .await;
        assert_eq!(job.payload.job_type(), "send-email");
        assert_eq!(job.options.priority.rank(), 2);
    }
}
