use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a CircleCI job.
///
/// CircleCI does not version this list, so values outside the documented set
/// are kept verbatim in [`JobStatus::Other`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Success,
    Running,
    NotRun,
    Failed,
    Retried,
    Queued,
    NotRunning,
    InfrastructureFail,
    TimedOut,
    OnHold,
    TerminatedUnknown,
    Blocked,
    Canceled,
    Unauthorized,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Running => "running",
            Self::NotRun => "not_run",
            Self::Failed => "failed",
            Self::Retried => "retried",
            Self::Queued => "queued",
            Self::NotRunning => "not_running",
            Self::InfrastructureFail => "infrastructure_fail",
            Self::TimedOut => "timedout",
            Self::OnHold => "on_hold",
            Self::TerminatedUnknown => "terminated-unknown",
            Self::Blocked => "blocked",
            Self::Canceled => "canceled",
            Self::Unauthorized => "unauthorized",
            Self::Other(status) => status,
        }
    }

    /// Whether the job has stopped and its status will not change again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Success
                | Self::NotRun
                | Self::Failed
                | Self::Retried
                | Self::InfrastructureFail
                | Self::TimedOut
                | Self::TerminatedUnknown
                | Self::Canceled
                | Self::Unauthorized
        )
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "success" => Self::Success,
            "running" => Self::Running,
            "not_run" => Self::NotRun,
            "failed" => Self::Failed,
            "retried" => Self::Retried,
            "queued" => Self::Queued,
            "not_running" => Self::NotRunning,
            "infrastructure_fail" => Self::InfrastructureFail,
            "timedout" => Self::TimedOut,
            "on_hold" => Self::OnHold,
            "terminated-unknown" => Self::TerminatedUnknown,
            "blocked" => Self::Blocked,
            "canceled" => Self::Canceled,
            "unauthorized" => Self::Unauthorized,
            _ => Self::Other(value),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        match status {
            JobStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
