use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::status::JobStatus;

/// A single CircleCI job execution.
///
/// Field names follow the v2 API payload. Every field decodes leniently:
/// missing or `null` values fall back to the empty value, and timestamps or
/// nested objects the API leaves `null` until the job reaches that point are
/// optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    /// Link to the job in the CircleCI web app
    #[serde(deserialize_with = "null_as_default")]
    pub web_url: String,
    pub project: Option<JobProject>,
    /// Status of each parallel run of this job
    #[serde(deserialize_with = "null_as_default")]
    pub parallel_runs: Vec<ParallelRun>,
    pub started_at: Option<DateTime<Utc>>,
    pub latest_workflow: Option<LatestWorkflow>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub executor: Option<Executor>,
    #[serde(deserialize_with = "null_as_default")]
    pub parallelism: u32,
    pub status: Option<JobStatus>,
    #[serde(deserialize_with = "null_as_default")]
    pub number: u64,
    pub pipeline: Option<JobPipeline>,
    /// Duration in milliseconds, unset while the job is running
    pub duration: Option<u64>,
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub messages: Vec<JobMessage>,
    #[serde(deserialize_with = "null_as_default")]
    pub contexts: Vec<JobContext>,
    #[serde(deserialize_with = "null_as_default")]
    pub organization: Organization,
    pub queued_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobProject {
    /// Project slug, e.g. `gh/acme/app`
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub external_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelRun {
    #[serde(deserialize_with = "null_as_default")]
    pub index: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LatestWorkflow {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Executor {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub type_: String,
    #[serde(deserialize_with = "null_as_default")]
    pub resource_class: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobPipeline {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobMessage {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub type_: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobContext {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

/// One page of artifacts produced by a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactList {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<Artifact>,
    /// Cursor for the next page, `None` on the last page
    pub next_page_token: Option<String>,
}

/// A stored build output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Artifact {
    #[serde(deserialize_with = "null_as_default")]
    pub path: String,
    /// Index of the parallel run that produced the artifact
    #[serde(deserialize_with = "null_as_default")]
    pub node_index: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
}

/// One page of test results recorded for a job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestMetadataList {
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<TestMetadata>,
    pub next_page_token: Option<String>,
}

/// A single test result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestMetadata {
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source: String,
    /// Run time in seconds, as reported by the test framework
    #[serde(deserialize_with = "run_time_seconds")]
    pub run_time: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub file: String,
    #[serde(deserialize_with = "null_as_default")]
    pub result: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub classname: String,
}

/// Decodes `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Test reporters disagree on whether `run_time` is a number or a numeric
/// string; accept both.
fn run_time_seconds<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RunTime {
        Number(f64),
        Text(String),
        Missing(()),
    }

    match RunTime::deserialize(deserializer)? {
        RunTime::Number(seconds) => Ok(seconds),
        RunTime::Text(text) if text.trim().is_empty() => Ok(0.0),
        RunTime::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
        RunTime::Missing(()) => Ok(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_time_accepts_number_and_string() {
        let from_number: TestMetadata =
            serde_json::from_str(r#"{"name":"a","run_time":0.25}"#).unwrap();
        assert!((from_number.run_time - 0.25).abs() < f64::EPSILON);

        let from_string: TestMetadata =
            serde_json::from_str(r#"{"name":"b","run_time":"1.5"}"#).unwrap();
        assert!((from_string.run_time - 1.5).abs() < f64::EPSILON);

        let missing: TestMetadata = serde_json::from_str(r#"{"name":"c"}"#).unwrap();
        assert_eq!(missing.run_time, 0.0);

        let null: TestMetadata =
            serde_json::from_str(r#"{"name":"d","run_time":null}"#).unwrap();
        assert_eq!(null.run_time, 0.0);
    }

    #[test]
    fn test_run_time_rejects_garbage() {
        let result = serde_json::from_str::<TestMetadata>(r#"{"run_time":"fast"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_job_with_null_optional_fields() {
        let job: Job = serde_json::from_str(
            r#"{
                "number": 12,
                "name": "build",
                "status": null,
                "created_at": "2024-05-01T10:00:00Z",
                "started_at": null,
                "stopped_at": null,
                "queued_at": null,
                "duration": null,
                "executor": null,
                "latest_workflow": null,
                "pipeline": null,
                "project": null
            }"#,
        )
        .unwrap();

        assert_eq!(job.number, 12);
        assert!(job.status.is_none());
        assert!(job.started_at.is_none());
        assert!(job.parallel_runs.is_empty());
        assert!(job.messages.is_empty());
        assert_eq!(job.organization.name, "");
    }

    #[test]
    fn test_job_with_null_and_missing_fields() {
        let job: Job = serde_json::from_str(
            r#"{
                "name": null,
                "web_url": null,
                "organization": null,
                "parallelism": null,
                "parallel_runs": null,
                "messages": [{"type": "info", "message": null}],
                "project": {"slug": "gh/acme/app", "name": null}
            }"#,
        )
        .unwrap();

        assert_eq!(job.number, 0);
        assert_eq!(job.name, "");
        assert_eq!(job.web_url, "");
        assert_eq!(job.parallelism, 0);
        assert!(job.created_at.is_none());
        assert!(job.parallel_runs.is_empty());
        assert_eq!(job.organization.name, "");
        assert_eq!(job.messages[0].type_, "info");
        assert_eq!(job.messages[0].message, "");
        let project = job.project.unwrap();
        assert_eq!(project.slug, "gh/acme/app");
        assert_eq!(project.external_url, "");
    }

    #[test]
    fn test_artifact_with_null_and_missing_fields() {
        let list: ArtifactList = serde_json::from_str(
            r#"{
                "items": [
                    {"path": "logs/out.txt"},
                    {"path": null, "node_index": null, "url": null}
                ],
                "next_page_token": null
            }"#,
        )
        .unwrap();

        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].path, "logs/out.txt");
        assert_eq!(list.items[0].node_index, 0);
        assert_eq!(list.items[1].url, "");

        let empty: ArtifactList = serde_json::from_str("{}").unwrap();
        assert!(empty.items.is_empty());
    }

    #[test]
    fn test_list_without_next_page_token() {
        let list: ArtifactList = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert!(list.items.is_empty());
        assert!(list.next_page_token.is_none());
    }
}
