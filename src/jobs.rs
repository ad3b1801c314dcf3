mod status;
mod types;


use reqwest::Method;

use crate::client::{valid_string, Client};
use crate::error::{CircleCiError, Result};

pub use status::JobStatus;
pub use types::{
    Artifact, ArtifactList, Executor, Job, JobContext, JobMessage, JobPipeline, JobProject,
    LatestWorkflow, Organization, ParallelRun, TestMetadata, TestMetadataList,
};

/// Job related operations of the CircleCI v2 API.
///
/// Obtained from [`Client::jobs`]. Every operation validates its identifiers
/// before any request is sent.
///
/// CircleCI API docs: <https://circleci.com/docs/api/v2/#tag/Job>
pub struct Jobs<'a> {
    client: &'a Client,
}

impl<'a> Jobs<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Returns job details.
    ///
    /// # Errors
    ///
    /// [`CircleCiError::RequiredProjectSlug`] or [`CircleCiError::RequiredJobNumber`]
    /// for empty identifiers, otherwise whatever the transport or decoding reports.
    pub async fn get(&self, project_slug: &str, job_number: &str) -> Result<Job> {
        validate(project_slug, job_number)?;

        let path = format!("project/{project_slug}/job/{job_number}");
        let request = self.client.new_request(Method::GET, &path, None)?;

        self.client.execute(request).await
    }

    /// Cancels the job with the given number.
    pub async fn cancel(&self, project_slug: &str, job_number: &str) -> Result<()> {
        validate(project_slug, job_number)?;

        let path = format!("project/{project_slug}/job/{job_number}/cancel");
        let request = self.client.new_request(Method::POST, &path, None)?;

        self.client.send(request).await?;
        Ok(())
    }

    /// Returns a job's artifacts.
    pub async fn list_artifacts(
        &self,
        project_slug: &str,
        job_number: &str,
    ) -> Result<ArtifactList> {
        validate(project_slug, job_number)?;

        let path = format!("project/{project_slug}/{job_number}/artifacts");
        let request = self.client.new_request(Method::GET, &path, None)?;

        self.client.execute(request).await
    }

    /// Returns the test metadata recorded for a job.
    pub async fn list_test_metadata(
        &self,
        project_slug: &str,
        job_number: &str,
    ) -> Result<TestMetadataList> {
        validate(project_slug, job_number)?;

        let path = format!("project/{project_slug}/{job_number}/tests");
        let request = self.client.new_request(Method::GET, &path, None)?;

        self.client.execute(request).await
    }
}

fn validate(project_slug: &str, job_number: &str) -> Result<()> {
    if !valid_string(project_slug) {
        return Err(CircleCiError::RequiredProjectSlug);
    }

    if !valid_string(job_number) {
        return Err(CircleCiError::RequiredJobNumber);
    }

    Ok(())
}
