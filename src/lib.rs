//! Typed client for the Job resource of the CircleCI v2 REST API.
//!
//! ```no_run
//! # async fn run() -> circleci_jobs::Result<()> {
//! use circleci_jobs::{Client, Token, DEFAULT_BASE_URL};
//!
//! let client = Client::new(DEFAULT_BASE_URL, Some(Token::from("my-token")))?;
//! let job = client.jobs().get("gh/acme/app", "42").await?;
//! println!("{} is {:?}", job.name, job.status);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod jobs;

pub use auth::Token;
pub use client::{Client, DEFAULT_BASE_URL};
pub use error::{CircleCiError, Result};
pub use jobs::{Artifact, ArtifactList, Job, JobStatus, Jobs, TestMetadata, TestMetadataList};
