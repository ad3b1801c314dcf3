use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use serde::Serialize;

use circleci_jobs::{ArtifactList, Client, Job, TestMetadataList, Token};

use crate::config::{Config, OutputFormat};
use crate::output::{self, Spinner};

#[derive(Parser)]
#[command(name = "circleci-jobs")]
#[command(author, version, about = "Inspect and cancel CircleCI jobs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true, env = "CIRCLECI_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// API base URL (defaults to https://circleci.com/api/v2/)
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Configuration file to use instead of the default search
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show job details
    Get {
        #[command(flatten)]
        job: JobArgs,

        /// Also fetch the job's artifacts and test results
        #[arg(long, default_value_t = false)]
        with_details: bool,
    },
    /// Cancel a running job
    Cancel {
        #[command(flatten)]
        job: JobArgs,
    },
    /// List the artifacts a job produced
    Artifacts {
        #[command(flatten)]
        job: JobArgs,
    },
    /// List the test results a job recorded
    Tests {
        #[command(flatten)]
        job: JobArgs,
    },
    /// Write a configuration file with the current settings
    Init {
        #[arg(default_value = "circleci.toml")]
        path: PathBuf,
    },
}

#[derive(Args)]
struct JobArgs {
    /// Project slug, e.g. gh/acme/app
    project_slug: String,

    /// Job number within the project
    job_number: String,
}

/// A job together with everything it produced.
#[derive(Debug, Serialize)]
pub struct JobDetails {
    pub job: Job,
    pub artifacts: ArtifactList,
    pub tests: TestMetadataList,
}

/// Settings after merging flags, environment and the config file.
struct Settings {
    format: OutputFormat,
    pretty: bool,
}

impl Cli {
    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let settings = Settings {
            format: self.format.unwrap_or(config.output.format),
            pretty: self.pretty || config.output.pretty,
        };

        match &self.command {
            Commands::Get { job, with_details } => {
                let client = self.build_client(&config)?;
                if *with_details {
                    self.execute_details(&client, job, &settings).await
                } else {
                    self.execute_get(&client, job, &settings).await
                }
            }
            Commands::Cancel { job } => {
                let client = self.build_client(&config)?;
                self.execute_cancel(&client, job).await
            }
            Commands::Artifacts { job } => {
                let client = self.build_client(&config)?;
                self.execute_artifacts(&client, job, &settings).await
            }
            Commands::Tests { job } => {
                let client = self.build_client(&config)?;
                self.execute_tests(&client, job, &settings).await
            }
            Commands::Init { path } => self.execute_init(config, path),
        }
    }

    fn build_client(&self, config: &Config) -> Result<Client> {
        let token = self
            .token
            .as_deref()
            .or(config.api.token.as_deref())
            .map(Token::from);
        let base_url = self.url.as_deref().unwrap_or(&config.api.base_url);

        Client::with_timeout(base_url, token, config.api.timeout())
            .context("Failed to create CircleCI client")
    }

    async fn execute_get(
        &self,
        client: &Client,
        args: &JobArgs,
        settings: &Settings,
    ) -> Result<()> {
        info!("Fetching job {} of {}", args.job_number, args.project_slug);

        let spinner = Spinner::start(format!("Fetching job {}", args.job_number));
        let job = client
            .jobs()
            .get(&args.project_slug, &args.job_number)
            .await;
        spinner.finish();
        let job = job.context("Failed to fetch job")?;

        match settings.format {
            OutputFormat::Json => self.emit_json(&job, settings),
            OutputFormat::Summary => self.emit(output::render_job(&job)),
        }
    }

    async fn execute_details(
        &self,
        client: &Client,
        args: &JobArgs,
        settings: &Settings,
    ) -> Result<()> {
        info!(
            "Fetching job {} of {} with artifacts and tests",
            args.job_number, args.project_slug
        );

        let jobs = client.jobs();
        let spinner = Spinner::start(format!("Fetching job {} details", args.job_number));
        let fetched = futures::try_join!(
            jobs.get(&args.project_slug, &args.job_number),
            jobs.list_artifacts(&args.project_slug, &args.job_number),
            jobs.list_test_metadata(&args.project_slug, &args.job_number),
        );
        spinner.finish();
        let (job, artifacts, tests) = fetched.context("Failed to fetch job details")?;

        let details = JobDetails {
            job,
            artifacts,
            tests,
        };

        match settings.format {
            OutputFormat::Json => self.emit_json(&details, settings),
            OutputFormat::Summary => self.emit(output::render_details(&details)),
        }
    }

    async fn execute_cancel(&self, client: &Client, args: &JobArgs) -> Result<()> {
        info!("Cancelling job {} of {}", args.job_number, args.project_slug);

        let spinner = Spinner::start(format!("Cancelling job {}", args.job_number));
        let result = client
            .jobs()
            .cancel(&args.project_slug, &args.job_number)
            .await;
        spinner.finish();
        result.context("Failed to cancel job")?;

        self.emit(output::render_cancelled(&args.project_slug, &args.job_number))
    }

    async fn execute_artifacts(
        &self,
        client: &Client,
        args: &JobArgs,
        settings: &Settings,
    ) -> Result<()> {
        let spinner = Spinner::start(format!("Fetching artifacts of job {}", args.job_number));
        let artifacts = client
            .jobs()
            .list_artifacts(&args.project_slug, &args.job_number)
            .await;
        spinner.finish();
        let artifacts = artifacts.context("Failed to list artifacts")?;

        info!("Fetched {} artifacts", artifacts.items.len());

        match settings.format {
            OutputFormat::Json => self.emit_json(&artifacts, settings),
            OutputFormat::Summary => self.emit(output::render_artifacts(&artifacts)),
        }
    }

    async fn execute_tests(
        &self,
        client: &Client,
        args: &JobArgs,
        settings: &Settings,
    ) -> Result<()> {
        let spinner = Spinner::start(format!("Fetching test results of job {}", args.job_number));
        let tests = client
            .jobs()
            .list_test_metadata(&args.project_slug, &args.job_number)
            .await;
        spinner.finish();
        let tests = tests.context("Failed to list test metadata")?;

        info!("Fetched {} test results", tests.items.len());

        match settings.format {
            OutputFormat::Json => self.emit_json(&tests, settings),
            OutputFormat::Summary => self.emit(output::render_tests(&tests)),
        }
    }

    fn execute_init(&self, mut config: Config, path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Refusing to overwrite existing file: {}", path.display());
        }

        if let Some(token) = &self.token {
            config.api.token = Some(token.clone());
        }
        if let Some(url) = &self.url {
            config.api.base_url = url.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        config.output.pretty |= self.pretty;

        config.save(path)?;
        info!("Configuration written to: {}", path.display());
        println!("{}", path.display());

        Ok(())
    }

    fn emit_json(&self, value: &impl Serialize, settings: &Settings) -> Result<()> {
        let json_output = if settings.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        self.emit(json_output)
    }

    fn emit(&self, text: String) -> Result<()> {
        if let Some(output_path) = &self.output {
            std::fs::write(output_path, text)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            info!("Output written to: {}", output_path.display());
        } else {
            println!("{text}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get_with_details() {
        let cli = Cli::try_parse_from([
            "circleci-jobs",
            "get",
            "gh/acme/app",
            "42",
            "--with-details",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.format, Some(OutputFormat::Json));
        match cli.command {
            Commands::Get { job, with_details } => {
                assert_eq!(job.project_slug, "gh/acme/app");
                assert_eq!(job.job_number, "42");
                assert!(with_details);
            }
            _ => panic!("expected get command"),
        }
    }

    #[test]
    fn test_init_writes_config_with_flags() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("circleci.toml");

        let cli = Cli::try_parse_from([
            "circleci-jobs",
            "init",
            path.to_str().unwrap(),
            "--url",
            "https://circleci.example.com/api/v2/",
            "--format",
            "json",
        ])
        .unwrap();
        cli.execute_init(Config::default(), &path).unwrap();

        let saved = std::fs::read_to_string(&path).unwrap();
        assert!(saved.contains("https://circleci.example.com/api/v2/"));
        assert!(saved.contains("json"));

        let err = cli.execute_init(Config::default(), &path).unwrap_err();
        assert!(err.to_string().contains("Refusing to overwrite"));
    }

    #[test]
    fn test_parse_requires_job_number() {
        let result = Cli::try_parse_from(["circleci-jobs", "cancel", "gh/acme/app"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flag_url_overrides_config() {
        let cli = Cli::try_parse_from([
            "circleci-jobs",
            "artifacts",
            "gh/acme/app",
            "7",
            "--token",
            "from-flag",
            "--url",
            "https://circleci.example.com/api/v2",
        ])
        .unwrap();

        let mut config = Config::default();
        config.api.base_url = "https://circleci.com/api/v2/".to_string();

        let client = cli.build_client(&config).unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "https://circleci.example.com/api/v2/"
        );
    }
}
