use std::fmt::Write;

use chrono::{DateTime, Utc};
use comfy_table::{Cell, Table};
use indexmap::IndexMap;

use circleci_jobs::{ArtifactList, Job, TestMetadata, TestMetadataList};

use super::styling::{bullet, heading, label, Tone};
use super::tables::{
    color_coded_result_cell, color_coded_status_cell, create_cyan_header, create_table,
    format_duration_ms,
};
use crate::cli::JobDetails;

/// Renders a human-readable overview of a single job.
///
/// Shows identity, status, timing and executor, followed by per-run status
/// when the job ran in parallel and any messages CircleCI attached to it.
pub fn render_job(job: &Job) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "🧱", &format!("Job #{} {}", job.number, job.name));

    let mut table = create_table();
    let project = job.project.as_ref().map_or("-", |p| p.slug.as_str());
    let workflow = job.latest_workflow.as_ref().map_or("-", |w| w.name.as_str());
    let executor = job.executor.as_ref().map_or_else(
        || "-".to_string(),
        |e| format!("{} ({})", e.type_, e.resource_class),
    );
    let duration = job
        .duration
        .map_or_else(|| "-".to_string(), format_duration_ms);

    add_field(&mut table, "Project", Cell::new(project));
    add_field(&mut table, "Status", color_coded_status_cell(job.status.as_ref()));
    add_field(&mut table, "Workflow", Cell::new(workflow));
    add_field(&mut table, "Executor", Cell::new(executor));
    add_field(&mut table, "Parallelism", Cell::new(job.parallelism));
    add_field(&mut table, "Duration", Cell::new(duration));
    add_field(&mut table, "Created", Cell::new(format_time(job.created_at)));
    add_field(&mut table, "Queued", Cell::new(format_time(job.queued_at)));
    add_field(&mut table, "Started", Cell::new(format_time(job.started_at)));
    add_field(&mut table, "Stopped", Cell::new(format_time(job.stopped_at)));
    if !job.contexts.is_empty() {
        let contexts = job
            .contexts
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        add_field(&mut table, "Contexts", Cell::new(contexts));
    }
    let _ = writeln!(output, "{table}");

    if job.parallel_runs.len() > 1 {
        let mut runs = create_table();
        runs.set_header(create_cyan_header(&["Run", "Status"]));
        for run in &job.parallel_runs {
            runs.add_row(vec![
                Cell::new(run.index),
                color_coded_result_cell(&run.status),
            ]);
        }
        let _ = writeln!(output, "{runs}");
    }

    for message in &job.messages {
        let _ = writeln!(
            output,
            "  {} {} {}",
            bullet(),
            label(&message.type_),
            message.message
        );
    }

    if !job.web_url.is_empty() {
        let _ = writeln!(output, "  {}", Tone::Muted.paint(&job.web_url));
    }

    output
}

pub fn render_artifacts(artifacts: &ArtifactList) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "📦", "Artifacts");

    if artifacts.items.is_empty() {
        let _ = writeln!(output, "  {}", Tone::Muted.paint("No artifacts"));
    } else {
        let mut table = create_table();
        table.set_header(create_cyan_header(&["Node", "Path", "URL"]));
        for artifact in &artifacts.items {
            table.add_row(vec![
                Cell::new(artifact.node_index),
                Cell::new(&artifact.path),
                Cell::new(&artifact.url),
            ]);
        }
        let _ = writeln!(output, "{table}");
    }

    add_next_page_hint(&mut output, artifacts.next_page_token.as_deref());
    output
}

/// Renders test results grouped by outcome, then lists every test that did
/// not pass.
pub fn render_tests(tests: &TestMetadataList) -> String {
    let mut output = String::new();
    add_section_header(&mut output, "🧪", "Tests");

    if tests.items.is_empty() {
        let _ = writeln!(output, "  {}", Tone::Muted.paint("No test results"));
        add_next_page_hint(&mut output, tests.next_page_token.as_deref());
        return output;
    }

    let by_result = group_by_result(&tests.items);
    let total_time: f64 = tests.items.iter().map(|t| t.run_time).sum();

    let mut table = create_table();
    table.set_header(create_cyan_header(&["Result", "Count"]));
    for (result, items) in &by_result {
        table.add_row(vec![color_coded_result_cell(result), Cell::new(items.len())]);
    }
    let _ = writeln!(output, "{table}");
    let _ = writeln!(
        output,
        "  {} {} tests in {total_time:.2}s",
        bullet(),
        tests.items.len()
    );

    let failures: Vec<&TestMetadata> = tests
        .items
        .iter()
        .filter(|t| !is_passing(&t.result))
        .collect();

    if failures.is_empty() {
        let _ = writeln!(output, "  {}", Tone::Good.paint("All tests passed ✓"));
    } else {
        let title = format!("Failing tests ({})", failures.len());
        let _ = writeln!(output, "\n{}", Tone::Bad.paint(title));
        let mut table = create_table();
        table.set_header(create_cyan_header(&["Name", "Classname", "File", "Message"]));
        for test in failures {
            table.add_row(vec![
                Cell::new(&test.name),
                Cell::new(&test.classname),
                Cell::new(&test.file),
                Cell::new(&test.message),
            ]);
        }
        let _ = writeln!(output, "{table}");
    }

    add_next_page_hint(&mut output, tests.next_page_token.as_deref());
    output
}

pub fn render_details(details: &JobDetails) -> String {
    [
        render_job(&details.job),
        render_artifacts(&details.artifacts),
        render_tests(&details.tests),
    ]
    .join("\n")
}

pub fn render_cancelled(project_slug: &str, job_number: &str) -> String {
    Tone::Good
        .paint(format!("Cancelled job {job_number} of {project_slug} ✓"))
        .to_string()
}

// Helper functions

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", label(emoji), heading(title));
}

fn add_field(table: &mut Table, name: &str, value: Cell) {
    table.add_row(vec![Cell::new(name), value]);
}

fn add_next_page_hint(output: &mut String, token: Option<&str>) {
    if let Some(token) = token {
        let hint = format!("More results available (next page token: {token})");
        let _ = writeln!(output, "  {}", Tone::Muted.paint(hint));
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

fn is_passing(result: &str) -> bool {
    matches!(result, "success" | "passed" | "skipped")
}

/// Groups tests by result, keeping results in the order they first appear.
fn group_by_result(items: &[TestMetadata]) -> IndexMap<&str, Vec<&TestMetadata>> {
    let mut groups: IndexMap<&str, Vec<&TestMetadata>> = IndexMap::new();
    for item in items {
        groups.entry(item.result.as_str()).or_default().push(item);
    }
    groups
}
