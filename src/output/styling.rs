use std::fmt::Display;

use comfy_table::Color as TableColor;
use console::{style, StyledObject};

use circleci_jobs::JobStatus;

/// How an outcome should read at a glance, shared by terminal text and
/// table cells so both use the same palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Good,
    Active,
    Waiting,
    Bad,
    Muted,
}

impl Tone {
    pub fn for_job_status(status: Option<&JobStatus>) -> Self {
        match status {
            None | Some(JobStatus::Other(_)) => Self::Muted,
            Some(JobStatus::Success) => Self::Good,
            Some(JobStatus::Running | JobStatus::Queued | JobStatus::NotRunning) => Self::Active,
            Some(
                JobStatus::OnHold | JobStatus::Blocked | JobStatus::Canceled | JobStatus::NotRun,
            ) => Self::Waiting,
            Some(_) => Self::Bad,
        }
    }

    /// Test frameworks report free-form results; anything unrecognised failed.
    pub fn for_test_result(result: &str) -> Self {
        match result {
            "success" | "passed" => Self::Good,
            "skipped" => Self::Waiting,
            "" => Self::Muted,
            _ => Self::Bad,
        }
    }

    pub fn paint(self, text: impl Display) -> StyledObject<String> {
        let styled = style(text.to_string());
        match self {
            Self::Good => styled.bright().green(),
            Self::Active => styled.bright().blue(),
            Self::Waiting => styled.bright().yellow(),
            Self::Bad => styled.bright().red(),
            Self::Muted => styled.dim(),
        }
    }

    pub fn table_color(self) -> TableColor {
        match self {
            Self::Good => TableColor::Green,
            Self::Active => TableColor::Blue,
            Self::Waiting => TableColor::Yellow,
            Self::Bad => TableColor::Red,
            Self::Muted => TableColor::DarkGrey,
        }
    }
}

pub fn heading(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright().underlined()
}

pub fn label(text: impl Display) -> StyledObject<String> {
    style(text.to_string()).bright()
}

pub fn bullet() -> StyledObject<&'static str> {
    style("•").cyan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_tones() {
        assert_eq!(Tone::for_job_status(Some(&JobStatus::Success)), Tone::Good);
        assert_eq!(Tone::for_job_status(Some(&JobStatus::Running)), Tone::Active);
        assert_eq!(Tone::for_job_status(Some(&JobStatus::OnHold)), Tone::Waiting);
        assert_eq!(Tone::for_job_status(Some(&JobStatus::TimedOut)), Tone::Bad);
        assert_eq!(Tone::for_job_status(None), Tone::Muted);
        assert_eq!(
            Tone::for_job_status(Some(&JobStatus::Other("new".to_string()))),
            Tone::Muted
        );
    }

    #[test]
    fn test_test_result_tones() {
        assert_eq!(Tone::for_test_result("passed"), Tone::Good);
        assert_eq!(Tone::for_test_result("skipped"), Tone::Waiting);
        assert_eq!(Tone::for_test_result("error"), Tone::Bad);
        assert_eq!(Tone::for_test_result(""), Tone::Muted);
    }

    #[test]
    fn test_paint_keeps_text() {
        let painted = Tone::Bad.paint("boom").to_string();
        assert!(painted.contains("boom"));
    }
}
