use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::Tone;

/// Spinner on stderr while a request is in flight.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn start(message: String) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
            pb.set_style(style);
        }
        pb.set_message(Tone::Active.paint(message).to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self { pb }
    }

    pub fn finish(self) {
        self.pb.finish_and_clear();
    }
}
