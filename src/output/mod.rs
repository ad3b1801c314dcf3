mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::Spinner;
pub use summary::{render_artifacts, render_cancelled, render_details, render_job, render_tests};
