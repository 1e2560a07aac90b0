//! Terminal presenter
//!
//! Prints frames to stdout and keeps the optional chart file in step with the
//! displayed result.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::models::CalculationResult;
use crate::session::ViewState;

use super::chart::write_macro_pie;
use super::render::render;

pub struct TerminalView {
    chart_path: Option<PathBuf>,
    charted: Option<Arc<CalculationResult>>,
}

impl TerminalView {
    pub fn new(chart_path: Option<PathBuf>) -> Self {
        Self {
            chart_path,
            charted: None,
        }
    }

    /// Draw a frame, and rewrite the chart file if the result changed
    pub fn present(&mut self, state: &ViewState) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "\n{}", render(state));
        let _ = stdout.flush();
        drop(stdout);

        if let Some(path) = self.chart_path.clone() {
            self.refresh_chart(state, &path);
        }
    }

    /// Blocking notice, printed apart from the frame
    pub fn notice(&self, message: &str) {
        println!("\n!! {}", message);
    }

    pub fn message(&self, message: &str) {
        println!("{}", message);
    }

    /// Write the chart for `result` to an explicit path
    pub fn export_chart(&self, result: Option<&Arc<CalculationResult>>, path: &Path) {
        match result {
            Some(result) => match write_macro_pie(result, path) {
                Ok(()) => self.message(&format!("Chart written to {}", path.display())),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "chart export failed");
                    self.message(&format!("Could not write chart: {}", e));
                }
            },
            None => self.message("Nothing to chart yet."),
        }
    }

    fn refresh_chart(&mut self, state: &ViewState, path: &Path) {
        if state.selection.is_empty() {
            if self.charted.take().is_some() {
                self.remove_chart(path);
            }
            return;
        }
        // A pending calculation keeps the last chart on disk
        let Some(result) = state.result.as_ref() else {
            return;
        };
        if self.charted.as_ref().is_some_and(|last| Arc::ptr_eq(last, result)) {
            return;
        }
        match write_macro_pie(result, path) {
            Ok(()) => tracing::debug!(path = %path.display(), "chart refreshed"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "chart refresh failed"),
        }
        self.charted = Some(Arc::clone(result));
    }

    fn remove_chart(&self, path: &Path) {
        match std::fs::remove_file(path) {
            Ok(()) => tracing::debug!(path = %path.display(), "chart removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "chart removal failed"),
        }
    }
}
