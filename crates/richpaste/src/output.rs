//! Colored progress messages on stderr.
//!
//! The converted HTML goes to a file, so everything printed here is for the
//! person running the command.

use console::{Style, Term};

pub(crate) struct Output {
    term: Term,
    step: Style,
    success: Style,
    warning: Style,
    error: Style,
    heading: Style,
    hint: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            step: Style::new().blue(),
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red(),
            heading: Style::new().cyan().bold(),
            hint: Style::new().dim(),
        }
    }

    fn line(&self, style: &Style, msg: &str) {
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }

    /// Unstyled line.
    pub(crate) fn plain(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Pipeline progress (blue).
    pub(crate) fn step(&self, msg: &str) {
        self.line(&self.step, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.line(&self.success, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.line(&self.warning, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.error, msg);
    }

    /// Section heading (cyan bold).
    pub(crate) fn heading(&self, msg: &str) {
        self.line(&self.heading, msg);
    }

    /// Usage hint (dimmed).
    pub(crate) fn hint(&self, msg: &str) {
        self.line(&self.hint, msg);
    }

    /// `✓` in the success color, for marking a list entry.
    pub(crate) fn check_mark(&self) -> String {
        self.success.apply_to("✓").to_string()
    }
}
