//! Terminal output.

use super::theme::NetverTheme;

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Results plus status messages and progress.
    #[default]
    Normal,
    /// Results and errors only.
    Quiet,
}

impl OutputMode {
    pub fn from_quiet(quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else {
            Self::Normal
        }
    }

    /// Check if this mode shows status messages and progress bars.
    pub fn shows_status(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// Writes results to stdout and status to stderr.
///
/// Results are always printed; status lines respect the output mode so
/// `--quiet` output can be piped.
#[derive(Debug, Clone)]
pub struct Console {
    mode: OutputMode,
    theme: NetverTheme,
}

impl Console {
    pub fn new(mode: OutputMode, colors: bool) -> Self {
        Self {
            mode,
            theme: NetverTheme::for_colors(colors),
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn theme(&self) -> &NetverTheme {
        &self.theme
    }

    /// A result line.
    pub fn println(&self, msg: &str) {
        println!("{}", msg);
    }

    /// Result text that already carries its own line endings.
    pub fn print(&self, text: &str) {
        print!("{}", text);
    }

    pub fn status(&self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", msg);
        }
    }

    pub fn success(&self, msg: &str) {
        self.status(&self.theme.format_success(msg));
    }

    pub fn warning(&self, msg: &str) {
        self.status(&self.theme.format_warning(msg));
    }

    /// Errors are shown in every mode.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }
}
