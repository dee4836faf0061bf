//! Diagnostic severity levels.

use std::fmt;

/// Severity of a diagnostic entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Hint,
    Info,
    Warning,
    Error,
}

impl Level {
    /// Single-letter tag used in the rendered output's gutter.
    pub const fn tag(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Info => "info",
            Level::Hint => "hint",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_severity_ascending() {
        assert!(Level::Hint < Level::Info);
        assert!(Level::Info < Level::Warning);
        assert!(Level::Warning < Level::Error);
    }

    #[test]
    fn tag_round_trips_through_display() {
        assert_eq!(Level::Error.to_string(), "error");
        assert_eq!(Level::Hint.to_string(), "hint");
    }
}
