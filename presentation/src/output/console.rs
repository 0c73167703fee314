//! Console output for diagnostics and run summaries

use colored::Colorize;
use lumiere_application::{DiagnosticSink, RunScriptOutput};
use lumiere_domain::{Diagnostic, LogLevel};

/// Formats diagnostics for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format one diagnostic, with its traceback indented below it
    pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
        let tag = match diagnostic.level {
            LogLevel::Debug => diagnostic.level.tag().dimmed(),
            LogLevel::Info => diagnostic.level.tag().cyan(),
            LogLevel::Warning => diagnostic.level.tag().yellow().bold(),
            LogLevel::Error => diagnostic.level.tag().red().bold(),
        };

        let mut output = format!(
            "{} {} {}",
            tag,
            format!("[{}]", diagnostic.kind).dimmed(),
            diagnostic.message
        );

        if let Some(trace) = &diagnostic.trace {
            output.push('\n');
            output.push_str(&Self::indent(trace, "    ").dimmed().to_string());
        }

        output
    }

    /// One-line summary of a script run; the entrypoint is shown as a
    /// member of `library`
    pub fn format_summary(
        output: &RunScriptOutput,
        library: &str,
        entrypoint: Option<&str>,
    ) -> String {
        let script = if output.loaded {
            "script ran".green().to_string()
        } else {
            "script failed".red().to_string()
        };

        match entrypoint {
            Some(name) => {
                let member = format!("{}.{}", library, name).bold();
                if output.entrypoint_called {
                    format!("{}, {} called", script, member)
                } else {
                    format!("{}, {} not called", script, member)
                }
            }
            None => script,
        }
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Diagnostic sink that prints to stderr
pub struct ConsoleDiagnosticSink {
    min_level: LogLevel,
}

impl ConsoleDiagnosticSink {
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }
}

impl Default for ConsoleDiagnosticSink {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl DiagnosticSink for ConsoleDiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic) {
        if diagnostic.level >= self.min_level {
            eprintln!("{}", ConsoleFormatter::format_diagnostic(&diagnostic));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumiere_domain::DiagnosticKind;

    fn plain<T>(f: impl FnOnce() -> T) -> T {
        colored::control::set_override(false);
        f()
    }

    #[test]
    fn test_format_diagnostic() {
        let text = plain(|| {
            ConsoleFormatter::format_diagnostic(&Diagnostic::new(
                DiagnosticKind::NotCallable,
                "'start' is 'nil' or is not a callable member of 'lib' object",
            ))
        });
        assert_eq!(
            text,
            "[WARNING] [NotCallable] 'start' is 'nil' or is not a callable member of 'lib' object"
        );
    }

    #[test]
    fn test_format_diagnostic_with_trace() {
        let text = plain(|| {
            ConsoleFormatter::format_diagnostic(
                &Diagnostic::new(DiagnosticKind::RuntimeError, "boom")
                    .with_trace("stack traceback:\n\t[C]: in ?"),
            )
        });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[ERROR] [RuntimeError] boom");
        assert_eq!(lines[1], "    stack traceback:");
    }

    #[test]
    fn test_format_summary() {
        let output = RunScriptOutput {
            loaded: true,
            entrypoint_called: true,
        };
        let text = plain(|| ConsoleFormatter::format_summary(&output, "lib", Some("start")));
        assert_eq!(text, "script ran, lib.start called");

        let text = plain(|| {
            ConsoleFormatter::format_summary(&RunScriptOutput::default(), "lib", None)
        });
        assert_eq!(text, "script failed");
    }

    #[test]
    fn test_format_summary_uses_library_name() {
        let output = RunScriptOutput {
            loaded: true,
            entrypoint_called: false,
        };
        let text = plain(|| ConsoleFormatter::format_summary(&output, "game", Some("start")));
        assert_eq!(text, "script ran, game.start not called");
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
