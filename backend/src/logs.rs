//! Run log: leveled progress lines printed to stdout.

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    fn prefix(self) -> &'static str {
        match self {
            LogLevel::Info => "  ",
            LogLevel::Success => "✓",
            LogLevel::Warning => "⚠️",
            LogLevel::Error => "❌",
        }
    }
}

/// A single log entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    /// Nesting depth under the previous line
    pub indent: u8,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// The line as it appears on the terminal.
    pub fn render(&self) -> String {
        let indent = "     ".repeat(self.indent as usize);
        format!("{}{} {}", indent, self.level.prefix(), self.message)
    }

    fn print(&self) {
        println!("{}", self.render());
    }
}

pub fn log_info(msg: impl Into<String>) {
    LogEntry::new(LogLevel::Info, msg).print();
}

pub fn log_success(msg: impl Into<String>) {
    LogEntry::new(LogLevel::Success, msg).print();
}

pub fn log_warning(msg: impl Into<String>) {
    LogEntry::new(LogLevel::Warning, msg).print();
}

pub fn log_error(msg: impl Into<String>) {
    LogEntry::new(LogLevel::Error, msg).print();
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LogEntry::new(LogLevel::Info, msg).with_indent(indent).print();
}

pub fn log_separator() {
    println!("----------------------------------------");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prefixes_level() {
        let line = LogEntry::new(LogLevel::Success, "1 - t.h.shevchenko - user account info generated").render();
        assert_eq!(line, "✓ 1 - t.h.shevchenko - user account info generated");

        let line = LogEntry::new(LogLevel::Warning, "2 - t.h.shevchenko - duplicate user found!").render();
        assert!(line.starts_with("⚠️ "));
    }

    #[test]
    fn test_render_indents_nested_lines() {
        let line = LogEntry::new(LogLevel::Info, "t.h.shevchenko - email info generated")
            .with_indent(1)
            .render();
        assert_eq!(line, "        t.h.shevchenko - email info generated");
    }
}
