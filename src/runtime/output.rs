//! Output sinks for script-produced text.
//!
//! The `print` builtin writes through an [`OutputSink`] rather than straight
//! to stdout, so evaluator tests can capture what a script printed.

/// Destination for text emitted by a running script.
pub trait OutputSink {
    fn emit(&mut self, text: &str);
}

/// Collects emitted lines into a string. Used by tests.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    buffer: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl OutputSink for OutputBuffer {
    fn emit(&mut self, text: &str) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(text);
    }
}

/// Writes each emitted line to stdout. Used by the check runner so script
/// output interleaves with the runner's own result lines, as it would if
/// the script ran standalone.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, text: &str) {
        println!("{text}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_joins_emissions_with_newlines() {
        let mut buf = OutputBuffer::new();
        buf.emit("one");
        buf.emit("two");
        assert_eq!(buf.as_str(), "one\ntwo");
    }
}
