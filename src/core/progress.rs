//! Adapter bridging core traits to the command layer.

use super::ProgressSink;
use crate::output::Output;

/// Adapter that forwards `ProgressSink` calls to an `Output` implementation.
///
/// # Example
///
/// ```ignore
/// let mut output = CliOutput::new(config);
/// let mut sink = OutputSink(&mut output);
/// let created = core::provision::create(&git, &layout, "origin", &request, &mut sink)?;
/// ```
pub struct OutputSink<'a>(pub &'a mut dyn Output);

impl ProgressSink for OutputSink<'_> {
    fn on_step(&mut self, msg: &str) {
        self.0.step(msg);
    }

    fn on_warning(&mut self, msg: &str) {
        self.0.warning(msg);
    }

    fn on_debug(&mut self, msg: &str) {
        self.0.debug(msg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::TestOutput;

    #[test]
    fn test_output_sink_forwards() {
        let mut output = TestOutput::verbose();
        {
            let mut sink = OutputSink(&mut output);
            sink.on_step("Fetching from 'origin'...");
            sink.on_warning("Fetch failed");
            sink.on_debug("git fetch origin");
        }
        assert!(output.has_step("Fetching"));
        assert!(output.has_warning("Fetch failed"));
        assert_eq!(output.debugs(), vec!["git fetch origin"]);
    }
}
