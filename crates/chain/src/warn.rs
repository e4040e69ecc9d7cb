/// Sink for non-fatal diagnostics raised while parsing alter metadata.
///
/// Unknown header keys are forward-compatible and must not break parsing,
/// so they are recorded here instead of being returned as errors. Passed in
/// explicitly rather than reaching for a process-wide logger.
pub trait WarningSink {
    fn record(&mut self, message: String);
}

/// Forwards warnings to the `log` facade at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl WarningSink for LogSink {
    fn record(&mut self, message: String) {
        log::warn!("{message}");
    }
}

impl WarningSink for Vec<String> {
    fn record(&mut self, message: String) {
        self.push(message);
    }
}
