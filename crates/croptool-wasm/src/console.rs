//! Browser console sink for crop tool events.

use croptool_core::{EventRecorder, Severity, ToolEvent};
use web_sys::console;

/// Writes tool events to the browser console.
///
/// Failures go to `console.warn` / `console.error` by severity; everything
/// else (only emitted in debug mode) goes to `console.log`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleRecorder;

impl EventRecorder for ConsoleRecorder {
    fn record(&self, event: &ToolEvent<'_>) {
        match event {
            ToolEvent::Failure(err) => {
                let message = format!("CropTool => {err}").into();
                match err.severity() {
                    Severity::Warning => console::warn_1(&message),
                    Severity::Error => console::error_1(&message),
                }
            }
            other => console::log_1(&format!("CropTool => {other:?}").into()),
        }
    }
}
