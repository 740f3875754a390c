//! View renderer — the templating collaborator.
//!
//! The core hands every page a named mapping of values and stays agnostic to
//! the output format; markup is somebody else's job.

use serde_json::Value;

/// Renders a named view from a mapping of values.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &str, context: &Value) -> String;
}

/// Default renderer: emits the view model itself as JSON. Good enough for
/// API clients and for wiring a real template engine in front of later.
#[derive(Debug, Default)]
pub struct JsonRenderer;

impl ViewRenderer for JsonRenderer {
    fn render(&self, _view: &str, context: &Value) -> String {
        serde_json::to_string_pretty(context).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_renderer_emits_context() {
        let renderer = JsonRenderer;
        let context = serde_json::json!({"view": "step1", "error": null});
        let out = renderer.render("step1", &context);
        assert!(out.contains("\"view\": \"step1\""));
    }
}
