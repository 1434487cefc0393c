//! Render targets.
//!
//! Widgets never touch a concrete UI. They drive a [`WidgetSurface`] (chart,
//! loading indicator, two totals, error line) and the period selector drives
//! a [`LabelSurface`]. The in-memory surfaces back the runner and the tests.

use std::sync::Mutex;

use crate::traffic::chart::ChartSpec;

/// The render targets owned by one chart widget.
pub trait WidgetSurface: Send + Sync {
    fn set_loading(&self, visible: bool);

    /// Write both totals and reveal the totals block.
    fn show_totals(&self, primary: &str, secondary: &str);

    /// Replace whatever chart was drawn before.
    fn render_chart(&self, chart: &ChartSpec);

    /// Show a failure message, or clear it with `None`.
    fn show_error(&self, message: Option<&str>);

    /// Hide the totals block and remove the chart.
    fn clear_data(&self);
}

/// A single line of text, e.g. the active period button.
pub trait LabelSurface: Send + Sync {
    fn set_label(&self, text: &str);
}

/// Everything a [`MemorySurface`] currently displays.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSnapshot {
    pub loading: bool,
    pub totals_visible: bool,
    pub totals: [String; 2],
    pub chart: Option<ChartSpec>,
    pub error: Option<String>,
    /// Number of charts drawn so far.
    pub renders: usize,
}

impl Default for SurfaceSnapshot {
    fn default() -> Self {
        Self {
            loading: true,
            totals_visible: false,
            totals: [String::new(), String::new()],
            chart: None,
            error: None,
            renders: 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<SurfaceSnapshot>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SurfaceSnapshot {
        self.state.lock().expect("surface mutex poisoned").clone()
    }

    fn update(&self, f: impl FnOnce(&mut SurfaceSnapshot)) {
        f(&mut self.state.lock().expect("surface mutex poisoned"));
    }
}

impl WidgetSurface for MemorySurface {
    fn set_loading(&self, visible: bool) {
        self.update(|s| s.loading = visible);
    }

    fn show_totals(&self, primary: &str, secondary: &str) {
        self.update(|s| {
            s.totals = [primary.to_string(), secondary.to_string()];
            s.totals_visible = true;
        });
    }

    fn render_chart(&self, chart: &ChartSpec) {
        self.update(|s| {
            s.chart = Some(chart.clone());
            s.renders += 1;
        });
    }

    fn show_error(&self, message: Option<&str>) {
        self.update(|s| s.error = message.map(str::to_string));
    }

    fn clear_data(&self) {
        self.update(|s| {
            s.totals_visible = false;
            s.chart = None;
        });
    }
}

#[derive(Debug, Default)]
pub struct MemoryLabel {
    text: Mutex<String>,
}

impl MemoryLabel {
    pub fn text(&self) -> String {
        self.text.lock().expect("label mutex poisoned").clone()
    }
}

impl LabelSurface for MemoryLabel {
    fn set_label(&self, text: &str) {
        *self.text.lock().expect("label mutex poisoned") = text.to_string();
    }
}
