//! Chart widgets.
//!
//! A widget owns its render targets and a fetch sequence counter. Each
//! refresh takes a new sequence number; only the newest one may touch the
//! surface, so a slow response can never overwrite newer data.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::format::format_byte_size;
use crate::render::WidgetSurface;
use crate::traffic::chart::ChartSpec;
use crate::traffic::types::{MetricDomain, Period, SeriesBundle};

/// Display state of a widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetState {
    Loading,
    Ready,
    Failed(String),
}

struct Inner {
    latest_seq: u64,
    state: WidgetState,
}

pub struct ChartWidget {
    id: String,
    domain: MetricDomain,
    scope_id: Option<String>,
    surface: Arc<dyn WidgetSurface>,
    inner: Mutex<Inner>,
}

impl ChartWidget {
    pub fn new(
        id: impl Into<String>,
        domain: MetricDomain,
        scope_id: Option<String>,
        surface: Arc<dyn WidgetSurface>,
    ) -> Self {
        Self {
            id: id.into(),
            domain,
            scope_id,
            surface,
            inner: Mutex::new(Inner {
                latest_seq: 0,
                state: WidgetState::Loading,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn domain(&self) -> MetricDomain {
        self.domain
    }

    pub fn scope_id(&self) -> Option<&str> {
        self.scope_id.as_deref()
    }

    pub fn state(&self) -> WidgetState {
        self.lock().state.clone()
    }

    /// Sequence number of the most recently issued fetch.
    pub fn latest_seq(&self) -> u64 {
        self.lock().latest_seq
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("widget mutex poisoned")
    }

    /// Issue a new fetch sequence number and show the loading indicator.
    pub fn begin_fetch(&self) -> u64 {
        let mut inner = self.lock();
        inner.latest_seq += 1;
        inner.state = WidgetState::Loading;
        self.surface.show_error(None);
        self.surface.set_loading(true);
        inner.latest_seq
    }

    /// Replace totals and chart with `bundle`. Returns false if `seq` is stale.
    pub fn apply(&self, seq: u64, bundle: &SeriesBundle, period: Period) -> bool {
        let mut inner = self.lock();
        if seq != inner.latest_seq {
            return false;
        }

        let layout = self.domain.layout();
        let [primary, secondary] = layout.keys.map(|key| {
            let total = bundle.total(key);
            if layout.byte_totals {
                format_byte_size(total, true)
            } else {
                total.to_string()
            }
        });

        self.surface.set_loading(false);
        self.surface.show_totals(&primary, &secondary);
        self.surface
            .render_chart(&ChartSpec::from_bundle(self.domain, bundle, period));
        inner.state = WidgetState::Ready;
        true
    }

    /// Record a failed fetch. Returns false if `seq` is stale.
    pub fn fail(&self, seq: u64, message: &str) -> bool {
        let mut inner = self.lock();
        if seq != inner.latest_seq {
            return false;
        }

        self.surface.set_loading(false);
        self.surface.clear_data();
        self.surface.show_error(Some(message));
        inner.state = WidgetState::Failed(message.to_string());
        true
    }
}

impl fmt::Debug for ChartWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartWidget")
            .field("id", &self.id)
            .field("domain", &self.domain)
            .field("scope_id", &self.scope_id)
            .finish()
    }
}
