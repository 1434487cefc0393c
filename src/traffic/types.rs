//! Period, metric domains and series data.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Aggregation window for the traffic series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
}

impl Period {
    pub const ALL: [Period; 2] = [Period::OneDay, Period::SevenDays];

    /// Form value sent to the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::SevenDays => "7d",
        }
    }

    /// Text for the period selector.
    pub fn label(&self) -> &'static str {
        match self {
            Period::OneDay => "1 Day",
            Period::SevenDays => "7 Days",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown period '{}', expected 1d or 7d", s))
    }
}

/// The metric family a widget shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricDomain {
    /// Request counts: success vs error.
    Requests,
    /// Byte flow: outbound vs inbound.
    Flows,
}

/// Static description of how a domain is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesLayout {
    pub keys: [&'static str; 2],
    pub names: [&'static str; 2],
    pub colors: [&'static str; 2],
    /// Totals are byte counts and go through the byte formatter.
    pub byte_totals: bool,
}

impl MetricDomain {
    pub const ALL: [MetricDomain; 2] = [MetricDomain::Requests, MetricDomain::Flows];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricDomain::Requests => "requests",
            MetricDomain::Flows => "flows",
        }
    }

    /// Aggregation endpoint for the form transport.
    pub fn endpoint(&self) -> &'static str {
        match self {
            MetricDomain::Requests => "/traffic/requests",
            MetricDomain::Flows => "/traffic/flows",
        }
    }

    pub fn layout(&self) -> SeriesLayout {
        match self {
            MetricDomain::Requests => SeriesLayout {
                keys: ["typ-success", "typ-error"],
                names: ["success", "error"],
                colors: ["#5470c6", "#B03A5B"],
                byte_totals: false,
            },
            MetricDomain::Flows => SeriesLayout {
                keys: ["typ-main_out_bytes", "typ-main_in_bytes"],
                names: ["out", "in"],
                colors: ["#91cc75", "#fac858"],
                byte_totals: true,
            },
        }
    }
}

impl fmt::Display for MetricDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MetricDomain::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown domain '{}', expected requests or flows", s))
    }
}

/// One sample: `[timestamp_millis, value]` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint(pub i64, pub f64);

impl SeriesPoint {
    pub fn timestamp_millis(&self) -> i64 {
        self.0
    }

    pub fn value(&self) -> f64 {
        self.1
    }
}

/// One named series with its precomputed total.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Series {
    #[serde(deserialize_with = "null_as_default")]
    pub total: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub values: Vec<SeriesPoint>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// All series returned by one fetch, keyed by series identifier.
///
/// Missing or `null` keys mean no data, never an error.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct SeriesBundle(pub HashMap<String, Series>);

impl<'de> Deserialize<'de> for SeriesBundle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, Option<Series>>::deserialize(deserializer)?;
        Ok(Self(
            raw.into_iter()
                .filter_map(|(key, series)| Some((key, series?)))
                .collect(),
        ))
    }
}

impl SeriesBundle {
    pub fn get(&self, key: &str) -> Option<&Series> {
        self.0.get(key)
    }

    pub fn total(&self, key: &str) -> f64 {
        self.get(key).map(|s| s.total).unwrap_or(0.0)
    }

    pub fn values(&self, key: &str) -> &[SeriesPoint] {
        self.get(key).map(|s| s.values.as_slice()).unwrap_or(&[])
    }
}
