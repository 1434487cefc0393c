//! Two-series time chart description.

use serde::Serialize;
use serde_json::{json, Value};

use crate::format::format_axis_timestamp;
use crate::traffic::types::{MetricDomain, Period, SeriesBundle, SeriesPoint};

/// Number of intervals on the time axis.
pub const SPLIT_NUMBER: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: &'static str,
    pub data: Vec<SeriesPoint>,
}

/// A smoothed, markerless line chart over a time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub period: Period,
    pub series: [ChartSeries; 2],
    pub colors: [&'static str; 2],
}

impl ChartSpec {
    /// Build the chart for `domain` from a freshly fetched bundle.
    pub fn from_bundle(domain: MetricDomain, bundle: &SeriesBundle, period: Period) -> Self {
        let layout = domain.layout();
        let series = [0usize, 1].map(|i| ChartSeries {
            name: layout.names[i],
            data: bundle.values(layout.keys[i]).to_vec(),
        });

        Self {
            period,
            series,
            colors: layout.colors,
        }
    }

    /// Axis label for a tick at `millis`.
    pub fn tick_label(&self, millis: i64) -> String {
        format_axis_timestamp(millis, self.period)
    }

    /// Evenly spaced tick labels spanning all points, empty without data.
    pub fn axis_labels(&self) -> Vec<String> {
        let mut stamps = self
            .series
            .iter()
            .flat_map(|s| s.data.iter().map(SeriesPoint::timestamp_millis));
        let Some(first) = stamps.next() else {
            return Vec::new();
        };
        let (min, max) = stamps.fold((first, first), |(lo, hi), t| (lo.min(t), hi.max(t)));

        if min == max {
            return vec![self.tick_label(min)];
        }
        let step = (max - min) as f64 / SPLIT_NUMBER as f64;
        (0..=SPLIT_NUMBER)
            .map(|i| self.tick_label(min + (step * i as f64).round() as i64))
            .collect()
    }

    /// ECharts-style option object.
    pub fn to_option(&self) -> Value {
        let series: Vec<Value> = self
            .series
            .iter()
            .map(|s| {
                json!({
                    "type": "line",
                    "name": s.name,
                    "data": s.data,
                    "smooth": true,
                    "symbol": "none",
                })
            })
            .collect();

        json!({
            "title": { "show": false },
            "tooltip": { "trigger": "axis" },
            "xAxis": {
                "type": "time",
                "splitNumber": SPLIT_NUMBER,
                "axisLabel": { "period": self.period },
            },
            "yAxis": { "show": false },
            "grid": { "top": 0, "left": 0, "right": 0, "bottom": 20 },
            "series": series,
            "color": self.colors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> SeriesBundle {
        serde_json::from_str(
            r#"{
                "typ-main_out_bytes": {"total": 10, "values": [[0, 1], [3000, 2]]},
                "typ-main_in_bytes": {"total": 5, "values": [[6000, 4]]}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_from_bundle_flows() {
        let chart = ChartSpec::from_bundle(MetricDomain::Flows, &bundle(), Period::OneDay);
        assert_eq!(chart.series[0].name, "out");
        assert_eq!(chart.series[0].data.len(), 2);
        assert_eq!(chart.series[1].name, "in");
        assert_eq!(chart.series[1].data, vec![SeriesPoint(6000, 4.0)]);
        assert_eq!(chart.colors, ["#91cc75", "#fac858"]);
    }

    #[test]
    fn test_missing_series_is_empty() {
        let chart = ChartSpec::from_bundle(MetricDomain::Requests, &bundle(), Period::OneDay);
        assert!(chart.series.iter().all(|s| s.data.is_empty()));
        assert!(chart.axis_labels().is_empty());
    }

    #[test]
    fn test_axis_labels_follow_period() {
        let chart = ChartSpec::from_bundle(MetricDomain::Flows, &bundle(), Period::SevenDays);
        let labels = chart.axis_labels();
        assert_eq!(labels.len(), SPLIT_NUMBER + 1);
        assert_eq!(labels[0], format_axis_timestamp(0, Period::SevenDays));
        assert_eq!(labels[3], format_axis_timestamp(6000, Period::SevenDays));
    }

    #[test]
    fn test_option_shape() {
        let option = ChartSpec::from_bundle(MetricDomain::Flows, &bundle(), Period::OneDay).to_option();
        assert_eq!(option["xAxis"]["type"], "time");
        assert_eq!(option["series"][0]["smooth"], true);
        assert_eq!(option["series"][0]["symbol"], "none");
        assert_eq!(option["series"][0]["data"][1], json!([3000, 2.0]));
        assert_eq!(option["color"][1], "#fac858");
    }
}
