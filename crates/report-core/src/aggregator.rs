//! Single-pass aggregation of stored reports into grouped counts
//!
//! [`StatsAccumulator`] folds records one at a time so callers can feed it
//! straight from a store scan without collecting the scan first.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;

use crate::model::Report;

/// Group key for records with no sector or city
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Aggregate view over every stored report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_reports: u64,
    pub sector_counts: BTreeMap<String, u64>,
    pub city_counts: BTreeMap<String, u64>,
    /// Mean of the reports that carry an amount, 2 decimals; `0.0` when none do
    pub avg_amount: f64,
}

#[derive(Debug, Default)]
pub struct StatsAccumulator {
    total_reports: u64,
    sector_counts: BTreeMap<String, u64>,
    city_counts: BTreeMap<String, u64>,
    /// Running mean of the amounts seen so far
    amount_mean: f64,
    amount_count: u64,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: &Report) {
        self.total_reports += 1;

        *self
            .sector_counts
            .entry(group_key(Some(report.sector.as_str())))
            .or_insert(0) += 1;
        *self
            .city_counts
            .entry(group_key(report.city.as_deref()))
            .or_insert(0) += 1;

        if let Some(amount) = report.amount.filter(|a| a.is_finite()) {
            self.amount_count += 1;
            let n = self.amount_count as f64;
            // Scaling each term by n first keeps the update finite for any
            // finite inputs
            self.amount_mean += amount / n - self.amount_mean / n;
        }
    }

    pub fn finish(self) -> Stats {
        let avg_amount = if self.amount_count == 0 {
            0.0
        } else {
            round_cents(self.amount_mean)
        };

        Stats {
            total_reports: self.total_reports,
            sector_counts: self.sector_counts,
            city_counts: self.city_counts,
            avg_amount,
        }
    }
}

/// Fold a sequence of reports into [`Stats`]
pub fn aggregate<I>(records: I) -> Stats
where
    I: IntoIterator,
    I::Item: Borrow<Report>,
{
    let mut acc = StatsAccumulator::new();
    for record in records {
        acc.push(record.borrow());
    }
    acc.finish()
}

fn group_key(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN_GROUP.to_string(),
    }
}

/// Round to 2 decimal places, halves away from zero. Values too large to
/// scale by 100 have no fractional part left and are returned unchanged.
fn round_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if scaled.is_finite() {
        scaled.round() / 100.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Location, DEFAULT_CHANNEL};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Map};

    fn report(sector: &str, city: Option<&str>, amount: Option<f64>) -> Report {
        Report {
            location: Location {
                lat: json!(0),
                lng: json!(0),
                extra: Map::new(),
            },
            sector: sector.to_string(),
            description: "d".to_string(),
            amount,
            channel: DEFAULT_CHANNEL.to_string(),
            city: city.map(str::to_string),
            timestamp: "2024-01-01T00:00:00.000000Z".to_string(),
            extra: Map::new(),
        }
    }

    #[test]
    fn empty_input() {
        let stats = aggregate(Vec::<Report>::new());
        assert_eq!(stats, Stats::default());
        assert_eq!(stats.avg_amount, 0.0);
        assert_eq!(
            serde_json::to_value(&stats).unwrap(),
            json!({"total_reports": 0, "sector_counts": {}, "city_counts": {}, "avg_amount": 0.0})
        );
    }

    #[test]
    fn groups_and_unknown_fallback() {
        let records = vec![
            report("Flood", Some("Accra"), None),
            report("Flood", None, None),
            report("", Some(""), None),
            report("Fire", Some("Accra"), None),
        ];
        let stats = aggregate(&records);

        assert_eq!(stats.total_reports, 4);
        assert_eq!(
            stats.sector_counts,
            BTreeMap::from([
                ("Fire".to_string(), 1),
                ("Flood".to_string(), 2),
                ("Unknown".to_string(), 1),
            ])
        );
        assert_eq!(
            stats.city_counts,
            BTreeMap::from([("Accra".to_string(), 2), ("Unknown".to_string(), 2)])
        );
    }

    #[test]
    fn average_skips_absent_amounts() {
        let records = vec![
            report("a", None, Some(10.0)),
            report("a", None, None),
            report("a", None, Some(20.0)),
        ];
        assert_eq!(aggregate(&records).avg_amount, 15.0);
    }

    #[test]
    fn no_amounts_gives_exact_zero() {
        let records = vec![report("a", None, None), report("b", None, None)];
        let avg = aggregate(&records).avg_amount;
        assert_eq!(avg, 0.0);
        assert!(!avg.is_nan());
    }

    #[test]
    fn average_rounded_to_cents() {
        let records = vec![
            report("a", None, Some(1.0)),
            report("a", None, Some(2.0)),
            report("a", None, Some(2.0)),
        ];
        assert_eq!(aggregate(&records).avg_amount, 1.67);

        let records = vec![report("a", None, Some(0.125))];
        assert_eq!(aggregate(&records).avg_amount, 0.13);

        let records = vec![report("a", None, Some(-0.125))];
        assert_eq!(aggregate(&records).avg_amount, -0.13);
    }

    #[test]
    fn huge_amounts_keep_a_finite_average() {
        let records = vec![report("a", None, Some(1e307))];
        let stats = aggregate(&records);
        assert_eq!(stats.avg_amount, 1e307);
        assert_eq!(serde_json::to_value(&stats).unwrap()["avg_amount"], json!(1e307));

        let records = vec![report("a", None, Some(1e308)), report("a", None, Some(1e308))];
        let stats = aggregate(&records);
        assert_eq!(stats.avg_amount, 1e308);
        assert!(serde_json::to_value(&stats).unwrap()["avg_amount"].is_f64());

        let records = vec![
            report("a", None, Some(f64::MAX)),
            report("a", None, Some(-f64::MAX)),
            report("a", None, Some(f64::MAX)),
        ];
        assert!(aggregate(&records).avg_amount.is_finite());
    }

    #[test]
    fn accumulator_matches_aggregate() {
        let records = vec![
            report("x", Some("c1"), Some(3.0)),
            report("y", Some("c2"), Some(4.5)),
        ];
        let mut acc = StatsAccumulator::new();
        for r in &records {
            acc.push(r);
        }
        assert_eq!(acc.finish(), aggregate(records));
    }
}
