//! Result aggregation: DPS sample statistics and the text report.

use std::fmt::Write;

use serde::Serialize;

use crate::breakdown::CombatBreakdown;
use crate::simulation::SimulationReport;

/// Summary statistics over the per-iteration DPS samples.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DpsSummary {
    pub mean: f64,
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
}

impl DpsSummary {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = sorted.len() as f64;
        let mut sum = 0.0;
        let mut sum_squared = 0.0;
        for &value in &sorted {
            sum += value;
            sum_squared += value * value;
        }
        let mean = sum / n;
        let variance = (sum_squared / n - mean * mean).max(0.0);

        Self {
            mean,
            median: sorted[sorted.len() / 2],
            p25: sorted[sorted.len() / 4],
            p75: sorted[sorted.len() * 3 / 4],
            min: *sorted.first().unwrap(),
            max: *sorted.last().unwrap(),
            std_dev: variance.sqrt(),
        }
    }
}

/// One row of the per-spell table.
#[derive(Debug, Clone, Serialize)]
pub struct BreakdownRow {
    pub name: &'static str,
    pub casts: u64,
    pub crits: u64,
    pub misses: u64,
    pub damage: f64,
    pub average_damage: f64,
    pub dps: f64,
    pub mana_gain: f64,
}

/// Rows sorted by damage contribution, heaviest hitter first.
pub fn breakdown_rows(breakdown: &CombatBreakdown, total_fight_time: f64) -> Vec<BreakdownRow> {
    let mut rows: Vec<BreakdownRow> = breakdown
        .iter()
        .map(|(id, entry)| BreakdownRow {
            name: id.name(),
            casts: entry.casts,
            crits: entry.crits,
            misses: entry.misses,
            damage: entry.damage,
            average_damage: if entry.casts > 0 {
                entry.damage / entry.casts as f64
            } else {
                0.0
            },
            dps: if total_fight_time > 0.0 {
                entry.damage / total_fight_time
            } else {
                0.0
            },
            mana_gain: entry.mana_gain,
        })
        .collect();
    rows.sort_by(|a, b| b.damage.partial_cmp(&a.damage).unwrap_or(std::cmp::Ordering::Equal));
    rows
}

pub fn format_report(report: &SimulationReport) -> String {
    let mut out = String::new();
    writeln!(&mut out, "=== DPS over {} iterations ===", report.iterations).unwrap();
    writeln!(
        &mut out,
        "mean {:.1}  median {:.1}  min {:.1}  max {:.1}  stddev {:.1}",
        report.dps.mean, report.dps.median, report.dps.min, report.dps.max, report.dps.std_dev
    )
    .unwrap();
    writeln!(&mut out).unwrap();
    writeln!(
        &mut out,
        "{:<40} {:>8} {:>8} {:>8} {:>14} {:>10} {:>9}",
        "Spell", "Casts", "Crits", "Misses", "Damage", "Avg", "DPS"
    )
    .unwrap();
    for row in breakdown_rows(&report.breakdown, report.total_fight_time) {
        writeln!(
            &mut out,
            "{:<40} {:>8} {:>8} {:>8} {:>14.0} {:>10.1} {:>9.1}",
            row.name, row.casts, row.crits, row.misses, row.damage, row.average_damage, row.dps
        )
        .unwrap();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_known_samples() {
        let samples = [10.0, 20.0, 30.0, 40.0];
        let summary = DpsSummary::from_samples(&samples);
        assert_eq!(summary.mean, 25.0);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 40.0);
        assert_eq!(summary.median, 30.0);
        assert!((summary.std_dev - 125.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn empty_samples_are_all_zero() {
        let summary = DpsSummary::from_samples(&[]);
        assert_eq!(summary.mean, 0.0);
        assert_eq!(summary.max, 0.0);
    }

    #[test]
    fn rows_sort_by_damage() {
        use crate::enums::SpellId;
        let mut breakdown = CombatBreakdown::default();
        breakdown.add_damage(SpellId::Corruption, 100.0);
        breakdown.add_damage(SpellId::ShadowBolt, 900.0);
        breakdown.entry(SpellId::ShadowBolt).casts = 3;
        let rows = breakdown_rows(&breakdown, 10.0);
        assert_eq!(rows[0].name, "Shadow Bolt");
        assert_eq!(rows[0].dps, 90.0);
        assert_eq!(rows[0].average_damage, 300.0);
    }
}
