use std::collections::BTreeSet;

use crate::model::Animation;
use crate::report::Report;

/// What the author said the animation would look like. Every field is
/// optional; an empty expectation set still runs the reference checks.
#[derive(Debug, Clone, Default)]
pub struct Expectations {
    /// Expected number of layers (one per animated element).
    pub layer_count: Option<usize>,
    /// Layers were described as animating one after another.
    pub sequential: bool,
    /// Maximum acceptable document size in KiB.
    pub max_size_kib: Option<f64>,
}

/// How layer start times relate across the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingStrategy {
    /// Every layer starts on the same frame.
    Simultaneous,
    /// Start times strictly increase in layer order.
    Staggered,
    /// Neither of the above.
    Mixed,
}

/// Effective start frame per layer: `st`, falling back to `ip`, then 0.
pub fn layer_start_times(doc: &Animation) -> Vec<f64> {
    doc.layers
        .iter()
        .map(|l| l.start_time.or(l.in_point).unwrap_or(0.0))
        .collect()
}

pub fn timing_strategy(starts: &[f64]) -> TimingStrategy {
    if starts.len() < 2 || starts.windows(2).all(|w| w[0] == w[1]) {
        return TimingStrategy::Simultaneous;
    }
    if starts.windows(2).all(|w| w[0] < w[1]) {
        return TimingStrategy::Staggered;
    }
    TimingStrategy::Mixed
}

/// Check a document against the author's stated intent: layer count,
/// unique per-layer asset references, timing strategy and size. Catches
/// the gap between "each element animates separately" and everything
/// landing in one layer that starts at frame 0.
#[tracing::instrument(skip(doc))]
pub fn verify(doc: &Animation, expect: &Expectations, byte_size: Option<u64>) -> Report {
    let mut report = Report::default();

    check_layer_count(doc, expect, &mut report);
    check_unique_refs(doc, &mut report);
    check_timing(doc, expect, &mut report);

    if let (Some(limit), Some(bytes)) = (expect.max_size_kib, byte_size) {
        let kib = bytes as f64 / 1024.0;
        if kib > limit {
            report.warning(format!(
                "document size {kib:.1} KiB exceeds the {limit:.0} KiB limit"
            ));
        } else {
            report.info(format!("document size {kib:.1} KiB (under {limit:.0} KiB)"));
        }
    }

    report
}

fn check_layer_count(doc: &Animation, expect: &Expectations, report: &mut Report) {
    let n = doc.layers.len();
    match expect.layer_count {
        Some(expected) if expected == n => {
            report.info(format!("{n} layer(s), as expected"));
        }
        Some(expected) => {
            report.warning(format!("{n} layer(s), expected {expected}"));
        }
        None => report.info(format!("{n} layer(s)")),
    }
}

fn check_unique_refs(doc: &Animation, report: &mut Report) {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    let mut total = 0usize;

    for layer in &doc.layers {
        let Some(ref_id) = &layer.ref_id else { continue };
        total += 1;
        if !seen.insert(ref_id.clone()) {
            duplicates.insert(ref_id.clone());
        }
    }

    if !duplicates.is_empty() {
        let list: Vec<&str> = duplicates.iter().map(String::as_str).collect();
        report.warning(format!(
            "duplicate asset references across layers: {}",
            list.join(", ")
        ));
    } else if total > 0 {
        report.info(format!("all {total} layer asset references are unique"));
    } else {
        report.info("no asset references (shape-only animation)");
    }
}

fn check_timing(doc: &Animation, expect: &Expectations, report: &mut Report) {
    let starts = layer_start_times(doc);
    let strategy = timing_strategy(&starts);

    if !expect.sequential {
        match strategy {
            TimingStrategy::Staggered => report.info("layers use staggered start times"),
            TimingStrategy::Simultaneous => report.info("layers start together"),
            TimingStrategy::Mixed => report.info("layers use a mixed timing pattern"),
        }
        return;
    }

    match strategy {
        TimingStrategy::Staggered => {
            report.info(format!("staggered timing confirmed (starts {starts:?})"));
        }
        TimingStrategy::Simultaneous => {
            let at = starts.first().copied().unwrap_or(0.0);
            report.warning(format!(
                "all layers start at frame {at}, but sequential timing was expected"
            ));
        }
        TimingStrategy::Mixed => {
            report.warning(format!(
                "layers have a non-sequential timing pattern (starts {starts:?})"
            ));
        }
    }
}
