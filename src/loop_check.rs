use std::fmt;

use crate::model::{Animation, Property, PropertyKind, Value};

/// Default tolerance for linear channels; absorbs float rounding from
/// upstream export tools.
pub const DEFAULT_TOLERANCE: f64 = 1e-3;

/// Component equivalence rule: `(first, last, tolerance) -> equal`.
pub type ComponentEq = fn(f64, f64, f64) -> bool;

/// Equivalence strategy for a channel kind. Rotation gets the wraparound
/// rule; every other channel compares within plain tolerance.
pub fn equivalence(kind: PropertyKind) -> ComponentEq {
    match kind {
        PropertyKind::Rotation => angle_equivalent,
        PropertyKind::Position | PropertyKind::Scale | PropertyKind::Opacity => linear_equivalent,
    }
}

fn linear_equivalent(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

/// Angles are equal modulo 360°: a full positive or negative turn lands
/// on the same visual pose.
fn angle_equivalent(a: f64, b: f64, tolerance: f64) -> bool {
    let diff = (a - b).abs() % 360.0;
    diff <= tolerance || diff >= 360.0 - tolerance
}

/// Outcome of the loop check for one whole document.
#[derive(Debug, Clone)]
pub struct LoopReport {
    /// True iff every checked channel returns to its starting value.
    pub seamless: bool,
    /// Per-(layer, channel) outcomes in document order.
    pub outcomes: Vec<PropertyOutcome>,
}

impl LoopReport {
    pub fn mismatches(&self) -> impl Iterator<Item = &PropertyOutcome> {
        self.outcomes.iter().filter(|o| !o.is_clean())
    }
}

/// First-vs-last comparison for a single animated channel.
#[derive(Debug, Clone)]
pub struct PropertyOutcome {
    pub layer: String,
    pub kind: PropertyKind,
    pub first: Value,
    pub last: Value,
    /// Indices of every mismatching component (all of them, not just the
    /// first), empty when the channel loops cleanly.
    pub mismatched: Vec<usize>,
    /// True when rotation only matched via a whole number of turns.
    pub wrapped: bool,
}

impl PropertyOutcome {
    pub fn is_clean(&self) -> bool {
        self.mismatched.is_empty()
    }
}

impl fmt::Display for PropertyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            if self.wrapped {
                return write!(
                    f,
                    "{}: rotation {}° → {}° (whole turns, visually identical)",
                    self.layer, self.first, self.last
                );
            }
            return write!(f, "{}: {} loops cleanly", self.layer, self.kind);
        }
        if self.kind == PropertyKind::Rotation
            && let (Some(a), Some(b)) = (self.first.scalar(), self.last.scalar())
        {
            let diff = (a - b).abs() % 360.0;
            return write!(
                f,
                "{}: rotation {a}° → {b}° (diff {diff:.1}°, not a multiple of 360°)",
                self.layer
            );
        }
        write!(
            f,
            "{}: {} first {} ≠ last {}",
            self.layer, self.kind, self.first, self.last
        )?;
        if self.first.components().len() > 1 || self.last.components().len() > 1 {
            write!(f, " (components ")?;
            for (i, idx) in self.mismatched.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{idx}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Decide whether the document plays as a seamless loop.
///
/// Pure over its input: for each animated transform channel the first
/// keyframe's value is compared against the last defined value (the
/// format holds the final keyframe's value to the end frame), using the
/// kind's equivalence rule. Findings come back as data; a document with
/// no animated channels trivially passes.
#[tracing::instrument(skip(doc))]
pub fn check_loop(doc: &Animation, tolerance: f64) -> LoopReport {
    let mut outcomes = Vec::new();

    for (i, layer) in doc.layers.iter().enumerate() {
        let Some(ks) = &layer.transform else { continue };
        for (kind, prop) in ks.channels() {
            let Some(Property::Animated(keys)) = prop else {
                continue;
            };
            // Keyframes without a value (bare final `{"t": N}` markers)
            // leave nothing to compare; skip like an absent channel.
            let (Some(first), Some(last)) = (
                keys.first().and_then(|k| k.value()),
                keys.last().and_then(|k| k.value()),
            ) else {
                continue;
            };
            outcomes.push(compare(layer.display_name(i), kind, first, last, tolerance));
        }
    }

    let seamless = outcomes.iter().all(PropertyOutcome::is_clean);
    tracing::debug!(checked = outcomes.len(), seamless, "loop check complete");
    LoopReport { seamless, outcomes }
}

fn compare(
    layer: String,
    kind: PropertyKind,
    first: &Value,
    last: &Value,
    tolerance: f64,
) -> PropertyOutcome {
    let eq = equivalence(kind);
    let a = first.components();
    let b = last.components();

    let mut mismatched = Vec::new();
    for i in 0..a.len().max(b.len()) {
        match (a.get(i), b.get(i)) {
            (Some(&x), Some(&y)) if eq(x, y, tolerance) => {}
            _ => mismatched.push(i),
        }
    }

    let wrapped = kind == PropertyKind::Rotation
        && mismatched.is_empty()
        && a.iter().zip(b).any(|(x, y)| (x - y).abs() > tolerance);

    PropertyOutcome {
        layer,
        kind,
        first: first.clone(),
        last: last.clone(),
        mismatched,
        wrapped,
    }
}
