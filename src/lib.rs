//! Lottielint analyzes Lottie JSON animation documents for animated-logo
//! deliverables.
//!
//! The passes are pure functions over a parsed [`Animation`]:
//!
//! 1. **Loop check**: does every animated transform channel return to its
//!    starting value by the final keyframe (rotation modulo 360°)?
//! 2. **Structure check**: frame rate, duration, dimensions, layer and
//!    asset sanity, with severity-tagged findings.
//! 3. **Expectation check**: layer counts, unique asset references and
//!    timing strategy against what the author intended.
//! 4. **Optimize**: metadata stripping, precision rounding and empty
//!    pruning over the raw JSON tree.
//!
//! Findings are data, not errors: a failed loop check is a normal
//! [`LoopReport`], and only malformed input surfaces as [`LintError`].
#![forbid(unsafe_code)]

pub mod error;
pub mod loop_check;
pub mod model;
pub mod optimize;
pub mod report;
pub mod structure;
pub mod verify;

pub use error::{LintError, LintResult};
pub use loop_check::{DEFAULT_TOLERANCE, LoopReport, PropertyOutcome, check_loop, equivalence};
pub use model::{Animation, Asset, Keyframe, Layer, Property, PropertyKind, Transform, Value};
pub use optimize::{OptimizeOptions, OptimizeStats, optimize, to_minified_string};
pub use report::{Finding, Report, Severity};
pub use structure::check_structure;
pub use verify::{Expectations, TimingStrategy, layer_start_times, timing_strategy, verify};
