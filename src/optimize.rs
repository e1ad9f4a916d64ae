use crate::error::{LintError, LintResult};

/// Root keys that carry authoring metadata and no playback semantics.
pub const METADATA_KEYS: [&str; 5] = ["meta", "metadata", "description", "generator", "keywords"];

#[derive(Debug, Clone)]
pub struct OptimizeOptions {
    /// Round every float in the tree to this many decimal places.
    pub decimal_places: u32,
    /// Drop the root metadata keys.
    pub strip_metadata: bool,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            decimal_places: 2,
            strip_metadata: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OptimizeStats {
    pub original_bytes: usize,
    pub optimized_bytes: usize,
}

impl OptimizeStats {
    pub fn reduction_bytes(&self) -> i64 {
        self.original_bytes as i64 - self.optimized_bytes as i64
    }

    pub fn reduction_percent(&self) -> f64 {
        if self.original_bytes == 0 {
            return 0.0;
        }
        self.reduction_bytes() as f64 / self.original_bytes as f64 * 100.0
    }
}

/// Shrink a Lottie JSON tree in place: strip metadata, round float
/// precision and prune empty containers. Purely structural; playback
/// semantics are untouched at sane precision settings.
#[tracing::instrument(skip(value))]
pub fn optimize(value: &mut serde_json::Value, opts: &OptimizeOptions) {
    if opts.strip_metadata && let Some(map) = value.as_object_mut() {
        for key in METADATA_KEYS {
            map.remove(key);
        }
    }
    round_numbers(value, opts.decimal_places);
    prune_empty(value);
}

/// Serialize with no whitespace.
pub fn to_minified_string(value: &serde_json::Value) -> LintResult<String> {
    serde_json::to_string(value).map_err(|e| LintError::parse(format!("serialize JSON: {e}")))
}

fn round_numbers(value: &mut serde_json::Value, decimal_places: u32) {
    match value {
        serde_json::Value::Number(n) if n.is_f64() => {
            if let Some(x) = n.as_f64() {
                let scale = 10f64.powi(decimal_places as i32);
                if let Some(rounded) = serde_json::Number::from_f64((x * scale).round() / scale) {
                    *n = rounded;
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items {
                round_numbers(item, decimal_places);
            }
        }
        serde_json::Value::Object(map) => {
            for item in map.values_mut() {
                round_numbers(item, decimal_places);
            }
        }
        _ => {}
    }
}

/// Objects drop null / empty-object / empty-array members (`false`, `0`
/// and `""` stay); arrays drop only null items, so positional lists keep
/// their shape.
fn prune_empty(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for item in map.values_mut() {
                prune_empty(item);
            }
            map.retain(|_, v| !is_removable(v));
        }
        serde_json::Value::Array(items) => {
            for item in items.iter_mut() {
                prune_empty(item);
            }
            items.retain(|v| !v.is_null());
        }
        _ => {}
    }
}

fn is_removable(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rounds_floats_and_keeps_integers() {
        let mut v = json!({"k": [10.123456, 3, {"t": 0.999999}]});
        optimize(&mut v, &OptimizeOptions::default());
        assert_eq!(v, json!({"k": [10.12, 3, {"t": 1.0}]}));
    }

    #[test]
    fn precision_is_configurable() {
        let mut v = json!({"x": 1.2345});
        optimize(
            &mut v,
            &OptimizeOptions {
                decimal_places: 1,
                ..Default::default()
            },
        );
        assert_eq!(v, json!({"x": 1.2}));
    }

    #[test]
    fn strips_root_metadata_only() {
        let mut v = json!({
            "meta": {"g": "tool"},
            "generator": "tool",
            "layers": [{"meta": "not root, kept"}]
        });
        optimize(&mut v, &OptimizeOptions::default());
        assert_eq!(v, json!({"layers": [{"meta": "not root, kept"}]}));
    }

    #[test]
    fn keep_metadata_option_is_honored() {
        let mut v = json!({"meta": {"g": "tool"}, "layers": []});
        optimize(
            &mut v,
            &OptimizeOptions {
                strip_metadata: false,
                ..Default::default()
            },
        );
        assert!(v.get("meta").is_some());
    }

    #[test]
    fn prunes_empty_containers_but_keeps_falsy_scalars() {
        let mut v = json!({
            "a": {},
            "b": [],
            "c": null,
            "d": false,
            "e": 0,
            "f": "",
            "list": [1, null, {"inner": {}}]
        });
        optimize(&mut v, &OptimizeOptions::default());
        assert_eq!(
            v,
            json!({"d": false, "e": 0, "f": "", "list": [1, {}]})
        );
    }

    #[test]
    fn minified_output_has_no_whitespace() {
        let v = json!({"a": [1, 2], "b": "x"});
        let s = to_minified_string(&v).unwrap();
        assert_eq!(s, r#"{"a":[1,2],"b":"x"}"#);
    }

    #[test]
    fn stats_report_reduction() {
        let stats = OptimizeStats {
            original_bytes: 1000,
            optimized_bytes: 600,
        };
        assert_eq!(stats.reduction_bytes(), 400);
        assert!((stats.reduction_percent() - 40.0).abs() < 1e-9);
    }
}
