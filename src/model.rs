use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LintError, LintResult};

/// A parsed Lottie animation document.
///
/// This is the JSON-facing boundary object: field names follow the wire
/// format's short keys (`fr`, `ip`, `op`, ...), unknown fields are ignored,
/// and the document is consumed read-only by the analysis passes.
#[derive(Debug, Clone, Deserialize)]
pub struct Animation {
    #[serde(rename = "v", default)]
    pub version: Option<String>,
    #[serde(rename = "nm", default)]
    pub name: Option<String>,
    #[serde(rename = "fr")]
    pub frame_rate: f64,
    #[serde(rename = "ip")]
    pub in_point: f64,
    #[serde(rename = "op")]
    pub out_point: f64,
    #[serde(rename = "w")]
    pub width: u32,
    #[serde(rename = "h")]
    pub height: u32,
    #[serde(default)]
    pub assets: Vec<Asset>,
    pub layers: Vec<Layer>,
}

impl Animation {
    /// Parse an animation from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> LintResult<Self> {
        serde_json::from_reader(r).map_err(|e| LintError::parse(format!("parse Lottie JSON: {e}")))
    }

    /// Parse an animation from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> LintResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| LintError::parse(format!("parse Lottie JSON: {e}")))
    }

    /// Parse an animation from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> LintResult<Self> {
        let path = path.as_ref();
        let f = File::open(path)
            .map_err(|e| LintError::parse(format!("open Lottie JSON '{}': {e}", path.display())))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject malformed keyframe sequences.
    ///
    /// The analysis passes assume this ran: animated channels must carry at
    /// least one keyframe, with strictly increasing times.
    pub fn validate(&self) -> LintResult<()> {
        for (i, layer) in self.layers.iter().enumerate() {
            let Some(ks) = &layer.transform else { continue };
            for (kind, prop) in ks.channels() {
                let Some(Property::Animated(keys)) = prop else {
                    continue;
                };
                if keys.is_empty() {
                    return Err(LintError::document(format!(
                        "{}: {kind} is animated but has no keyframes",
                        layer.display_name(i)
                    )));
                }
                if !keys.windows(2).all(|w| w[0].time < w[1].time) {
                    return Err(LintError::document(format!(
                        "{}: {kind} keyframe times must be strictly increasing",
                        layer.display_name(i)
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn duration_frames(&self) -> f64 {
        self.out_point - self.in_point
    }

    pub fn duration_secs(&self) -> f64 {
        if self.frame_rate > 0.0 {
            self.duration_frames() / self.frame_rate
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Layer {
    #[serde(rename = "nm", default)]
    pub name: Option<String>,
    #[serde(rename = "ind", default)]
    pub index: Option<u32>,
    #[serde(rename = "refId", default)]
    pub ref_id: Option<String>,
    #[serde(rename = "st", default)]
    pub start_time: Option<f64>,
    #[serde(rename = "ip", default)]
    pub in_point: Option<f64>,
    #[serde(rename = "op", default)]
    pub out_point: Option<f64>,
    #[serde(rename = "ks", default)]
    pub transform: Option<Transform>,
}

impl Layer {
    /// Name for diagnostics; unnamed layers fall back to their position.
    pub fn display_name(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Layer {index}"))
    }
}

/// A layer's transform (`ks`): the recognized animatable channels.
///
/// Channels the wire format expresses in a shape this model does not
/// recognize (split position tracks, expression-driven values) parse to
/// `None` and are treated as absent by the checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Transform {
    #[serde(rename = "a", default, deserialize_with = "numeric_property")]
    pub anchor: Option<Property>,
    #[serde(rename = "p", default, deserialize_with = "numeric_property")]
    pub position: Option<Property>,
    #[serde(rename = "s", default, deserialize_with = "numeric_property")]
    pub scale: Option<Property>,
    #[serde(rename = "r", default, deserialize_with = "numeric_property")]
    pub rotation: Option<Property>,
    #[serde(rename = "o", default, deserialize_with = "numeric_property")]
    pub opacity: Option<Property>,
}

impl Transform {
    /// Loop-checkable channels in report order. The anchor is parsed for
    /// completeness but takes no part in loop continuity.
    pub fn channels(&self) -> [(PropertyKind, Option<&Property>); 4] {
        [
            (PropertyKind::Position, self.position.as_ref()),
            (PropertyKind::Scale, self.scale.as_ref()),
            (PropertyKind::Rotation, self.rotation.as_ref()),
            (PropertyKind::Opacity, self.opacity.as_ref()),
        ]
    }
}

/// Kind tag of a transform channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Position,
    Scale,
    Rotation,
    Opacity,
}

impl PropertyKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Scale => "scale",
            Self::Rotation => "rotation",
            Self::Opacity => "opacity",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One time-varying channel, with the wire format's animated-vs-static
/// flag (`a`) resolved into a sum type at parse time.
#[derive(Debug, Clone)]
pub enum Property {
    Static(Value),
    Animated(Vec<Keyframe>),
}

impl Property {
    /// Resolve a raw property into the recognized shapes.
    ///
    /// `{a: 1, k: [keyframes]}` becomes [`Property::Animated`]; `{a: 0, k:
    /// value}`, `{k: value}` and bare values become [`Property::Static`];
    /// anything else is `None`.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        if let Some(obj) = value.as_object() {
            let k = obj.get("k")?;
            let animated = obj.get("a").and_then(serde_json::Value::as_u64) == Some(1);
            if animated && let Ok(keys) = serde_json::from_value::<Vec<Keyframe>>(k.clone()) {
                return Some(Self::Animated(keys));
            }
            return Value::from_json(k).map(Self::Static);
        }
        Value::from_json(value).map(Self::Static)
    }
}

fn numeric_property<'de, D>(deserializer: D) -> Result<Option<Property>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(Property::from_json(&raw))
}

/// A (time, value) pair. The effective value is `s`, falling back to `e`
/// for exports that only carry the segment end.
#[derive(Debug, Clone, Deserialize)]
pub struct Keyframe {
    #[serde(rename = "t")]
    pub time: f64,
    #[serde(rename = "s", default)]
    pub start: Option<Value>,
    #[serde(rename = "e", default)]
    pub end: Option<Value>,
}

impl Keyframe {
    pub fn value(&self) -> Option<&Value> {
        self.start.as_ref().or(self.end.as_ref())
    }
}

/// A channel value normalized to its components: one for opacity and
/// rotation, two or three for position and scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Value(pub Vec<f64>);

impl Value {
    pub fn components(&self) -> &[f64] {
        &self.0
    }

    pub fn scalar(&self) -> Option<f64> {
        match self.0.as_slice() {
            [x] => Some(*x),
            _ => None,
        }
    }

    fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => n.as_f64().map(|x| Self(vec![x])),
            serde_json::Value::Array(items) => {
                let mut components = Vec::with_capacity(items.len());
                for item in items {
                    components.push(item.as_f64()?);
                }
                Some(Self(components))
            }
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Scalar(f64),
            Vector(Vec<f64>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Scalar(x) => Ok(Self(vec![x])),
            Repr::Vector(components) => Ok(Self(components)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [x] => write!(f, "{x}"),
            components => {
                f.write_str("[")?;
                for (i, c) in components.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("]")
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "p", default)]
    pub path: Option<String>,
    #[serde(rename = "u", default)]
    pub directory: Option<String>,
    #[serde(rename = "e", default)]
    pub embedded: u8,
    #[serde(rename = "w", default)]
    pub width: Option<u32>,
    #[serde(rename = "h", default)]
    pub height: Option<u32>,
}

impl Asset {
    pub fn display_id(&self, index: usize) -> String {
        self.id.clone().unwrap_or_else(|| format!("asset {index}"))
    }

    /// True when the payload is declared embedded or inlined as a data URI.
    pub fn is_embedded(&self) -> bool {
        self.embedded == 1 || self.path.as_deref().is_some_and(|p| p.starts_with("data:"))
    }

    /// Estimated decoded size in bytes of an inlined base64 payload.
    pub fn embedded_payload_bytes(&self) -> Option<u64> {
        let path = self.path.as_deref()?;
        if !path.starts_with("data:") {
            return None;
        }
        let encoded = path.split_once(',').map_or(path, |(_, tail)| tail);
        Some(encoded.len() as u64 * 3 / 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Animation {
        Animation::from_slice(json.as_bytes()).unwrap()
    }

    fn minimal(layer_ks: &str) -> String {
        format!(
            r#"{{"v":"5.7.4","fr":30,"ip":0,"op":60,"w":512,"h":512,
                "layers":[{{"nm":"logo","ks":{layer_ks}}}]}}"#
        )
    }

    #[test]
    fn static_and_animated_channels_resolve_at_parse() {
        let doc = parse(&minimal(
            r#"{"o":{"a":0,"k":100},
                "r":{"a":1,"k":[{"t":0,"s":[0]},{"t":60,"s":[360]}]}}"#,
        ));
        let ks = doc.layers[0].transform.as_ref().unwrap();
        assert!(matches!(ks.opacity, Some(Property::Static(_))));
        match ks.rotation.as_ref().unwrap() {
            Property::Animated(keys) => {
                assert_eq!(keys.len(), 2);
                assert_eq!(keys[1].value().unwrap().scalar(), Some(360.0));
            }
            other => panic!("expected animated rotation, got {other:?}"),
        }
    }

    #[test]
    fn bare_value_parses_as_static() {
        let doc = parse(&minimal(r#"{"p":[256,256]}"#));
        let ks = doc.layers[0].transform.as_ref().unwrap();
        match ks.position.as_ref().unwrap() {
            Property::Static(v) => assert_eq!(v.components(), [256.0, 256.0]),
            other => panic!("expected static position, got {other:?}"),
        }
    }

    #[test]
    fn split_position_is_skipped_not_rejected() {
        let doc = parse(&minimal(
            r#"{"p":{"s":true,"x":{"a":0,"k":10},"y":{"a":0,"k":20}}}"#,
        ));
        let ks = doc.layers[0].transform.as_ref().unwrap();
        assert!(ks.position.is_none());
    }

    #[test]
    fn keyframe_value_falls_back_to_end() {
        let kf: Keyframe = serde_json::from_str(r#"{"t":30,"e":[50]}"#).unwrap();
        assert_eq!(kf.value().unwrap().scalar(), Some(50.0));
        let bare: Keyframe = serde_json::from_str(r#"{"t":30}"#).unwrap();
        assert!(bare.value().is_none());
    }

    #[test]
    fn validate_rejects_unordered_keyframes() {
        let doc = parse(&minimal(
            r#"{"o":{"a":1,"k":[{"t":30,"s":[0]},{"t":0,"s":[100]}]}}"#,
        ));
        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));
    }

    #[test]
    fn validate_rejects_empty_keyframe_list() {
        let doc = parse(&minimal(r#"{"o":{"a":1,"k":[]}}"#));
        assert!(doc.validate().is_err());
    }

    #[test]
    fn missing_required_root_field_is_a_parse_error() {
        let err =
            Animation::from_slice(br#"{"fr":30,"ip":0,"op":60,"w":512,"h":512}"#).unwrap_err();
        assert!(err.to_string().contains("parse error"));
    }

    #[test]
    fn embedded_asset_size_estimate() {
        let asset: Asset = serde_json::from_str(
            r#"{"id":"img_0","e":1,"p":"data:image/png;base64,AAAAAAAAAAAAAAAA"}"#,
        )
        .unwrap();
        assert!(asset.is_embedded());
        // 16 base64 chars decode to ~12 bytes.
        assert_eq!(asset.embedded_payload_bytes(), Some(12));
    }

    #[test]
    fn duration_helpers() {
        let doc = parse(&minimal(r#"{}"#));
        assert_eq!(doc.duration_frames(), 60.0);
        assert_eq!(doc.duration_secs(), 2.0);
    }
}
