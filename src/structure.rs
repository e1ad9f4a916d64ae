use crate::model::Animation;
use crate::report::Report;

/// Frame-rate band outside which renderers struggle or motion stutters.
const MIN_FRAME_RATE: f64 = 15.0;
const MAX_FRAME_RATE: f64 = 120.0;

const MIN_DURATION_SECS: f64 = 1.0;
const MAX_DURATION_SECS: f64 = 10.0;

const MIN_DIMENSION: u32 = 100;
const MAX_DIMENSION: u32 = 2048;

const MAX_LAYERS: usize = 50;

/// Embedded payloads above this decoded size are known to upset
/// raster backends; above the hard limit they almost always do.
const EMBEDDED_WARN_BYTES: u64 = 100 * 1024;
const EMBEDDED_HARD_BYTES: u64 = 500 * 1024;

pub const MAX_DOCUMENT_BYTES: u64 = 500 * 1024;

/// Structural sanity pass over a parsed document.
///
/// `byte_size` is the serialized document size when the caller knows it
/// (read from disk); `None` skips the size advice. Missing required root
/// fields never reach this pass — they fail at parse.
#[tracing::instrument(skip(doc))]
pub fn check_structure(doc: &Animation, byte_size: Option<u64>) -> Report {
    let mut report = Report::default();

    if let Some(v) = &doc.version {
        report.info(format!("lottie version {v}"));
    }

    check_frame_rate(doc, &mut report);
    check_duration(doc, &mut report);
    check_dimensions(doc, &mut report);
    check_layers(doc, &mut report);
    check_assets(doc, &mut report);

    if let Some(bytes) = byte_size {
        let kib = bytes as f64 / 1024.0;
        if bytes > MAX_DOCUMENT_BYTES {
            report.warning(format!(
                "large document ({kib:.1} KiB), consider optimizing"
            ));
        } else {
            report.info(format!("document size {kib:.1} KiB"));
        }
    }

    report
}

fn check_frame_rate(doc: &Animation, report: &mut Report) {
    let fps = doc.frame_rate;
    if fps <= 0.0 {
        report.error(format!("frame rate must be positive (got {fps})"));
    } else if fps < MIN_FRAME_RATE {
        report.warning(format!(
            "low frame rate ({fps} fps), consider 24-60 fps for smoother motion"
        ));
    } else if fps > MAX_FRAME_RATE {
        report.warning(format!(
            "very high frame rate ({fps} fps) may cause playback performance issues"
        ));
    } else {
        report.info(format!("frame rate {fps} fps"));
    }
}

fn check_duration(doc: &Animation, report: &mut Report) {
    if doc.out_point <= doc.in_point {
        report.error(format!(
            "out point must be after in point (ip {}, op {})",
            doc.in_point, doc.out_point
        ));
        return;
    }
    if doc.frame_rate <= 0.0 {
        return;
    }
    let secs = doc.duration_secs();
    if secs < MIN_DURATION_SECS {
        report.warning(format!("very short animation ({secs:.1} s)"));
    } else if secs > MAX_DURATION_SECS {
        report.warning(format!(
            "long animation ({secs:.1} s) may increase file size"
        ));
    } else {
        report.info(format!(
            "duration {secs:.1} s ({} frames)",
            doc.duration_frames()
        ));
    }
}

fn check_dimensions(doc: &Animation, report: &mut Report) {
    let (w, h) = (doc.width, doc.height);
    if w == 0 || h == 0 {
        report.error(format!("dimensions must be non-zero (got {w}x{h})"));
    } else if w < MIN_DIMENSION || h < MIN_DIMENSION {
        report.warning(format!("small dimensions ({w}x{h})"));
    } else if w > MAX_DIMENSION || h > MAX_DIMENSION {
        report.warning(format!(
            "large dimensions ({w}x{h}) may affect playback performance"
        ));
    } else {
        report.info(format!("dimensions {w}x{h}"));
    }
}

fn check_layers(doc: &Animation, report: &mut Report) {
    let n = doc.layers.len();
    if n == 0 {
        report.error("no layers, the animation would be empty");
    } else if n > MAX_LAYERS {
        report.warning(format!("many layers ({n}) may impact performance"));
    } else {
        report.info(format!("{n} layer(s)"));
    }
}

fn check_assets(doc: &Animation, report: &mut Report) {
    if doc.assets.is_empty() {
        return;
    }
    report.info(format!("{} asset(s)", doc.assets.len()));

    for (i, asset) in doc.assets.iter().enumerate() {
        let id = asset.display_id(i);
        if let Some(bytes) = asset.embedded_payload_bytes() {
            let kib = bytes as f64 / 1024.0;
            let dims = match (asset.width, asset.height) {
                (Some(w), Some(h)) => format!("{w}x{h}"),
                _ => "?x?".to_owned(),
            };
            if bytes > EMBEDDED_HARD_BYTES {
                report.warning(format!(
                    "asset '{id}' ({dims}): very large embedded image (~{kib:.1} KiB), \
                     use an external reference or optimize the source image"
                ));
            } else if bytes > EMBEDDED_WARN_BYTES {
                report.warning(format!(
                    "asset '{id}' ({dims}): large embedded image (~{kib:.1} KiB) \
                     may upset raster backends"
                ));
            } else {
                report.info(format!("asset '{id}': ~{kib:.1} KiB embedded"));
            }
        } else if let Some(path) = &asset.path
            && !asset.is_embedded()
        {
            report.warning(format!(
                "external asset '{id}': {path} must exist at render time"
            ));
        }
    }
}
