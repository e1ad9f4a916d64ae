use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rayon::prelude::*;

use lottielint::{
    Animation, Expectations, LoopReport, OptimizeOptions, OptimizeStats, Report, Severity,
    check_loop, check_structure, optimize, to_minified_string, verify,
};

#[derive(Parser, Debug)]
#[command(name = "lottielint", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that animations loop seamlessly (exit 1 on any mismatch).
    Loop(LoopArgs),
    /// Validate document structure (exit 1 on structural errors).
    Validate(ValidateArgs),
    /// Verify an animation against stated expectations (warnings only).
    Verify(VerifyArgs),
    /// Shrink a Lottie JSON file: strip metadata, round precision, minify.
    Optimize(OptimizeArgs),
}

#[derive(Parser, Debug)]
struct LoopArgs {
    /// Input Lottie JSON file(s).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Acceptable difference between first and last keyframe values.
    #[arg(long, default_value_t = 0.01)]
    tolerance: f64,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input Lottie JSON file(s).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Only print warnings and errors.
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

#[derive(Parser, Debug)]
struct VerifyArgs {
    /// Input Lottie JSON file.
    input: PathBuf,

    /// Expected number of layers.
    #[arg(long)]
    expect_layers: Option<usize>,

    /// Expect staggered (sequential) layer timing.
    #[arg(long, default_value_t = false)]
    expect_sequential: bool,

    /// Maximum document size in KiB.
    #[arg(long)]
    max_size: Option<f64>,
}

#[derive(Parser, Debug)]
struct OptimizeArgs {
    /// Input Lottie JSON file.
    input: PathBuf,

    /// Output path (defaults to overwriting the input).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Decimal places kept on float values.
    #[arg(long, default_value_t = 2)]
    decimals: u32,

    /// Keep root metadata keys.
    #[arg(long, default_value_t = false)]
    keep_metadata: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Loop(args) => cmd_loop(args),
        Command::Validate(args) => cmd_validate(args),
        Command::Verify(args) => cmd_verify(args),
        Command::Optimize(args) => cmd_optimize(args),
    }
}

fn load(path: &Path) -> anyhow::Result<(Animation, u64)> {
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    let doc = Animation::from_slice(&bytes)
        .with_context(|| format!("parse '{}'", path.display()))?;
    doc.validate()
        .with_context(|| format!("validate '{}'", path.display()))?;
    Ok((doc, bytes.len() as u64))
}

/// Run one analysis per input. Each document's check is independent, so a
/// batch fans out on the rayon pool; a single file stays on this thread.
fn run_batch<T, F>(inputs: &[PathBuf], f: F) -> Vec<(PathBuf, anyhow::Result<T>)>
where
    T: Send,
    F: Fn(&Path) -> anyhow::Result<T> + Sync,
{
    if inputs.len() > 1 {
        inputs.par_iter().map(|p| (p.clone(), f(p))).collect()
    } else {
        inputs.iter().map(|p| (p.clone(), f(p))).collect()
    }
}

fn cmd_loop(args: LoopArgs) -> anyhow::Result<ExitCode> {
    let results: Vec<(PathBuf, anyhow::Result<LoopReport>)> = run_batch(&args.inputs, |p| {
        load(p).map(|(doc, _)| check_loop(&doc, args.tolerance))
    });

    let mut all_clean = true;
    for (path, result) in results {
        match result {
            Ok(report) if report.seamless => {
                println!("{}: perfect loop, first and last keyframes match", path.display());
            }
            Ok(report) => {
                all_clean = false;
                println!("{}: loop issues detected", path.display());
                for outcome in report.mismatches() {
                    println!("  - {outcome}");
                }
            }
            Err(e) => {
                all_clean = false;
                eprintln!("{}: {e:#}", path.display());
            }
        }
    }

    if !all_clean {
        eprintln!("hint: make first and last keyframes identical for position, scale, rotation and opacity");
    }
    Ok(exit_code(all_clean))
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<ExitCode> {
    let results: Vec<(PathBuf, anyhow::Result<Report>)> = run_batch(&args.inputs, |p| {
        load(p).map(|(doc, size)| check_structure(&doc, Some(size)))
    });

    let mut all_pass = true;
    for (path, result) in results {
        match result {
            Ok(report) => {
                all_pass &= report.passes();
                print_report(&path, &report, args.quiet);
            }
            Err(e) => {
                all_pass = false;
                eprintln!("{}: {e:#}", path.display());
            }
        }
    }
    Ok(exit_code(all_pass))
}

fn cmd_verify(args: VerifyArgs) -> anyhow::Result<ExitCode> {
    let (doc, size) = load(&args.input)?;
    let expectations = Expectations {
        layer_count: args.expect_layers,
        sequential: args.expect_sequential,
        max_size_kib: args.max_size,
    };
    let report = verify(&doc, &expectations, Some(size));
    print_report(&args.input, &report, false);

    // Expectation drift is advice, not failure.
    if report.has(Severity::Warning) {
        eprintln!("review warnings above before rendering");
    } else {
        println!("animation is ready to render");
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_optimize(args: OptimizeArgs) -> anyhow::Result<ExitCode> {
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("read '{}'", args.input.display()))?;
    let mut value: serde_json::Value = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse '{}'", args.input.display()))?;

    optimize(
        &mut value,
        &OptimizeOptions {
            decimal_places: args.decimals,
            strip_metadata: !args.keep_metadata,
        },
    );
    let minified = to_minified_string(&value)?;

    let out = args.out.unwrap_or_else(|| args.input.clone());
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&out, &minified)
        .with_context(|| format!("write '{}'", out.display()))?;

    let stats = OptimizeStats {
        original_bytes: bytes.len(),
        optimized_bytes: minified.len(),
    };
    println!(
        "optimized {:.1} KiB -> {:.1} KiB ({:.1}% reduction)",
        stats.original_bytes as f64 / 1024.0,
        stats.optimized_bytes as f64 / 1024.0,
        stats.reduction_percent()
    );
    eprintln!("wrote {}", out.display());
    Ok(ExitCode::SUCCESS)
}

fn print_report(path: &Path, report: &Report, quiet: bool) {
    println!("{}:", path.display());
    for finding in report.findings() {
        if quiet && finding.severity == Severity::Info {
            continue;
        }
        println!("  {finding}");
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::from(1) }
}
