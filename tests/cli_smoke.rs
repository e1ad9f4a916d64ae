use std::path::PathBuf;
use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lottielint"))
}

fn write_fixture(name: &str, contents: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loop_subcommand_exit_codes() {
    let clean = write_fixture("clean.json", include_str!("data/spin_clean.json"));
    let broken = write_fixture("broken.json", include_str!("data/fade_broken.json"));

    let ok = bin().arg("loop").arg(&clean).status().unwrap();
    assert!(ok.success());

    let fail = bin().arg("loop").arg(&broken).status().unwrap();
    assert_eq!(fail.code(), Some(1));

    // Batch mode: one broken input fails the whole run.
    let batch = bin().arg("loop").arg(&clean).arg(&broken).status().unwrap();
    assert_eq!(batch.code(), Some(1));
}

#[test]
fn loop_tolerance_is_adjustable() {
    let near = write_fixture(
        "near.json",
        r#"{"fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[
            {"nm":"l","ks":{"o":{"a":1,"k":[{"t":0,"s":[100]},{"t":60,"s":[100.4]}]}}}
        ]}"#,
    );

    let strict = bin()
        .arg("loop")
        .arg(&near)
        .args(["--tolerance", "0.001"])
        .status()
        .unwrap();
    assert_eq!(strict.code(), Some(1));

    let loose = bin()
        .arg("loop")
        .arg(&near)
        .args(["--tolerance", "0.5"])
        .status()
        .unwrap();
    assert!(loose.success());
}

#[test]
fn validate_subcommand_flags_empty_documents() {
    let empty = write_fixture(
        "empty.json",
        r#"{"fr":30,"ip":0,"op":60,"w":100,"h":100,"layers":[]}"#,
    );
    let status = bin().arg("validate").arg(&empty).status().unwrap();
    assert_eq!(status.code(), Some(1));

    let ok = write_fixture("ok.json", include_str!("data/spin_clean.json"));
    let status = bin().arg("validate").arg(&ok).status().unwrap();
    assert!(status.success());
}

#[test]
fn verify_subcommand_warns_but_exits_zero() {
    let path = write_fixture("verify.json", include_str!("data/fade_broken.json"));
    let status = bin()
        .arg("verify")
        .arg(&path)
        .args(["--expect-layers", "5"])
        .status()
        .unwrap();
    assert!(status.success());
}

#[test]
fn optimize_subcommand_writes_minified_output() {
    let input = write_fixture(
        "optimize_in.json",
        r#"{
            "fr": 30, "ip": 0, "op": 60, "w": 100, "h": 100,
            "meta": {"g": "editor"},
            "layers": [ {"nm": "l", "ks": {"o": {"a": 0, "k": 99.999999}}} ]
        }"#,
    );
    let out = PathBuf::from("target").join("cli_smoke").join("optimize_out.json");
    let _ = std::fs::remove_file(&out);

    let status = bin()
        .arg("optimize")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .status()
        .unwrap();
    assert!(status.success());

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(!written.contains("meta"));
    assert!(!written.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["layers"][0]["ks"]["o"]["k"], 100.0);
}

#[test]
fn missing_file_is_a_hard_error() {
    let status = bin().arg("loop").arg("does-not-exist.json").status().unwrap();
    assert!(!status.success());
}
