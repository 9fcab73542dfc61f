use std::fs;
use std::path::Path;
use std::process::{Command, Output};

/// Helper function to run laptimes with the given arguments, writing into `out_dir`
fn run_laptimes(out_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_laptimes"))
        .arg("--out-dir")
        .arg(out_dir)
        .args(args)
        .output()
        .expect("Failed to spawn laptimes")
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_end_to_end_all_reports() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_laptimes(dir.path(), &["test/cars.csv"]);
    assert!(output.status.success(), "Failed: {}", stderr(&output));

    for stem in ["top_lap_times", "fastest_by_manufacturer", "driver_frequency", "power_weight"] {
        let bytes = fs::read(dir.path().join(format!("{stem}.png")))
            .unwrap_or_else(|e| panic!("{stem}.png not written: {e}"));
        assert!(is_valid_png(&bytes), "{stem}.png is not a valid PNG");
    }
}

#[test]
fn test_end_to_end_single_report_svg() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_laptimes(
        dir.path(),
        &["test/cars.csv", "--report", "driver-frequency", "--format", "svg"],
    );
    assert!(output.status.success(), "Failed: {}", stderr(&output));

    let svg = fs::read_to_string(dir.path().join("driver_frequency.svg")).unwrap();
    assert!(svg.contains("<svg"));
    assert!(!dir.path().join("top_lap_times.svg").exists());
}

#[test]
fn test_end_to_end_schema_failure_does_not_block_other_reports() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_laptimes(dir.path(), &["test/no_power_weight.csv"]);
    assert!(!output.status.success(), "Should have failed the power-weight report");
    assert!(stderr(&output).contains("PS / KG"));

    assert!(dir.path().join("top_lap_times.png").exists());
    assert!(dir.path().join("fastest_by_manufacturer.png").exists());
    assert!(dir.path().join("driver_frequency.png").exists());
    assert!(!dir.path().join("power_weight.png").exists());
}

#[test]
fn test_end_to_end_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_laptimes(dir.path(), &["test/does_not_exist.csv"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("was not found"));
}

#[test]
fn test_end_to_end_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_laptimes(dir.path(), &["test/empty.csv", "-r", "top-lap-times"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("is empty"));
}

#[test]
fn test_end_to_end_ragged_rows() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_laptimes(dir.path(), &["test/ragged.csv", "-r", "driver-frequency"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("parsing error"));
}

#[test]
fn test_end_to_end_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("laptimes.json");
    fs::write(
        &config,
        r#"{ "input": "test/cars.csv", "reports": ["power-weight"], "top_n": 5,
             "render": { "width": 640, "height": 480, "point_color": "red" } }"#,
    )
    .unwrap();

    let output = run_laptimes(dir.path(), &["--config", config.to_str().unwrap()]);
    assert!(output.status.success(), "Failed: {}", stderr(&output));

    let bytes = fs::read(dir.path().join("power_weight.png")).unwrap();
    assert!(is_valid_png(&bytes));
}

#[test]
fn test_end_to_end_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.json");
    fs::write(&config, r#"{ "top_n": 0 }"#).unwrap();

    let output = run_laptimes(dir.path(), &["--config", config.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("top_n"));
}
