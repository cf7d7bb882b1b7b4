use assert_cmd::Command;

#[test]
fn extract_entities_help_runs() {
    let mut cmd = Command::cargo_bin("extract-entities").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn zero_shot_help_runs() {
    let mut cmd = Command::cargo_bin("zero-shot").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn zero_shot_rejects_arguments() {
    let mut cmd = Command::cargo_bin("zero-shot").expect("binary exists");
    cmd.arg("texto").assert().failure();
}

#[cfg(not(feature = "onnx"))]
#[test]
fn zero_shot_without_onnx_reports_model_load_failure() {
    let mut cmd = Command::cargo_bin("zero-shot").expect("binary exists");
    let output = cmd
        .env_remove("RUST_LOG")
        .assert()
        .failure()
        .get_output()
        .clone();
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("onnx"), "stderr was: {stderr}");
}

#[test]
fn zero_shot_rejects_template_without_placeholder() {
    let mut cmd = Command::cargo_bin("zero-shot").expect("binary exists");
    let output = cmd
        .env("ZERO_SHOT_HYPOTHESIS_TEMPLATE", "Este texto trata de")
        .env_remove("RUST_LOG")
        .assert()
        .failure()
        .get_output()
        .clone();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("placeholder"), "stderr was: {stderr}");
}
