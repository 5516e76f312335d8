//! End-to-end tests for the `rattlec` binary: write a source file, invoke
//! the compiled binary, and assert on its exit status and diagnostics.

use std::process::Command;

fn rattlec() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rattlec"))
}

#[test]
fn clean_program_exits_zero_with_no_diagnostics() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("ok.rat");
    std::fs::write(&path, "x = 1 + 2\n").expect("failed to write source file");

    let output = rattlec().arg(&path).output().expect("failed to invoke rattlec");

    assert!(
        output.status.success(),
        "expected success, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output.stderr.is_empty());
}

#[test]
fn unassignable_target_exits_nonzero_with_a_diagnostic() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("bad.rat");
    std::fs::write(&path, "1 + 2 = x\n").expect("failed to write source file");

    let output = rattlec().arg(&path).output().expect("failed to invoke rattlec");

    assert!(!output.status.success());
    assert!(!output.stderr.is_empty());
}

#[test]
fn missing_file_exits_nonzero() {
    let output = rattlec()
        .arg("/nonexistent/path/does-not-exist.rat")
        .output()
        .expect("failed to invoke rattlec");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not read"));
}

#[test]
fn dump_ast_prints_the_assignment_statement() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("ok.rat");
    std::fs::write(&path, "x = 1\n").expect("failed to write source file");

    let output = rattlec()
        .arg("--dump-ast")
        .arg(&path)
        .output()
        .expect("failed to invoke rattlec");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Assignment"));
}
