use std::process::{Command, Output};

fn hubzip(args: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    Command::new(env!("CARGO_BIN_EXE_hubzip"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn malformed_specifier_exits_with_one_error_line() {
    let output = hubzip(&["alice/demo", "bogus"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert_eq!(stderr.lines().count(), 1, "{stderr}");
    assert_eq!(
        stderr,
        "hubzip: error: invalid repository 'bogus': expected owner/repo\n"
    );
}

#[test]
fn missing_repositories_exit_with_one() {
    let output = hubzip(&["--keep"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}

#[test]
fn unknown_flag_exits_with_one() {
    let output = hubzip(&["--bogus", "alice/demo"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn help_exits_successfully() {
    let output = hubzip(&["--help"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--keep"));
}
