use std::process::{Command, Output};

fn hexmage(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hexmage"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run the hexmage binary")
}

#[test]
fn same_seed_prints_the_same_summary() {
    let args = ["--seed", "17", "--size", "9", "--max-rounds", "30"];
    let first = hexmage(&args);
    let second = hexmage(&args);

    assert!(first.status.success());
    assert!(!first.stdout.is_empty());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn json_summary_is_machine_readable() {
    let output = hexmage(&["--seed", "5", "--size", "8", "--json"]);
    assert!(output.status.success());

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout holds JSON");
    assert_eq!(summary["seed"], 5);
    assert_eq!(summary["size"], 8);
    assert!(summary["survivors"].is_array());
}

#[test]
fn impossible_battles_exit_with_an_error() {
    let output = hexmage(&["--teams", "1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("two teams"));
}
