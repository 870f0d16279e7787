use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "dicebox-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn read_json(path: &std::path::Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).expect("read output");
    serde_json::from_str(&content).expect("parse json report")
}

#[test]
fn cli_writes_json_report() {
    let exe = env!("CARGO_BIN_EXE_dicebox-tester");
    let output_path = temp_path("json");
    let status = Command::new(exe)
        .args([
            "--days",
            "25",
            "--rolls-per-day",
            "2",
            "--seed",
            "7",
            "--start-date",
            "2025-03-01",
            "--auto-claim",
            "--report",
            "json",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());

    let value = read_json(&output_path);
    assert_eq!(value["passed"], serde_json::Value::Bool(true));
    assert_eq!(value["report"]["records"].as_array().map(Vec::len), Some(25));
    assert_eq!(value["report"]["records"][0]["date"], "2025-03-01");
    let _ = std::fs::remove_file(output_path);
}

#[test]
fn cli_text_report_mentions_summary() {
    let exe = env!("CARGO_BIN_EXE_dicebox-tester");
    let output_path = temp_path("text");
    let status = Command::new(exe)
        .args(["--days", "3", "--start-date", "2025-03-01", "--verbose", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(&output_path).expect("read output");
    assert!(content.contains("Streak Simulation Summary"));
    assert!(content.contains("2025-03-03"));
    let _ = std::fs::remove_file(output_path);
}

#[test]
fn cli_store_carries_streak_between_runs() {
    let exe = env!("CARGO_BIN_EXE_dicebox-tester");
    let store_path = temp_path("store");
    let first_out = temp_path("first");
    let second_out = temp_path("second");

    let run = |start: &str, out: &std::path::Path| {
        Command::new(exe)
            .args([
                "--days",
                "10",
                "--seed",
                "3",
                "--start-date",
                start,
                "--report",
                "json",
                "--store",
            ])
            .arg(&store_path)
            .arg("--output")
            .arg(out)
            .status()
            .expect("run cli")
    };

    assert!(run("2025-06-01", &first_out).success());
    assert!(store_path.exists());
    let first = read_json(&first_out);

    assert!(run("2025-06-11", &second_out).success());
    let second = read_json(&second_out);
    assert_eq!(
        second["report"]["initial_streak"],
        first["report"]["final_streak"]
    );

    for path in [store_path, first_out, second_out] {
        let _ = std::fs::remove_file(path);
    }
}

#[test]
fn cli_rejects_malformed_start_date() {
    let exe = env!("CARGO_BIN_EXE_dicebox-tester");
    let output = Command::new(exe)
        .args(["--start-date", "03/01/2025"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("YYYY-MM-DD"));
}
