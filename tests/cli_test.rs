use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn write_input(dir: &std::path::Path) -> std::path::PathBuf {
    let input_path = dir.join("input.csv");
    fs::write(&input_path, "a,b,c\n1,-2,3\n4,5,\n7,8,9\n").unwrap();
    input_path
}

#[test]
fn test_cli_bench_all_routines() {
    let dir = tempdir().unwrap();
    let input_path = write_input(dir.path());
    let report_path = dir.path().join("report.json");

    let output = Command::new(env!("CARGO_BIN_EXE_rusty-pandas"))
        .args([
            "--quiet",
            "bench",
            "--input",
            input_path.to_str().unwrap(),
            "--all",
            "--report",
            report_path.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to run rusty-pandas");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();

    // 2 reads + 7 routines, each with a label and a timing line, per engine
    assert_eq!(lines.len(), 2 * 2 * 8);
    assert_eq!(lines[0], "POLARS: Reading CSV");
    assert!(lines[1].starts_with("POLARS: took ") && lines[1].ends_with(" second"));
    assert_eq!(lines[2], "RP: Reading CSV");
    assert_eq!(lines[4], "POLARS: Summing CSV");
    assert_eq!(lines[6], "RP: Summing CSV");

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["measurements"].as_array().unwrap().len(), 16);
    assert_eq!(report["input"]["size_bytes"], 24);
}

#[test]
fn test_cli_bench_plan_file() {
    let dir = tempdir().unwrap();
    let input_path = write_input(dir.path());
    let plan_path = dir.path().join("plan.yaml");
    let yaml = format!(
        r#"
input: "{input}"
routines: [copy]
repeat: 2
contenders: [rp]
"#,
        input = input_path.to_str().unwrap()
    );
    fs::write(&plan_path, yaml).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_rusty-pandas"))
        .args(["-q", "bench", "--plan", plan_path.to_str().unwrap()])
        .output()
        .expect("Failed to run rusty-pandas");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "RP: Reading CSV");
    assert_eq!(lines[2], "RP: Copying CSV");
    assert!(lines[3].contains("of 2 runs"));
}

#[test]
fn test_cli_show_and_reduce() {
    let dir = tempdir().unwrap();
    let input_path = write_input(dir.path());

    let show = Command::new(env!("CARGO_BIN_EXE_rusty-pandas"))
        .args(["-q", "show", input_path.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(show.status.success());
    let text = String::from_utf8(show.stdout).unwrap();
    assert!(text.contains('a') && text.contains("-2") && text.contains("NaN"));

    let reduce = Command::new(env!("CARGO_BIN_EXE_rusty-pandas"))
        .args(["-q", "reduce", input_path.to_str().unwrap(), "--op", "sum"])
        .output()
        .unwrap();
    assert!(reduce.status.success());
    let text = String::from_utf8(reduce.stdout).unwrap();
    assert!(text.contains("12"));
    assert!(text.contains("11"));

    let bad_axis = Command::new(env!("CARGO_BIN_EXE_rusty-pandas"))
        .args(["-q", "reduce", input_path.to_str().unwrap(), "--op", "max", "--axis", "2"])
        .status()
        .unwrap();
    assert!(!bad_axis.success());
}

#[test]
fn test_cli_missing_input_fails() {
    let dir = tempdir().unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_rusty-pandas"))
        .args([
            "-q",
            "bench",
            "--input",
            dir.path().join("nope.csv").to_str().unwrap(),
        ])
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn test_gen_csv_output_is_readable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("synthetic.csv");
    let status = Command::new(env!("CARGO_BIN_EXE_gen_csv"))
        .args([path.to_str().unwrap(), "50", "4"])
        .status()
        .unwrap();
    assert!(status.success());

    let df = rusty_pandas::io::read_csv(&path).unwrap();
    assert_eq!(df.shape(), (50, 4));
    assert_eq!(df.header(), &["c0", "c1", "c2", "c3"]);
    assert!(df.columns().iter().any(|c| c.has_na()));
}

#[test]
fn test_gen_csv_rejects_bad_arguments() {
    let help = Command::new(env!("CARGO_BIN_EXE_gen_csv"))
        .arg("--help")
        .output()
        .unwrap();
    assert!(help.status.success());
    assert!(String::from_utf8_lossy(&help.stdout).contains("ROWS"));

    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    let bad = Command::new(env!("CARGO_BIN_EXE_gen_csv"))
        .args([path.to_str().unwrap(), "many", "4"])
        .status()
        .unwrap();
    assert!(!bad.success());
    assert!(!path.exists());
}
