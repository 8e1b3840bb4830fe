use std::process::Command;

fn run(fixture: &str) -> (String, String, bool) {
    let path = format!("tests/fixtures/{fixture}");
    let output = Command::new(env!("CARGO_BIN_EXE_split-pay"))
        .arg(&path)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn valid_checkouts() {
    let (stdout, stderr, success) = run("valid.csv");

    assert!(success);
    assert!(stderr.is_empty());

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "sale,total,cash,credit_card,debit_card,pix,digital_wallet,change",
            "1,100.00,60.00,40.00,0.00,0.00,0.00,10.00",
            "2,50.00,0.00,0.00,0.00,30.00,20.00,0.00",
            "total,150.00,60.00,40.00,0.00,30.00,20.00,10.00",
        ]
    );
}

#[test]
fn errors_warn_but_do_not_block() {
    let (stdout, stderr, success) = run("with_errors.csv");

    assert!(success);
    assert!(stderr.contains("unrecognized event type"));
    assert!(stderr.contains("missing amount"));
    assert!(stderr.contains("sale left open"));

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "sale,total,cash,credit_card,debit_card,pix,digital_wallet,change",
            "1,30.00,20.00,0.00,0.00,10.00,0.00,0.00",
            "total,30.00,20.00,0.00,0.00,10.00,0.00,0.00",
        ]
    );
}

#[test]
fn missing_argument_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_split-pay"))
        .output()
        .expect("failed to run binary");

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_file_fails() {
    let (stdout, stderr, success) = run("does_not_exist.csv");

    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("failed to open"));
}
