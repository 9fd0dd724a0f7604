// Integration tests for `sbridge build` and `sbridge inspect`.
// Run with: cargo test -p settlebridge-cli --test build_cli

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

fn sbridge(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sbridge"));
    cmd.current_dir(dir);
    // Keep a developer's real mapping URL out of the tests
    cmd.env_remove("SBRIDGE_MAPPING_URL");
    cmd
}

/// Two-line settlement export (banner row, then header) plus a one-entry
/// mapping sheet. "A 1" joins against "A1"; "A2" has no mapping entry.
fn write_sources(dir: &Path) {
    std::fs::write(
        dir.join("settlement.csv"),
        "정산 요약 리포트,,,,\n\
         옵션ID,매출인식일,판매수량,정산대상액,등록상품명\n\
         A 1,2024-01-02,3,-300,위젯\n\
         A2,2024-01-02,1,50,가젯\n",
    )
    .unwrap();
    std::fs::write(
        dir.join("products.csv"),
        "옵션ID,상품코드,윈윈상품명\nA1,C1,윈 위젯\n",
    )
    .unwrap();
}

// ----- build -----

#[test]
fn build_converts_and_reports() {
    let dir = TempDir::new().unwrap();
    write_sources(dir.path());

    let output = sbridge(dir.path())
        .args(["build", "settlement.csv", "--mapping", "products.csv", "--out", "result.csv"])
        .output()
        .expect("failed to run sbridge");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("wrote result.csv: 2 rows (1 fallback) from 2 settlement lines"),
        "stderr: {}",
        stderr,
    );

    let result = std::fs::read_to_string(dir.path().join("result.csv")).unwrap();
    assert!(result.starts_with("거래일자,거래처명"));
    // Unmatched row falls back to the raw option id + registered name
    assert!(result.contains("2024-01-02,쿠팡-제트배송,A2,가젯,1,50"));
    // Matched row gets the mapped code/name and a per-unit price
    assert!(result.contains("2024-01-02,쿠팡-제트배송,C1,윈 위젯,3,100"));
}

#[test]
fn build_defaults_to_result_output_xlsx() {
    let dir = TempDir::new().unwrap();
    write_sources(dir.path());

    let output = sbridge(dir.path())
        .args(["build", "settlement.csv", "--mapping", "products.csv", "--quiet"])
        .output()
        .expect("failed to run sbridge");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    assert!(String::from_utf8_lossy(&output.stderr).trim().is_empty());

    let bytes = std::fs::read(dir.path().join("result_output.xlsx")).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}

#[test]
fn build_json_reports_the_run() {
    let dir = TempDir::new().unwrap();
    write_sources(dir.path());

    let output = sbridge(dir.path())
        .args(["build", "settlement.csv", "--mapping", "products.csv", "--json"])
        .output()
        .expect("failed to run sbridge");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let v: serde_json::Value = serde_json::from_str(&stdout).expect("stdout is not JSON");
    assert_eq!(v["meta"]["profile_name"], "coupang-jet");
    assert_eq!(v["summary"]["main_rows"], 2);
    assert_eq!(v["summary"]["matched_rows"], 1);
    assert_eq!(v["summary"]["fallback_rows"], 1);
    assert_eq!(v["summary"]["output_rows"], 2);
    assert_eq!(v["rows"][0]["code"], "A2");
    assert_eq!(v["rows"][1]["name"], "윈 위젯");
    assert_eq!(v["rows"][1]["unit_price"], 100);
}

// ----- failure exit codes -----

#[test]
fn missing_mapping_source_exits_2() {
    let dir = TempDir::new().unwrap();
    write_sources(dir.path());

    let output = sbridge(dir.path())
        .args(["build", "settlement.csv"])
        .output()
        .expect("failed to run sbridge");

    assert_eq!(
        output.status.code(),
        Some(2),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--mapping"), "stderr: {}", stderr);
    assert!(stderr.contains("SBRIDGE_MAPPING_URL"), "stderr: {}", stderr);
}

#[test]
fn missing_amount_column_exits_4() {
    let dir = TempDir::new().unwrap();
    write_sources(dir.path());
    std::fs::write(
        dir.path().join("settlement.csv"),
        "옵션ID,매출인식일,판매수량,등록상품명\nA1,2024-01-02,3,위젯\n",
    )
    .unwrap();

    let output = sbridge(dir.path())
        .args(["build", "settlement.csv", "--mapping", "products.csv"])
        .output()
        .expect("failed to run sbridge");

    assert_eq!(
        output.status.code(),
        Some(4),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no column for 'amount'"), "stderr: {}", stderr);
}

#[test]
fn numeric_garbage_exits_5_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    write_sources(dir.path());
    std::fs::write(
        dir.path().join("settlement.csv"),
        "옵션ID,매출인식일,판매수량,정산대상액,등록상품명\n\
         A1,2024-01-02,1-2-3,100,위젯\n",
    )
    .unwrap();

    let output = sbridge(dir.path())
        .args(["build", "settlement.csv", "--mapping", "products.csv"])
        .output()
        .expect("failed to run sbridge");

    assert_eq!(
        output.status.code(),
        Some(5),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot parse quantity"), "stderr: {}", stderr);
    // The run aborted, so no partial workbook may exist
    assert!(!dir.path().join("result_output.xlsx").exists());
}

#[test]
fn header_only_settlement_exits_3() {
    let dir = TempDir::new().unwrap();
    write_sources(dir.path());
    std::fs::write(
        dir.path().join("settlement.csv"),
        "옵션ID,매출인식일,판매수량,정산대상액,등록상품명\n",
    )
    .unwrap();

    let output = sbridge(dir.path())
        .args(["build", "settlement.csv", "--mapping", "products.csv"])
        .output()
        .expect("failed to run sbridge");

    assert_eq!(
        output.status.code(),
        Some(3),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no data rows"), "stderr: {}", stderr);
}

#[test]
fn unreadable_profile_exits_2() {
    let dir = TempDir::new().unwrap();
    write_sources(dir.path());

    let output = sbridge(dir.path())
        .args([
            "build", "settlement.csv",
            "--mapping", "products.csv",
            "--profile", "missing.toml",
        ])
        .output()
        .expect("failed to run sbridge");

    assert_eq!(
        output.status.code(),
        Some(2),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read profile"));
}

#[test]
fn invalid_profile_exits_2() {
    let dir = TempDir::new().unwrap();
    write_sources(dir.path());
    std::fs::write(dir.path().join("bad.toml"), "search_rows = 0\n").unwrap();

    let output = sbridge(dir.path())
        .args([
            "build", "settlement.csv",
            "--mapping", "products.csv",
            "--profile", "bad.toml",
        ])
        .output()
        .expect("failed to run sbridge");

    assert_eq!(
        output.status.code(),
        Some(2),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("search_rows"));
}

// ----- inspect -----

#[test]
fn inspect_shows_header_and_bindings() {
    let dir = TempDir::new().unwrap();
    write_sources(dir.path());

    let output = sbridge(dir.path())
        .args(["inspect", "settlement.csv"])
        .output()
        .expect("failed to run sbridge");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Role:       settlement"), "stdout: {}", stdout);
    assert!(stdout.contains("Header row: 1"), "stdout: {}", stdout);
    assert!(stdout.contains("option_id"), "stdout: {}", stdout);
    assert!(stdout.contains("\"판매수량\""), "stdout: {}", stdout);
    assert!(stdout.contains("위젯"), "stdout: {}", stdout);
}

#[test]
fn inspect_mapping_role_binds_mapping_columns() {
    let dir = TempDir::new().unwrap();
    write_sources(dir.path());

    let output = sbridge(dir.path())
        .args(["inspect", "products.csv", "--mapping-table"])
        .output()
        .expect("failed to run sbridge");

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Role:       mapping"), "stdout: {}", stdout);
    assert!(stdout.contains("\"윈윈상품명\""), "stdout: {}", stdout);
}

#[test]
fn inspect_unresolvable_source_exits_4() {
    let dir = TempDir::new().unwrap();
    write_sources(dir.path());

    // The mapping sheet inspected in the settlement role has an option id
    // column but none of the other settlement fields.
    let output = sbridge(dir.path())
        .args(["inspect", "products.csv"])
        .output()
        .expect("failed to run sbridge");

    assert_eq!(
        output.status.code(),
        Some(4),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("no column for 'date'"));
}

#[test]
fn unknown_sheet_name_exits_3() {
    let dir = TempDir::new().unwrap();

    // Any real workbook works here; the exporter produces one with "Sheet1"
    settlebridge_io::xlsx::export_result(&[], &dir.path().join("erp.xlsx")).unwrap();

    let output = sbridge(dir.path())
        .args(["inspect", "erp.xlsx", "--sheet", "정산내역"])
        .output()
        .expect("failed to run sbridge");

    assert_eq!(
        output.status.code(),
        Some(3),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr),
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No sheet named"), "stderr: {}", stderr);
    assert!(stderr.contains("정산내역"), "stderr: {}", stderr);
}
