use std::fs;

use account_records::{
    AppError, Ledger, MalformedLinePolicy, Record, RecordStore, StoreConfig, StoreError, app,
};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> RecordStore {
    RecordStore::new(dir.path().join("accounts.csv"), dir.path().join("errors.log"))
}

// Runs the CLI against files in `dir` and returns what it printed.
fn run_cli(dir: &TempDir, args: &[&str]) -> Result<String, AppError> {
    let data = dir.path().join("accounts.csv");
    let errors = dir.path().join("errors.log");
    let mut argv = vec![
        "account_records".to_string(),
        "--data".to_string(),
        data.display().to_string(),
        "--errors".to_string(),
        errors.display().to_string(),
    ];
    argv.extend(args.iter().map(|a| a.to_string()));

    let mut out = Vec::<u8>::new();
    app::run(argv, &mut out)?;
    Ok(String::from_utf8(out).expect("output was not valid UTF-8"))
}

#[test]
fn loads_fixture_in_file_order() {
    let store = RecordStore::new("tests/fixtures/accounts.csv", "tests/fixtures/unused.log");
    let mut ledger = Ledger::new();

    assert_eq!(store.load(&mut ledger).unwrap(), 2);
    assert_eq!(
        ledger.accounts(),
        &[
            Record::new(7, "Bob", "Savings", 500),
            Record::new(12, "Carla", "Checking", 1200),
        ]
    );
}

#[test]
fn rewrite_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let mut ledger = Ledger::new();
    ledger.push(Record::new(1001, "Alice", "Checking", 25000));
    ledger.push(Record::new(-3, "Ben Ortiz", "Joint Savings", -120));
    ledger.push(Record::new(0, "Chloé", "Checking", 0));
    store.rewrite_all(&ledger).unwrap();

    let mut reloaded = Ledger::new();
    store.load(&mut reloaded).unwrap();
    assert_eq!(reloaded, ledger);
}

#[test]
fn appends_accumulate_in_call_order() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    for i in 0..5 {
        let rec = Record::new(i, format!("holder{i}"), "Savings", i * 100);
        store.append_record(&rec.fields()).unwrap();
    }

    let mut loaded: Vec<Record> = Vec::new();
    assert_eq!(store.load(&mut loaded).unwrap(), 5);
    let ids: Vec<i64> = loaded.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    assert_eq!(loaded[4].balance, 400);
}

#[test]
fn every_written_line_has_four_fields() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let accounts = vec![
        Record::new(1, "Ann", "Checking", 1),
        Record::new(2, "Ben", "Savings", 2),
    ];
    store.rewrite_all(&accounts).unwrap();
    store.append_record(&["3", "Cy", "Checking", "3"]).unwrap();

    let text = fs::read_to_string(store.data_path()).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(text.lines().all(|line| line.matches(',').count() == 3));
}

#[test]
fn malformed_fixture_fails_by_default() {
    let store = RecordStore::new("tests/fixtures/malformed.csv", "tests/fixtures/unused.log");
    let mut ledger = Ledger::new();

    let err = store.load(&mut ledger).unwrap_err();
    assert!(matches!(err, StoreError::Arity { line: 2, found: 2, .. }));
    assert!(ledger.is_empty());
}

#[test]
fn malformed_fixture_skips_with_log_when_configured() {
    let dir = TempDir::new().unwrap();
    let mut cfg = StoreConfig::new("tests/fixtures/malformed.csv", dir.path().join("errors.log"));
    cfg.malformed_lines = MalformedLinePolicy::SkipAndLog;
    let store = RecordStore::with_config(cfg);

    let mut ledger = Ledger::new();
    assert_eq!(store.load(&mut ledger).unwrap(), 2);
    let ids: Vec<i64> = ledger.accounts().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1001, 1004]);

    let log = fs::read_to_string(store.error_log_path()).unwrap();
    assert_eq!(log.lines().count(), 2);
    assert!(log.contains("field `balance`"));
}

#[test]
fn error_log_is_append_only() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.log_error("Insufficient funds for account 7").unwrap();
    store.log_error("Account 99 not found").unwrap();

    let log = fs::read_to_string(store.error_log_path()).unwrap();
    assert_eq!(
        log.lines().collect::<Vec<_>>(),
        vec!["Insufficient funds for account 7", "Account 99 not found"]
    );
}

#[test]
fn cli_add_then_list() {
    let dir = TempDir::new().unwrap();

    assert_eq!(run_cli(&dir, &["list"]).unwrap(), "");
    run_cli(&dir, &["add", "7", "Bob", "Savings", "500"]).unwrap();
    run_cli(&dir, &["add", "12", "Carla", "Checking", "-40"]).unwrap();

    assert_eq!(
        run_cli(&dir, &["list"]).unwrap(),
        "7,Bob,Savings,500\n12,Carla,Checking,-40\n"
    );
}

#[test]
fn cli_rejects_duplicate_ids() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, &["add", "7", "Bob", "Savings", "500"]).unwrap();

    let err = run_cli(&dir, &["add", "7", "Eve", "Checking", "1"]).unwrap_err();
    assert!(matches!(err, AppError::DuplicateAccount(7)));

    let text = fs::read_to_string(dir.path().join("accounts.csv")).unwrap();
    assert_eq!(text, "7,Bob,Savings,500\n");
}

#[test]
fn cli_remove_rewrites_remaining_accounts() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, &["add", "1", "Ann", "Checking", "10"]).unwrap();
    run_cli(&dir, &["add", "2", "Ben", "Savings", "20"]).unwrap();
    run_cli(&dir, &["add", "3", "Cy", "Checking", "30"]).unwrap();

    run_cli(&dir, &["remove", "2"]).unwrap();
    let text = fs::read_to_string(dir.path().join("accounts.csv")).unwrap();
    assert_eq!(text, "1,Ann,Checking,10\n3,Cy,Checking,30\n");

    let err = run_cli(&dir, &["remove", "2"]).unwrap_err();
    assert!(matches!(err, AppError::UnknownAccount(2)));
}

#[test]
fn cli_compact_normalises_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("accounts.csv"),
        "1,Ann,Checking, 10\r\n\r\n2,Ben,Savings,20\n",
    )
    .unwrap();

    run_cli(&dir, &["compact"]).unwrap();
    let text = fs::read_to_string(dir.path().join("accounts.csv")).unwrap();
    assert_eq!(text, "1,Ann,Checking,10\n2,Ben,Savings,20\n");
}

#[test]
fn cli_records_load_failures_in_error_log() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("accounts.csv"), "7,Bob,Savings,abc\n").unwrap();

    let err = run_cli(&dir, &["list"]).unwrap_err();
    assert!(matches!(err, AppError::Store(StoreError::Parse { line: 1, .. })));

    let log = fs::read_to_string(dir.path().join("errors.log")).unwrap();
    assert!(log.starts_with("failed to load "));
    assert!(log.contains("field `balance`"));
}

#[test]
fn cli_reads_json_config() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("bank.csv");
    fs::write(&data, "5,\"Doe, Jane\",Checking,10\n").unwrap();
    let config = dir.path().join("store.json");
    fs::write(
        &config,
        format!(
            r#"{{ "data_path": {:?}, "error_log_path": {:?}, "quoting": "necessary" }}"#,
            data.display().to_string(),
            dir.path().join("e.log").display().to_string()
        ),
    )
    .unwrap();

    let mut out = Vec::<u8>::new();
    app::run(
        ["account_records", "--config", config.to_str().unwrap(), "list"],
        &mut out,
    )
    .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "5,\"Doe, Jane\",Checking,10\n");
}

#[test]
fn cli_rejects_text_that_would_break_the_line_format() {
    let dir = TempDir::new().unwrap();
    run_cli(&dir, &["add", "1", "Ann", "Checking", "10"]).unwrap();

    let err = run_cli(&dir, &["add", "2", "Doe, Jane", "Checking", "5"]).unwrap_err();
    assert!(matches!(err, AppError::InvalidField { field: "name", .. }));

    let err = run_cli(&dir, &["add", "3", "Cy", "Check\ning", "5"]).unwrap_err();
    assert!(matches!(err, AppError::InvalidField { field: "type", .. }));

    // The file is still readable and further commands keep working.
    run_cli(&dir, &["add", "4", "Dee", "Savings", "7"]).unwrap();
    assert_eq!(
        run_cli(&dir, &["list"]).unwrap(),
        "1,Ann,Checking,10\n4,Dee,Savings,7\n"
    );
}

#[test]
fn cli_accepts_delimiter_in_names_when_quoting() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("store.json");
    fs::write(
        &config,
        format!(
            r#"{{ "data_path": {:?}, "error_log_path": {:?}, "quoting": "necessary" }}"#,
            dir.path().join("bank.csv").display().to_string(),
            dir.path().join("e.log").display().to_string()
        ),
    )
    .unwrap();
    let config = config.display().to_string();

    let mut out = Vec::<u8>::new();
    app::run(
        ["account_records", "--config", config.as_str(), "add", "5", "Doe, Jane", "Checking", "10"],
        &mut out,
    )
    .unwrap();
    app::run(["account_records", "--config", config.as_str(), "list"], &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "5,\"Doe, Jane\",Checking,10\n");
}
