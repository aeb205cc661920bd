// SPDX-FileCopyrightText: 2025 RAprogramm
// SPDX-License-Identifier: MIT

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering}
};

use sql_review::{
    advisor::{
        Advice, AdviceCode, Advisor, AdvisorRegistry, Context, Level, RegistryBuilder, Rule,
        RuleType, Status, finish_advice
    },
    catalog::Catalog,
    dialect::Dialect,
    error::{ErrorKind, ReviewError},
    review::ReviewSession
};

/// Advisor that counts its invocations.
struct Counting(Arc<AtomicUsize>);

impl Advisor for Counting {
    fn check(&self, _ctx: &Context<'_>) -> Result<Vec<Advice>, ReviewError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(finish_advice(Vec::new()))
    }
}

fn counting_registry(rule_type: &str) -> (AdvisorRegistry, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = RegistryBuilder::new()
        .register(Dialect::Sqlite, RuleType::new(rule_type), Counting(calls.clone()))
        .unwrap()
        .build();
    (registry, calls)
}

#[test]
fn test_disabled_rule_is_never_invoked() {
    let (registry, calls) = counting_registry("custom.count");
    let rules = vec![Rule::new(RuleType::new("custom.count"), Dialect::Sqlite, Level::Disabled)];

    let result = ReviewSession::new(&registry)
        .run("SELECT 1; SELECT 2; CREATE TABLE t (a INT)", Dialect::Sqlite, &rules)
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(result.advice.is_empty());
    assert_eq!(result.rules_count, 0);
    assert_eq!(result.statements_count, 3);
    assert_eq!(result.status, Status::Success);
}

#[test]
fn test_enabled_rule_runs_once_per_statement() {
    let (registry, calls) = counting_registry("custom.count");
    let rules = vec![Rule::new(RuleType::new("custom.count"), Dialect::Sqlite, Level::Warning)];

    let result = ReviewSession::new(&registry)
        .run("SELECT 1; SELECT 2", Dialect::Sqlite, &rules)
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(result.advice, vec![Advice::ok(), Advice::ok()]);
}

#[test]
fn test_varchar_threshold_reports_column_line() {
    let registry = AdvisorRegistry::builtin().unwrap();
    let rules = vec![
        Rule::new(RuleType::COLUMN_MAXIMUM_VARCHAR_LENGTH, Dialect::Mysql, Level::Warning)
            .with_payload(r#"{"number": 255}"#),
    ];

    let result = ReviewSession::new(&registry)
        .run("CREATE TABLE t (a VARCHAR(300))", Dialect::Mysql, &rules)
        .unwrap();

    assert_eq!(result.advice.len(), 1);
    assert_eq!(result.advice[0].status, Status::Warn);
    assert_eq!(result.advice[0].line, 1);
    assert_eq!(result.status, Status::Warn);
}

#[test]
fn test_nvarchar_max_exceeds_threshold() {
    let registry = AdvisorRegistry::builtin().unwrap();
    let rules = vec![
        Rule::new(RuleType::COLUMN_MAXIMUM_VARCHAR_LENGTH, Dialect::Mssql, Level::Error)
            .with_payload(r#"{"number": 4000}"#),
    ];

    let result = ReviewSession::new(&registry)
        .run("CREATE TABLE t (a NVARCHAR(MAX))", Dialect::Mssql, &rules)
        .unwrap();

    assert_eq!(result.advice.len(), 1);
    assert_eq!(result.advice[0].code, AdviceCode::VarcharLengthExceedsLimit);
    assert_eq!(result.status, Status::Error);
}

#[test]
fn test_advice_keeps_rule_order_and_worst_status_wins() {
    let registry = AdvisorRegistry::builtin().unwrap();
    let rules = vec![
        Rule::new(RuleType::COLUMN_MAXIMUM_VARCHAR_LENGTH, Dialect::Mssql, Level::Warning)
            .with_payload(r#"{"number": 255}"#),
        Rule::new(RuleType::NAMING_TABLE, Dialect::Mssql, Level::Error)
            .with_payload(r#"{"format": "^[a-z]+(_[a-z]+)*$"}"#),
    ];
    let sql = "CREATE TABLE BadName (\n id INT,\n a VARCHAR(300)\n)";

    let result = ReviewSession::new(&registry)
        .run(sql, Dialect::Mssql, &rules)
        .unwrap();

    let seen: Vec<(Status, usize)> = result.advice.iter().map(|a| (a.status, a.line)).collect();
    assert_eq!(seen, vec![(Status::Warn, 3), (Status::Error, 1)]);
    assert_eq!(result.status, Status::Error);
}

#[test]
fn test_advice_follows_statement_order() {
    let registry = AdvisorRegistry::builtin().unwrap();
    let rules = vec![
        Rule::new(RuleType::STATEMENT_SELECT_NO_SELECT_ALL, Dialect::Mysql, Level::Warning),
    ];
    let sql = "SELECT * FROM a;\nSELECT id FROM b;\nSELECT * FROM c;";

    let result = ReviewSession::new(&registry)
        .run(sql, Dialect::Mysql, &rules)
        .unwrap();

    let lines: Vec<usize> = result.advice.iter().map(|a| a.line).collect();
    assert_eq!(lines, vec![1, 0, 3]);
    assert_eq!(result.warning_count(), 2);
}

#[test]
fn test_unknown_rule_is_isolated() {
    let registry = AdvisorRegistry::builtin().unwrap();
    let rules = vec![
        Rule::new(RuleType::COLUMN_MAXIMUM_VARCHAR_LENGTH, Dialect::Sqlite, Level::Error)
            .with_payload(r#"{"number": 10}"#),
        Rule::new(RuleType::NAMING_TABLE, Dialect::Sqlite, Level::Warning)
            .with_payload(r#"{"format": "^[a-z]+$"}"#),
    ];

    let result = ReviewSession::new(&registry)
        .run("CREATE TABLE Orders (a VARCHAR(20))", Dialect::Sqlite, &rules)
        .unwrap();

    assert_eq!(result.rule_errors.len(), 1);
    let error = &result.rule_errors[0];
    assert_eq!(error.kind, ErrorKind::Configuration);
    assert_eq!(error.rule_type, RuleType::COLUMN_MAXIMUM_VARCHAR_LENGTH);
    assert_eq!(error.statement_index, 0);

    assert_eq!(result.advice.len(), 1);
    assert_eq!(result.advice[0].code, AdviceCode::NamingTableConventionMismatch);
    assert_eq!(result.status, Status::Warn);
    assert!(!result.is_complete());
}

#[test]
fn test_bad_payload_does_not_stop_sibling_rules() {
    let registry = AdvisorRegistry::builtin().unwrap();
    let rules = vec![
        Rule::new(RuleType::COLUMN_TYPE_DISALLOW_LIST, Dialect::Mysql, Level::Error)
            .with_payload("not json"),
        Rule::new(RuleType::STATEMENT_SELECT_NO_SELECT_ALL, Dialect::Mysql, Level::Error),
    ];

    let result = ReviewSession::new(&registry)
        .run("SELECT * FROM t", Dialect::Mysql, &rules)
        .unwrap();

    assert_eq!(result.rule_errors.len(), 1);
    assert_eq!(result.advice.len(), 1);
    assert_eq!(result.advice[0].status, Status::Error);
}

#[test]
fn test_rule_for_other_dialect_is_structural_error() {
    let registry = AdvisorRegistry::builtin().unwrap();
    let rules = vec![
        Rule::new(RuleType::COLUMN_MAXIMUM_VARCHAR_LENGTH, Dialect::Mysql, Level::Error)
            .with_payload(r#"{"number": 10}"#),
    ];

    let result = ReviewSession::new(&registry)
        .run("CREATE TABLE t (a VARCHAR(20))", Dialect::Postgres, &rules)
        .unwrap();

    assert_eq!(result.rule_errors[0].kind, ErrorKind::Structural);
    assert!(result.advice.is_empty());
}

#[test]
fn test_parse_failure_aborts_before_any_advisor() {
    let (registry, calls) = counting_registry("custom.count");
    let rules = vec![Rule::new(RuleType::new("custom.count"), Dialect::Sqlite, Level::Error)];

    let err = ReviewSession::new(&registry)
        .run("SELECT 1;\nCREATE TABLE (id INT);", Dialect::Sqlite, &rules)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_trigger_body_is_reviewed_as_one_statement() {
    let (registry, calls) = counting_registry("custom.count");
    let rules = vec![Rule::new(RuleType::new("custom.count"), Dialect::Sqlite, Level::Error)];
    let sql = "CREATE TABLE t (a INT);\nCREATE TRIGGER tr AFTER INSERT ON t\nBEGIN\n  UPDATE t SET a = 1;\nEND;";

    let result = ReviewSession::new(&registry)
        .run(sql, Dialect::Sqlite, &rules)
        .unwrap();

    assert_eq!(result.statements_count, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(result.status, Status::Success);
}

#[test]
fn test_alter_table_column_is_reviewed() {
    let registry = AdvisorRegistry::builtin().unwrap();
    let rules = vec![
        Rule::new(RuleType::COLUMN_MAXIMUM_VARCHAR_LENGTH, Dialect::Mysql, Level::Error)
            .with_payload(r#"{"number": 255}"#),
    ];

    let result = ReviewSession::new(&registry)
        .run(
            "CREATE TABLE t (id INT);\nALTER TABLE t ADD COLUMN a VARCHAR(300);",
            Dialect::Mysql,
            &rules
        )
        .unwrap();

    assert_eq!(result.status, Status::Error);
    let finding = &result.advice[1];
    assert_eq!(finding.code, AdviceCode::VarcharLengthExceedsLimit);
    assert_eq!(finding.line, 2);
}

#[test]
fn test_review_is_deterministic() {
    let registry = AdvisorRegistry::builtin().unwrap();
    let rules = vec![
        Rule::new(RuleType::COLUMN_TYPE_DISALLOW_LIST, Dialect::Postgres, Level::Warning)
            .with_payload(r#"{"list": ["JSON", "TEXT"]}"#),
        Rule::new(RuleType::NAMING_TABLE, Dialect::Postgres, Level::Error)
            .with_payload(r#"{"format": "^[a-z]+$", "maxLength": 4}"#),
    ];
    let sql = "CREATE TABLE orders (a JSON, b TEXT);\nCREATE TABLE t (c INT);";

    let first = ReviewSession::new(&registry)
        .run(sql, Dialect::Postgres, &rules)
        .unwrap();
    let second = ReviewSession::new(&registry)
        .run(sql, Dialect::Postgres, &rules)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.error_count(), 1);
    assert_eq!(first.warning_count(), 2);
}

#[test]
fn test_catalog_flows_into_advisors() {
    let registry = AdvisorRegistry::builtin().unwrap();
    let catalog = Catalog::parse("CREATE TABLE users (id INT)", Dialect::Mysql).unwrap();
    let rules = vec![Rule::new(RuleType::TABLE_NO_REDEFINITION, Dialect::Mysql, Level::Error)];

    let result = ReviewSession::new(&registry)
        .with_catalog(&catalog)
        .run("CREATE TABLE users (id INT);\nCREATE TABLE orders (id INT);", Dialect::Mysql, &rules)
        .unwrap();

    assert_eq!(result.advice[0].code, AdviceCode::TableExists);
    assert_eq!(result.advice[1], Advice::ok());
    assert_eq!(result.status, Status::Error);
}

#[test]
fn test_generous_deadline_completes() {
    let registry = AdvisorRegistry::builtin().unwrap();
    let result = ReviewSession::new(&registry)
        .with_deadline(std::time::Duration::from_secs(60))
        .run("SELECT 1", Dialect::Mysql, &[]);

    assert!(result.is_ok());
}
