use sql_review::{
    advisor::{Advice, Advisor, AdvisorRegistry, Context, RegistryBuilder, RuleType, mysql},
    dialect::Dialect,
    error::{ErrorKind, ReviewError}
};

struct Noop;

impl Advisor for Noop {
    fn check(&self, _ctx: &Context<'_>) -> Result<Vec<Advice>, ReviewError> {
        Ok(vec![Advice::ok()])
    }
}

#[test]
fn test_duplicate_registration_fails() {
    let err = RegistryBuilder::new()
        .register(Dialect::Mysql, RuleType::NAMING_TABLE, Noop)
        .and_then(|b| b.register(Dialect::Mysql, RuleType::NAMING_TABLE, Noop))
        .err()
        .unwrap();

    assert!(matches!(err, ReviewError::DuplicateAdvisor { .. }));
}

#[test]
fn test_same_rule_on_two_dialects_is_allowed() {
    let registry = RegistryBuilder::new()
        .register(Dialect::Mysql, RuleType::NAMING_TABLE, Noop)
        .and_then(|b| b.register(Dialect::Postgres, RuleType::NAMING_TABLE, Noop))
        .unwrap()
        .build();

    assert_eq!(registry.len(), 2);
}

#[test]
fn test_lookup_miss_is_configuration_error() {
    let registry = AdvisorRegistry::builtin().unwrap();
    let err = registry
        .lookup(Dialect::Sqlite, &RuleType::TABLE_NO_REDEFINITION)
        .err()
        .unwrap();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("table.no-redefinition"));
}

#[test]
fn test_lookup_custom_rule_type() {
    let registry = RegistryBuilder::new()
        .register(Dialect::Sqlite, RuleType::new("custom.noop"), Noop)
        .unwrap()
        .build();

    assert!(registry.lookup(Dialect::Sqlite, &RuleType::new("custom.noop")).is_ok());
    assert!(registry.lookup(Dialect::Mysql, &RuleType::new("custom.noop")).is_err());
}

#[test]
fn test_builtin_registry_contents() {
    let registry = AdvisorRegistry::builtin().unwrap();

    assert_eq!(registry.len(), 11);
    assert!(!registry.is_empty());
    assert!(
        registry
            .lookup(Dialect::Mssql, &RuleType::COLUMN_MAXIMUM_VARCHAR_LENGTH)
            .is_ok()
    );
    let mysql_rules: Vec<&str> = registry
        .keys()
        .filter(|(d, _)| *d == Dialect::Mysql)
        .map(|(_, r)| r.as_str())
        .collect();
    assert_eq!(
        mysql_rules,
        vec![
            "column.maximum-varchar-length",
            "column.type-disallow-list",
            "statement.select.no-select-all",
            "table.no-redefinition"
        ]
    );
}

#[test]
fn test_registry_is_shareable_across_threads() {
    let registry = RegistryBuilder::new()
        .register(Dialect::Mysql, RuleType::TABLE_NO_REDEFINITION, mysql::TableNoRedefinition)
        .unwrap()
        .build();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert!(
                    registry
                        .lookup(Dialect::Mysql, &RuleType::TABLE_NO_REDEFINITION)
                        .is_ok()
                );
            });
        }
    });
}
