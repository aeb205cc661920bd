use serde::{Deserialize, Serialize};
use sqlparser::dialect::{MsSqlDialect, MySqlDialect, PostgreSqlDialect, SQLiteDialect};

/// Target database engine of a review.
///
/// The set is closed: every advisor is bound to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Dialect {
    #[serde(alias = "MYSQL")]
    Mysql,
    #[serde(alias = "postgresql", alias = "POSTGRES")]
    Postgres,
    #[serde(alias = "tsql", alias = "MSSQL")]
    Mssql,
    #[serde(alias = "SQLITE")]
    Sqlite
}

impl Dialect {
    pub const ALL: [Dialect; 4] = [Self::Mysql, Self::Postgres, Self::Mssql, Self::Sqlite];

    /// Convert to sqlparser dialect for parsing
    pub fn into_parser_dialect(self) -> Box<dyn sqlparser::dialect::Dialect> {
        match self {
            Self::Mysql => Box::new(MySqlDialect {}),
            Self::Postgres => Box::new(PostgreSqlDialect {}),
            Self::Mssql => Box::new(MsSqlDialect {}),
            Self::Sqlite => Box::new(SQLiteDialect {})
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Postgres => "postgres",
            Self::Mssql => "mssql",
            Self::Sqlite => "sqlite"
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(Self::Mysql),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "mssql" | "tsql" => Ok(Self::Mssql),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!("unknown dialect '{}'", other))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_str_aliases() {
        assert_eq!("PostgreSQL".parse::<Dialect>(), Ok(Dialect::Postgres));
        assert_eq!("tsql".parse::<Dialect>(), Ok(Dialect::Mssql));
        assert!("oracle".parse::<Dialect>().is_err());
    }

    #[test]
    fn test_dialect_serde_names() {
        let json = serde_json::to_string(&Dialect::Mssql).unwrap();
        assert_eq!(json, "\"mssql\"");
        let parsed: Dialect = serde_json::from_str("\"postgresql\"").unwrap();
        assert_eq!(parsed, Dialect::Postgres);
    }
}
