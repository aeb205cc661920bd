//! Dialect parser adapter.
//!
//! Wraps [`sqlparser`] so that a review input is parsed exactly once into one
//! [`SyntaxTree`] per statement. The whole text goes through a single parser,
//! so semicolons inside `BEGIN ... END` bodies (triggers, procedures) belong
//! to their enclosing statement. Positions reported by the parser (spans and
//! error messages) are absolute with respect to the input.
//!
//! # Example
//!
//! ```
//! use sql_review::{dialect::Dialect, parser::parse_statements};
//!
//! let sql = "CREATE TABLE t (a INT);\nSELECT a FROM t;";
//! let trees = parse_statements(sql, Dialect::Postgres).unwrap();
//!
//! assert_eq!(trees.len(), 2);
//! assert_eq!(trees[1].line, 2);
//! assert_eq!(trees[1].text, "SELECT a FROM t");
//! ```

use sqlparser::{
    ast::Statement,
    parser::Parser,
    tokenizer::{Location, Token}
};

use crate::{dialect::Dialect, error::ReviewError};

/// One parsed statement tagged with the dialect it was parsed for.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    /// Dialect the statement was parsed with
    pub dialect:   Dialect,
    /// Zero-based index of the statement in the input
    pub index:     usize,
    /// Statement source text, without the trailing semicolon
    pub text:      String,
    /// 1-based line the statement starts on
    pub line:      usize,
    /// Parsed statement
    pub statement: Statement
}

/// Parse SQL text into one syntax tree per statement.
///
/// # Errors
///
/// Returns [`ReviewError::Parse`] for the first statement (in input order)
/// that fails to tokenize or parse.
pub fn parse_statements(sql: &str, dialect: Dialect) -> Result<Vec<SyntaxTree>, ReviewError> {
    let parser_dialect = dialect.into_parser_dialect();
    let mut parser = Parser::new(parser_dialect.as_ref())
        .try_with_sql(sql)
        .map_err(|e| ReviewError::parse(None, e.to_string()))?;
    let lines = LineIndex::new(sql);

    let mut trees = Vec::new();
    loop {
        while parser.consume_token(&Token::SemiColon) {}
        if parser.peek_token_ref().token == Token::EOF {
            break;
        }

        let index = trees.len();
        let start = parser.peek_token_ref().span.start;
        let statement = parser
            .parse_statement()
            .map_err(|e| ReviewError::parse(Some(index), e.to_string()))?;
        let end = parser.get_current_token().span.end;

        trees.push(SyntaxTree {
            dialect,
            index,
            text: lines.slice(sql, start, end).trim().to_string(),
            line: start.line.max(1) as usize,
            statement
        });

        if parser.peek_token_ref().token != Token::EOF {
            parser
                .expect_token(&Token::SemiColon)
                .map_err(|e| ReviewError::parse(Some(index + 1), e.to_string()))?;
        }
    }
    Ok(trees)
}

/// Byte offsets of line starts, for mapping parser locations back to text.
struct LineIndex {
    starts: Vec<usize>
}

impl LineIndex {
    fn new(sql: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(sql.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            starts
        }
    }

    /// Source text between two parser locations.
    fn slice<'s>(&self, sql: &'s str, start: Location, end: Location) -> &'s str {
        let from = self.offset(sql, start);
        let to = self.offset(sql, end).max(from);
        &sql[from..to]
    }

    /// Byte offset of a 1-based line/column location.
    fn offset(&self, sql: &str, location: Location) -> usize {
        let line = (location.line.max(1) as usize - 1).min(self.starts.len() - 1);
        let line_start = self.starts[line];
        let column = location.column.max(1) as usize - 1;
        sql[line_start..]
            .char_indices()
            .nth(column)
            .map(|(i, _)| line_start + i)
            .unwrap_or(sql.len())
    }
}
