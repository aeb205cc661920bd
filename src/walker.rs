//! Pre-order syntax tree traversal.
//!
//! Advisors implement [`Listener`] for the node kinds they care about and
//! hand it to [`walk`]. The walk visits a parent before its children, exactly
//! once per node, and never mutates the tree.
//!
//! Column changes made by `ALTER TABLE` (`ADD`, `MODIFY`, `CHANGE`,
//! `ALTER COLUMN ... TYPE`) are reported as column definitions, so column
//! rules see them the same way as columns of `CREATE TABLE`. Subqueries
//! inside expressions, views and `UPDATE`/`DELETE` sources are walked like
//! any other query.

use serde::Serialize;
use sqlparser::{
    ast::{
        AlterColumnOperation, AlterTable, AlterTableOperation, ColumnDef, ColumnOption,
        ColumnOptionDef, CreateTable, DataType, Expr, FromTable, FunctionArg, FunctionArgExpr,
        FunctionArguments, Ident, Query, Select, SelectItem, SetExpr, Spanned, Statement,
        TableFactor, TableWithJoins, UpdateTableFromKind
    },
    tokenizer::Span
};

/// 1-based source position of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line:   usize,
    pub column: usize
}

impl Position {
    /// Position of the start of a span, `None` when the parser left it empty.
    pub fn from_span(span: Span) -> Option<Self> {
        if span.start.line == 0 {
            return None;
        }
        Some(Self {
            line:   span.start.line as usize,
            column: span.start.column as usize
        })
    }
}

/// Per-node-kind callbacks invoked by [`walk`].
///
/// Every method defaults to a no-op.
pub trait Listener {
    fn enter_statement(&mut self, _statement: &Statement) {}

    fn enter_create_table(&mut self, _create: &CreateTable, _position: Position) {}

    /// Called before the column definitions the statement adds or changes.
    fn enter_alter_table(&mut self, _alter: &AlterTable, _position: Position) {}

    fn enter_column_def(&mut self, _column: &ColumnDef, _position: Position) {}

    /// Data types carry the position of their column definition.
    fn enter_data_type(&mut self, _data_type: &DataType, _position: Position) {}

    fn enter_query(&mut self, _query: &Query) {}

    fn enter_select(&mut self, _select: &Select, _position: Position) {}

    fn enter_select_item(&mut self, _item: &SelectItem, _position: Position) {}
}

/// Walk one statement, parent before children.
///
/// `line` is the statement start line, used for nodes without a span.
pub fn walk<L: Listener + ?Sized>(listener: &mut L, statement: &Statement, line: usize) {
    let mut walker = Walker {
        listener,
        fallback: Position {
            line,
            column: 1
        }
    };
    walker.statement(statement);
}

struct Walker<'l, L: ?Sized> {
    listener: &'l mut L,
    fallback: Position
}

impl<L: Listener + ?Sized> Walker<'_, L> {
    fn position(&self, span: Span) -> Position {
        Position::from_span(span).unwrap_or(self.fallback)
    }

    fn statement(&mut self, statement: &Statement) {
        self.listener.enter_statement(statement);
        match statement {
            Statement::CreateTable(create) => self.create_table(create),
            Statement::AlterTable(alter) => self.alter_table(alter),
            Statement::CreateView(view) => self.query(&view.query),
            Statement::Query(query) => self.query(query),
            Statement::Insert(insert) => {
                if let Some(source) = &insert.source {
                    self.query(source);
                }
            }
            Statement::Update(update) => {
                self.table_with_joins(&update.table);
                if let Some(
                    UpdateTableFromKind::BeforeSet(from) | UpdateTableFromKind::AfterSet(from)
                ) = &update.from
                {
                    from.iter().for_each(|table| self.table_with_joins(table));
                }
                for assignment in &update.assignments {
                    self.expr(&assignment.value);
                }
                if let Some(selection) = &update.selection {
                    self.expr(selection);
                }
            }
            Statement::Delete(delete) => {
                let (FromTable::WithFromKeyword(from) | FromTable::WithoutKeyword(from)) =
                    &delete.from;
                from.iter().for_each(|table| self.table_with_joins(table));
                if let Some(using) = &delete.using {
                    using.iter().for_each(|table| self.table_with_joins(table));
                }
                if let Some(selection) = &delete.selection {
                    self.expr(selection);
                }
            }
            _ => {}
        }
    }

    fn create_table(&mut self, create: &CreateTable) {
        let position = self.position(create.name.span());
        self.listener.enter_create_table(create, position);
        for column in &create.columns {
            self.column_def(column);
        }
        if let Some(query) = &create.query {
            self.query(query);
        }
    }

    fn alter_table(&mut self, alter: &AlterTable) {
        let position = self.position(alter.name.span());
        self.listener.enter_alter_table(alter, position);
        for operation in &alter.operations {
            match operation {
                AlterTableOperation::AddColumn {
                    column_def,
                    ..
                } => self.column_def(column_def),
                AlterTableOperation::ModifyColumn {
                    col_name: name,
                    data_type,
                    options,
                    ..
                }
                | AlterTableOperation::ChangeColumn {
                    new_name: name,
                    data_type,
                    options,
                    ..
                } => self.column_def(&changed_column(name, data_type, options)),
                AlterTableOperation::AlterColumn {
                    column_name,
                    op: AlterColumnOperation::SetDataType {
                        data_type,
                        ..
                    }
                } => self.column_def(&changed_column(column_name, data_type, &[])),
                _ => {}
            }
        }
    }

    fn column_def(&mut self, column: &ColumnDef) {
        let position = self.position(column.name.span);
        self.listener.enter_column_def(column, position);
        self.listener.enter_data_type(&column.data_type, position);
    }

    fn query(&mut self, query: &Query) {
        self.listener.enter_query(query);
        if let Some(with) = &query.with {
            for cte in &with.cte_tables {
                self.query(&cte.query);
            }
        }
        self.set_expr(&query.body);
    }

    fn set_expr(&mut self, expr: &SetExpr) {
        match expr {
            SetExpr::Select(select) => self.select(select),
            SetExpr::Query(query) => self.query(query),
            SetExpr::SetOperation {
                left,
                right,
                ..
            } => {
                self.set_expr(left);
                self.set_expr(right);
            }
            _ => {}
        }
    }

    fn select(&mut self, select: &Select) {
        let position = self.position(select.span());
        self.listener.enter_select(select, position);
        for item in &select.projection {
            let position = self.position(item.span());
            self.listener.enter_select_item(item, position);
            if let SelectItem::UnnamedExpr(expr)
            | SelectItem::ExprWithAlias {
                expr,
                ..
            } = item
            {
                self.expr(expr);
            }
        }
        for table in &select.from {
            self.table_with_joins(table);
        }
        if let Some(selection) = &select.selection {
            self.expr(selection);
        }
        if let Some(having) = &select.having {
            self.expr(having);
        }
    }

    fn table_with_joins(&mut self, table: &TableWithJoins) {
        self.table_factor(&table.relation);
        for join in &table.joins {
            self.table_factor(&join.relation);
        }
    }

    fn table_factor(&mut self, factor: &TableFactor) {
        match factor {
            TableFactor::Derived {
                subquery,
                ..
            } => self.query(subquery),
            TableFactor::NestedJoin {
                table_with_joins,
                ..
            } => self.table_with_joins(table_with_joins),
            _ => {}
        }
    }

    /// Descend into the subqueries of an expression.
    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Subquery(query)
            | Expr::Exists {
                subquery: query,
                ..
            } => self.query(query),
            Expr::InSubquery {
                expr,
                subquery,
                ..
            } => {
                self.expr(expr);
                self.query(subquery);
            }
            Expr::BinaryOp {
                left,
                right,
                ..
            }
            | Expr::AnyOp {
                left,
                right,
                ..
            }
            | Expr::AllOp {
                left,
                right,
                ..
            }
            | Expr::IsDistinctFrom(left, right)
            | Expr::IsNotDistinctFrom(left, right)
            | Expr::Like {
                expr: left,
                pattern: right,
                ..
            }
            | Expr::ILike {
                expr: left,
                pattern: right,
                ..
            } => {
                self.expr(left);
                self.expr(right);
            }
            Expr::UnaryOp {
                expr, ..
            }
            | Expr::Cast {
                expr, ..
            }
            | Expr::Nested(expr)
            | Expr::IsNull(expr)
            | Expr::IsNotNull(expr)
            | Expr::IsTrue(expr)
            | Expr::IsNotTrue(expr)
            | Expr::IsFalse(expr)
            | Expr::IsNotFalse(expr) => self.expr(expr),
            Expr::InList {
                expr,
                list,
                ..
            } => {
                self.expr(expr);
                list.iter().for_each(|item| self.expr(item));
            }
            Expr::Between {
                expr,
                low,
                high,
                ..
            } => {
                self.expr(expr);
                self.expr(low);
                self.expr(high);
            }
            Expr::Case {
                operand,
                conditions,
                else_result,
                ..
            } => {
                if let Some(operand) = operand {
                    self.expr(operand);
                }
                for when in conditions {
                    self.expr(&when.condition);
                    self.expr(&when.result);
                }
                if let Some(else_result) = else_result {
                    self.expr(else_result);
                }
            }
            Expr::Tuple(items) => items.iter().for_each(|item| self.expr(item)),
            Expr::Function(function) => self.function_args(&function.args),
            _ => {}
        }
    }

    fn function_args(&mut self, args: &FunctionArguments) {
        match args {
            FunctionArguments::Subquery(query) => self.query(query),
            FunctionArguments::List(list) => {
                for arg in &list.args {
                    let (FunctionArg::Named {
                        arg, ..
                    }
                    | FunctionArg::ExprNamed {
                        arg, ..
                    }
                    | FunctionArg::Unnamed(arg)) = arg;
                    if let FunctionArgExpr::Expr(expr) = arg {
                        self.expr(expr);
                    }
                }
            }
            FunctionArguments::None => {}
        }
    }
}

/// Column definition for a column an `ALTER TABLE` changes in place.
fn changed_column(name: &Ident, data_type: &DataType, options: &[ColumnOption]) -> ColumnDef {
    ColumnDef {
        name:      name.clone(),
        data_type: data_type.clone(),
        options:   options
            .iter()
            .map(|option| ColumnOptionDef {
                name:   None,
                option: option.clone()
            })
            .collect()
    }
}
