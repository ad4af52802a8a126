//! Token emission: flattening a node tree into an ordered display-token
//! stream for the formatter.
//!
//! Every node emits its own leading keyword (if any) and then delegates to
//! its children in source order, threading an opaque [`NodeId`] so the
//! formatter can make indentation decisions from logical nesting rather
//! than physical call depth. The ids are plain counters issued during
//! emission; there are no back-pointers and no reference cycles.
//!
//! Two walks are load-bearing for stack safety and therefore explicit
//! loops: compound-select branches (`UNION ALL` chains) and operator-chain
//! links. A 50,000-branch compound emits from a work stack, not from
//! 50,000 nested calls.

use crate::dialect::Dialect;
use crate::keywords;
use crate::{
    AlterAction, AlterTableQuery, Assignment, AssignmentTarget, CaseExpr, ChainOp,
    ColumnConstraint, ColumnDef, ColumnRef, CommonTable, CreateIndexQuery, CreateTableQuery,
    DeleteQuery, Expr,
    ExprChain, FrameBound, FrameSpec, FromClause, FunctionArgs, FunctionCall, InSet, InsertQuery,
    InsertSource, JoinKind, LimitClause, Literal, MergeAction, MergeQuery, NullsOrder,
    OrderingTerm, OverClause, Parameter, QualifiedName, Relation, SelectItem, SelectQuery,
    SetOp, SortDirection, Statement, TableConstraint, TableConstraintKind, TableRef, TableSource,
    TypeName, UnaryOp, UpdateQuery, ValuesQuery, WindowDef, WindowSpec, WithClause,
};

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Opaque handle identifying the node that emitted a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The root parent handed to a top-level emission.
    pub const ROOT: Self = Self(0);
}

/// One display token: text, reservedness, and the emitting node plus its
/// logical parent. The references are used only for layout decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayToken {
    pub text: String,
    pub reserved: bool,
    pub owner: NodeId,
    pub parent: NodeId,
}

/// Collects display tokens during an emission walk and issues node ids.
#[derive(Debug)]
pub struct TokenSink {
    dialect: Dialect,
    tokens: Vec<DisplayToken>,
    next: u32,
}

impl TokenSink {
    #[must_use]
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            tokens: Vec::new(),
            next: 1,
        }
    }

    /// The dialect tokens are being rendered for.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Issue a fresh node id.
    pub fn node(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Emit a reserved keyword token (already uppercase).
    pub fn keyword(&mut self, text: &str, owner: NodeId, parent: NodeId) {
        self.tokens.push(DisplayToken {
            text: text.to_owned(),
            reserved: true,
            owner,
            parent,
        });
    }

    /// Emit a non-reserved token verbatim (operators, punctuation,
    /// literals, function names).
    pub fn word(&mut self, text: impl Into<String>, owner: NodeId, parent: NodeId) {
        self.tokens.push(DisplayToken {
            text: text.into(),
            reserved: false,
            owner,
            parent,
        });
    }

    /// Emit an identifier, quoting it per the dialect when it needs it.
    pub fn ident(&mut self, name: &str, owner: NodeId, parent: NodeId) {
        let text = if needs_quoting(name) {
            let open = self.dialect.quote.open();
            let close = self.dialect.quote.close();
            let mut quoted = String::with_capacity(name.len() + 2);
            quoted.push(open);
            for ch in name.chars() {
                quoted.push(ch);
                if ch == close {
                    quoted.push(close);
                }
            }
            quoted.push(close);
            quoted
        } else {
            name.to_owned()
        };
        self.word(text, owner, parent);
    }

    /// Emit a bind-parameter token using the dialect marker.
    pub fn bind(&mut self, name: &str, owner: NodeId, parent: NodeId) {
        let mut text = String::with_capacity(name.len() + 1);
        text.push(self.dialect.bind.char());
        text.push_str(name);
        self.word(text, owner, parent);
    }

    /// Consume the sink, returning the token stream.
    #[must_use]
    pub fn finish(self) -> Vec<DisplayToken> {
        self.tokens
    }
}

/// An identifier needs quoting when it is empty, does not look like a bare
/// word, or collides with a reserved word.
fn needs_quoting(name: &str) -> bool {
    if name.is_empty() {
        return true;
    }
    let first = name.as_bytes()[0];
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return true;
    }
    if name
        .bytes()
        .any(|b| !(b.is_ascii_alphanumeric() || b == b'_'))
    {
        return true;
    }
    keywords::is_reserved(name)
}

// ---------------------------------------------------------------------------
// Statement entry point
// ---------------------------------------------------------------------------

impl Statement {
    /// Flatten this statement into a display-token stream.
    #[must_use]
    pub fn tokens(&self, dialect: &Dialect) -> Vec<DisplayToken> {
        let mut sink = TokenSink::new(*dialect);
        self.emit(&mut sink, NodeId::ROOT);
        sink.finish()
    }

    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        match self {
            Self::Select(q) => q.emit(sink, parent),
            Self::Insert(q) => q.emit(sink, parent),
            Self::Update(q) => q.emit(sink, parent),
            Self::Delete(q) => q.emit(sink, parent),
            Self::Merge(q) => q.emit(sink, parent),
            Self::CreateTable(q) => q.emit(sink, parent),
            Self::AlterTable(q) => q.emit(sink, parent),
            Self::CreateIndex(q) => q.emit(sink, parent),
            Self::Values(q) => q.emit(sink, parent),
        }
    }
}

// ---------------------------------------------------------------------------
// SELECT
// ---------------------------------------------------------------------------

impl SelectQuery {
    /// Emit the full statement including the CTE wrapper, compound
    /// branches, and trailing ORDER BY / LIMIT.
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        if let Some(ref with) = self.with {
            with.emit(sink, me);
        }

        // Compound branches walk from an explicit stack; branches are
        // pushed in reverse so they pop in source order.
        let mut stack: Vec<(Option<SetOp>, &Self)> = vec![(None, self)];
        while let Some((op, query)) = stack.pop() {
            if let Some(op) = op {
                sink.keyword(op.sql(), me, parent);
            }
            query.emit_core(sink, me);
            for (branch_op, branch) in query.compounds.iter().rev() {
                stack.push((Some(*branch_op), branch));
            }
        }

        emit_order_by(&self.order_by, sink, me, parent);
        if let Some(ref limit) = self.limit {
            limit.emit(sink, me);
        }
    }

    /// Emit one select core: columns through WINDOW, no compounds and no
    /// trailing ORDER BY / LIMIT.
    fn emit_core(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        if self.distinct {
            sink.keyword("SELECT DISTINCT", me, parent);
        } else {
            sink.keyword("SELECT", me, parent);
        }
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                sink.word(",", me, parent);
            }
            item.emit(sink, me);
        }
        if let Some(ref from) = self.from {
            from.emit(sink, me, "FROM");
        }
        if let Some(ref cond) = self.where_clause {
            sink.keyword("WHERE", me, parent);
            cond.emit(sink, me);
        }
        if !self.group_by.is_empty() {
            sink.keyword("GROUP BY", me, parent);
            for (i, chain) in self.group_by.iter().enumerate() {
                if i > 0 {
                    sink.word(",", me, parent);
                }
                chain.emit(sink, me);
            }
        }
        if let Some(ref cond) = self.having {
            sink.keyword("HAVING", me, parent);
            cond.emit(sink, me);
        }
        if !self.windows.is_empty() {
            sink.keyword("WINDOW", me, parent);
            for (i, def) in self.windows.iter().enumerate() {
                if i > 0 {
                    sink.word(",", me, parent);
                }
                def.emit(sink, me);
            }
        }
    }
}

fn emit_order_by(terms: &[OrderingTerm], sink: &mut TokenSink, owner: NodeId, parent: NodeId) {
    if terms.is_empty() {
        return;
    }
    sink.keyword("ORDER BY", owner, parent);
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            sink.word(",", owner, parent);
        }
        term.emit(sink, owner);
    }
}

impl SelectItem {
    fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        self.chain.emit(sink, me);
        if let Some(alias) = self.effective_alias() {
            sink.keyword("AS", me, parent);
            sink.ident(alias, me, parent);
        }
    }
}

impl OrderingTerm {
    fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        self.chain.emit(sink, me);
        match self.direction {
            Some(SortDirection::Asc) => sink.keyword("ASC", me, parent),
            Some(SortDirection::Desc) => sink.keyword("DESC", me, parent),
            None => {}
        }
        match self.nulls {
            Some(NullsOrder::First) => sink.keyword("NULLS FIRST", me, parent),
            Some(NullsOrder::Last) => sink.keyword("NULLS LAST", me, parent),
            None => {}
        }
    }
}

impl LimitClause {
    fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        sink.keyword("LIMIT", me, parent);
        self.limit.emit(sink, me);
        if let Some(ref offset) = self.offset {
            sink.keyword("OFFSET", me, parent);
            offset.emit(sink, me);
        }
    }
}

// ---------------------------------------------------------------------------
// FROM / relations
// ---------------------------------------------------------------------------

impl FromClause {
    /// Emit the relation list under the given leading keyword (`FROM` for
    /// selects, `USING` for deletes, `FROM` again for `UPDATE … FROM`).
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId, leading: &str) {
        let me = sink.node();
        sink.keyword(leading, me, parent);
        for relation in &self.relations {
            relation.emit(sink, me);
        }
    }
}

impl Relation {
    fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        match self.join {
            JoinKind::From => {}
            JoinKind::Comma => sink.word(",", me, parent),
            kind => sink.keyword(kind.sql(), me, parent),
        }
        self.table.emit(sink, me);
        if let Some(ref on) = self.on {
            sink.keyword("ON", me, parent);
            on.emit(sink, me);
        }
    }
}

impl TableRef {
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        match &self.source {
            TableSource::Physical(name) => name.emit(sink, me, parent),
            TableSource::Query(stmt) => {
                sink.word("(", me, parent);
                stmt.emit(sink, me);
                sink.word(")", me, parent);
            }
            TableSource::Function(call) => call.emit(sink, me),
        }
        if let Some(alias) = self.effective_alias() {
            sink.keyword("AS", me, parent);
            sink.ident(alias, me, parent);
        }
    }
}

impl QualifiedName {
    pub(crate) fn emit(&self, sink: &mut TokenSink, owner: NodeId, parent: NodeId) {
        if let Some(ref schema) = self.schema {
            sink.ident(schema, owner, parent);
            sink.word(".", owner, parent);
        }
        sink.ident(&self.name, owner, parent);
    }
}

// ---------------------------------------------------------------------------
// WITH
// ---------------------------------------------------------------------------

impl WithClause {
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        if self.recursive {
            sink.keyword("WITH RECURSIVE", me, parent);
        } else {
            sink.keyword("WITH", me, parent);
        }
        for (i, table) in self.tables.iter().enumerate() {
            if i > 0 {
                sink.word(",", me, parent);
            }
            table.emit(sink, me);
        }
    }
}

impl CommonTable {
    fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        sink.ident(&self.name, me, parent);
        if !self.columns.is_empty() {
            sink.word("(", me, parent);
            for (i, col) in self.columns.iter().enumerate() {
                if i > 0 {
                    sink.word(",", me, parent);
                }
                sink.ident(col, me, parent);
            }
            sink.word(")", me, parent);
        }
        sink.keyword("AS", me, parent);
        match self.materialized {
            Some(true) => sink.keyword("MATERIALIZED", me, parent),
            Some(false) => sink.keyword("NOT MATERIALIZED", me, parent),
            None => {}
        }
        sink.word("(", me, parent);
        self.query.emit(sink, me);
        sink.word(")", me, parent);
    }
}

// ---------------------------------------------------------------------------
// VALUES
// ---------------------------------------------------------------------------

impl ValuesQuery {
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        sink.keyword("VALUES", me, parent);
        // Row walk is a plain loop; 50,001 rows never deepen the stack.
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                sink.word(",", me, parent);
            }
            sink.word("(", me, parent);
            for (j, cell) in row.iter().enumerate() {
                if j > 0 {
                    sink.word(",", me, parent);
                }
                cell.emit(sink, me);
            }
            sink.word(")", me, parent);
        }
    }
}

// ---------------------------------------------------------------------------
// INSERT / UPDATE / DELETE
// ---------------------------------------------------------------------------

impl InsertQuery {
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        sink.keyword("INSERT INTO", me, parent);
        self.table.emit(sink, me, parent);
        if let Some(ref alias) = self.alias {
            sink.keyword("AS", me, parent);
            sink.ident(alias, me, parent);
        }
        if !self.columns.is_empty() {
            sink.word("(", me, parent);
            for (i, col) in self.columns.iter().enumerate() {
                if i > 0 {
                    sink.word(",", me, parent);
                }
                sink.ident(col, me, parent);
            }
            sink.word(")", me, parent);
        }
        match &self.source {
            InsertSource::Values(values) => values.emit(sink, me),
            InsertSource::Select(query) => query.emit(sink, me),
            InsertSource::DefaultValues => sink.keyword("DEFAULT VALUES", me, parent),
        }
        emit_returning(&self.returning, sink, me, parent);
    }
}

fn emit_returning(items: &[SelectItem], sink: &mut TokenSink, owner: NodeId, parent: NodeId) {
    if items.is_empty() {
        return;
    }
    sink.keyword("RETURNING", owner, parent);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            sink.word(",", owner, parent);
        }
        item.emit(sink, owner);
    }
}

impl UpdateQuery {
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        if let Some(ref with) = self.with {
            with.emit(sink, me);
        }
        sink.keyword("UPDATE", me, parent);
        self.table.emit(sink, me);
        sink.keyword("SET", me, parent);
        for (i, assignment) in self.assignments.iter().enumerate() {
            if i > 0 {
                sink.word(",", me, parent);
            }
            assignment.emit(sink, me);
        }
        if let Some(ref from) = self.from {
            from.emit(sink, me, "FROM");
        }
        if let Some(ref cond) = self.where_clause {
            sink.keyword("WHERE", me, parent);
            cond.emit(sink, me);
        }
        emit_returning(&self.returning, sink, me, parent);
    }
}

impl Assignment {
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        match &self.target {
            AssignmentTarget::Column(name) => sink.ident(name, me, parent),
            AssignmentTarget::ColumnList(names) => {
                sink.word("(", me, parent);
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        sink.word(",", me, parent);
                    }
                    sink.ident(name, me, parent);
                }
                sink.word(")", me, parent);
            }
        }
        sink.word("=", me, parent);
        self.value.emit(sink, me);
    }
}

impl DeleteQuery {
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        if let Some(ref with) = self.with {
            with.emit(sink, me);
        }
        sink.keyword("DELETE FROM", me, parent);
        self.table.emit(sink, me);
        if let Some(ref using) = self.using {
            using.emit(sink, me, "USING");
        }
        if let Some(ref cond) = self.where_clause {
            sink.keyword("WHERE", me, parent);
            cond.emit(sink, me);
        }
        emit_returning(&self.returning, sink, me, parent);
    }
}

// ---------------------------------------------------------------------------
// MERGE
// ---------------------------------------------------------------------------

impl MergeQuery {
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        sink.keyword("MERGE INTO", me, parent);
        self.into.emit(sink, me);
        sink.keyword("USING", me, parent);
        self.using.emit(sink, me);
        sink.keyword("ON", me, parent);
        self.on.emit(sink, me);
        for when in &self.whens {
            let arm = sink.node();
            if when.matched {
                sink.keyword("WHEN MATCHED", arm, me);
            } else {
                sink.keyword("WHEN NOT MATCHED", arm, me);
            }
            if let Some(ref cond) = when.condition {
                sink.keyword("AND", arm, me);
                cond.emit(sink, arm);
            }
            sink.keyword("THEN", arm, me);
            match &when.action {
                MergeAction::Update(assignments) => {
                    sink.keyword("UPDATE SET", arm, me);
                    for (i, assignment) in assignments.iter().enumerate() {
                        if i > 0 {
                            sink.word(",", arm, me);
                        }
                        assignment.emit(sink, arm);
                    }
                }
                MergeAction::Insert { columns, values } => {
                    sink.keyword("INSERT", arm, me);
                    if !columns.is_empty() {
                        sink.word("(", arm, me);
                        for (i, col) in columns.iter().enumerate() {
                            if i > 0 {
                                sink.word(",", arm, me);
                            }
                            sink.ident(col, arm, me);
                        }
                        sink.word(")", arm, me);
                    }
                    sink.keyword("VALUES", arm, me);
                    sink.word("(", arm, me);
                    for (i, value) in values.iter().enumerate() {
                        if i > 0 {
                            sink.word(",", arm, me);
                        }
                        value.emit(sink, arm);
                    }
                    sink.word(")", arm, me);
                }
                MergeAction::Delete => sink.keyword("DELETE", arm, me),
                MergeAction::DoNothing => sink.keyword("DO NOTHING", arm, me),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// DDL
// ---------------------------------------------------------------------------

impl CreateTableQuery {
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        sink.keyword("CREATE TABLE", me, parent);
        if self.if_not_exists {
            sink.keyword("IF NOT EXISTS", me, parent);
        }
        self.name.emit(sink, me, parent);
        sink.word("(", me, parent);
        let mut first = true;
        for column in &self.columns {
            if !first {
                sink.word(",", me, parent);
            }
            first = false;
            column.emit(sink, me);
        }
        for constraint in &self.constraints {
            if !first {
                sink.word(",", me, parent);
            }
            first = false;
            constraint.emit(sink, me);
        }
        sink.word(")", me, parent);
    }
}

impl ColumnDef {
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        sink.ident(&self.name, me, parent);
        if let Some(ref ty) = self.ty {
            ty.emit(sink, me);
        }
        for constraint in &self.constraints {
            match constraint {
                ColumnConstraint::PrimaryKey { autoincrement } => {
                    sink.keyword("PRIMARY KEY", me, parent);
                    if *autoincrement {
                        sink.keyword("AUTOINCREMENT", me, parent);
                    }
                }
                ColumnConstraint::NotNull => sink.keyword("NOT NULL", me, parent),
                ColumnConstraint::Unique => sink.keyword("UNIQUE", me, parent),
                ColumnConstraint::Default(chain) => {
                    sink.keyword("DEFAULT", me, parent);
                    chain.emit(sink, me);
                }
                ColumnConstraint::Check(chain) => {
                    sink.keyword("CHECK", me, parent);
                    sink.word("(", me, parent);
                    chain.emit(sink, me);
                    sink.word(")", me, parent);
                }
                ColumnConstraint::References { table, columns } => {
                    sink.keyword("REFERENCES", me, parent);
                    table.emit(sink, me, parent);
                    if !columns.is_empty() {
                        sink.word("(", me, parent);
                        for (i, col) in columns.iter().enumerate() {
                            if i > 0 {
                                sink.word(",", me, parent);
                            }
                            sink.ident(col, me, parent);
                        }
                        sink.word(")", me, parent);
                    }
                }
            }
        }
    }
}

impl TableConstraint {
    fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        if let Some(ref name) = self.name {
            sink.keyword("CONSTRAINT", me, parent);
            sink.ident(name, me, parent);
        }
        let ident_list = |sink: &mut TokenSink, names: &[String], me: NodeId| {
            sink.word("(", me, parent);
            for (i, name) in names.iter().enumerate() {
                if i > 0 {
                    sink.word(",", me, parent);
                }
                sink.ident(name, me, parent);
            }
            sink.word(")", me, parent);
        };
        match &self.kind {
            TableConstraintKind::PrimaryKey(columns) => {
                sink.keyword("PRIMARY KEY", me, parent);
                ident_list(sink, columns, me);
            }
            TableConstraintKind::Unique(columns) => {
                sink.keyword("UNIQUE", me, parent);
                ident_list(sink, columns, me);
            }
            TableConstraintKind::Check(chain) => {
                sink.keyword("CHECK", me, parent);
                sink.word("(", me, parent);
                chain.emit(sink, me);
                sink.word(")", me, parent);
            }
            TableConstraintKind::ForeignKey {
                columns,
                table,
                ref_columns,
            } => {
                sink.keyword("FOREIGN KEY", me, parent);
                ident_list(sink, columns, me);
                sink.keyword("REFERENCES", me, parent);
                table.emit(sink, me, parent);
                if !ref_columns.is_empty() {
                    ident_list(sink, ref_columns, me);
                }
            }
        }
    }
}

impl AlterTableQuery {
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        sink.keyword("ALTER TABLE", me, parent);
        self.table.emit(sink, me, parent);
        match &self.action {
            AlterAction::AddColumn(column) => {
                sink.keyword("ADD COLUMN", me, parent);
                column.emit(sink, me);
            }
            AlterAction::DropColumn(name) => {
                sink.keyword("DROP COLUMN", me, parent);
                sink.ident(name, me, parent);
            }
            AlterAction::RenameColumn { from, to } => {
                sink.keyword("RENAME COLUMN", me, parent);
                sink.ident(from, me, parent);
                sink.keyword("TO", me, parent);
                sink.ident(to, me, parent);
            }
            AlterAction::RenameTo(name) => {
                sink.keyword("RENAME TO", me, parent);
                sink.ident(name, me, parent);
            }
        }
    }
}

impl CreateIndexQuery {
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        if self.unique {
            sink.keyword("CREATE UNIQUE INDEX", me, parent);
        } else {
            sink.keyword("CREATE INDEX", me, parent);
        }
        if self.if_not_exists {
            sink.keyword("IF NOT EXISTS", me, parent);
        }
        self.name.emit(sink, me, parent);
        sink.keyword("ON", me, parent);
        self.table.emit(sink, me, parent);
        sink.word("(", me, parent);
        for (i, term) in self.columns.iter().enumerate() {
            if i > 0 {
                sink.word(",", me, parent);
            }
            term.emit(sink, me);
        }
        sink.word(")", me, parent);
        if let Some(ref cond) = self.where_clause {
            sink.keyword("WHERE", me, parent);
            cond.emit(sink, me);
        }
    }
}

impl TypeName {
    fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        sink.word(self.name.clone(), me, parent);
        if !self.args.is_empty() {
            sink.word("(", me, parent);
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    sink.word(",", me, parent);
                }
                sink.word(arg.clone(), me, parent);
            }
            sink.word(")", me, parent);
        }
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

impl ExprChain {
    /// Emit the chain by walking links iteratively; a chain of tens of
    /// thousands of links must not deepen the call stack.
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        self.head.emit(sink, me);
        for link in &self.links {
            // A NULL comparison link renders exactly like the postfix
            // predicate, so rewritten `= NULL` chains and parsed
            // `IS NULL` agree token for token.
            if matches!(link.expr, Expr::Literal(Literal::Null))
                && matches!(link.op, ChainOp::Is | ChainOp::IsNot)
            {
                if link.op == ChainOp::Is {
                    sink.keyword("IS NULL", me, parent);
                } else {
                    sink.keyword("IS NOT NULL", me, parent);
                }
                continue;
            }
            let symbol = link.op.sql();
            if symbol.chars().next().is_some_and(char::is_alphabetic) {
                sink.keyword(symbol, me, parent);
            } else {
                sink.word(symbol, me, parent);
            }
            link.expr.emit(sink, me);
        }
    }
}

impl Expr {
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        match self {
            Self::Literal(literal) => literal.emit(sink, me, parent),
            Self::Column(column) => column.emit(sink, me, parent),
            Self::Star(qualifier) => {
                if let Some(table) = qualifier {
                    sink.ident(table, me, parent);
                    sink.word(".", me, parent);
                }
                sink.word("*", me, parent);
            }
            Self::Bind(parameter) => parameter.emit(sink, me, parent),
            Self::Function(call) => call.emit(sink, me),
            Self::Case(case) => case.emit(sink, me),
            Self::Bracket(chain) => {
                sink.word("(", me, parent);
                chain.emit(sink, me);
                sink.word(")", me, parent);
            }
            Self::Unary { op, expr } => {
                match op {
                    UnaryOp::Not => sink.keyword("NOT", me, parent),
                    UnaryOp::Neg => sink.word("-", me, parent),
                }
                expr.emit(sink, me);
            }
            Self::IsNull { expr, not } => {
                expr.emit(sink, me);
                if *not {
                    sink.keyword("IS NOT NULL", me, parent);
                } else {
                    sink.keyword("IS NULL", me, parent);
                }
            }
            Self::In { expr, set, not } => {
                expr.emit(sink, me);
                if *not {
                    sink.keyword("NOT IN", me, parent);
                } else {
                    sink.keyword("IN", me, parent);
                }
                sink.word("(", me, parent);
                match set {
                    InSet::List(items) => {
                        for (i, item) in items.iter().enumerate() {
                            if i > 0 {
                                sink.word(",", me, parent);
                            }
                            item.emit(sink, me);
                        }
                    }
                    InSet::Query(query) => query.emit(sink, me),
                }
                sink.word(")", me, parent);
            }
            Self::Between {
                expr,
                low,
                high,
                not,
            } => {
                expr.emit(sink, me);
                if *not {
                    sink.keyword("NOT BETWEEN", me, parent);
                } else {
                    sink.keyword("BETWEEN", me, parent);
                }
                low.emit(sink, me);
                sink.keyword("AND", me, parent);
                high.emit(sink, me);
            }
            Self::Like {
                expr,
                pattern,
                escape,
                not,
            } => {
                expr.emit(sink, me);
                if *not {
                    sink.keyword("NOT LIKE", me, parent);
                } else {
                    sink.keyword("LIKE", me, parent);
                }
                pattern.emit(sink, me);
                if let Some(escape) = escape {
                    sink.keyword("ESCAPE", me, parent);
                    escape.emit(sink, me);
                }
            }
            Self::Exists { query, not } => {
                if *not {
                    sink.keyword("NOT EXISTS", me, parent);
                } else {
                    sink.keyword("EXISTS", me, parent);
                }
                sink.word("(", me, parent);
                query.emit(sink, me);
                sink.word(")", me, parent);
            }
            Self::Subquery(query) => {
                sink.word("(", me, parent);
                query.emit(sink, me);
                sink.word(")", me, parent);
            }
            Self::Cast { expr, ty } => {
                sink.keyword("CAST", me, parent);
                sink.word("(", me, parent);
                expr.emit(sink, me);
                sink.keyword("AS", me, parent);
                ty.emit(sink, me);
                sink.word(")", me, parent);
            }
        }
    }
}

impl Literal {
    fn emit(&self, sink: &mut TokenSink, owner: NodeId, parent: NodeId) {
        match self {
            Self::Number(raw) => sink.word(raw.clone(), owner, parent),
            Self::String(value) => {
                let mut text = String::with_capacity(value.len() + 2);
                text.push('\'');
                for ch in value.chars() {
                    if ch == '\'' {
                        text.push('\'');
                    }
                    text.push(ch);
                }
                text.push('\'');
                sink.word(text, owner, parent);
            }
            Self::Null => sink.keyword("NULL", owner, parent),
            Self::True => sink.keyword("TRUE", owner, parent),
            Self::False => sink.keyword("FALSE", owner, parent),
        }
    }
}

impl ColumnRef {
    fn emit(&self, sink: &mut TokenSink, owner: NodeId, parent: NodeId) {
        if let Some(ref table) = self.table {
            sink.ident(table, owner, parent);
            sink.word(".", owner, parent);
        }
        sink.ident(&self.column, owner, parent);
    }
}

impl Parameter {
    fn emit(&self, sink: &mut TokenSink, owner: NodeId, parent: NodeId) {
        sink.bind(&self.name, owner, parent);
    }
}

impl FunctionCall {
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        sink.word(self.name.clone(), me, parent);
        sink.word("(", me, parent);
        if self.distinct {
            sink.keyword("DISTINCT", me, parent);
        }
        match &self.args {
            FunctionArgs::Star => sink.word("*", me, parent),
            FunctionArgs::List(args) => {
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        sink.word(",", me, parent);
                    }
                    arg.emit(sink, me);
                }
            }
        }
        sink.word(")", me, parent);
        if let Some(ref over) = self.over {
            sink.keyword("OVER", me, parent);
            match over.as_ref() {
                OverClause::Named(name) => sink.ident(name, me, parent),
                OverClause::Spec(spec) => {
                    sink.word("(", me, parent);
                    spec.emit(sink, me);
                    sink.word(")", me, parent);
                }
            }
        }
    }
}

impl CaseExpr {
    fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        sink.keyword("CASE", me, parent);
        if let Some(ref operand) = self.operand {
            operand.emit(sink, me);
        }
        for branch in &self.whens {
            sink.keyword("WHEN", me, parent);
            branch.when.emit(sink, me);
            sink.keyword("THEN", me, parent);
            branch.then.emit(sink, me);
        }
        if let Some(ref else_branch) = self.else_branch {
            sink.keyword("ELSE", me, parent);
            else_branch.emit(sink, me);
        }
        sink.keyword("END", me, parent);
    }
}

impl WindowDef {
    fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        sink.ident(&self.name, me, parent);
        sink.keyword("AS", me, parent);
        sink.word("(", me, parent);
        self.spec.emit(sink, me);
        sink.word(")", me, parent);
    }
}

impl WindowSpec {
    pub(crate) fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        if let Some(ref base) = self.base {
            sink.ident(base, me, parent);
        }
        if !self.partition_by.is_empty() {
            sink.keyword("PARTITION BY", me, parent);
            for (i, chain) in self.partition_by.iter().enumerate() {
                if i > 0 {
                    sink.word(",", me, parent);
                }
                chain.emit(sink, me);
            }
        }
        if !self.order_by.is_empty() {
            // Inside an OVER bracket this stays inline; the formatter only
            // breaks on clause keywords outside inline parens.
            sink.keyword("ORDER BY", me, parent);
            for (i, term) in self.order_by.iter().enumerate() {
                if i > 0 {
                    sink.word(",", me, parent);
                }
                term.emit(sink, me);
            }
        }
        if let Some(ref frame) = self.frame {
            frame.emit(sink, me);
        }
    }
}

impl FrameSpec {
    fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        sink.keyword(self.units.sql(), me, parent);
        if let Some(ref end) = self.end {
            sink.keyword("BETWEEN", me, parent);
            self.start.emit(sink, me);
            sink.keyword("AND", me, parent);
            end.emit(sink, me);
        } else {
            self.start.emit(sink, me);
        }
    }
}

impl FrameBound {
    fn emit(&self, sink: &mut TokenSink, parent: NodeId) {
        let me = sink.node();
        match self {
            Self::UnboundedPreceding => sink.keyword("UNBOUNDED PRECEDING", me, parent),
            Self::Preceding(chain) => {
                chain.emit(sink, me);
                sink.keyword("PRECEDING", me, parent);
            }
            Self::CurrentRow => sink.keyword("CURRENT ROW", me, parent),
            Self::Following(chain) => {
                chain.emit(sink, me);
                sink.keyword("FOLLOWING", me, parent);
            }
            Self::UnboundedFollowing => sink.keyword("UNBOUNDED FOLLOWING", me, parent),
        }
    }
}
