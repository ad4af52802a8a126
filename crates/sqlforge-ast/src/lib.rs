//! SQL abstract syntax tree node model for sqlforge.
//!
//! Every SQL statement parsed by `sqlforge-parser` produces a tree of these
//! nodes, and every node knows how to flatten itself back into a stream of
//! display tokens (see [`emit`]) for the formatter in `sqlforge-format`.
//!
//! The expression model deliberately uses a flat left-to-right operator
//! chain ([`ExprChain`]) instead of a binary precedence tree: SQL admits
//! arbitrarily long flat chains (`a + b + c + …`, 50,000-way `UNION ALL`)
//! and the original grouping must survive a round trip exactly as written.
//! Grouping therefore comes solely from explicit [`Expr::Bracket`] nodes
//! inserted where the source text had parentheses; the chain itself carries
//! no precedence information. All chain walks are loops, never per-link
//! recursion.

pub mod collect;
pub mod compose;
pub mod dialect;
pub mod emit;
pub mod keywords;

use std::fmt;

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// A possibly-schema-qualified object name like `main.users` or `users`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    /// Optional schema qualifier.
    pub schema: Option<String>,
    /// The object name.
    pub name: String,
}

impl QualifiedName {
    /// Create an unqualified name.
    #[must_use]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Create a schema-qualified name.
    #[must_use]
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref s) = self.schema {
            write!(f, "{s}.{}", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// A reference to a column, possibly qualified with a table name or alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Optional table (or alias) qualifier.
    pub table: Option<String>,
    /// Column name.
    pub column: String,
}

impl ColumnRef {
    /// Create an unqualified column reference.
    #[must_use]
    pub fn bare(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }

    /// Create a table-qualified column reference.
    #[must_use]
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: column.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Literals and bind parameters
// ---------------------------------------------------------------------------

/// A literal constant in SQL source.
///
/// Numbers keep their raw source text so that `1.50` round-trips as
/// `1.50`, not `1.5`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Numeric literal, raw text.
    Number(String),
    /// String literal, decoded (the `''` escape already collapsed).
    String(String),
    /// The keyword `NULL`.
    Null,
    /// The keyword `TRUE`.
    True,
    /// The keyword `FALSE`.
    False,
}

impl Literal {
    /// Whether this literal is the NULL keyword.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// A bind parameter discovered in text or attached by a caller.
///
/// Parsed parameters carry no value; callers assembling trees directly may
/// attach one so that the collection pass can report it alongside the name.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name, without the dialect marker character.
    pub name: String,
    /// Optional attached value.
    pub value: Option<Literal>,
}

impl Parameter {
    /// A named parameter with no value attached.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    /// A named parameter with a value attached.
    #[must_use]
    pub fn with_value(name: impl Into<String>, value: Literal) -> Self {
        Self {
            name: name.into(),
            value: Some(value),
        }
    }
}

// ---------------------------------------------------------------------------
// Operator chains
// ---------------------------------------------------------------------------

/// An operator linking two adjacent operands in a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainOp {
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Concat,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Is,
    IsNot,
    /// The `::` cast operator.
    TypeCast,
}

impl ChainOp {
    /// The SQL rendering of this operator.
    #[must_use]
    pub fn sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Concat => "||",
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
            Self::TypeCast => "::",
        }
    }

    /// Whether this is a logical connective (`AND`/`OR`).
    #[must_use]
    pub fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Map an operator symbol span to a chain operator. `!=` normalizes
    /// to [`ChainOp::Ne`].
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Mod,
            "||" => Self::Concat,
            "=" => Self::Eq,
            "<>" | "!=" => Self::Ne,
            "<" => Self::Lt,
            "<=" => Self::Le,
            ">" => Self::Gt,
            ">=" => Self::Ge,
            "::" => Self::TypeCast,
            _ => return None,
        })
    }
}

/// One `(operator, operand)` link in a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainLink {
    pub op: ChainOp,
    pub expr: Expr,
}

/// A flat left-to-right operator chain: `head op₁ e₁ op₂ e₂ …`.
///
/// `a + b + c` and `a AND b AND c` are both one chain with two links. A
/// parenthesized group in the source becomes a single [`Expr::Bracket`]
/// operand wrapping its own inner chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprChain {
    pub head: Expr,
    pub links: Vec<ChainLink>,
}

/// Summary of the logical connectives used by a chain's links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalProfile {
    /// No `AND`/`OR` links at all.
    None,
    /// Every logical link uses this one connective.
    Pure(ChainOp),
    /// Both `AND` and `OR` appear.
    Mixed,
}

impl ExprChain {
    /// A chain consisting of a single operand.
    #[must_use]
    pub fn solo(head: Expr) -> Self {
        Self {
            head,
            links: Vec::new(),
        }
    }

    /// Append a link, normalizing NULL comparisons: `= NULL` becomes
    /// `IS NULL`-style `IS`, `<> NULL` becomes `IS NOT`. The rewrite
    /// happens here, at construction time, so the tree always encodes
    /// SQL-legal semantics.
    pub fn push(&mut self, op: ChainOp, expr: Expr) {
        let op = match (op, &expr) {
            (ChainOp::Eq, Expr::Literal(l)) if l.is_null() => ChainOp::Is,
            (ChainOp::Ne, Expr::Literal(l)) if l.is_null() => ChainOp::IsNot,
            _ => op,
        };
        self.links.push(ChainLink { op, expr });
    }

    /// The logical-connective profile of this chain's links.
    #[must_use]
    pub fn logical_profile(&self) -> LogicalProfile {
        let mut seen: Option<ChainOp> = None;
        for link in &self.links {
            if link.op.is_logical() {
                match seen {
                    None => seen = Some(link.op),
                    Some(op) if op == link.op => {}
                    Some(_) => return LogicalProfile::Mixed,
                }
            }
        }
        seen.map_or(LogicalProfile::None, LogicalProfile::Pure)
    }

    /// The name this chain would be known by without an alias: the column
    /// name when the chain is a single bare column reference.
    #[must_use]
    pub fn default_name(&self) -> Option<&str> {
        if self.links.is_empty() {
            if let Expr::Column(ref c) = self.head {
                return Some(&c.column);
            }
        }
        None
    }
}

impl From<Expr> for ExprChain {
    fn from(head: Expr) -> Self {
        Self::solo(head)
    }
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Logical `NOT`.
    Not,
    /// Arithmetic negation `-`.
    Neg,
}

impl UnaryOp {
    #[must_use]
    pub fn sql(self) -> &'static str {
        match self {
            Self::Not => "NOT",
            Self::Neg => "-",
        }
    }
}

/// A single operand in an expression chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal constant.
    Literal(Literal),
    /// A column reference.
    Column(ColumnRef),
    /// `*` or `table.*` in a select list.
    Star(Option<String>),
    /// A bind parameter placeholder.
    Bind(Parameter),
    /// A function call, possibly windowed.
    Function(FunctionCall),
    /// `CASE … END`.
    Case(CaseExpr),
    /// An explicitly parenthesized sub-chain.
    Bracket(Box<ExprChain>),
    /// A unary prefix operation.
    Unary { op: UnaryOp, expr: Box<Expr> },
    /// `expr IS [NOT] NULL`.
    IsNull { expr: Box<Expr>, not: bool },
    /// `expr [NOT] IN (…)`.
    In {
        expr: Box<Expr>,
        set: InSet,
        not: bool,
    },
    /// `expr [NOT] BETWEEN low AND high`.
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        not: bool,
    },
    /// `expr [NOT] LIKE pattern [ESCAPE escape]`.
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
        not: bool,
    },
    /// `[NOT] EXISTS (subquery)`.
    Exists { query: Box<SelectQuery>, not: bool },
    /// A scalar subquery `(SELECT …)`.
    Subquery(Box<SelectQuery>),
    /// `CAST(expr AS type)`.
    Cast { expr: Box<ExprChain>, ty: TypeName },
}

impl Expr {
    /// Convenience constructor for a bare column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(ColumnRef::bare(name))
    }

    /// Convenience constructor for a string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// Convenience constructor for a numeric literal.
    #[must_use]
    pub fn number(raw: impl Into<String>) -> Self {
        Self::Literal(Literal::Number(raw.into()))
    }
}

/// The right-hand side of an `IN` predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum InSet {
    /// `IN (e1, e2, …)`.
    List(Vec<ExprChain>),
    /// `IN (SELECT …)`.
    Query(Box<SelectQuery>),
}

/// A column type name as written in DDL (`VARCHAR(255)`, `DECIMAL(10, 2)`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    pub name: String,
    /// Size/precision arguments, raw text.
    pub args: Vec<String>,
}

impl TypeName {
    #[must_use]
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }
}

/// A function call, optionally `DISTINCT`-qualified and windowed.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: FunctionArgs,
    pub distinct: bool,
    /// `OVER (…)` or `OVER window_name`.
    pub over: Option<Box<OverClause>>,
}

impl FunctionCall {
    /// A plain call with positional arguments.
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<ExprChain>) -> Self {
        Self {
            name: name.into(),
            args: FunctionArgs::List(args),
            distinct: false,
            over: None,
        }
    }
}

/// Function argument list.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionArgs {
    /// `count(*)`.
    Star,
    /// `f(a, b, …)` or `f()`.
    List(Vec<ExprChain>),
}

/// The `OVER` part of a window function call.
#[derive(Debug, Clone, PartialEq)]
pub enum OverClause {
    /// `OVER window_name`.
    Named(String),
    /// `OVER (partition/order/frame)`.
    Spec(WindowSpec),
}

/// `CASE [operand] WHEN … THEN … [ELSE …] END`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpr {
    pub operand: Option<Box<ExprChain>>,
    pub whens: Vec<CaseWhen>,
    pub else_branch: Option<Box<ExprChain>>,
}

/// One `WHEN cond THEN result` branch.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseWhen {
    pub when: ExprChain,
    pub then: ExprChain,
}

// ---------------------------------------------------------------------------
// Window specifications
// ---------------------------------------------------------------------------

/// Window specification for window functions.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSpec {
    /// Optional base window name.
    pub base: Option<String>,
    pub partition_by: Vec<ExprChain>,
    pub order_by: Vec<OrderingTerm>,
    pub frame: Option<FrameSpec>,
}

/// A named window in a `WINDOW` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDef {
    pub name: String,
    pub spec: WindowSpec,
}

/// Window frame specification.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSpec {
    pub units: FrameUnits,
    pub start: FrameBound,
    /// `BETWEEN start AND end` when present.
    pub end: Option<FrameBound>,
}

/// Window frame units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameUnits {
    Rows,
    Range,
    Groups,
}

impl FrameUnits {
    #[must_use]
    pub fn sql(self) -> &'static str {
        match self {
            Self::Rows => "ROWS",
            Self::Range => "RANGE",
            Self::Groups => "GROUPS",
        }
    }
}

/// Window frame boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(ExprChain),
    CurrentRow,
    Following(ExprChain),
    UnboundedFollowing,
}

// ---------------------------------------------------------------------------
// Ordering, limits
// ---------------------------------------------------------------------------

/// One `ORDER BY` term.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderingTerm {
    pub chain: ExprChain,
    pub direction: Option<SortDirection>,
    pub nulls: Option<NullsOrder>,
}

impl OrderingTerm {
    /// An ascending term with defaults.
    #[must_use]
    pub fn plain(chain: ExprChain) -> Self {
        Self {
            chain,
            direction: None,
            nulls: None,
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// `NULLS FIRST` / `NULLS LAST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullsOrder {
    First,
    Last,
}

/// `LIMIT n [OFFSET m]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitClause {
    pub limit: ExprChain,
    pub offset: Option<ExprChain>,
}

// ---------------------------------------------------------------------------
// Table references and joins
// ---------------------------------------------------------------------------

/// Where a table reference gets its rows from.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    /// A physical table (schema + name).
    Physical(QualifiedName),
    /// A virtual table wrapping a nested query (`(SELECT …)`, `(VALUES …)`).
    Query(Box<Statement>),
    /// A table-valued function call.
    Function(FunctionCall),
}

/// A table reference with an optional alias.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub source: TableSource,
    pub alias: Option<String>,
}

impl TableRef {
    /// A physical table reference.
    #[must_use]
    pub fn physical(name: QualifiedName) -> Self {
        Self {
            source: TableSource::Physical(name),
            alias: None,
        }
    }

    /// The name this reference would be known by without an alias.
    #[must_use]
    pub fn default_name(&self) -> Option<&str> {
        match &self.source {
            TableSource::Physical(q) => Some(&q.name),
            TableSource::Function(f) => Some(&f.name),
            TableSource::Query(_) => None,
        }
    }

    /// The alias that will actually render: `None` when the alias matches
    /// the reference's default name.
    #[must_use]
    pub fn effective_alias(&self) -> Option<&str> {
        match (&self.alias, self.default_name()) {
            (Some(a), Some(d)) if a == d => None,
            (alias, _) => alias.as_deref(),
        }
    }
}

/// How a relation attaches to the relation before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    /// The first relation in a FROM clause.
    From,
    /// Comma-separated cross product.
    Comma,
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    /// The join keyword, empty for the leading relation.
    #[must_use]
    pub fn sql(self) -> &'static str {
        match self {
            Self::From => "",
            Self::Comma => ",",
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// One relation in a FROM clause: a join keyword, a table reference, and
/// an optional ON condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub join: JoinKind,
    pub table: TableRef,
    pub on: Option<ExprChain>,
}

/// An ordered collection of relations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FromClause {
    pub relations: Vec<Relation>,
}

impl FromClause {
    /// A FROM clause over one leading relation.
    #[must_use]
    pub fn of(table: TableRef) -> Self {
        Self {
            relations: vec![Relation {
                join: JoinKind::From,
                table,
                on: None,
            }],
        }
    }
}

// ---------------------------------------------------------------------------
// Common tables
// ---------------------------------------------------------------------------

/// A single `WITH`-declared common table.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonTable {
    pub name: String,
    /// Optional column name list.
    pub columns: Vec<String>,
    /// `MATERIALIZED` / `NOT MATERIALIZED` hint.
    pub materialized: Option<bool>,
    pub query: Box<Statement>,
}

/// The `WITH [RECURSIVE]` clause.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WithClause {
    pub recursive: bool,
    pub tables: Vec<CommonTable>,
}

// ---------------------------------------------------------------------------
// SELECT
// ---------------------------------------------------------------------------

/// One item in a select list.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub chain: ExprChain,
    pub alias: Option<String>,
}

impl SelectItem {
    /// An item with no alias.
    #[must_use]
    pub fn bare(chain: impl Into<ExprChain>) -> Self {
        Self {
            chain: chain.into(),
            alias: None,
        }
    }

    /// The alias that will actually render: `None` when the alias matches
    /// the chain's default name.
    #[must_use]
    pub fn effective_alias(&self) -> Option<&str> {
        match (&self.alias, self.chain.default_name()) {
            (Some(a), Some(d)) if a == d => None,
            (alias, _) => alias.as_deref(),
        }
    }
}

/// Set operators connecting compound select branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOp {
    Union,
    UnionAll,
    Intersect,
    IntersectAll,
    Except,
    ExceptAll,
}

impl SetOp {
    #[must_use]
    pub fn sql(self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::UnionAll => "UNION ALL",
            Self::Intersect => "INTERSECT",
            Self::IntersectAll => "INTERSECT ALL",
            Self::Except => "EXCEPT",
            Self::ExceptAll => "EXCEPT ALL",
        }
    }
}

/// A SELECT statement.
///
/// Compound branches (`UNION [ALL]`, `INTERSECT`, `EXCEPT`) are stored as
/// a flat vector on the leading query; the parser flattens nested chains
/// so a 50,000-way `UNION ALL` is 50,000 vector elements, not 50,000
/// levels of nesting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectQuery {
    pub with: Option<WithClause>,
    pub distinct: bool,
    pub items: Vec<SelectItem>,
    pub from: Option<FromClause>,
    pub where_clause: Option<ExprChain>,
    pub group_by: Vec<ExprChain>,
    pub having: Option<ExprChain>,
    pub windows: Vec<WindowDef>,
    pub compounds: Vec<(SetOp, SelectQuery)>,
    pub order_by: Vec<OrderingTerm>,
    pub limit: Option<LimitClause>,
}

impl SelectQuery {
    /// Detach and return the CTE wrapper, leaving the base query in place.
    /// Callers that need to inspect or rewrite the statement without its
    /// WITH clause use this and re-attach afterwards.
    pub fn strip_with(&mut self) -> Option<WithClause> {
        self.with.take()
    }

    /// A copy of this query with the CTE wrapper removed, for callers
    /// that must keep the original intact.
    #[must_use]
    pub fn without_with(&self) -> Self {
        Self {
            with: None,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// VALUES
// ---------------------------------------------------------------------------

/// A standalone `VALUES (…), (…), …` query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValuesQuery {
    pub rows: Vec<Vec<ExprChain>>,
}

// ---------------------------------------------------------------------------
// INSERT
// ---------------------------------------------------------------------------

/// An INSERT statement.
///
/// Note the deliberate absence of a `with` field: the canonical grammar
/// does not place a WITH clause on INSERT. When the parser sees one it
/// reparents the clause onto the nested SELECT source so the emitted text
/// stays valid SQL. This is a compatibility quirk, preserved on purpose;
/// see the crate documentation of `sqlforge-parser`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    pub table: QualifiedName,
    pub alias: Option<String>,
    pub columns: Vec<String>,
    pub source: InsertSource,
    pub returning: Vec<SelectItem>,
}

/// Where an INSERT gets its rows.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertSource {
    Values(ValuesQuery),
    Select(Box<SelectQuery>),
    DefaultValues,
}

// ---------------------------------------------------------------------------
// UPDATE / DELETE
// ---------------------------------------------------------------------------

/// One `SET` assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: AssignmentTarget,
    pub value: ExprChain,
}

/// Left-hand side of a SET assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentTarget {
    Column(String),
    ColumnList(Vec<String>),
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuery {
    pub with: Option<WithClause>,
    pub table: TableRef,
    pub assignments: Vec<Assignment>,
    /// `UPDATE … FROM` extra relations.
    pub from: Option<FromClause>,
    pub where_clause: Option<ExprChain>,
    pub returning: Vec<SelectItem>,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteQuery {
    pub with: Option<WithClause>,
    pub table: TableRef,
    /// `DELETE … USING` extra relations.
    pub using: Option<FromClause>,
    pub where_clause: Option<ExprChain>,
    pub returning: Vec<SelectItem>,
}

// ---------------------------------------------------------------------------
// MERGE
// ---------------------------------------------------------------------------

/// A MERGE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeQuery {
    pub into: TableRef,
    pub using: TableRef,
    pub on: ExprChain,
    pub whens: Vec<MergeWhen>,
}

/// One `WHEN [NOT] MATCHED [AND cond] THEN action` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeWhen {
    pub matched: bool,
    pub condition: Option<ExprChain>,
    pub action: MergeAction,
}

/// The action of a MERGE arm.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeAction {
    Update(Vec<Assignment>),
    Insert {
        columns: Vec<String>,
        values: Vec<ExprChain>,
    },
    Delete,
    DoNothing,
}

// ---------------------------------------------------------------------------
// DDL
// ---------------------------------------------------------------------------

/// A CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableQuery {
    pub if_not_exists: bool,
    pub name: QualifiedName,
    pub columns: Vec<ColumnDef>,
    pub constraints: Vec<TableConstraint>,
}

/// One column definition in CREATE TABLE / ALTER TABLE ADD COLUMN.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: Option<TypeName>,
    pub constraints: Vec<ColumnConstraint>,
}

/// A constraint attached to a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnConstraint {
    PrimaryKey { autoincrement: bool },
    NotNull,
    Unique,
    Default(ExprChain),
    Check(ExprChain),
    References {
        table: QualifiedName,
        columns: Vec<String>,
    },
}

/// A table-level constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct TableConstraint {
    pub name: Option<String>,
    pub kind: TableConstraintKind,
}

/// The kind of a table-level constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraintKind {
    PrimaryKey(Vec<String>),
    Unique(Vec<String>),
    Check(ExprChain),
    ForeignKey {
        columns: Vec<String>,
        table: QualifiedName,
        ref_columns: Vec<String>,
    },
}

/// An ALTER TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterTableQuery {
    pub table: QualifiedName,
    pub action: AlterAction,
}

/// The action of an ALTER TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub enum AlterAction {
    AddColumn(ColumnDef),
    DropColumn(String),
    RenameColumn { from: String, to: String },
    RenameTo(String),
}

/// A CREATE INDEX statement.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndexQuery {
    pub unique: bool,
    pub if_not_exists: bool,
    pub name: QualifiedName,
    pub table: QualifiedName,
    pub columns: Vec<OrderingTerm>,
    /// Partial index predicate.
    pub where_clause: Option<ExprChain>,
}

// ---------------------------------------------------------------------------
// Statement
// ---------------------------------------------------------------------------

/// A single parsed SQL statement — the top-level AST node.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectQuery),
    Insert(InsertQuery),
    Update(UpdateQuery),
    Delete(DeleteQuery),
    Merge(MergeQuery),
    CreateTable(CreateTableQuery),
    AlterTable(AlterTableQuery),
    CreateIndex(CreateIndexQuery),
    Values(ValuesQuery),
}
