//! Tree-walking collectors: bind parameters, physical tables, common
//! tables, and nested queries.
//!
//! All walks run from an explicit work stack rather than recursion, so a
//! statement with tens of thousands of compound branches or VALUES rows
//! collects in constant stack space. Children are pushed in reverse so
//! they pop in source order; every collector therefore reports its results
//! in first-appearance order, deduplicated first-wins.

use std::collections::HashSet;

use crate::{
    AlterAction, ColumnConstraint, CommonTable, Expr, ExprChain, FrameBound, FromClause,
    FunctionArgs, FunctionCall, InSet, InsertSource, OverClause, Parameter, QualifiedName,
    SelectItem, SelectQuery, Statement, TableConstraintKind, TableRef, TableSource, ValuesQuery,
    WindowSpec, WithClause,
};

/// One node surfaced during a preorder walk.
#[derive(Debug, Clone, Copy)]
enum Node<'a> {
    Stmt(&'a Statement),
    /// A select core. `branch` marks compound branches (`UNION` arms),
    /// which are part of their leading query rather than nested queries.
    Query {
        query: &'a SelectQuery,
        branch: bool,
    },
    Values(&'a ValuesQuery),
    Table(&'a TableRef),
    /// A physical object name referenced directly (table sources, insert
    /// targets, foreign-key references, DDL subjects).
    Name(&'a QualifiedName),
    Common(&'a CommonTable),
    Chain(&'a ExprChain),
    Expr(&'a Expr),
}

/// Preorder iterator over every node reachable from a statement.
struct Walker<'a> {
    stack: Vec<Node<'a>>,
}

impl<'a> Walker<'a> {
    fn over(statement: &'a Statement) -> Self {
        Self {
            stack: vec![Node::Stmt(statement)],
        }
    }

    fn push_chain_opt(&mut self, chain: Option<&'a ExprChain>) {
        if let Some(chain) = chain {
            self.stack.push(Node::Chain(chain));
        }
    }

    fn push_chains(&mut self, chains: &'a [ExprChain]) {
        for chain in chains.iter().rev() {
            self.stack.push(Node::Chain(chain));
        }
    }

    fn push_items(&mut self, items: &'a [SelectItem]) {
        for item in items.iter().rev() {
            self.stack.push(Node::Chain(&item.chain));
        }
    }

    fn push_from(&mut self, from: &'a FromClause) {
        for relation in from.relations.iter().rev() {
            self.push_chain_opt(relation.on.as_ref());
            self.stack.push(Node::Table(&relation.table));
        }
    }

    fn push_with(&mut self, with: &'a WithClause) {
        for table in with.tables.iter().rev() {
            self.stack.push(Node::Common(table));
        }
    }

    fn push_call(&mut self, call: &'a FunctionCall) {
        if let Some(ref over) = call.over {
            if let OverClause::Spec(ref spec) = **over {
                self.push_spec(spec);
            }
        }
        if let FunctionArgs::List(ref args) = call.args {
            self.push_chains(args);
        }
    }

    fn push_spec(&mut self, spec: &'a WindowSpec) {
        if let Some(ref frame) = spec.frame {
            if let Some(ref end) = frame.end {
                self.push_bound(end);
            }
            self.push_bound(&frame.start);
        }
        for term in spec.order_by.iter().rev() {
            self.stack.push(Node::Chain(&term.chain));
        }
        self.push_chains(&spec.partition_by);
    }

    fn push_bound(&mut self, bound: &'a FrameBound) {
        match bound {
            FrameBound::Preceding(chain) | FrameBound::Following(chain) => {
                self.stack.push(Node::Chain(chain));
            }
            FrameBound::UnboundedPreceding
            | FrameBound::CurrentRow
            | FrameBound::UnboundedFollowing => {}
        }
    }

    #[allow(clippy::too_many_lines)]
    fn push_children(&mut self, node: Node<'a>) {
        match node {
            Node::Stmt(statement) => match statement {
                Statement::Select(q) => self.stack.push(Node::Query {
                    query: q,
                    branch: false,
                }),
                Statement::Insert(q) => {
                    self.push_items(&q.returning);
                    match &q.source {
                        InsertSource::Values(values) => self.stack.push(Node::Values(values)),
                        InsertSource::Select(select) => self.stack.push(Node::Query {
                            query: select,
                            branch: false,
                        }),
                        InsertSource::DefaultValues => {}
                    }
                    self.stack.push(Node::Name(&q.table));
                }
                Statement::Update(q) => {
                    self.push_items(&q.returning);
                    self.push_chain_opt(q.where_clause.as_ref());
                    if let Some(ref from) = q.from {
                        self.push_from(from);
                    }
                    for assignment in q.assignments.iter().rev() {
                        self.stack.push(Node::Chain(&assignment.value));
                    }
                    self.stack.push(Node::Table(&q.table));
                    if let Some(ref with) = q.with {
                        self.push_with(with);
                    }
                }
                Statement::Delete(q) => {
                    self.push_items(&q.returning);
                    self.push_chain_opt(q.where_clause.as_ref());
                    if let Some(ref using) = q.using {
                        self.push_from(using);
                    }
                    self.stack.push(Node::Table(&q.table));
                    if let Some(ref with) = q.with {
                        self.push_with(with);
                    }
                }
                Statement::Merge(q) => {
                    for when in q.whens.iter().rev() {
                        match &when.action {
                            crate::MergeAction::Update(assignments) => {
                                for assignment in assignments.iter().rev() {
                                    self.stack.push(Node::Chain(&assignment.value));
                                }
                            }
                            crate::MergeAction::Insert { values, .. } => {
                                self.push_chains(values);
                            }
                            crate::MergeAction::Delete | crate::MergeAction::DoNothing => {}
                        }
                        self.push_chain_opt(when.condition.as_ref());
                    }
                    self.stack.push(Node::Chain(&q.on));
                    self.stack.push(Node::Table(&q.using));
                    self.stack.push(Node::Table(&q.into));
                }
                Statement::CreateTable(q) => {
                    for constraint in q.constraints.iter().rev() {
                        match &constraint.kind {
                            TableConstraintKind::Check(chain) => {
                                self.stack.push(Node::Chain(chain));
                            }
                            TableConstraintKind::ForeignKey { table, .. } => {
                                self.stack.push(Node::Name(table));
                            }
                            TableConstraintKind::PrimaryKey(_)
                            | TableConstraintKind::Unique(_) => {}
                        }
                    }
                    for column in q.columns.iter().rev() {
                        self.push_column_constraints(&column.constraints);
                    }
                    self.stack.push(Node::Name(&q.name));
                }
                Statement::AlterTable(q) => {
                    if let AlterAction::AddColumn(ref column) = q.action {
                        self.push_column_constraints(&column.constraints);
                    }
                    self.stack.push(Node::Name(&q.table));
                }
                Statement::CreateIndex(q) => {
                    self.push_chain_opt(q.where_clause.as_ref());
                    for term in q.columns.iter().rev() {
                        self.stack.push(Node::Chain(&term.chain));
                    }
                    self.stack.push(Node::Name(&q.table));
                }
                Statement::Values(values) => self.stack.push(Node::Values(values)),
            },
            Node::Query { query, .. } => {
                if let Some(ref limit) = query.limit {
                    self.push_chain_opt(limit.offset.as_ref());
                    self.stack.push(Node::Chain(&limit.limit));
                }
                for term in query.order_by.iter().rev() {
                    self.stack.push(Node::Chain(&term.chain));
                }
                for (_, compound) in query.compounds.iter().rev() {
                    self.stack.push(Node::Query {
                        query: compound,
                        branch: true,
                    });
                }
                for def in query.windows.iter().rev() {
                    self.push_spec(&def.spec);
                }
                self.push_chain_opt(query.having.as_ref());
                self.push_chains(&query.group_by);
                self.push_chain_opt(query.where_clause.as_ref());
                if let Some(ref from) = query.from {
                    self.push_from(from);
                }
                self.push_items(&query.items);
                if let Some(ref with) = query.with {
                    self.push_with(with);
                }
            }
            Node::Values(values) => {
                for row in values.rows.iter().rev() {
                    self.push_chains(row);
                }
            }
            Node::Table(table) => match &table.source {
                TableSource::Physical(name) => self.stack.push(Node::Name(name)),
                TableSource::Query(statement) => self.stack.push(Node::Stmt(statement)),
                TableSource::Function(call) => self.push_call(call),
            },
            Node::Name(_) => {}
            Node::Common(table) => self.stack.push(Node::Stmt(&table.query)),
            Node::Chain(chain) => {
                for link in chain.links.iter().rev() {
                    self.stack.push(Node::Expr(&link.expr));
                }
                self.stack.push(Node::Expr(&chain.head));
            }
            Node::Expr(expr) => self.push_expr_children(expr),
        }
    }

    fn push_column_constraints(&mut self, constraints: &'a [ColumnConstraint]) {
        for constraint in constraints.iter().rev() {
            match constraint {
                ColumnConstraint::Default(chain) | ColumnConstraint::Check(chain) => {
                    self.stack.push(Node::Chain(chain));
                }
                ColumnConstraint::References { table, .. } => {
                    self.stack.push(Node::Name(table));
                }
                ColumnConstraint::PrimaryKey { .. }
                | ColumnConstraint::NotNull
                | ColumnConstraint::Unique => {}
            }
        }
    }

    fn push_expr_children(&mut self, expr: &'a Expr) {
        match expr {
            Expr::Literal(_) | Expr::Column(_) | Expr::Star(_) | Expr::Bind(_) => {}
            Expr::Function(call) => self.push_call(call),
            Expr::Case(case) => {
                if let Some(ref else_branch) = case.else_branch {
                    self.stack.push(Node::Chain(else_branch));
                }
                for branch in case.whens.iter().rev() {
                    self.stack.push(Node::Chain(&branch.then));
                    self.stack.push(Node::Chain(&branch.when));
                }
                if let Some(ref operand) = case.operand {
                    self.stack.push(Node::Chain(operand));
                }
            }
            Expr::Bracket(chain) => self.stack.push(Node::Chain(chain)),
            Expr::Unary { expr, .. } => self.stack.push(Node::Expr(expr)),
            Expr::IsNull { expr, .. } => self.stack.push(Node::Expr(expr)),
            Expr::In { expr, set, .. } => {
                match set {
                    InSet::List(items) => self.push_chains(items),
                    InSet::Query(query) => self.stack.push(Node::Query {
                        query,
                        branch: false,
                    }),
                }
                self.stack.push(Node::Expr(expr));
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                self.stack.push(Node::Expr(high));
                self.stack.push(Node::Expr(low));
                self.stack.push(Node::Expr(expr));
            }
            Expr::Like {
                expr,
                pattern,
                escape,
                ..
            } => {
                if let Some(escape) = escape {
                    self.stack.push(Node::Expr(escape));
                }
                self.stack.push(Node::Expr(pattern));
                self.stack.push(Node::Expr(expr));
            }
            Expr::Exists { query, .. } | Expr::Subquery(query) => self.stack.push(Node::Query {
                query,
                branch: false,
            }),
            Expr::Cast { expr, .. } => self.stack.push(Node::Chain(expr)),
        }
    }
}

impl<'a> Iterator for Walker<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_children(node);
        Some(node)
    }
}

impl Statement {
    /// All bind parameters in first-appearance order, deduplicated by
    /// name. When the same name appears several times, the first
    /// occurrence wins (it may carry an attached value).
    #[must_use]
    pub fn parameters(&self) -> Vec<Parameter> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for node in Walker::over(self) {
            if let Node::Expr(Expr::Bind(parameter)) = node {
                if seen.insert(parameter.name.clone()) {
                    out.push(parameter.clone());
                }
            }
        }
        out
    }

    /// All physical table names the statement touches, in first-appearance
    /// order, deduplicated. Unqualified names that match a common table
    /// declared anywhere in the statement are not physical and are
    /// excluded.
    #[must_use]
    pub fn physical_tables(&self) -> Vec<QualifiedName> {
        let cte_names: HashSet<&str> = self
            .common_tables()
            .iter()
            .map(|ct| ct.name.as_str())
            .collect();
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for node in Walker::over(self) {
            if let Node::Name(name) = node {
                if name.schema.is_none() && cte_names.contains(name.name.as_str()) {
                    continue;
                }
                if seen.insert(name.clone()) {
                    out.push(name.clone());
                }
            }
        }
        out
    }

    /// All common tables declared anywhere in the statement, in
    /// first-appearance order. Duplicate names keep the first declaration.
    #[must_use]
    pub fn common_tables(&self) -> Vec<&CommonTable> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for node in Walker::over(self) {
            if let Node::Common(table) = node {
                if seen.insert(table.name.as_str()) {
                    out.push(table);
                }
            }
        }
        out
    }

    /// Every select query nested below the top level: derived tables,
    /// scalar and `IN`/`EXISTS` subqueries, insert sources, and common
    /// table bodies. Compound branches belong to their leading query and
    /// are not reported separately.
    #[must_use]
    pub fn nested_queries(&self) -> Vec<&SelectQuery> {
        let root: Option<*const SelectQuery> = match self {
            Self::Select(q) => Some(std::ptr::from_ref(q)),
            _ => None,
        };
        let mut out = Vec::new();
        for node in Walker::over(self) {
            if let Node::Query {
                query,
                branch: false,
            } = node
            {
                if root == Some(std::ptr::from_ref(query)) {
                    continue;
                }
                out.push(query);
            }
        }
        out
    }
}
