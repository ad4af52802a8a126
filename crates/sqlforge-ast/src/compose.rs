//! Programmatic tree composition: combining conditions, attaching
//! aliases, and merging CTE lists.
//!
//! The logical combinators keep chains flat whenever they can. Appending
//! `AND` to a chain that only uses `AND` extends the chain in place; only
//! when the connectives would mix does the existing chain get demoted to a
//! single bracketed operand, so `a AND b` followed by `.or(c)` yields
//! `(a AND b) OR c` and nothing ever grows a redundant nested bracket.

use crate::{
    ChainOp, CommonTable, Expr, ExprChain, Literal, LogicalProfile, SelectItem, SelectQuery,
    TableRef, WithClause,
};

impl ExprChain {
    /// Combine with another condition under `AND`.
    pub fn and(&mut self, other: impl Into<Self>) {
        self.combine(ChainOp::And, other.into());
    }

    /// Combine with another condition under `OR`.
    pub fn or(&mut self, other: impl Into<Self>) {
        self.combine(ChainOp::Or, other.into());
    }

    fn combine(&mut self, op: ChainOp, other: Self) {
        let keeps_flat = match self.logical_profile() {
            LogicalProfile::None => true,
            LogicalProfile::Pure(existing) => existing == op,
            LogicalProfile::Mixed => false,
        };
        if !keeps_flat {
            let old = std::mem::replace(self, Self::solo(Expr::Literal(Literal::Null)));
            self.head = Expr::Bracket(Box::new(old));
        }
        self.push(op, Self::operand(other));
    }

    /// A chain used as a single operand: solo chains contribute their head
    /// directly, multi-link chains must be bracketed to keep their
    /// grouping.
    fn operand(chain: Self) -> Expr {
        if chain.links.is_empty() {
            chain.head
        } else {
            Expr::Bracket(Box::new(chain))
        }
    }
}

impl SelectQuery {
    /// Add a condition to the WHERE clause, `AND`-combined with whatever
    /// is already there.
    pub fn and_where(&mut self, condition: impl Into<ExprChain>) {
        match self.where_clause.as_mut() {
            Some(existing) => existing.and(condition),
            None => self.where_clause = Some(condition.into()),
        }
    }

    /// Add a condition to the WHERE clause, `OR`-combined with whatever
    /// is already there.
    pub fn or_where(&mut self, condition: impl Into<ExprChain>) {
        match self.where_clause.as_mut() {
            Some(existing) => existing.or(condition),
            None => self.where_clause = Some(condition.into()),
        }
    }
}

impl SelectItem {
    /// Set or replace the output alias.
    pub fn set_alias(&mut self, alias: impl Into<String>) {
        self.alias = Some(alias.into());
    }
}

impl TableRef {
    /// Builder-style alias attachment.
    #[must_use]
    pub fn aliased(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set or replace the alias on an existing reference.
    pub fn set_alias(&mut self, alias: impl Into<String>) {
        self.alias = Some(alias.into());
    }
}

impl WithClause {
    /// Fold another WITH clause into this one. Tables keep
    /// first-appearance order; when both clauses declare the same name the
    /// earlier declaration wins. `RECURSIVE` is sticky.
    pub fn merge(&mut self, other: Self) {
        self.recursive |= other.recursive;
        for table in other.tables {
            if !self.declares(&table.name) {
                self.tables.push(table);
            }
        }
    }

    /// Whether this clause already declares a table by that name.
    #[must_use]
    pub fn declares(&self, name: &str) -> bool {
        self.tables.iter().any(|ct| ct.name == name)
    }

    /// Append a common table, keeping the first declaration on a name
    /// collision.
    pub fn add(&mut self, table: CommonTable) {
        if !self.declares(&table.name) {
            self.tables.push(table);
        }
    }
}
