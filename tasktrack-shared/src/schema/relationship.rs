/// One-to-many relationships between declared tables
///
/// A [`HasMany`] stores the "one" side's primary key on the "many" side. The
/// reconciler turns it into a foreign-key constraint plus an index on the
/// referencing column. No cascade behavior is declared.

use super::table::{ConstraintDef, ConstraintKind, IndexDef, Table};
use super::tables::{REPORT, TASK};

/// `one` has many `many`, linked through `many.foreign_key`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasMany {
    pub one: &'static Table,
    pub many: &'static Table,
    pub foreign_key: &'static str,
}

impl HasMany {
    /// Column on `one` that the foreign key points at
    pub fn referenced_column(&self) -> &'static str {
        self.one.primary_key().map(|c| c.name).unwrap_or("id")
    }

    /// Foreign-key constraint, named `{many}_{foreign_key}_fkey`
    pub fn constraint(&self) -> ConstraintDef {
        ConstraintDef {
            name: format!("{}_{}_fkey", self.many.name, self.foreign_key),
            table: self.many.name,
            kind: ConstraintKind::ForeignKey {
                column: self.foreign_key,
                references_table: self.one.name,
                references_column: self.referenced_column(),
            },
        }
    }

    /// Index supporting lookups by owner, named `{many}_{foreign_key}_idx`
    pub fn index(&self) -> IndexDef {
        IndexDef {
            name: format!("{}_{}_idx", self.many.name, self.foreign_key),
            table: self.many.name,
            columns: vec![self.foreign_key],
            unique: false,
        }
    }
}

/// Each report owns zero or more tasks; each task belongs to one report
pub const REPORT_TASKS: HasMany = HasMany {
    one: &REPORT,
    many: &TASK,
    foreign_key: "relatorioId",
};

pub const RELATIONSHIPS: &[HasMany] = &[REPORT_TASKS];
