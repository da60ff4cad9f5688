/// Declared schema for TaskTrack
///
/// The schema is pure declaration: tables, their columns, per-column
/// constraints and the relationships between tables. Nothing here talks to
/// the database. The reconciler in [`crate::db::reconcile`] turns these
/// declarations into DDL, and the seed loader reads them to know which column
/// carries a propagated identifier.
///
/// # Tables
///
/// - [`tables::USER`] (`"user"`): people who can be responsible for tasks
/// - [`tables::REPORT`] (`relatorio`): reports that group tasks
/// - [`tables::TASK`] (`tarefa`): tasks, each owned by one report
///
/// # Example
///
/// ```
/// use tasktrack_shared::schema::{relationship::REPORT_TASKS, tables::SCHEMA};
///
/// for table in SCHEMA {
///     println!("{}", table.create_sql());
/// }
/// assert_eq!(REPORT_TASKS.foreign_key, "relatorioId");
/// ```

pub mod relationship;
pub mod table;
pub mod tables;

pub use relationship::{HasMany, RELATIONSHIPS, REPORT_TASKS};
pub use table::{
    quote_ident, Column, ColumnConstraint, ColumnType, ConstraintDef, ConstraintKind, IndexDef,
    Pattern, Table,
};
pub use tables::{REPORT, SCHEMA, TASK, USER};
