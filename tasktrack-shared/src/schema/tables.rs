/// Table declarations for users, reports and tasks
///
/// Column names are the persisted names and must not change: existing
/// databases created by earlier tooling use exactly these.

use super::table::{Column, ColumnConstraint, ColumnType, Pattern, Table};

const ID: Column = Column {
    name: "id",
    ty: ColumnType::Serial,
    constraints: &[ColumnConstraint::PrimaryKey],
};

/// `"user"`: identity, department and a hashed credential
pub const USER: Table = Table {
    name: "user",
    columns: &[
        ID,
        Column {
            name: "nome",
            ty: ColumnType::Text,
            constraints: &[],
        },
        // National identifier (CPF)
        Column {
            name: "cpf",
            ty: ColumnType::Text,
            constraints: &[ColumnConstraint::Unique],
        },
        Column {
            name: "setor",
            ty: ColumnType::Text,
            constraints: &[],
        },
        Column {
            name: "email",
            ty: ColumnType::Text,
            constraints: &[
                ColumnConstraint::Unique,
                ColumnConstraint::Pattern(Pattern::Email),
            ],
        },
        // Argon2id PHC string, never plaintext
        Column {
            name: "senha",
            ty: ColumnType::Text,
            constraints: &[],
        },
    ],
};

/// `relatorio`: the "one" side of [`super::relationship::REPORT_TASKS`]
pub const REPORT: Table = Table {
    name: "relatorio",
    columns: &[
        ID,
        Column {
            name: "finalidade",
            ty: ColumnType::Text,
            constraints: &[],
        },
        Column {
            name: "data",
            ty: ColumnType::Timestamp,
            constraints: &[],
        },
        Column {
            name: "descricao",
            ty: ColumnType::LongText,
            constraints: &[],
        },
        Column {
            name: "componentes",
            ty: ColumnType::LongText,
            constraints: &[],
        },
    ],
};

/// `tarefa`: the "many" side of [`super::relationship::REPORT_TASKS`]
pub const TASK: Table = Table {
    name: "tarefa",
    columns: &[
        ID,
        Column {
            name: "nome",
            ty: ColumnType::Text,
            constraints: &[],
        },
        Column {
            name: "descricao",
            ty: ColumnType::LongText,
            constraints: &[],
        },
        Column {
            name: "data",
            ty: ColumnType::Timestamp,
            constraints: &[],
        },
        // Comma-joined display names, not a relation
        Column {
            name: "responsaveis",
            ty: ColumnType::Text,
            constraints: &[],
        },
        Column {
            name: "setor",
            ty: ColumnType::Text,
            constraints: &[],
        },
        Column {
            name: "relatorioId",
            ty: ColumnType::Integer,
            constraints: &[],
        },
    ],
};

/// All tables, ordered so that referenced tables come first
pub const SCHEMA: &[&Table] = &[&USER, &REPORT, &TASK];
