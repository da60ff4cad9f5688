/// Building blocks for table declarations
///
/// A [`Table`] is a name plus a static list of [`Column`]s. Each column has a
/// semantic [`ColumnType`] and zero or more [`ColumnConstraint`]s. Everything
/// that can be derived from a declaration (CREATE TABLE, unique indexes,
/// check constraints) is derived here so the reconciler never hand-writes DDL.
///
/// Primary keys are inlined when a table is created and added as the
/// `{table}_pkey` constraint when an existing table lacks one. Uniqueness and
/// patterns are expressed as separately named indexes and constraints so that
/// an existing table can be brought up to date one object at a time.

/// Semantic column types and their PostgreSQL rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Auto-generated integer identifier
    Serial,

    /// Plain integer (used for foreign keys)
    Integer,

    /// Short text, up to 255 characters
    Text,

    /// Unbounded text
    LongText,

    /// Calendar date and time, stored with time zone
    Timestamp,
}

impl ColumnType {
    /// SQL type used when the column is created
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnType::Serial => "SERIAL",
            ColumnType::Integer => "INTEGER",
            ColumnType::Text => "VARCHAR(255)",
            ColumnType::LongText => "TEXT",
            ColumnType::Timestamp => "TIMESTAMPTZ",
        }
    }
}

/// Shape a text value must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// `local@domain`, no whitespace
    Email,
}

impl Pattern {
    /// SQL boolean expression enforcing the pattern on `column`
    pub fn check_sql(&self, column: &str) -> String {
        match self {
            Pattern::Email => format!(
                "{} ~ '^[^@[:space:]]+@[^@[:space:]]+$'",
                quote_ident(column)
            ),
        }
    }

    fn constraint_suffix(&self) -> &'static str {
        match self {
            Pattern::Email => "check",
        }
    }
}

/// Per-column constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnConstraint {
    /// Primary key (declared at table creation)
    PrimaryKey,

    /// Unique across all rows of the table
    Unique,

    /// Value must match a pattern
    Pattern(Pattern),
}

/// Declared column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
    pub constraints: &'static [ColumnConstraint],
}

impl Column {
    pub fn is_primary_key(&self) -> bool {
        self.constraints.contains(&ColumnConstraint::PrimaryKey)
    }

    pub fn is_unique(&self) -> bool {
        self.constraints.contains(&ColumnConstraint::Unique)
    }

    pub fn pattern(&self) -> Option<Pattern> {
        self.constraints.iter().find_map(|c| match c {
            ColumnConstraint::Pattern(p) => Some(*p),
            _ => None,
        })
    }

    /// Column definition without key clauses, e.g. `"cpf" VARCHAR(255)`
    pub fn definition_sql(&self) -> String {
        format!("{} {}", quote_ident(self.name), self.ty.sql_type())
    }
}

/// Declared table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_primary_key())
    }

    /// `CREATE TABLE IF NOT EXISTS` with every column and the primary key
    ///
    /// Unique indexes and check constraints are not inlined; see
    /// [`Table::unique_indexes`] and [`Table::check_constraints`].
    pub fn create_sql(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if c.is_primary_key() {
                    format!("{} PRIMARY KEY", c.definition_sql())
                } else {
                    c.definition_sql()
                }
            })
            .collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_ident(self.name),
            columns.join(", ")
        )
    }

    /// `ALTER TABLE ... ADD COLUMN IF NOT EXISTS` for a column missing from a live table
    pub fn add_column_sql(&self, column: &Column) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {}",
            quote_ident(self.name),
            column.definition_sql()
        )
    }

    /// `{table}_pkey` on the primary key column, for tables that exist without one
    pub fn primary_key_constraint(&self) -> Option<ConstraintDef> {
        self.primary_key().map(|c| ConstraintDef {
            name: format!("{}_pkey", self.name),
            table: self.name,
            kind: ConstraintKind::PrimaryKey { column: c.name },
        })
    }

    /// One unique index per `Unique` column, named `{table}_{column}_key`
    pub fn unique_indexes(&self) -> Vec<IndexDef> {
        self.columns
            .iter()
            .filter(|c| c.is_unique())
            .map(|c| IndexDef {
                name: format!("{}_{}_key", self.name, c.name),
                table: self.name,
                columns: vec![c.name],
                unique: true,
            })
            .collect()
    }

    /// One check constraint per `Pattern` column, named `{table}_{column}_check`
    pub fn check_constraints(&self) -> Vec<ConstraintDef> {
        self.columns
            .iter()
            .filter_map(|c| {
                c.pattern().map(|p| ConstraintDef {
                    name: format!("{}_{}_{}", self.name, c.name, p.constraint_suffix()),
                    table: self.name,
                    kind: ConstraintKind::Check(p.check_sql(c.name)),
                })
            })
            .collect()
    }
}

/// Index derived from a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDef {
    pub name: String,
    pub table: &'static str,
    pub columns: Vec<&'static str>,
    pub unique: bool,
}

impl IndexDef {
    pub fn create_sql(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| quote_ident(c)).collect();
        format!(
            "CREATE {}INDEX IF NOT EXISTS {} ON {} ({})",
            if self.unique { "UNIQUE " } else { "" },
            quote_ident(&self.name),
            quote_ident(self.table),
            columns.join(", ")
        )
    }
}

/// Table constraint derived from a declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintDef {
    pub name: String,
    pub table: &'static str,
    pub kind: ConstraintKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey { column: &'static str },

    /// Boolean SQL expression
    Check(String),

    /// Foreign key without ON DELETE / ON UPDATE actions
    ForeignKey {
        column: &'static str,
        references_table: &'static str,
        references_column: &'static str,
    },
}

impl ConstraintDef {
    /// `ALTER TABLE ... ADD CONSTRAINT ...`
    ///
    /// PostgreSQL has no `IF NOT EXISTS` for constraints; callers check the
    /// live schema first.
    pub fn add_sql(&self) -> String {
        let body = match &self.kind {
            ConstraintKind::PrimaryKey { column } => {
                format!("PRIMARY KEY ({})", quote_ident(column))
            }
            ConstraintKind::Check(expr) => format!("CHECK ({})", expr),
            ConstraintKind::ForeignKey {
                column,
                references_table,
                references_column,
            } => format!(
                "FOREIGN KEY ({}) REFERENCES {} ({})",
                quote_ident(column),
                quote_ident(references_table),
                quote_ident(references_column)
            ),
        };

        format!(
            "ALTER TABLE {} ADD CONSTRAINT {} {}",
            quote_ident(self.table),
            quote_ident(&self.name),
            body
        )
    }
}

/// Quotes an SQL identifier
///
/// Every identifier is quoted: `user` is reserved in PostgreSQL and
/// `relatorioId` would otherwise be folded to lower case.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDGET: Table = Table {
        name: "widget",
        columns: &[
            Column {
                name: "id",
                ty: ColumnType::Serial,
                constraints: &[ColumnConstraint::PrimaryKey],
            },
            Column {
                name: "code",
                ty: ColumnType::Text,
                constraints: &[ColumnConstraint::Unique],
            },
            Column {
                name: "contact",
                ty: ColumnType::Text,
                constraints: &[
                    ColumnConstraint::Unique,
                    ColumnConstraint::Pattern(Pattern::Email),
                ],
            },
            Column {
                name: "notes",
                ty: ColumnType::LongText,
                constraints: &[],
            },
        ],
    };

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("user"), "\"user\"");
        assert_eq!(quote_ident("relatorioId"), "\"relatorioId\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_create_sql_declares_primary_key_only() {
        assert_eq!(
            WIDGET.create_sql(),
            "CREATE TABLE IF NOT EXISTS \"widget\" (\"id\" SERIAL PRIMARY KEY, \
             \"code\" VARCHAR(255), \"contact\" VARCHAR(255), \"notes\" TEXT)"
        );
    }

    #[test]
    fn test_add_column_sql() {
        let notes = WIDGET.column("notes").unwrap();
        assert_eq!(
            WIDGET.add_column_sql(notes),
            "ALTER TABLE \"widget\" ADD COLUMN IF NOT EXISTS \"notes\" TEXT"
        );
    }

    #[test]
    fn test_unique_indexes() {
        let indexes = WIDGET.unique_indexes();
        let names: Vec<&str> = indexes.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["widget_code_key", "widget_contact_key"]);
        assert_eq!(
            indexes[0].create_sql(),
            "CREATE UNIQUE INDEX IF NOT EXISTS \"widget_code_key\" ON \"widget\" (\"code\")"
        );
    }

    #[test]
    fn test_check_constraints() {
        let checks = WIDGET.check_constraints();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].name, "widget_contact_check");
        assert!(checks[0]
            .add_sql()
            .starts_with("ALTER TABLE \"widget\" ADD CONSTRAINT \"widget_contact_check\" CHECK (\"contact\" ~ "));
    }

    #[test]
    fn test_primary_key_constraint() {
        let pk = WIDGET.primary_key_constraint().unwrap();
        assert_eq!(pk.name, "widget_pkey");
        assert_eq!(
            pk.add_sql(),
            "ALTER TABLE \"widget\" ADD CONSTRAINT \"widget_pkey\" PRIMARY KEY (\"id\")"
        );

        let keyless = Table {
            name: "log",
            columns: &[Column {
                name: "line",
                ty: ColumnType::LongText,
                constraints: &[],
            }],
        };
        assert!(keyless.primary_key_constraint().is_none());
    }

    #[test]
    fn test_primary_key_lookup() {
        assert_eq!(WIDGET.primary_key().map(|c| c.name), Some("id"));
        assert!(WIDGET.column("missing").is_none());
    }
}
