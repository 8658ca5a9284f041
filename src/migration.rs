//! Auto-migration for the `people` and `addresses` tables.
//! Idempotent: creates what is missing and adds absent columns to existing tables.

use crate::error::AppError;
use sqlx::PgPool;

/// Columns per table after the primary key: (name, definition used by ADD COLUMN IF NOT EXISTS).
const PEOPLE_COLUMNS: &[(&str, &str)] = &[
    ("created_at", "TIMESTAMPTZ NOT NULL DEFAULT NOW()"),
    ("updated_at", "TIMESTAMPTZ NOT NULL DEFAULT NOW()"),
    ("deleted_at", "TIMESTAMPTZ"),
    ("name", "TEXT NOT NULL DEFAULT ''"),
    ("skills", "TEXT NOT NULL DEFAULT ''"),
    ("email", "VARCHAR(100) NOT NULL DEFAULT ''"),
];

const ADDRESSES_COLUMNS: &[(&str, &str)] = &[
    ("created_at", "TIMESTAMPTZ NOT NULL DEFAULT NOW()"),
    ("updated_at", "TIMESTAMPTZ NOT NULL DEFAULT NOW()"),
    ("deleted_at", "TIMESTAMPTZ"),
    ("person_id", "BIGINT NOT NULL DEFAULT 0"),
    ("city", "TEXT NOT NULL DEFAULT ''"),
    ("state", "TEXT NOT NULL DEFAULT ''"),
    ("mobile", "TEXT NOT NULL DEFAULT ''"),
];

fn create_table_sql(table: &str, columns: &[(&str, &str)]) -> String {
    let mut defs = vec!["id BIGSERIAL PRIMARY KEY".to_string()];
    defs.extend(columns.iter().map(|(name, def)| format!("{} {}", name, def)));
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
        table,
        defs.join(",\n  ")
    )
}

async fn ensure_table(pool: &PgPool, table: &str, columns: &[(&str, &str)]) -> Result<(), AppError> {
    let ddl = create_table_sql(table, columns);
    tracing::debug!(sql = %ddl, "migrate");
    sqlx::query(&ddl).execute(pool).await?;
    for (name, def) in columns {
        let alter = format!("ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} {}", table, name, def);
        sqlx::query(&alter).execute(pool).await?;
    }
    Ok(())
}

/// Statements run after both tables exist. Uniqueness only holds among live rows.
fn index_statements() -> Vec<&'static str> {
    vec![
        "CREATE UNIQUE INDEX IF NOT EXISTS uix_people_email ON people (email) WHERE deleted_at IS NULL",
        "CREATE INDEX IF NOT EXISTS idx_people_deleted_at ON people (deleted_at)",
        "CREATE UNIQUE INDEX IF NOT EXISTS uix_addresses_mobile ON addresses (mobile) WHERE deleted_at IS NULL",
        "CREATE INDEX IF NOT EXISTS idx_addresses_deleted_at ON addresses (deleted_at)",
        "CREATE INDEX IF NOT EXISTS idx_addresses_person_id ON addresses (person_id)",
    ]
}

pub const PERSON_FK: &str = "fk_addresses_person";

const ADD_PERSON_FK: &str = r#"
DO $$
BEGIN
    IF NOT EXISTS (SELECT 1 FROM pg_constraint WHERE conname = 'fk_addresses_person') THEN
        ALTER TABLE addresses ADD CONSTRAINT fk_addresses_person
            FOREIGN KEY (person_id) REFERENCES people (id) ON UPDATE CASCADE ON DELETE CASCADE;
    END IF;
END
$$"#;

/// Outcome of `auto_migrate`. `missing_foreign_key` holds the reason the FK could not be added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub missing_foreign_key: Option<String>,
}

impl MigrationReport {
    pub fn foreign_key_status(&self) -> String {
        match self.missing_foreign_key {
            None => "present".to_string(),
            Some(ref reason) => format!("missing: {}", reason),
        }
    }
}

/// Create or alter both tables, their indexes, and the address-to-person foreign key.
pub async fn auto_migrate(pool: &PgPool) -> Result<MigrationReport, AppError> {
    ensure_table(pool, "people", PEOPLE_COLUMNS).await?;
    ensure_table(pool, "addresses", ADDRESSES_COLUMNS).await?;
    for sql in index_statements() {
        tracing::debug!(sql = %sql, "migrate");
        sqlx::query(sql).execute(pool).await?;
    }
    let mut report = MigrationReport::default();
    // Existing rows may hold orphaned person ids; the schema stays usable without the constraint.
    if let Err(e) = sqlx::query(ADD_PERSON_FK).execute(pool).await {
        tracing::warn!(constraint = PERSON_FK, error = %e, "could not add addresses.person_id foreign key");
        report.missing_foreign_key = Some(e.to_string());
    }
    tracing::info!(
        constraint = PERSON_FK,
        foreign_key = %report.foreign_key_status(),
        "schema migrated for people and addresses"
    );
    Ok(report)
}
