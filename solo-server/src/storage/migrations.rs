//! Database Migrations - PostgreSQL schema for the record table
//!
//! Same shape as the PostgREST table so both backends can share a database.

/// Single-row record table
pub const MIGRATION_V1: &str = r#"
CREATE TABLE IF NOT EXISTS player_data (
    id          TEXT PRIMARY KEY,
    data        JSONB NOT NULL DEFAULT '{}'::jsonb,
    updated_at  TIMESTAMP WITH TIME ZONE DEFAULT NOW()
);
"#;

/// Get all migrations in order
pub fn get_migrations() -> Vec<(&'static str, &'static str)> {
    vec![
        ("v1_player_data", MIGRATION_V1),
    ]
}
