//! SQL schema for the nimbus SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per user; created lazily on first authenticated read.
CREATE TABLE IF NOT EXISTS user_preferences (
    user_id               TEXT PRIMARY KEY,
    saved_cities          TEXT NOT NULL DEFAULT '[]',  -- JSON array, ordered
    default_city          TEXT,
    notifications_enabled INTEGER NOT NULL DEFAULT 1,
    email_notifications   INTEGER NOT NULL DEFAULT 0,
    updated_at            TEXT NOT NULL                -- ISO 8601 UTC
);

CREATE TABLE IF NOT EXISTS alert_rules (
    rule_id      TEXT PRIMARY KEY,
    owner_id     TEXT NOT NULL,
    city         TEXT,            -- NULL for space-scoped rules
    rule_type    TEXT NOT NULL,   -- 'temperature'|'humidity'|'wind'|'rain'|'storm'|'space'
    comparison   TEXT,            -- 'above'|'below'|'equals'; metric rules only
    threshold    REAL,            -- metric rules only
    event_types  TEXT,            -- JSON array of codes; space rules only
    min_severity TEXT,            -- 'C'|'M'|'X'; space rules only
    enabled      INTEGER NOT NULL DEFAULT 1,
    created_at   TEXT NOT NULL
);

-- Notification history is strictly append-only apart from the single
-- null -> timestamp transition of read_at.
CREATE TABLE IF NOT EXISTS notification_history (
    record_id  TEXT PRIMARY KEY,
    user_id    TEXT NOT NULL,
    kind       TEXT NOT NULL,     -- 'weather' | 'space_weather'
    title      TEXT NOT NULL,
    message    TEXT NOT NULL,
    payload    TEXT NOT NULL DEFAULT '{}',
    email_sent INTEGER NOT NULL DEFAULT 0,
    sent_at    TEXT NOT NULL,     -- server-assigned
    read_at    TEXT
);

CREATE INDEX IF NOT EXISTS alert_rules_owner_idx ON alert_rules(owner_id);
CREATE INDEX IF NOT EXISTS alert_rules_city_idx  ON alert_rules(city);
CREATE INDEX IF NOT EXISTS history_user_sent_idx
    ON notification_history(user_id, sent_at);

PRAGMA user_version = 1;
";
