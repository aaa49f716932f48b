//! [`SqliteStore`] — the SQLite implementation of the nimbus store traits.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use nimbus_core::{
  history::{NewNotification, NotificationRecord},
  preferences::{PreferencesUpdate, UserPreferences},
  rule::{AlertRule, AlertScope, NewAlertRule},
  store::{AlertRuleStore, HistoryStore, PreferenceStore},
};

use crate::{
  Error, Result,
  encode::{
    RawNotification, RawPreferences, RawRule, encode_dt, encode_uuid,
    rule_columns,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A nimbus store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. The store is
/// constructed once in `main` and injected everywhere it is needed; nothing
/// reaches it through a global.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

const RULE_COLUMNS: &str = "rule_id, owner_id, city, rule_type, comparison, \
                            threshold, event_types, min_severity, enabled, \
                            created_at";

const PREF_COLUMNS: &str = "user_id, saved_cities, default_city, \
                            notifications_enabled, email_notifications, \
                            updated_at";

const HISTORY_COLUMNS: &str = "record_id, user_id, kind, title, message, \
                               payload, email_sent, sent_at, read_at";

fn rule_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRule> {
  Ok(RawRule {
    rule_id:      row.get(0)?,
    owner_id:     row.get(1)?,
    city:         row.get(2)?,
    rule_type:    row.get(3)?,
    comparison:   row.get(4)?,
    threshold:    row.get(5)?,
    event_types:  row.get(6)?,
    min_severity: row.get(7)?,
    enabled:      row.get(8)?,
    created_at:   row.get(9)?,
  })
}

fn prefs_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawPreferences> {
  Ok(RawPreferences {
    user_id:               row.get(0)?,
    saved_cities:          row.get(1)?,
    default_city:          row.get(2)?,
    notifications_enabled: row.get(3)?,
    email_notifications:   row.get(4)?,
    updated_at:            row.get(5)?,
  })
}

fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawNotification> {
  Ok(RawNotification {
    record_id:  row.get(0)?,
    user_id:    row.get(1)?,
    kind:       row.get(2)?,
    title:      row.get(3)?,
    message:    row.get(4)?,
    payload:    row.get(5)?,
    email_sent: row.get(6)?,
    sent_at:    row.get(7)?,
    read_at:    row.get(8)?,
  })
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`UserPreferences`] row, replacing any existing
  /// row for the same user.
  async fn write_preferences(&self, prefs: &UserPreferences) -> Result<()> {
    let user_id_str = encode_uuid(prefs.user_id);
    let cities_str  = serde_json::to_string(&prefs.saved_cities)?;
    let default_city = prefs.default_city.clone();
    let notifications_enabled = prefs.notifications_enabled;
    let email_notifications = prefs.email_notifications;
    let updated_str = encode_dt(prefs.updated_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO user_preferences (
             user_id, saved_cities, default_city,
             notifications_enabled, email_notifications, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            user_id_str,
            cities_str,
            default_city,
            notifications_enabled,
            email_notifications,
            updated_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch one rule row by id + owner. `None` when missing or foreign-owned.
  async fn get_rule_scoped(
    &self,
    rule_id: Uuid,
    owner_id: Uuid,
  ) -> Result<Option<AlertRule>> {
    let id_str    = encode_uuid(rule_id);
    let owner_str = encode_uuid(owner_id);

    let raw: Option<RawRule> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {RULE_COLUMNS} FROM alert_rules
                 WHERE rule_id = ?1 AND owner_id = ?2"
              ),
              rusqlite::params![id_str, owner_str],
              rule_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRule::into_rule).transpose()
  }
}

// ─── PreferenceStore impl ────────────────────────────────────────────────────

impl PreferenceStore for SqliteStore {
  type Error = Error;

  async fn get_preferences(
    &self,
    user_id: Uuid,
  ) -> Result<Option<UserPreferences>> {
    let id_str = encode_uuid(user_id);

    let raw: Option<RawPreferences> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {PREF_COLUMNS} FROM user_preferences
                 WHERE user_id = ?1"
              ),
              rusqlite::params![id_str],
              prefs_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPreferences::into_preferences).transpose()
  }

  async fn upsert_preferences(
    &self,
    user_id: Uuid,
    update: PreferencesUpdate,
  ) -> Result<UserPreferences> {
    let mut prefs = self
      .get_preferences(user_id)
      .await?
      .unwrap_or_else(|| UserPreferences::defaults(user_id));

    if let Some(cities) = update.saved_cities {
      prefs.saved_cities = cities;
    }
    if let Some(default_city) = update.default_city {
      prefs.default_city = default_city;
    }
    if let Some(enabled) = update.notifications_enabled {
      prefs.notifications_enabled = enabled;
    }
    if let Some(email) = update.email_notifications {
      prefs.email_notifications = email;
    }
    prefs.updated_at = Utc::now();

    self.write_preferences(&prefs).await?;
    Ok(prefs)
  }

  async fn list_preferences(&self) -> Result<Vec<UserPreferences>> {
    let raws: Vec<RawPreferences> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare(&format!("SELECT {PREF_COLUMNS} FROM user_preferences"))?;
        let rows = stmt
          .query_map([], prefs_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawPreferences::into_preferences)
      .collect()
  }
}

// ─── AlertRuleStore impl ─────────────────────────────────────────────────────

impl AlertRuleStore for SqliteStore {
  type Error = Error;

  async fn create_rule(&self, input: NewAlertRule) -> Result<AlertRule> {
    let rule = AlertRule {
      rule_id: Uuid::new_v4(),
      owner_id: input.owner_id,
      scope: input.scope,
      kind: input.kind,
      enabled: input.enabled,
      created_at: Utc::now(),
    };

    let cols = rule_columns(&rule.scope, &rule.kind)?;
    let id_str      = encode_uuid(rule.rule_id);
    let owner_str   = encode_uuid(rule.owner_id);
    let created_str = encode_dt(rule.created_at);
    let enabled     = rule.enabled;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO alert_rules (
             rule_id, owner_id, city, rule_type, comparison,
             threshold, event_types, min_severity, enabled, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str,
            owner_str,
            cols.city,
            cols.rule_type,
            cols.comparison,
            cols.threshold,
            cols.event_types,
            cols.min_severity,
            enabled,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(rule)
  }

  async fn list_rules(&self, owner_id: Uuid) -> Result<Vec<AlertRule>> {
    let owner_str = encode_uuid(owner_id);

    let raws: Vec<RawRule> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RULE_COLUMNS} FROM alert_rules
           WHERE owner_id = ?1
           ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], rule_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRule::into_rule).collect()
  }

  fn list_enabled(
    &self,
    scope: &AlertScope,
  ) -> impl Future<Output = Result<Vec<AlertRule>>> + Send + '_ {
    let city = scope.city().map(str::to_owned);

    async move {
      let raws: Vec<RawRule> = self
        .conn
        .call(move |conn| {
          let rows = if let Some(city) = city {
            let mut stmt = conn.prepare(&format!(
              "SELECT {RULE_COLUMNS} FROM alert_rules
               WHERE enabled = 1 AND city = ?1"
            ))?;
            stmt
              .query_map(rusqlite::params![city], rule_from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?
          } else {
            let mut stmt = conn.prepare(&format!(
              "SELECT {RULE_COLUMNS} FROM alert_rules
               WHERE enabled = 1 AND rule_type = 'space'"
            ))?;
            stmt
              .query_map([], rule_from_row)?
              .collect::<rusqlite::Result<Vec<_>>>()?
          };
          Ok(rows)
        })
        .await?;

      raws.into_iter().map(RawRule::into_rule).collect()
    }
  }

  async fn list_enabled_for_owner(
    &self,
    owner_id: Uuid,
  ) -> Result<Vec<AlertRule>> {
    let owner_str = encode_uuid(owner_id);

    let raws: Vec<RawRule> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RULE_COLUMNS} FROM alert_rules
           WHERE owner_id = ?1 AND enabled = 1"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![owner_str], rule_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRule::into_rule).collect()
  }

  async fn set_rule_enabled(
    &self,
    rule_id: Uuid,
    owner_id: Uuid,
    enabled: bool,
  ) -> Result<AlertRule> {
    let id_str    = encode_uuid(rule_id);
    let owner_str = encode_uuid(owner_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE alert_rules SET enabled = ?3
           WHERE rule_id = ?1 AND owner_id = ?2",
          rusqlite::params![id_str, owner_str, enabled],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::RuleNotFound(rule_id));
    }

    self
      .get_rule_scoped(rule_id, owner_id)
      .await?
      .ok_or(Error::RuleNotFound(rule_id))
  }

  async fn delete_rule(&self, rule_id: Uuid, owner_id: Uuid) -> Result<()> {
    let id_str    = encode_uuid(rule_id);
    let owner_str = encode_uuid(owner_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM alert_rules WHERE rule_id = ?1 AND owner_id = ?2",
          rusqlite::params![id_str, owner_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::RuleNotFound(rule_id));
    }
    Ok(())
  }
}

// ─── HistoryStore impl ───────────────────────────────────────────────────────

impl HistoryStore for SqliteStore {
  type Error = Error;

  async fn append(&self, input: NewNotification) -> Result<NotificationRecord> {
    let record = NotificationRecord {
      record_id: Uuid::new_v4(),
      user_id: input.user_id,
      kind: input.kind,
      title: input.title,
      message: input.message,
      payload: input.payload,
      email_sent: input.email_sent,
      sent_at: Utc::now(),
      read_at: None,
    };

    let id_str      = encode_uuid(record.record_id);
    let user_str    = encode_uuid(record.user_id);
    let kind_str    = record.kind.as_str();
    let title       = record.title.clone();
    let message     = record.message.clone();
    let payload_str = record.payload.to_string();
    let email_sent  = record.email_sent;
    let sent_str    = encode_dt(record.sent_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO notification_history (
             record_id, user_id, kind, title, message,
             payload, email_sent, sent_at, read_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL)",
          rusqlite::params![
            id_str, user_str, kind_str, title, message, payload_str,
            email_sent, sent_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn list_for_user(
    &self,
    user_id: Uuid,
    limit: usize,
  ) -> Result<Vec<NotificationRecord>> {
    let user_str  = encode_uuid(user_id);
    let limit_val = limit as i64;

    let raws: Vec<RawNotification> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {HISTORY_COLUMNS} FROM notification_history
           WHERE user_id = ?1
           ORDER BY sent_at DESC
           LIMIT ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_str, limit_val], record_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawNotification::into_record).collect()
  }

  async fn mark_read(
    &self,
    record_id: Uuid,
    user_id: Uuid,
  ) -> Result<NotificationRecord> {
    let id_str   = encode_uuid(record_id);
    let user_str = encode_uuid(user_id);

    let raw: Option<RawNotification> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {HISTORY_COLUMNS} FROM notification_history
                 WHERE record_id = ?1 AND user_id = ?2"
              ),
              rusqlite::params![id_str, user_str],
              record_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    let mut record = raw
      .ok_or(Error::RecordNotFound(record_id))?
      .into_record()?;

    // Already read: no-op, the first timestamp stands.
    if record.read_at.is_some() {
      return Ok(record);
    }

    let now = Utc::now();
    let id_str  = encode_uuid(record_id);
    let now_str = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE notification_history SET read_at = ?2
           WHERE record_id = ?1 AND read_at IS NULL",
          rusqlite::params![id_str, now_str],
        )?;
        Ok(())
      })
      .await?;

    record.read_at = Some(now);
    Ok(record)
  }
}
