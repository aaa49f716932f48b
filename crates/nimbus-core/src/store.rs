//! Store traits for preferences, alert rules, and notification history.
//!
//! Implemented by storage backends (e.g. `nimbus-store-sqlite`). Higher
//! layers (`nimbus-alerts`, `nimbus-api`) depend on these abstractions, not
//! on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  history::{NewNotification, NotificationRecord},
  preferences::{PreferencesUpdate, UserPreferences},
  rule::{AlertRule, AlertScope, NewAlertRule},
};

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Implemented by store error types so generic callers can tell owner-scoped
/// misses (map to 404) apart from real storage failures (map to 500).
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_not_found(&self) -> bool;
}

impl StoreError for std::convert::Infallible {
  fn is_not_found(&self) -> bool { match *self {} }
}

// ─── Preferences ─────────────────────────────────────────────────────────────

/// One preference record per user.
pub trait PreferenceStore: Send + Sync {
  type Error: StoreError;

  /// Retrieve a user's preferences. Returns `None` if never created.
  fn get_preferences(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<UserPreferences>, Self::Error>> + Send + '_;

  /// Apply a partial update, creating the record with defaults first if it
  /// does not exist. Returns the stored state after the update.
  fn upsert_preferences(
    &self,
    user_id: Uuid,
    update: PreferencesUpdate,
  ) -> impl Future<Output = Result<UserPreferences, Self::Error>> + Send + '_;

  /// Every known preference record — the orchestrator's user enumeration.
  fn list_preferences(
    &self,
  ) -> impl Future<Output = Result<Vec<UserPreferences>, Self::Error>> + Send + '_;
}

// ─── Alert rules ─────────────────────────────────────────────────────────────

/// User-owned alert rules. All mutating operations are owner-scoped: a
/// `rule_id` belonging to someone else behaves exactly like a missing one.
pub trait AlertRuleStore: Send + Sync {
  type Error: StoreError;

  /// Create and persist a new rule. `rule_id`/`created_at` are assigned by
  /// the store.
  fn create_rule(
    &self,
    input: NewAlertRule,
  ) -> impl Future<Output = Result<AlertRule, Self::Error>> + Send + '_;

  /// All rules owned by `owner_id`, enabled or not, newest first.
  fn list_rules(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Vec<AlertRule>, Self::Error>> + Send + '_;

  /// Every enabled rule matching `scope`, across all owners — the scanner's
  /// per-pass enumeration.
  fn list_enabled(
    &self,
    scope: &AlertScope,
  ) -> impl Future<Output = Result<Vec<AlertRule>, Self::Error>> + Send + '_;

  /// Enabled rules owned by `owner_id` — used to collect the cities an
  /// orchestrator pass must fetch.
  fn list_enabled_for_owner(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Vec<AlertRule>, Self::Error>> + Send + '_;

  /// Flip a rule's `enabled` flag. Fails with the store's not-found error if
  /// the rule does not exist or is not owned by `owner_id`.
  fn set_rule_enabled(
    &self,
    rule_id: Uuid,
    owner_id: Uuid,
    enabled: bool,
  ) -> impl Future<Output = Result<AlertRule, Self::Error>> + Send + '_;

  /// Delete a rule, owner-scoped like [`Self::set_rule_enabled`].
  fn delete_rule(
    &self,
    rule_id: Uuid,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Notification history ────────────────────────────────────────────────────

/// Append-only notification log with read-state tracking.
pub trait HistoryStore: Send + Sync {
  type Error: StoreError;

  /// Insert one record. Never updates or deletes existing rows.
  fn append(
    &self,
    input: NewNotification,
  ) -> impl Future<Output = Result<NotificationRecord, Self::Error>> + Send + '_;

  /// Records for `user_id`, newest first by `sent_at`.
  fn list_for_user(
    &self,
    user_id: Uuid,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<NotificationRecord>, Self::Error>> + Send + '_;

  /// Set `read_at` to now, scoped to the record's owner. Calling it again on
  /// an already-read record is a no-op that keeps the first timestamp. Fails
  /// with the store's not-found error if the record does not belong to
  /// `user_id`.
  fn mark_read(
    &self,
    record_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<NotificationRecord, Self::Error>> + Send + '_;
}
