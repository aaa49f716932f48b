//! Integration tests for `SqliteStore` against an in-memory database.

use nimbus_core::{
  history::{NewNotification, NotificationKind},
  preferences::PreferencesUpdate,
  rule::{AlertKind, AlertScope, Comparison, Metric, NewAlertRule},
  severity::Severity,
  snapshot::EventType,
  store::{AlertRuleStore, HistoryStore, PreferenceStore},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn temp_rule(owner_id: Uuid, city: &str, threshold: f64) -> NewAlertRule {
  NewAlertRule::new(
    owner_id,
    AlertScope::City(city.into()),
    AlertKind::Metric {
      metric: Metric::Temperature,
      comparison: Comparison::Above,
      threshold,
    },
  )
}

fn space_rule(owner_id: Uuid) -> NewAlertRule {
  NewAlertRule::new(
    owner_id,
    AlertScope::Space,
    AlertKind::SpaceEvents {
      event_types:  vec![EventType::FLR, EventType::CME],
      min_severity: Severity::M,
    },
  )
}

fn weather_notification(user_id: Uuid, title: &str) -> NewNotification {
  NewNotification {
    user_id,
    kind: NotificationKind::Weather,
    title: title.into(),
    message: "temperature is above 30 in Cairo. Current: 34°C".into(),
    payload: serde_json::json!({ "city": "Cairo" }),
    email_sent: false,
  }
}

// ─── Preferences ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_preferences_missing_returns_none() {
  let s = store().await;
  let result = s.get_preferences(Uuid::new_v4()).await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn upsert_creates_defaults_then_applies_update() {
  let s = store().await;
  let user = Uuid::new_v4();

  let prefs = s
    .upsert_preferences(user, PreferencesUpdate {
      saved_cities: Some(vec!["London".into(), "Oslo".into()]),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(prefs.saved_cities, &["London", "Oslo"]);
  // untouched fields keep their defaults
  assert!(prefs.notifications_enabled);
  assert!(!prefs.email_notifications);
  assert!(prefs.default_city.is_none());
}

#[tokio::test]
async fn partial_update_leaves_other_fields_alone() {
  let s = store().await;
  let user = Uuid::new_v4();

  s.upsert_preferences(user, PreferencesUpdate {
    saved_cities: Some(vec!["Tokyo".into()]),
    default_city: Some(Some("Tokyo".into())),
    ..Default::default()
  })
  .await
  .unwrap();

  let prefs = s
    .upsert_preferences(user, PreferencesUpdate {
      email_notifications: Some(true),
      ..Default::default()
    })
    .await
    .unwrap();

  assert_eq!(prefs.saved_cities, &["Tokyo"]);
  assert_eq!(prefs.default_city.as_deref(), Some("Tokyo"));
  assert!(prefs.email_notifications);
}

#[tokio::test]
async fn default_city_can_be_cleared() {
  let s = store().await;
  let user = Uuid::new_v4();

  s.upsert_preferences(user, PreferencesUpdate {
    default_city: Some(Some("Lagos".into())),
    ..Default::default()
  })
  .await
  .unwrap();

  let prefs = s
    .upsert_preferences(user, PreferencesUpdate {
      default_city: Some(None),
      ..Default::default()
    })
    .await
    .unwrap();

  assert!(prefs.default_city.is_none());
}

#[tokio::test]
async fn list_preferences_returns_all_rows() {
  let s = store().await;

  s.upsert_preferences(Uuid::new_v4(), PreferencesUpdate::default())
    .await
    .unwrap();
  s.upsert_preferences(Uuid::new_v4(), PreferencesUpdate::default())
    .await
    .unwrap();

  let all = s.list_preferences().await.unwrap();
  assert_eq!(all.len(), 2);
}

// ─── Alert rules ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_list_rules() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let rule = s.create_rule(temp_rule(owner, "Cairo", 30.0)).await.unwrap();
  assert!(rule.enabled);
  assert_eq!(rule.scope.city(), Some("Cairo"));

  let rules = s.list_rules(owner).await.unwrap();
  assert_eq!(rules.len(), 1);
  assert_eq!(rules[0].rule_id, rule.rule_id);
  assert!(matches!(
    rules[0].kind,
    AlertKind::Metric { metric: Metric::Temperature, comparison: Comparison::Above, threshold }
      if threshold == 30.0
  ));
}

#[tokio::test]
async fn space_rule_roundtrip() {
  let s = store().await;
  let owner = Uuid::new_v4();

  s.create_rule(space_rule(owner)).await.unwrap();

  let rules = s.list_rules(owner).await.unwrap();
  assert_eq!(rules.len(), 1);
  assert_eq!(rules[0].scope, AlertScope::Space);
  assert!(matches!(
    &rules[0].kind,
    AlertKind::SpaceEvents { event_types, min_severity: Severity::M }
      if event_types == &[EventType::FLR, EventType::CME]
  ));
}

#[tokio::test]
async fn list_rules_does_not_leak_other_owners() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();

  s.create_rule(temp_rule(alice, "Cairo", 30.0)).await.unwrap();
  s.create_rule(temp_rule(bob, "Oslo", -5.0)).await.unwrap();

  let rules = s.list_rules(alice).await.unwrap();
  assert_eq!(rules.len(), 1);
  assert_eq!(rules[0].owner_id, alice);
}

#[tokio::test]
async fn list_enabled_filters_by_city_and_flag() {
  let s = store().await;
  let owner = Uuid::new_v4();

  let cairo = s.create_rule(temp_rule(owner, "Cairo", 30.0)).await.unwrap();
  s.create_rule(temp_rule(owner, "Oslo", -5.0)).await.unwrap();
  let disabled = s.create_rule(temp_rule(owner, "Cairo", 40.0)).await.unwrap();
  s.set_rule_enabled(disabled.rule_id, owner, false)
    .await
    .unwrap();

  let matches = s
    .list_enabled(&AlertScope::City("Cairo".into()))
    .await
    .unwrap();
  assert_eq!(matches.len(), 1);
  assert_eq!(matches[0].rule_id, cairo.rule_id);
}

#[tokio::test]
async fn list_enabled_space_scope_ignores_city_rules() {
  let s = store().await;
  let owner = Uuid::new_v4();

  s.create_rule(temp_rule(owner, "Cairo", 30.0)).await.unwrap();
  let space = s.create_rule(space_rule(owner)).await.unwrap();

  let matches = s.list_enabled(&AlertScope::Space).await.unwrap();
  assert_eq!(matches.len(), 1);
  assert_eq!(matches[0].rule_id, space.rule_id);
}

#[tokio::test]
async fn toggle_rule_roundtrip() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let rule = s.create_rule(temp_rule(owner, "Cairo", 30.0)).await.unwrap();

  let off = s
    .set_rule_enabled(rule.rule_id, owner, false)
    .await
    .unwrap();
  assert!(!off.enabled);

  let on = s.set_rule_enabled(rule.rule_id, owner, true).await.unwrap();
  assert!(on.enabled);
}

#[tokio::test]
async fn toggle_foreign_rule_errors_not_found() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let rule = s.create_rule(temp_rule(owner, "Cairo", 30.0)).await.unwrap();

  let err = s
    .set_rule_enabled(rule.rule_id, Uuid::new_v4(), false)
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::RuleNotFound(_)));
}

#[tokio::test]
async fn delete_rule_removes_it() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let rule = s.create_rule(temp_rule(owner, "Cairo", 30.0)).await.unwrap();

  s.delete_rule(rule.rule_id, owner).await.unwrap();
  assert!(s.list_rules(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_foreign_rule_errors_and_keeps_row() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let rule = s.create_rule(temp_rule(owner, "Cairo", 30.0)).await.unwrap();

  let err = s
    .delete_rule(rule.rule_id, Uuid::new_v4())
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::RuleNotFound(_)));
  assert_eq!(s.list_rules(owner).await.unwrap().len(), 1);
}

// ─── Notification history ────────────────────────────────────────────────────

#[tokio::test]
async fn append_and_list_newest_first() {
  let s = store().await;
  let user = Uuid::new_v4();

  let first = s
    .append(weather_notification(user, "first"))
    .await
    .unwrap();
  // sent_at has second-level ties broken by insertion; space the rows out
  tokio::time::sleep(std::time::Duration::from_millis(5)).await;
  let second = s
    .append(weather_notification(user, "second"))
    .await
    .unwrap();

  let records = s.list_for_user(user, 50).await.unwrap();
  assert_eq!(records.len(), 2);
  assert_eq!(records[0].record_id, second.record_id);
  assert_eq!(records[1].record_id, first.record_id);
}

#[tokio::test]
async fn list_respects_limit_and_user_scope() {
  let s = store().await;
  let user = Uuid::new_v4();
  let other = Uuid::new_v4();

  for i in 0..3 {
    s.append(weather_notification(user, &format!("n{i}")))
      .await
      .unwrap();
  }
  s.append(weather_notification(other, "not yours"))
    .await
    .unwrap();

  let records = s.list_for_user(user, 2).await.unwrap();
  assert_eq!(records.len(), 2);
  assert!(records.iter().all(|r| r.user_id == user));
}

#[tokio::test]
async fn mark_read_sets_timestamp_once() {
  let s = store().await;
  let user = Uuid::new_v4();
  let record = s
    .append(weather_notification(user, "storm warning"))
    .await
    .unwrap();
  assert!(record.read_at.is_none());

  let read = s.mark_read(record.record_id, user).await.unwrap();
  let first_read_at = read.read_at.expect("read_at set");

  // second call is a no-op; the original timestamp stands
  let again = s.mark_read(record.record_id, user).await.unwrap();
  assert_eq!(again.read_at, Some(first_read_at));
}

#[tokio::test]
async fn mark_read_wrong_user_errors_not_found() {
  let s = store().await;
  let user = Uuid::new_v4();
  let record = s
    .append(weather_notification(user, "storm warning"))
    .await
    .unwrap();

  let err = s
    .mark_read(record.record_id, Uuid::new_v4())
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::RecordNotFound(_)));
}

#[tokio::test]
async fn payload_roundtrips_as_json() {
  let s = store().await;
  let user = Uuid::new_v4();

  let mut input = weather_notification(user, "detail check");
  input.payload = serde_json::json!({
    "city": "Cairo",
    "metric": "temperature",
    "value": 34.2,
  });
  input.email_sent = true;

  s.append(input).await.unwrap();

  let records = s.list_for_user(user, 10).await.unwrap();
  assert_eq!(records[0].payload["value"], 34.2);
  assert!(records[0].email_sent);
}
