//! [`AlertEngine`] — scan passes, dispatch, and the scheduled orchestrator.

use chrono::{Days, Duration, Utc};
use nimbus_core::{
  evaluate::{ProviderSnapshot, evaluate},
  history::{NewNotification, NotificationKind},
  preferences::UserPreferences,
  provider::{
    Directory, Location, Mailer, SpaceWeatherProvider, WeatherProvider,
  },
  rule::{AlertKind, AlertRule, AlertScope},
  snapshot::{SpaceWeatherEvent, WeatherSnapshot},
  store::{AlertRuleStore, HistoryStore, PreferenceStore},
};
use tokio::sync::broadcast;

use crate::{
  Error, Result,
  feed::NotificationLog,
  message,
  report::{
    PhaseReport, RunReport, ScanOutcome, SpaceSummary, WeatherSummary,
  },
};

/// Evaluates snapshots against stored rules and dispatches notifications.
///
/// `S` is one store implementing all three store traits; `M` sends email;
/// `D` resolves a user id to an email address at dispatch time. Everything
/// is injected — the engine holds no globals and opens no connections.
pub struct AlertEngine<S, M, D> {
  store:     S,
  mailer:    M,
  directory: D,
  log:       NotificationLog,
}

impl<S, M, D> AlertEngine<S, M, D>
where
  S: PreferenceStore + AlertRuleStore + HistoryStore,
  M: Mailer,
  D: Directory,
{
  pub fn new(store: S, mailer: M, directory: D) -> Self {
    Self {
      store,
      mailer,
      directory,
      log: NotificationLog::new(),
    }
  }

  /// Live feed of dispatched notification records.
  pub fn subscribe(
    &self,
  ) -> broadcast::Receiver<nimbus_core::history::NotificationRecord> {
    self.log.subscribe()
  }

  // ─── Scan passes ───────────────────────────────────────────────────────────

  /// Evaluate one fresh weather snapshot against every enabled rule scoped
  /// to `city`. Rules whose owner is silenced or unresolvable are skipped
  /// before evaluation.
  pub async fn scan_weather(
    &self,
    city: &str,
    snapshot: &WeatherSnapshot,
  ) -> Result<ScanOutcome> {
    let rules = self
      .store
      .list_enabled(&AlertScope::City(city.to_owned()))
      .await
      .map_err(Error::store)?;

    let mut outcome = ScanOutcome::default();
    for rule in &rules {
      let Some(prefs) = self.owner_prefs(rule).await else {
        continue;
      };

      outcome.rules_checked += 1;
      if evaluate(rule, ProviderSnapshot::Weather(snapshot)) {
        tracing::info!(
          rule_id = %rule.rule_id,
          owner_id = %rule.owner_id,
          city,
          "weather alert triggered"
        );
        self.dispatch_weather(rule, &prefs, city, snapshot).await;
        outcome.rules_triggered += 1;
      }
    }
    Ok(outcome)
  }

  /// Evaluate a batch of recent space-weather events against every enabled
  /// space-scoped rule. An empty batch is a no-op.
  pub async fn scan_space(
    &self,
    events: &[SpaceWeatherEvent],
  ) -> Result<ScanOutcome> {
    let mut outcome = ScanOutcome::default();
    if events.is_empty() {
      return Ok(outcome);
    }

    let rules = self
      .store
      .list_enabled(&AlertScope::Space)
      .await
      .map_err(Error::store)?;

    for rule in &rules {
      let Some(prefs) = self.owner_prefs(rule).await else {
        continue;
      };

      outcome.rules_checked += 1;
      if evaluate(rule, ProviderSnapshot::Space(events)) {
        tracing::info!(
          rule_id = %rule.rule_id,
          owner_id = %rule.owner_id,
          "space weather alert triggered"
        );
        self.dispatch_space(rule, &prefs, events).await;
        outcome.rules_triggered += 1;
      }
    }
    Ok(outcome)
  }

  /// The owner-preference gate: `None` silences the rule, whether because
  /// the owner has no preference record, the lookup failed, or
  /// notifications are switched off.
  async fn owner_prefs(&self, rule: &AlertRule) -> Option<UserPreferences> {
    let prefs = match self.store.get_preferences(rule.owner_id).await {
      Ok(Some(prefs)) => prefs,
      Ok(None) => {
        tracing::warn!(
          rule_id = %rule.rule_id,
          owner_id = %rule.owner_id,
          "rule owner has no preference record, skipping"
        );
        return None;
      }
      Err(e) => {
        tracing::warn!(
          rule_id = %rule.rule_id,
          owner_id = %rule.owner_id,
          error = %e,
          "preference lookup failed, skipping rule"
        );
        return None;
      }
    };

    prefs.notifications_enabled.then_some(prefs)
  }

  // ─── Dispatch ──────────────────────────────────────────────────────────────

  async fn dispatch_weather(
    &self,
    rule: &AlertRule,
    prefs: &UserPreferences,
    city: &str,
    snapshot: &WeatherSnapshot,
  ) {
    let message = match &rule.kind {
      AlertKind::Metric { metric, comparison, threshold } => {
        message::metric_message(
          *metric,
          *comparison,
          *threshold,
          city,
          snapshot.metric(*metric),
        )
      }
      AlertKind::Storm => {
        message::storm_message(city, &snapshot.description)
      }
      // space rules never evaluate true against a weather snapshot
      AlertKind::SpaceEvents { .. } => return,
    };
    let title = message::weather_title(&rule.kind, city);

    let email_sent = if prefs.email_notifications {
      let html =
        message::weather_email_html(&title, &message, city, snapshot);
      self.send_email(prefs.user_id, &title, &html).await
    } else {
      false
    };

    let payload = serde_json::json!({
      "city": city,
      "rule_id": rule.rule_id,
      "rule_type": rule.kind.discriminant(),
      "snapshot": snapshot,
    });
    self
      .append_record(NewNotification {
        user_id: rule.owner_id,
        kind: NotificationKind::Weather,
        title,
        message,
        payload,
        email_sent,
      })
      .await;
  }

  async fn dispatch_space(
    &self,
    rule: &AlertRule,
    prefs: &UserPreferences,
    events: &[SpaceWeatherEvent],
  ) {
    let title = message::SPACE_TITLE.to_owned();
    let message_text = message::space_message(events);

    let email_sent = if prefs.email_notifications {
      let html = message::space_email_html(events);
      self.send_email(prefs.user_id, &title, &html).await
    } else {
      false
    };

    let payload = serde_json::json!({
      "rule_id": rule.rule_id,
      "events": events,
    });
    self
      .append_record(NewNotification {
        user_id: rule.owner_id,
        kind: NotificationKind::SpaceWeather,
        title,
        message: message_text,
        payload,
        email_sent,
      })
      .await;
  }

  /// `true` only when the provider confirmed the send. Lookup and send
  /// failures are logged and reported as not-sent; they never abort the
  /// dispatch.
  async fn send_email(
    &self,
    user_id: uuid::Uuid,
    subject: &str,
    html: &str,
  ) -> bool {
    let email = match self.directory.email_for(user_id).await {
      Ok(Some(email)) => email,
      Ok(None) => {
        tracing::warn!(%user_id, "no email address on file, skipping send");
        return false;
      }
      Err(e) => {
        tracing::warn!(%user_id, error = %e, "email address lookup failed");
        return false;
      }
    };

    match self.mailer.send(&email, subject, html).await {
      Ok(id) => {
        tracing::info!(%user_id, message_id = %id.0, "alert email sent");
        true
      }
      Err(e) => {
        tracing::warn!(%user_id, error = %e, "alert email failed");
        false
      }
    }
  }

  /// History append failure is logged and swallowed: the scan pass carries
  /// on, and the record is simply absent from history.
  async fn append_record(&self, input: NewNotification) {
    let user_id = input.user_id;
    if let Err(e) = self.log.record(&self.store, input).await {
      tracing::error!(
        %user_id,
        error = %e,
        "failed to append notification history"
      );
    }
  }

  // ─── Scheduled orchestrator ────────────────────────────────────────────────

  /// One full scheduled check: a weather phase over every city referenced by
  /// an eligible user's enabled rules, then a space phase over the last 24
  /// hours of events. The phases are independent; each reports
  /// completed-with-summary or failed-with-error.
  pub async fn run_scheduled<W, P>(&self, weather: &W, space: &P) -> RunReport
  where
    W: WeatherProvider,
    P: SpaceWeatherProvider,
  {
    let ran_at = Utc::now();

    let weather_report = match self.weather_phase(weather).await {
      Ok(summary) => PhaseReport::Completed { summary },
      Err(e) => {
        tracing::error!(error = %e, "weather phase failed");
        PhaseReport::Failed { error: e.to_string() }
      }
    };

    let space_report = match self.space_phase(space).await {
      Ok(summary) => PhaseReport::Completed { summary },
      Err(e) => {
        tracing::error!(error = %e, "space weather phase failed");
        PhaseReport::Failed { error: e.to_string() }
      }
    };

    RunReport { ran_at, weather: weather_report, space: space_report }
  }

  async fn weather_phase<W: WeatherProvider>(
    &self,
    weather: &W,
  ) -> Result<WeatherSummary> {
    // Cities come only from users who can actually be notified, so a fully
    // silenced user costs zero fetches and zero evaluations.
    let users = self.store.list_preferences().await.map_err(Error::store)?;
    let mut cities: Vec<String> = Vec::new();
    for user in users.iter().filter(|u| u.notifications_enabled) {
      let rules = self
        .store
        .list_enabled_for_owner(user.user_id)
        .await
        .map_err(Error::store)?;
      for rule in rules {
        if let Some(city) = rule.scope.city() {
          if !cities.iter().any(|c| c == city) {
            cities.push(city.to_owned());
          }
        }
      }
    }

    let mut summary = WeatherSummary::default();
    for city in &cities {
      match weather.fetch_current(&Location::City(city.clone())).await {
        Ok(snapshot) => {
          let outcome = self.scan_weather(city, &snapshot).await?;
          summary.cities_checked += 1;
          summary.rules_checked += outcome.rules_checked;
          summary.notifications_sent += outcome.rules_triggered;
        }
        Err(e) => {
          tracing::warn!(city, error = %e, "could not fetch weather");
          summary.cities_failed += 1;
        }
      }
    }
    Ok(summary)
  }

  async fn space_phase<P: SpaceWeatherProvider>(
    &self,
    space: &P,
  ) -> Result<SpaceSummary> {
    let today = Utc::now().date_naive();
    let start = today - Days::new(1);
    let events = space.fetch_events(None, start, today).await?;

    let cutoff = Utc::now() - Duration::hours(24);
    let recent: Vec<SpaceWeatherEvent> =
      events.into_iter().filter(|e| e.issued_at > cutoff).collect();

    let mut summary = SpaceSummary {
      events_found: recent.len(),
      ..SpaceSummary::default()
    };
    if recent.is_empty() {
      tracing::debug!("no recent space weather events");
      return Ok(summary);
    }

    let outcome = self.scan_space(&recent).await?;
    summary.rules_checked = outcome.rules_checked;
    summary.notifications_sent = outcome.rules_triggered;
    Ok(summary)
  }
}
