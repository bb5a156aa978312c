//! PM policy engine

use chrono::{DateTime, Local};
use pmtrack_catalog::Catalog;
use pmtrack_store::Store;
use pmtrack_types::{PmRecord, RetentionPeriod, SessionInfo, Settings, StageResults, Zone};
use pmtrack_util::{EquipmentTag, PmError, Result, SessionId, start_of_week};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{ActiveSession, CoreEvent};

/// How many engine events to keep for the monitoring screen.
const EVENT_LOG_CAPACITY: usize = 64;

/// The PM policy engine.
///
/// Owns the confirmed record set, the active sessions, and the effective
/// settings. One instance per process; the shell drives it by mutable
/// reference. Every record mutation writes the full set back through the
/// store.
pub struct PolicyEngine {
    store: Arc<dyn Store>,
    catalog: Arc<Catalog>,
    records: Vec<PmRecord>,
    sessions: Vec<ActiveSession>,
    settings: Settings,
    events: Vec<CoreEvent>,
}

impl PolicyEngine {
    /// Create an engine over a store and catalog.
    ///
    /// An unreadable store degrades to an empty record set so the terminal
    /// stays usable; persisted settings win over `default_settings` when
    /// present.
    pub fn new(store: Arc<dyn Store>, catalog: Arc<Catalog>, default_settings: Settings) -> Self {
        let records = match store.load_records() {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Could not load PM records, starting empty");
                Vec::new()
            }
        };

        let settings = match store.load_settings() {
            Ok(Some(settings)) => settings,
            Ok(None) => default_settings,
            Err(e) => {
                warn!(error = %e, "Could not load settings, using defaults");
                default_settings
            }
        };

        info!(
            record_count = records.len(),
            retention = settings.retention.as_str(),
            warning_hours = settings.warning_period_hours,
            "Policy engine initialized"
        );

        Self {
            store,
            catalog,
            records,
            sessions: Vec::new(),
            settings,
            events: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Confirmed records in storage order.
    pub fn records(&self) -> &[PmRecord] {
        &self.records
    }

    /// Confirmed records, most recent first.
    pub fn history(&self) -> Vec<&PmRecord> {
        let mut records: Vec<&PmRecord> = self.records.iter().collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    /// In-progress sessions for the monitoring screen.
    pub fn active_sessions(&self) -> Vec<SessionInfo> {
        self.sessions.iter().map(ActiveSession::to_session_info).collect()
    }

    /// Drop all in-progress sessions, e.g. at logout.
    pub fn clear_sessions(&mut self) {
        if !self.sessions.is_empty() {
            debug!(count = self.sessions.len(), "Clearing active sessions");
            self.sessions.clear();
        }
    }

    /// Recent events, oldest first. Draining leaves the log empty.
    pub fn drain_events(&mut self) -> Vec<CoreEvent> {
        std::mem::take(&mut self.events)
    }

    fn push_event(&mut self, event: CoreEvent) {
        if self.events.len() >= EVENT_LOG_CAPACITY {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    /// Begin an inspection of `tag` within `zone`.
    ///
    /// The equipment must exist in the zone's catalog. Several sessions may
    /// be open at once, even on the same equipment; the returned id is what
    /// distinguishes them at completion.
    pub fn begin_session(
        &mut self,
        user: &str,
        zone: Zone,
        tag: &EquipmentTag,
        now: DateTime<Local>,
    ) -> Result<SessionId> {
        let equipment = self.catalog.find(zone, tag).ok_or_else(|| {
            PmError::EquipmentNotFound {
                zone: zone.to_string(),
                tag: tag.clone(),
            }
        })?;

        let session = ActiveSession::new(user, equipment, now);
        let session_id = session.id;

        info!(
            session_id = %session_id,
            user,
            zone = %zone,
            tag = %tag,
            "Session started"
        );

        self.sessions.push(session);
        self.push_event(CoreEvent::SessionStarted {
            session_id,
            user: user.to_string(),
            tag: tag.clone(),
        });

        Ok(session_id)
    }

    /// Whether `user` already inspected `tag` within the warning window.
    ///
    /// The boundary is exclusive: a record dated exactly one window ago
    /// does not warn.
    pub fn check_repeat_warning(
        &self,
        user: &str,
        tag: &EquipmentTag,
        now: DateTime<Local>,
    ) -> bool {
        let window = self.settings.warning_window();
        self.records.iter().any(|record| {
            record.tag == *tag && record.user == user && {
                let elapsed = record.elapsed_since(now);
                elapsed < window
            }
        })
    }

    /// Confirm a session as a PM record.
    ///
    /// Validation runs before any mutation, so a rejected confirmation
    /// leaves both the record set and the session untouched. After the
    /// record is accepted the session is gone even if the save fails; the
    /// storage error is surfaced so the operator knows the disk copy is
    /// stale.
    pub fn complete_session(
        &mut self,
        session_id: SessionId,
        results: StageResults,
        now: DateTime<Local>,
    ) -> Result<PmRecord> {
        let index = self
            .sessions
            .iter()
            .position(|s| s.id == session_id)
            .ok_or(PmError::SessionNotFound(session_id))?;

        results
            .validate()
            .map_err(|e| PmError::ValidationFailed(e.to_string()))?;

        let mut session = self.sessions.remove(index);
        session.mark_recorded();

        let record = PmRecord {
            user: session.user,
            zone: session.zone,
            tag: session.tag,
            description: session.description,
            timestamp: now,
            results,
        };
        self.records.push(record.clone());

        info!(
            session_id = %session_id,
            user = %record.user,
            tag = %record.tag,
            "PM record confirmed"
        );

        self.push_event(CoreEvent::RecordConfirmed {
            session_id,
            user: record.user.clone(),
            tag: record.tag.clone(),
            timestamp: record.timestamp,
        });

        if let Err(e) = self.store.save_records(&self.records) {
            warn!(error = %e, "PM record kept in memory but not persisted");
            return Err(PmError::storage(e.to_string()));
        }

        Ok(record)
    }

    /// Abandon a session without creating a record.
    pub fn cancel_session(&mut self, session_id: SessionId) -> Result<()> {
        let index = self
            .sessions
            .iter()
            .position(|s| s.id == session_id)
            .ok_or(PmError::SessionNotFound(session_id))?;

        let mut session = self.sessions.remove(index);
        session.mark_discarded();

        info!(session_id = %session_id, tag = %session.tag, "Session discarded");
        self.push_event(CoreEvent::SessionDiscarded {
            session_id,
            tag: session.tag,
        });

        Ok(())
    }

    /// Drop records older than the most recent Monday 00:00 local time.
    ///
    /// Returns the number of records dropped. Runs once at startup and is
    /// idempotent. The purge always uses the weekly boundary; other stored
    /// retention periods only change the label shown in settings.
    pub fn apply_retention_policy(&mut self, now: DateTime<Local>) -> Result<usize> {
        if self.settings.retention != RetentionPeriod::Weekly {
            warn!(
                retention = self.settings.retention.as_str(),
                "Retention period is informational only, purging on the weekly boundary"
            );
        }

        let boundary = start_of_week(now);
        let before = self.records.len();
        self.records.retain(|r| r.timestamp.date_naive() >= boundary);
        let dropped = before - self.records.len();

        if dropped == 0 {
            debug!(boundary = %boundary, "Retention pass dropped nothing");
            return Ok(0);
        }

        info!(
            boundary = %boundary,
            dropped,
            retained = self.records.len(),
            "Retention policy applied"
        );
        self.push_event(CoreEvent::RetentionApplied { boundary, dropped });

        self.store
            .save_records(&self.records)
            .map_err(|e| PmError::storage(e.to_string()))?;

        Ok(dropped)
    }

    /// Change the repeat-warning window, in whole hours.
    pub fn update_warning_period(&mut self, hours: u32) -> Result<()> {
        if hours == 0 {
            return Err(PmError::invalid_parameter(
                "Warning period must be at least 1 hour",
            ));
        }

        self.settings.warning_period_hours = hours;
        self.persist_settings()?;

        info!(warning_hours = hours, "Warning period updated");
        Ok(())
    }

    /// Change the stored retention period.
    pub fn update_retention_period(&mut self, period: RetentionPeriod) -> Result<()> {
        self.settings.retention = period;
        self.persist_settings()?;

        info!(retention = period.as_str(), "Retention period updated");
        Ok(())
    }

    fn persist_settings(&mut self) -> Result<()> {
        self.push_event(CoreEvent::SettingsChanged {
            retention: self.settings.retention,
            warning_period_hours: self.settings.warning_period_hours,
        });

        self.store
            .save_settings(&self.settings)
            .map_err(|e| PmError::storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pmtrack_store::{JsonStore, StoreError, StoreResult};
    use pmtrack_types::{CHOICE_CHECK_MARK, CHOICE_ERROR, Equipment, PM_STAGES, StageKind};
    use tempfile::TempDir;

    fn test_catalog() -> Arc<Catalog> {
        Arc::new(Catalog::from_zones([
            (
                Zone::Hlp,
                vec![
                    Equipment {
                        tag: EquipmentTag::new("HLP-01"),
                        description: "Hydraulic press".into(),
                        zone: Zone::Hlp,
                    },
                    Equipment {
                        tag: EquipmentTag::new("HLP-02"),
                        description: "Feed conveyor".into(),
                        zone: Zone::Hlp,
                    },
                ],
            ),
            (
                Zone::Screen,
                vec![Equipment {
                    tag: EquipmentTag::new("SCR-01"),
                    description: "Dewatering screen".into(),
                    zone: Zone::Screen,
                }],
            ),
        ]))
    }

    fn test_engine(dir: &TempDir) -> PolicyEngine {
        let store = Arc::new(JsonStore::open(dir.path()).unwrap());
        PolicyEngine::new(store, test_catalog(), Settings::default())
    }

    fn complete_results() -> StageResults {
        let mut results = StageResults::new();
        for def in PM_STAGES {
            match def.kind {
                StageKind::Choice { .. } => results.insert(def.name, CHOICE_CHECK_MARK),
                StageKind::Text => results.insert(def.name, "no issues"),
            }
        }
        results
    }

    fn monday_morning() -> DateTime<Local> {
        // 2026-08-24 is a Monday
        Local.with_ymd_and_hms(2026, 8, 24, 8, 0, 0).unwrap()
    }

    fn record_one(engine: &mut PolicyEngine, user: &str, tag: &str, at: DateTime<Local>) {
        let id = engine
            .begin_session(user, Zone::Hlp, &EquipmentTag::new(tag), at)
            .unwrap();
        engine.complete_session(id, complete_results(), at).unwrap();
    }

    #[test]
    fn begin_session_requires_catalog_entry() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);

        let result = engine.begin_session(
            "User1",
            Zone::Hlp,
            &EquipmentTag::new("SCR-01"), // wrong zone
            monday_morning(),
        );
        assert!(matches!(result, Err(PmError::EquipmentNotFound { .. })));
        assert!(engine.active_sessions().is_empty());
    }

    #[test]
    fn begin_session_matches_tag_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);

        let id = engine
            .begin_session("User1", Zone::Hlp, &EquipmentTag::new("hlp-01"), monday_morning())
            .unwrap();

        let sessions = engine.active_sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, id);
        assert_eq!(sessions[0].description, "Hydraulic press");
    }

    #[test]
    fn duplicate_sessions_are_allowed() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);
        let tag = EquipmentTag::new("HLP-01");
        let now = monday_morning();

        let a = engine.begin_session("User1", Zone::Hlp, &tag, now).unwrap();
        let b = engine.begin_session("User1", Zone::Hlp, &tag, now).unwrap();
        assert_ne!(a, b);
        assert_eq!(engine.active_sessions().len(), 2);

        // Completing one leaves the other alone
        engine.complete_session(b, complete_results(), now).unwrap();
        assert_eq!(engine.active_sessions().len(), 1);
        assert_eq!(engine.active_sessions()[0].id, a);
    }

    #[test]
    fn complete_session_appends_and_persists() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);
        let now = monday_morning();

        let id = engine
            .begin_session("User1", Zone::Hlp, &EquipmentTag::new("HLP-01"), now)
            .unwrap();
        let record = engine.complete_session(id, complete_results(), now).unwrap();

        assert_eq!(record.user, "User1");
        assert_eq!(record.timestamp, now);
        assert_eq!(engine.records().len(), 1);
        assert!(engine.active_sessions().is_empty());

        // Persisted copy matches
        let store = JsonStore::open(dir.path()).unwrap();
        assert_eq!(store.load_records().unwrap(), vec![record]);
    }

    #[test]
    fn invalid_results_leave_no_partial_state() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);
        let now = monday_morning();

        let id = engine
            .begin_session("User1", Zone::Hlp, &EquipmentTag::new("HLP-01"), now)
            .unwrap();

        // Missing one choice stage
        let incomplete: StageResults = complete_results()
            .ordered()
            .filter(|(stage, _)| *stage != "Heat")
            .filter_map(|(stage, value)| value.map(|v| (stage.to_string(), v.to_string())))
            .collect();

        let result = engine.complete_session(id, incomplete, now);
        assert!(matches!(result, Err(PmError::ValidationFailed(_))));

        // Session survives, nothing recorded, nothing written
        assert_eq!(engine.active_sessions().len(), 1);
        assert!(engine.records().is_empty());
        let store = JsonStore::open(dir.path()).unwrap();
        assert!(store.load_records().unwrap().is_empty());

        // A corrected resubmission for the same session succeeds
        engine.complete_session(id, complete_results(), now).unwrap();
        assert_eq!(engine.records().len(), 1);
    }

    #[test]
    fn out_of_range_choice_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);
        let now = monday_morning();

        let id = engine
            .begin_session("User1", Zone::Hlp, &EquipmentTag::new("HLP-01"), now)
            .unwrap();

        let mut results = complete_results();
        results.insert("Status", "Maybe");

        let result = engine.complete_session(id, results, now);
        assert!(matches!(result, Err(PmError::ValidationFailed(_))));
    }

    #[test]
    fn error_status_is_a_valid_answer() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);
        let now = monday_morning();

        let id = engine
            .begin_session("User2", Zone::Hlp, &EquipmentTag::new("HLP-02"), now)
            .unwrap();

        let mut results = complete_results();
        results.insert("Status", CHOICE_ERROR);

        let record = engine.complete_session(id, results, now).unwrap();
        assert_eq!(record.results.get("Status"), Some(CHOICE_ERROR));
    }

    #[test]
    fn cancel_session_drops_without_record() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);
        let now = monday_morning();

        let id = engine
            .begin_session("User1", Zone::Hlp, &EquipmentTag::new("HLP-01"), now)
            .unwrap();
        engine.cancel_session(id).unwrap();

        assert!(engine.active_sessions().is_empty());
        assert!(engine.records().is_empty());

        // Unknown id afterwards
        assert!(matches!(
            engine.cancel_session(id),
            Err(PmError::SessionNotFound(_))
        ));
    }

    #[test]
    fn repeat_warning_within_window() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);
        let recorded_at = monday_morning();
        record_one(&mut engine, "User1", "HLP-01", recorded_at);

        let tag = EquipmentTag::new("HLP-01");

        // 23 hours later: still inside the 24h default window
        let later = recorded_at + chrono::Duration::hours(23);
        assert!(engine.check_repeat_warning("User1", &tag, later));

        // 25 hours later: outside
        let later = recorded_at + chrono::Duration::hours(25);
        assert!(!engine.check_repeat_warning("User1", &tag, later));
    }

    #[test]
    fn repeat_warning_boundary_is_exclusive() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);
        let recorded_at = monday_morning();
        record_one(&mut engine, "User1", "HLP-01", recorded_at);

        let exactly = recorded_at + chrono::Duration::hours(24);
        assert!(!engine.check_repeat_warning("User1", &EquipmentTag::new("HLP-01"), exactly));
    }

    #[test]
    fn repeat_warning_is_per_user_and_tag() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);
        let recorded_at = monday_morning();
        record_one(&mut engine, "User1", "HLP-01", recorded_at);

        let later = recorded_at + chrono::Duration::hours(1);
        assert!(!engine.check_repeat_warning("User2", &EquipmentTag::new("HLP-01"), later));
        assert!(!engine.check_repeat_warning("User1", &EquipmentTag::new("HLP-02"), later));
    }

    #[test]
    fn retention_drops_records_before_monday() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);

        // Sunday before the boundary, then Monday on it
        let sunday = Local.with_ymd_and_hms(2026, 8, 23, 18, 0, 0).unwrap();
        let monday = monday_morning();
        record_one(&mut engine, "User1", "HLP-01", sunday);
        record_one(&mut engine, "User2", "HLP-02", monday);

        let wednesday = Local.with_ymd_and_hms(2026, 8, 26, 10, 0, 0).unwrap();
        let dropped = engine.apply_retention_policy(wednesday).unwrap();

        assert_eq!(dropped, 1);
        assert_eq!(engine.records().len(), 1);
        assert_eq!(engine.records()[0].user, "User2");

        // Store was rewritten to the retained set
        let store = JsonStore::open(dir.path()).unwrap();
        assert_eq!(store.load_records().unwrap().len(), 1);
    }

    #[test]
    fn retention_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);

        let sunday = Local.with_ymd_and_hms(2026, 8, 23, 18, 0, 0).unwrap();
        record_one(&mut engine, "User1", "HLP-01", sunday);

        let wednesday = Local.with_ymd_and_hms(2026, 8, 26, 10, 0, 0).unwrap();
        assert_eq!(engine.apply_retention_policy(wednesday).unwrap(), 1);
        assert_eq!(engine.apply_retention_policy(wednesday).unwrap(), 0);
    }

    #[test]
    fn non_weekly_retention_still_purges_weekly() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);
        engine.update_retention_period(RetentionPeriod::Daily).unwrap();

        let sunday = Local.with_ymd_and_hms(2026, 8, 23, 18, 0, 0).unwrap();
        record_one(&mut engine, "User1", "HLP-01", sunday);

        let wednesday = Local.with_ymd_and_hms(2026, 8, 26, 10, 0, 0).unwrap();
        assert_eq!(engine.apply_retention_policy(wednesday).unwrap(), 1);
        assert!(engine.records().is_empty());
    }

    #[test]
    fn zero_warning_period_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);
        engine.update_warning_period(48).unwrap();

        let result = engine.update_warning_period(0);
        assert!(matches!(result, Err(PmError::InvalidParameter(_))));
        assert_eq!(engine.settings().warning_period_hours, 48);

        // Persisted settings untouched by the rejection
        let store = JsonStore::open(dir.path()).unwrap();
        let persisted = store.load_settings().unwrap().unwrap();
        assert_eq!(persisted.warning_period_hours, 48);
    }

    #[test]
    fn settings_survive_restart() {
        let dir = TempDir::new().unwrap();
        {
            let mut engine = test_engine(&dir);
            engine.update_warning_period(12).unwrap();
            engine.update_retention_period(RetentionPeriod::Monthly).unwrap();
        }

        let engine = test_engine(&dir);
        assert_eq!(engine.settings().warning_period_hours, 12);
        assert_eq!(engine.settings().retention, RetentionPeriod::Monthly);
    }

    #[test]
    fn history_is_most_recent_first() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);

        let monday = monday_morning();
        record_one(&mut engine, "User1", "HLP-01", monday);
        record_one(&mut engine, "User2", "HLP-02", monday + chrono::Duration::hours(2));

        let history = engine.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].user, "User2");
        assert_eq!(history[1].user, "User1");
    }

    #[test]
    fn clear_sessions_empties_active_set() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);
        let now = monday_morning();

        engine
            .begin_session("User1", Zone::Hlp, &EquipmentTag::new("HLP-01"), now)
            .unwrap();
        engine
            .begin_session("User2", Zone::Hlp, &EquipmentTag::new("HLP-02"), now)
            .unwrap();

        engine.clear_sessions();
        assert!(engine.active_sessions().is_empty());
        // Records untouched
        assert!(engine.records().is_empty());
    }

    #[test]
    fn events_capture_the_lifecycle() {
        let dir = TempDir::new().unwrap();
        let mut engine = test_engine(&dir);
        let now = monday_morning();

        let id = engine
            .begin_session("User1", Zone::Hlp, &EquipmentTag::new("HLP-01"), now)
            .unwrap();
        engine.complete_session(id, complete_results(), now).unwrap();

        let events = engine.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], CoreEvent::SessionStarted { .. }));
        assert!(matches!(events[1], CoreEvent::RecordConfirmed { .. }));
        assert!(engine.drain_events().is_empty());
    }

    /// Store that accepts loads but fails every write.
    struct ReadOnlyStore;

    impl Store for ReadOnlyStore {
        fn load_records(&self) -> StoreResult<Vec<PmRecord>> {
            Ok(Vec::new())
        }

        fn save_records(&self, _records: &[PmRecord]) -> StoreResult<()> {
            Err(StoreError::Serialization("disk full".into()))
        }

        fn load_settings(&self) -> StoreResult<Option<Settings>> {
            Ok(None)
        }

        fn save_settings(&self, _settings: &Settings) -> StoreResult<()> {
            Err(StoreError::Serialization("disk full".into()))
        }

        fn is_healthy(&self) -> bool {
            false
        }
    }

    #[test]
    fn save_failure_keeps_memory_state() {
        let mut engine =
            PolicyEngine::new(Arc::new(ReadOnlyStore), test_catalog(), Settings::default());
        let now = monday_morning();

        let id = engine
            .begin_session("User1", Zone::Hlp, &EquipmentTag::new("HLP-01"), now)
            .unwrap();
        let result = engine.complete_session(id, complete_results(), now);

        assert!(matches!(result, Err(PmError::StorageUnavailable(_))));
        // The record stands in memory and the session is gone
        assert_eq!(engine.records().len(), 1);
        assert!(engine.active_sessions().is_empty());
    }
}
