use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{
    normalize_starts, CycleDays, CyclePhase, CycleRecord, FertileWindow, UserSettings,
};
use crate::records::{
    test_results_for, text_reports_for, NewTestResult, NewTextReport, TestResult, TextReport,
};
use crate::stats::CycleStatistics;
use crate::store::{CycleStore, StoreError, StoredState};
use crate::{phase, predict, segment, stats};

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("cycle and period lengths must be positive")]
    InvalidSettings,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Facade over the stored state and the pure cycle functions.
///
/// Mutations apply to the in-memory state first and then persist; a
/// failed save surfaces as an error but does not roll back what the
/// caller already sees, matching the non-blocking persistence semantics
/// of the surrounding application.
pub struct CycleTracker<S: CycleStore> {
    store: S,
    state: StoredState,
}

impl<S: CycleStore> CycleTracker<S> {
    /// Load existing state from the store, or start empty.
    pub fn open(store: S) -> Result<Self, StoreError> {
        let mut state = store.load()?.unwrap_or_default();
        state.period_starts = normalize_starts(&state.period_starts);
        Ok(Self { store, state })
    }

    pub fn period_starts(&self) -> &[NaiveDate] {
        &self.state.period_starts
    }

    pub fn settings(&self) -> Option<&UserSettings> {
        self.state.settings.as_ref()
    }

    /// Record a period start. Returns `false` (without persisting) when
    /// the day is already recorded.
    pub fn add_period_start(&mut self, date: NaiveDate) -> Result<bool, TrackerError> {
        match self.state.period_starts.binary_search(&date) {
            Ok(_) => Ok(false),
            Err(pos) => {
                self.state.period_starts.insert(pos, date);
                self.persist()?;
                Ok(true)
            }
        }
    }

    /// Remove a recorded period start. Returns `false` when the day was
    /// not recorded.
    pub fn remove_period_start(&mut self, date: NaiveDate) -> Result<bool, TrackerError> {
        match self.state.period_starts.binary_search(&date) {
            Ok(pos) => {
                self.state.period_starts.remove(pos);
                self.persist()?;
                Ok(true)
            }
            Err(_) => Ok(false),
        }
    }

    pub fn update_settings(&mut self, settings: UserSettings) -> Result<(), TrackerError> {
        if !settings.is_valid() {
            return Err(TrackerError::InvalidSettings);
        }
        self.state.settings = Some(settings);
        self.persist()
    }

    /// Completed cycles, recomputed from scratch on every call.
    pub fn cycles(&self) -> Vec<CycleRecord> {
        segment::segment_cycles(&self.state.period_starts, self.settings())
    }

    pub fn phase_on(&self, date: NaiveDate) -> CyclePhase {
        phase::cycle_phase(date, &self.state.period_starts, self.settings())
    }

    pub fn cycle_day_on(&self, date: NaiveDate) -> Option<u32> {
        phase::cycle_day_number(date, &self.state.period_starts, self.settings())
    }

    pub fn phase_calendar(&self, today: NaiveDate) -> CycleDays {
        phase::phase_calendar(&self.state.period_starts, self.settings(), today)
    }

    pub fn next_period(&self) -> Option<NaiveDate> {
        predict::predicted_next_period(&self.state.period_starts, self.settings())
    }

    pub fn next_ovulation(&self) -> Option<NaiveDate> {
        predict::predicted_ovulation(&self.state.period_starts, self.settings())
    }

    pub fn fertile_window(&self) -> Option<FertileWindow> {
        predict::fertile_window(&self.state.period_starts, self.settings())
    }

    pub fn statistics(&self) -> CycleStatistics {
        stats::cycle_statistics(&self.cycles(), self.settings())
    }

    pub fn is_irregular(&self) -> bool {
        stats::is_irregular(&self.cycles())
    }

    /// Save a diagnostic test outcome for a user. The id of the stored
    /// record is returned.
    pub fn record_test_result(
        &mut self,
        user_id: &str,
        new: NewTestResult,
    ) -> Result<Uuid, TrackerError> {
        let id = Uuid::new_v4();
        self.state.test_results.push(TestResult {
            id,
            user_id: user_id.to_owned(),
            test_type: new.test_type,
            file_url: new.file_url,
            file_name: new.file_name,
            prediction: new.prediction,
            confidence: new.confidence,
            full_report: new.full_report,
            created_at: Utc::now(),
        });
        self.persist()?;
        Ok(id)
    }

    pub fn record_text_report(
        &mut self,
        user_id: &str,
        new: NewTextReport,
    ) -> Result<Uuid, TrackerError> {
        let id = Uuid::new_v4();
        self.state.text_reports.push(TextReport {
            id,
            user_id: user_id.to_owned(),
            input_type: new.input_type,
            prediction: new.prediction,
            confidence: new.confidence,
            full_report: new.full_report,
            file_name: new.file_name,
            file_url: new.file_url,
            created_at: Utc::now(),
        });
        self.persist()?;
        Ok(id)
    }

    /// Test results for a user, newest first.
    pub fn test_results(&self, user_id: &str) -> Vec<&TestResult> {
        test_results_for(&self.state.test_results, user_id)
    }

    /// Text reports for a user, newest first.
    pub fn text_reports(&self, user_id: &str) -> Vec<&TextReport> {
        text_reports_for(&self.state.text_reports, user_id)
    }

    pub fn export_json(&self) -> Result<String, TrackerError> {
        Ok(serde_json::to_string_pretty(&self.state).map_err(StoreError::from)?)
    }

    /// Drop all state, in memory and in the store.
    pub fn wipe(&mut self) -> Result<(), TrackerError> {
        self.state = StoredState::default();
        self.store.wipe()?;
        Ok(())
    }

    fn persist(&self) -> Result<(), TrackerError> {
        if let Err(err) = self.store.save(&self.state) {
            tracing::warn!(%err, "saving cycle state failed; in-memory state kept");
            return Err(err.into());
        }
        Ok(())
    }
}
