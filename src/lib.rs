//! Arogya: the deterministic core of a patient-facing health app.
//!
//! The heart of the crate is the menstrual cycle engine — pure
//! functions over recorded period-start dates and user-configured
//! averages: segmentation into completed cycles ([`segment`]), phase
//! classification ([`phase`]), next-period and fertility prediction
//! ([`predict`]), and descriptive statistics ([`stats`]). Around it sit
//! an encrypted, injectable persistence layer ([`store`]), a stateful
//! facade ([`tracker`]), diagnostic record contracts ([`records`]), a
//! client for the remote inference backend ([`client`]), and a parser
//! for its free-text reports ([`report`]).
//!
//! Nothing here performs inference or gives medical advice. The
//! hormone curves in [`hormones`] in particular are chart decoration,
//! not physiology.

pub mod client;
pub mod crypto;
pub mod hormones;
pub mod models;
pub mod phase;
pub mod predict;
pub mod records;
pub mod report;
pub mod segment;
pub mod stats;
pub mod store;
pub mod tracker;

pub use client::{ClientError, DiagnosticsClient, DiseasePrediction, ImageDiagnosis, ImageUpload};
pub use hormones::hormone_levels;
pub use models::{
    CycleDays, CyclePhase, CycleRecord, FertileWindow, HormoneLevels, UserSettings,
};
pub use phase::{cycle_day_number, cycle_phase, phase_calendar};
pub use predict::{fertile_window, predicted_next_period, predicted_ovulation};
pub use records::{
    InputType, NewTestResult, NewTextReport, TestResult, TestType, TextReport,
};
pub use report::{parse_report, ParsedReport, ReportError};
pub use segment::segment_cycles;
pub use stats::{cycle_statistics, is_irregular, CycleStatistics, Predictability, Regularity};
pub use store::{CycleStore, MemoryStore, StoreError, StoredState, VaultStore};
pub use tracker::{CycleTracker, TrackerError};
