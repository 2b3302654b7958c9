//! Diagnostic result records persisted alongside the cycle data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestType {
    Alzheimers,
    Pneumonia,
    BrainTumor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputType {
    LabReport,
    Prescription,
}

/// Outcome of one image-based diagnostic test, as saved after a
/// successful remote analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: Uuid,
    pub user_id: String,
    pub test_type: TestType,
    pub file_url: String,
    pub file_name: String,
    pub prediction: String,
    pub confidence: f64,
    pub full_report: String,
    pub created_at: DateTime<Utc>,
}

/// Outcome of one document-simplification run over a lab report or
/// prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextReport {
    pub id: Uuid,
    pub user_id: String,
    pub input_type: InputType,
    pub prediction: String,
    pub confidence: Option<f64>,
    pub full_report: String,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when recording a new test result; id and timestamp
/// are assigned at insert time.
#[derive(Debug, Clone)]
pub struct NewTestResult {
    pub test_type: TestType,
    pub file_url: String,
    pub file_name: String,
    pub prediction: String,
    pub confidence: f64,
    pub full_report: String,
}

#[derive(Debug, Clone)]
pub struct NewTextReport {
    pub input_type: InputType,
    pub prediction: String,
    pub confidence: Option<f64>,
    pub full_report: String,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
}

/// Test results for one user, newest first.
pub fn test_results_for<'a>(results: &'a [TestResult], user_id: &str) -> Vec<&'a TestResult> {
    let mut scoped: Vec<&TestResult> = results.iter().filter(|r| r.user_id == user_id).collect();
    scoped.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    scoped
}

/// Text reports for one user, newest first.
pub fn text_reports_for<'a>(reports: &'a [TextReport], user_id: &str) -> Vec<&'a TextReport> {
    let mut scoped: Vec<&TextReport> = reports.iter().filter(|r| r.user_id == user_id).collect();
    scoped.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    scoped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn result(user: &str, hour: u32) -> TestResult {
        TestResult {
            id: Uuid::new_v4(),
            user_id: user.into(),
            test_type: TestType::Pneumonia,
            file_url: "https://files.example/xray.png".into(),
            file_name: "xray.png".into(),
            prediction: "NORMAL".into(),
            confidence: 0.97,
            full_report: String::new(),
            created_at: Utc.with_ymd_and_hms(2026, 4, 1, hour, 0, 0).unwrap(),
        }
    }

    #[test]
    fn results_are_scoped_and_newest_first() {
        let all = vec![result("a", 9), result("b", 10), result("a", 12)];
        let scoped = test_results_for(&all, "a");
        assert_eq!(scoped.len(), 2);
        assert!(scoped[0].created_at > scoped[1].created_at);
    }

    #[test]
    fn record_enums_use_wire_names() {
        assert_eq!(
            serde_json::to_string(&TestType::BrainTumor).unwrap(),
            "\"BRAIN_TUMOR\""
        );
        assert_eq!(
            serde_json::to_string(&InputType::LabReport).unwrap(),
            "\"LAB_REPORT\""
        );
    }
}
