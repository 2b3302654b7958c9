//! Section extraction for generative-AI report text.
//!
//! The remote analysis API returns free-form Markdown that is supposed
//! to follow a `## Summary` / `## Condition` / `## Confidence` /
//! `## Reason` / `## Next Steps` template. The model does not always
//! comply, so this is treated as an unreliable external contract: every
//! field is optional, and a response with no recognizable sections is a
//! hard parse failure instead of a pile of silently empty strings.

use std::sync::LazyLock;

use regex::Regex;

use crate::records::TestType;

static SUMMARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"## Summary\n([\s\S]*?)## Condition").unwrap());
static CONDITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"## Condition\n(.+)").unwrap());
static CONFIDENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"## Confidence\n(.+)").unwrap());
static REASON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"## Reason\n([\s\S]*?)## Next Steps").unwrap());
static NEXT_STEPS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"## Next Steps\n([\s\S]*?)(?:## Redirect|\z)").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("no recognizable report sections found")]
    NoSections,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReport {
    pub summary: Option<String>,
    pub condition: Option<String>,
    pub confidence: Option<String>,
    pub reason: Option<String>,
    pub next_steps: Option<String>,
}

impl ParsedReport {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.condition.is_none()
            && self.confidence.is_none()
            && self.reason.is_none()
            && self.next_steps.is_none()
    }

    /// Map a recognized condition name to the diagnostic test that
    /// should follow up on it.
    pub fn suggested_followup(&self) -> Option<TestType> {
        let condition = self.condition.as_deref()?;
        if condition.contains("Alzheimer") {
            Some(TestType::Alzheimers)
        } else if condition.contains("Tumor") || condition.contains("tumor") {
            Some(TestType::BrainTumor)
        } else if condition.contains("Pneumonia") || condition.contains("pneumonia") {
            Some(TestType::Pneumonia)
        } else {
            None
        }
    }
}

/// Extract the templated sections from a model response. Missing
/// sections come back as `None`; when nothing at all matches, the whole
/// parse fails with [`ReportError::NoSections`].
pub fn parse_report(text: &str) -> Result<ParsedReport, ReportError> {
    let report = ParsedReport {
        summary: capture(&SUMMARY, text),
        condition: capture(&CONDITION, text),
        confidence: capture(&CONFIDENCE, text),
        reason: capture(&REASON, text),
        next_steps: capture(&NEXT_STEPS, text),
    };

    if report.is_empty() {
        return Err(ReportError::NoSections);
    }
    Ok(report)
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    let section = re.captures(text)?.get(1)?.as_str().trim();
    if section.is_empty() {
        None
    } else {
        Some(section.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "\
## Summary
The scan shows a hyperdense region in the left hemisphere.

## Condition
Brain Tumor

## Confidence
High (92%)

## Reason
Mass effect and surrounding edema are visible.

## Next Steps
Consult a neurologist within the week.

## Redirect
None";

    #[test]
    fn well_formed_report_parses_fully() {
        let report = parse_report(WELL_FORMED).unwrap();
        assert_eq!(
            report.summary.as_deref(),
            Some("The scan shows a hyperdense region in the left hemisphere.")
        );
        assert_eq!(report.condition.as_deref(), Some("Brain Tumor"));
        assert_eq!(report.confidence.as_deref(), Some("High (92%)"));
        assert_eq!(
            report.reason.as_deref(),
            Some("Mass effect and surrounding edema are visible.")
        );
        assert_eq!(
            report.next_steps.as_deref(),
            Some("Consult a neurologist within the week.")
        );
        assert_eq!(report.suggested_followup(), Some(TestType::BrainTumor));
    }

    #[test]
    fn next_steps_without_redirect_runs_to_end() {
        let text = "## Next Steps\nRest and hydrate.\n";
        let report = parse_report(text).unwrap();
        assert_eq!(report.next_steps.as_deref(), Some("Rest and hydrate."));
        assert!(report.summary.is_none());
    }

    #[test]
    fn partial_report_keeps_what_matched() {
        let text = "preamble\n## Condition\nPneumonia\ntrailing chatter";
        let report = parse_report(text).unwrap();
        assert_eq!(report.condition.as_deref(), Some("Pneumonia"));
        assert_eq!(report.suggested_followup(), Some(TestType::Pneumonia));
        assert!(report.reason.is_none());
    }

    #[test]
    fn freeform_text_is_a_parse_failure() {
        let err = parse_report("The model decided to write a poem instead.");
        assert!(matches!(err, Err(ReportError::NoSections)));
    }

    #[test]
    fn unrecognized_condition_has_no_followup() {
        let report = parse_report("## Condition\nCommon Cold\n").unwrap();
        assert_eq!(report.suggested_followup(), None);
    }
}
