//! Findings formatter — bounded human-readable damage summary.
//!
//! A lossy summary by design: the full findings list stays available on the
//! [`DamageAssessment`] for callers that need complete detail; this renders
//! the string surfaced to operators.

use super::rules::DamageAssessment;
use super::verdict;

/// Sentinel summary when the snapshot held no data at all.
pub const NO_DATA_SUMMARY: &str = "cannot determine damage location, telemetry data is empty";

/// Suffix appended when more findings exist than are listed.
const TRUNCATION_SUFFIX: &str = ", among other anomalies";

/// Render the operator-facing damage summary.
///
/// - No data: the fixed sentinel string.
/// - No findings: the qualitative verdict for the health index.
/// - More than `max_findings`: the first `max_findings` messages (catalog
///   order) plus a truncation suffix; otherwise all messages, comma-joined.
///
/// Always returns a non-empty string.
pub fn summarize(assessment: &DamageAssessment, max_findings: usize) -> String {
    if assessment.no_data {
        return NO_DATA_SUMMARY.to_string();
    }
    if assessment.findings.is_empty() {
        return verdict::verdict(assessment.health_index).to_string();
    }

    let messages: Vec<&str> = assessment
        .findings
        .iter()
        .take(max_findings.max(1))
        .map(|f| f.message.as_str())
        .collect();
    let joined = messages.join(", ");

    if assessment.findings.len() > messages.len() {
        format!("{joined}{TRUNCATION_SUFFIX}")
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ParameterGroup;
    use crate::scoring::{Finding, Severity};

    fn finding(feature: &'static str, message: &str) -> Finding {
        Finding {
            feature,
            group: ParameterGroup::Temperature,
            severity: Severity::Mild,
            deduction: 5.0,
            message: message.to_string(),
        }
    }

    fn assessment(findings: Vec<Finding>, health_index: f64) -> DamageAssessment {
        DamageAssessment {
            findings,
            health_index,
            no_data: false,
        }
    }

    #[test]
    fn no_data_uses_sentinel() {
        let a = DamageAssessment {
            findings: vec![],
            health_index: 100.0,
            no_data: true,
        };
        assert_eq!(summarize(&a, 3), NO_DATA_SUMMARY);
    }

    #[test]
    fn empty_findings_delegate_to_verdict() {
        let a = assessment(vec![], 100.0);
        assert!(summarize(&a, 3).contains("good condition"));

        let a = assessment(vec![], 55.0);
        assert!(summarize(&a, 3).contains("maintenance check"));
    }

    #[test]
    fn few_findings_are_comma_joined() {
        let a = assessment(
            vec![finding("T24", "first"), finding("T30", "second")],
            80.0,
        );
        assert_eq!(summarize(&a, 3), "first, second");
    }

    #[test]
    fn excess_findings_truncate_to_first_three_with_suffix() {
        let a = assessment(
            vec![
                finding("T24", "one"),
                finding("T30", "two"),
                finding("T48", "three"),
                finding("T50", "four"),
                finding("T40", "five"),
            ],
            20.0,
        );
        let summary = summarize(&a, 3);
        assert!(summary.starts_with("one, two, three"));
        assert!(summary.ends_with("among other anomalies"));
        assert!(!summary.contains("four"));
        assert!(!summary.contains("five"));
    }

    #[test]
    fn exactly_three_findings_are_not_truncated() {
        let a = assessment(
            vec![
                finding("T24", "one"),
                finding("T30", "two"),
                finding("T48", "three"),
            ],
            55.0,
        );
        assert_eq!(summarize(&a, 3), "one, two, three");
    }

    #[test]
    fn summary_is_never_empty() {
        let a = assessment(vec![], 0.0);
        assert!(!summarize(&a, 3).is_empty());
        let a = assessment(vec![finding("T24", "x")], 95.0);
        assert!(!summarize(&a, 0).is_empty());
    }
}
