//! Checks that the five courses of a run belong to one program offering.

use crate::error::ActaError;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::warn;

/// Token substituted for the course-sequence marker in a signature.
pub const WILDCARD: &str = "CX";

static SEQUENCE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-C\d-").expect("sequence marker pattern is valid"));

/// Reduces an institutional code to its cohort signature.
///
/// `PROG-C3-2024` → `PROG-CX-2024`. Codes without a marker are returned unchanged.
pub fn signature(institutional_code: &str) -> String {
    SEQUENCE_MARKER
        .replace_all(institutional_code, format!("-{WILDCARD}-").as_str())
        .into_owned()
}

/// Whether the code carries a `-C<digit>-` course-sequence marker.
pub fn has_sequence_marker(institutional_code: &str) -> bool {
    SEQUENCE_MARKER.is_match(institutional_code)
}

/// Returns the single cohort label shared by every code, or
/// [`ActaError::MixedCohort`] carrying the distinct signatures found.
///
/// Codes without a sequence marker are compared verbatim and logged at `warn`.
pub fn validate_cohort<'a, I>(codes: I) -> Result<String, ActaError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut signatures = BTreeSet::new();
    for code in codes {
        if !has_sequence_marker(code) {
            warn!(code, "Institutional code has no course sequence marker");
        }
        signatures.insert(signature(code));
    }

    if signatures.len() == 1 {
        if let Some(label) = signatures.pop_first() {
            return Ok(label);
        }
    }

    Err(ActaError::MixedCohort(signatures))
}

/// Strips the wildcard segment from a cohort label: `PROG-CX-2024` → `PROG-2024`.
pub fn version_code(cohort: &str) -> String {
    let marker = format!("-{WILDCARD}");
    match cohort.find(&marker) {
        Some(pos) => format!("{}{}", &cohort[..pos], &cohort[pos + marker.len()..]),
        None => cohort.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_wildcards_marker() {
        assert_eq!(signature("PROG-C1-2024"), "PROG-CX-2024");
        assert_eq!(signature("DIP-GES-C5-2025-S1"), "DIP-GES-CX-2025-S1");
        assert_eq!(signature("NOMARKER"), "NOMARKER");
        assert_eq!(signature("PROG-C12-2024"), "PROG-C12-2024");
    }

    #[test]
    fn test_sequence_marker_detection() {
        assert!(has_sequence_marker("PROG-C3-2024"));
        assert!(!has_sequence_marker("PROG-C12-2024"));
        assert!(!has_sequence_marker(""));
        assert!(!has_sequence_marker("NOMARKER"));
    }

    #[test]
    fn test_unmarked_identical_codes_still_agree() {
        assert_eq!(validate_cohort(["", "", "", "", ""]).unwrap(), "");
        assert_eq!(validate_cohort(["PLAIN", "PLAIN"]).unwrap(), "PLAIN");
    }

    #[test]
    fn test_unanimous_cohort() {
        let codes = [
            "PROG-C1-2024",
            "PROG-C2-2024",
            "PROG-C3-2024",
            "PROG-C4-2024",
            "PROG-C5-2024",
        ];
        assert_eq!(validate_cohort(codes).unwrap(), "PROG-CX-2024");
    }

    #[test]
    fn test_mixed_cohort_reports_signatures() {
        let codes = [
            "PROG-C1-2024",
            "OTHER-C2-2024",
            "PROG-C3-2024",
            "PROG-C4-2024",
            "PROG-C5-2024",
        ];

        match validate_cohort(codes) {
            Err(ActaError::MixedCohort(set)) => {
                let found: Vec<_> = set.into_iter().collect();
                assert_eq!(found, vec!["OTHER-CX-2024", "PROG-CX-2024"]);
            }
            other => panic!("expected mixed cohort, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input_is_mixed() {
        assert!(matches!(
            validate_cohort(std::iter::empty()),
            Err(ActaError::MixedCohort(set)) if set.is_empty()
        ));
    }

    #[test]
    fn test_version_code() {
        assert_eq!(version_code("PROG-CX-2024"), "PROG-2024");
        assert_eq!(version_code("PLAIN"), "PLAIN");
    }
}
