//! Benchmarking extracted pairs against a reference
//!
//! Quantity accuracy is measured against the reference size. Tags found in
//! the extraction but absent from the reference are reported as `extra`;
//! they are informational and never lower accuracy.

use crate::tagmap::TagQuantityMap;

/// A tag found with the wrong quantity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityMismatch {
    pub tag: String,
    pub expected: u32,
    pub extracted: u32,
}

/// Comparison of an extraction against a reference
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationReport {
    /// Tags in both maps with equal quantity
    pub correct: usize,
    /// Tags in both maps with differing quantity
    pub wrong: usize,
    /// Reference tags absent from the extraction
    pub missing: usize,
    /// Extracted tags absent from the reference
    pub extra: usize,
    /// correct / |reference| * 100, 0 when the reference is empty
    pub accuracy: f64,
    pub reference_total: usize,
    pub extracted_total: usize,
    pub missing_tags: Vec<String>,
    pub extra_tags: Vec<String>,
    pub mismatches: Vec<QuantityMismatch>,
}

/// Tag-set membership metrics, ignoring quantities. Values are fractions.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TagSetMetrics {
    /// Tags present in both maps
    pub true_positives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Compare `extracted` against `reference`
pub fn evaluate(extracted: &TagQuantityMap, reference: &TagQuantityMap) -> EvaluationReport {
    let mut report = EvaluationReport {
        reference_total: reference.len(),
        extracted_total: extracted.len(),
        ..Default::default()
    };

    for (tag, expected) in reference.iter() {
        match extracted.get(tag) {
            Some(got) if got == expected => report.correct += 1,
            Some(got) => {
                report.wrong += 1;
                report.mismatches.push(QuantityMismatch {
                    tag: tag.to_string(),
                    expected,
                    extracted: got,
                });
            }
            None => {
                report.missing += 1;
                report.missing_tags.push(tag.to_string());
            }
        }
    }

    report.extra_tags = extracted
        .tags()
        .filter(|tag| !reference.contains(tag))
        .map(str::to_string)
        .collect();
    report.extra = report.extra_tags.len();

    report.accuracy = percentage(report.correct, report.reference_total);
    report
}

/// Precision, recall and F1 over tag membership alone
pub fn tag_set_metrics(extracted: &TagQuantityMap, reference: &TagQuantityMap) -> TagSetMetrics {
    let true_positives = extracted.tags().filter(|t| reference.contains(t)).count();
    let precision = ratio(true_positives, extracted.len());
    let recall = ratio(true_positives, reference.len());
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    TagSetMetrics {
        true_positives,
        precision,
        recall,
        f1,
    }
}

/// Sort named reports best first: accuracy, then correct count, then name
pub fn rank_reports<'a>(reports: &'a [(String, EvaluationReport)]) -> Vec<&'a (String, EvaluationReport)> {
    let mut ranked: Vec<&(String, EvaluationReport)> = reports.iter().collect();
    ranked.sort_by(|a, b| {
        b.1.accuracy
            .total_cmp(&a.1.accuracy)
            .then_with(|| b.1.correct.cmp(&a.1.correct))
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    ratio(part, whole) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, u32)]) -> TagQuantityMap {
        entries.iter().map(|&(t, q)| (t, q)).collect()
    }

    #[test]
    fn test_empty_maps() {
        let report = evaluate(&TagQuantityMap::new(), &TagQuantityMap::new());
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.correct + report.wrong + report.missing + report.extra, 0);
        let metrics = tag_set_metrics(&TagQuantityMap::new(), &TagQuantityMap::new());
        assert_eq!(metrics.f1, 0.0);
    }

    #[test]
    fn test_perfect_match() {
        let m = map(&[("X-1", 2)]);
        let report = evaluate(&m, &m);
        assert_eq!(report.correct, 1);
        assert_eq!(report.wrong, 0);
        assert_eq!(report.missing, 0);
        assert_eq!(report.extra, 0);
        assert_eq!(report.accuracy, 100.0);
    }

    #[test]
    fn test_mixed_outcomes() {
        let extracted = map(&[("A", 1), ("B", 5), ("D", 9)]);
        let reference = map(&[("A", 1), ("B", 2), ("C", 3), ("E", 4)]);
        let report = evaluate(&extracted, &reference);
        assert_eq!(report.correct, 1);
        assert_eq!(report.wrong, 1);
        assert_eq!(report.missing, 2);
        assert_eq!(report.extra, 1);
        assert_eq!(report.accuracy, 25.0);
        assert_eq!(report.missing_tags, vec!["C", "E"]);
        assert_eq!(report.extra_tags, vec!["D"]);
        assert_eq!(
            report.mismatches,
            vec![QuantityMismatch {
                tag: "B".into(),
                expected: 2,
                extracted: 5
            }]
        );
    }

    #[test]
    fn test_tag_set_metrics() {
        let extracted = map(&[("A", 1), ("B", 5), ("D", 9), ("F", 1)]);
        let reference = map(&[("A", 7), ("B", 2)]);
        let metrics = tag_set_metrics(&extracted, &reference);
        assert_eq!(metrics.true_positives, 2);
        assert!((metrics.precision - 0.5).abs() < 1e-9);
        assert!((metrics.recall - 1.0).abs() < 1e-9);
        assert!((metrics.f1 - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_rank_reports() {
        let reference = map(&[("A", 1), ("B", 2)]);
        let reports = vec![
            ("weak".to_string(), evaluate(&map(&[("A", 1)]), &reference)),
            ("best".to_string(), evaluate(&reference, &reference)),
            ("also-weak".to_string(), evaluate(&map(&[("B", 2)]), &reference)),
        ];
        let names: Vec<&str> = rank_reports(&reports).iter().map(|r| r.0.as_str()).collect();
        assert_eq!(names, vec!["best", "also-weak", "weak"]);
    }
}
