//! Analysis progress stages shown while a submission is in flight.
//!
//! Pure data: stage labels, nominal durations, and cumulative target
//! percentages. The interface layer animates them however it likes; no
//! timers live here.

use crate::models::ScanType;

/// One stage of the progress display.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisStage {
    pub label: String,
    /// Nominal animation time for this stage.
    pub duration_ms: u64,
    /// Cumulative progress once this stage completes, 0–100.
    pub target_percent: f32,
}

/// The progress stages for one submission, in order.
pub fn analysis_stages(scan_type: ScanType) -> Vec<AnalysisStage> {
    let scan = scan_type.as_str().to_uppercase();
    let steps: [(String, u64); 5] = [
        (format!("Preprocessing {scan} scan..."), 1000),
        ("Extracting neural features...".to_string(), 1500),
        (format!("Running {scan} analysis..."), 2000),
        ("Comparing with database...".to_string(), 1200),
        ("Generating report...".to_string(), 800),
    ];

    let count = steps.len();
    steps
        .into_iter()
        .enumerate()
        .map(|(i, (label, duration_ms))| AnalysisStage {
            label,
            duration_ms,
            target_percent: ((i + 1) as f32 / count as f32) * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_stages_ending_at_full_progress() {
        let stages = analysis_stages(ScanType::Mri);
        assert_eq!(stages.len(), 5);
        assert_eq!(stages.last().unwrap().target_percent, 100.0);
    }

    #[test]
    fn targets_are_strictly_increasing() {
        let stages = analysis_stages(ScanType::Spiral);
        for pair in stages.windows(2) {
            assert!(pair[0].target_percent < pair[1].target_percent);
        }
    }

    #[test]
    fn labels_name_the_scan_type() {
        let stages = analysis_stages(ScanType::Spiral);
        assert!(stages[0].label.contains("SPIRAL"));
        assert!(stages[2].label.contains("SPIRAL"));
    }

    #[test]
    fn every_stage_has_a_nonzero_duration() {
        for stage in analysis_stages(ScanType::Mri) {
            assert!(stage.duration_ms > 0);
        }
    }
}
