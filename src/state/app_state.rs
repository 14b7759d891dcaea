use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use dataset_balancer::core::analysis::{
    BalanceProgressMessage, BalanceStats, BalanceSummary, ClassReport,
};

/// Class counts for the loaded dataset folder
#[derive(Default)]
pub struct AnalysisState {
    /// Parent folder whose class folders are shown
    pub dataset_path: Option<PathBuf>,
    pub stats: Option<BalanceStats>,
    /// Error message if the folder could not be scanned
    pub error: Option<String>,
}

impl AnalysisState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Which page of the balance dialog is showing
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BalanceDialogStep {
    #[default]
    Hidden,
    Confirm,
    Running,
    Finished,
}

/// UI-related state for dialogs and user input
pub struct UIState {
    /// Target count input field content
    pub target_input: String,
    /// Seed input field content (empty = random)
    pub seed_input: String,
    pub dialog_step: BalanceDialogStep,
}

impl UIState {
    pub fn new(target_count: usize, seed: Option<u64>) -> Self {
        Self {
            target_input: target_count.to_string(),
            seed_input: seed.map(|s| s.to_string()).unwrap_or_default(),
            dialog_step: BalanceDialogStep::Hidden,
        }
    }

    /// Parsed target count, if the input is a positive integer
    pub fn target_count(&self) -> Option<usize> {
        self.target_input
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|&t| t > 0)
    }

    /// Parsed seed; `Ok(None)` when the field is blank
    pub fn seed(&self) -> Result<Option<u64>, std::num::ParseIntError> {
        let trimmed = self.seed_input.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            trimmed.parse::<u64>().map(Some)
        }
    }
}

/// Progress of the background balancing run
#[derive(Default)]
pub struct BalanceRunState {
    /// Whether a run is currently executing
    pub running: bool,
    pub current: usize,
    pub total: usize,
    pub current_class: String,
    pub last_file: String,
    /// Classes finished so far
    pub completed: Vec<ClassReport>,
    pub summary: Option<BalanceSummary>,
    pub error: Option<String>,
    /// Channel receiver for progress updates from the worker thread
    pub(crate) progress_receiver: Option<Receiver<BalanceProgressMessage>>,
}

impl BalanceRunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of actions done, for the progress bar
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f32 / self.total as f32
        }
    }

    /// Apply one message from the worker thread.
    ///
    /// Returns true once the run has ended, successfully or not.
    pub fn apply(&mut self, message: BalanceProgressMessage) -> bool {
        match message {
            BalanceProgressMessage::Progress {
                current,
                total,
                class_name,
                last_file,
            } => {
                self.current = current;
                self.total = total;
                self.current_class = class_name;
                self.last_file = last_file;
                false
            }
            BalanceProgressMessage::ClassComplete(report) => {
                self.completed.push(report);
                false
            }
            BalanceProgressMessage::Complete(summary) => {
                self.summary = Some(summary);
                self.finish();
                true
            }
            BalanceProgressMessage::Error(message) => {
                self.error = Some(message);
                self.finish();
                true
            }
        }
    }

    fn finish(&mut self) {
        self.running = false;
        self.progress_receiver = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset_balancer::core::analysis::BalanceOutcome;

    #[test]
    fn test_target_and_seed_parsing() {
        let mut ui = UIState::new(50, None);
        assert_eq!(ui.target_count(), Some(50));
        assert_eq!(ui.seed(), Ok(None));

        ui.target_input = "0".to_string();
        assert_eq!(ui.target_count(), None);
        ui.target_input = " 12 ".to_string();
        assert_eq!(ui.target_count(), Some(12));

        ui.seed_input = "7".to_string();
        assert_eq!(ui.seed(), Ok(Some(7)));
        ui.seed_input = "abc".to_string();
        assert!(ui.seed().is_err());
    }

    #[test]
    fn test_run_state_applies_messages() {
        let mut run = BalanceRunState::new();
        run.running = true;

        let done = run.apply(BalanceProgressMessage::Progress {
            current: 5,
            total: 10,
            class_name: "cat".to_string(),
            last_file: "augmented_abcd_1.png".to_string(),
        });
        assert!(!done);
        assert!((run.fraction() - 0.5).abs() < 1e-6);

        run.apply(BalanceProgressMessage::ClassComplete(ClassReport {
            class_name: "cat".to_string(),
            outcome: BalanceOutcome::Oversample(1),
            before: 1,
            after: 2,
            created: vec![PathBuf::from("cat/augmented_abcd_1.png")],
            deleted: Vec::new(),
        }));
        assert_eq!(run.completed.len(), 1);

        assert!(run.apply(BalanceProgressMessage::Error("boom".to_string())));
        assert!(!run.running);
        assert_eq!(run.error.as_deref(), Some("boom"));
    }
}
