//! Balance execution.
//!
//! Applies a [`BalancePlan`] to disk: augmented copies are written next to
//! their sources and surplus files are deleted. There is no rollback; a
//! failure part-way leaves every earlier change in place.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;

use rand::Rng;
use tracing::{error, info, info_span};

use crate::core::dataset::scan_class_directories;
use crate::core::error::{BalanceError, Result};
use crate::core::image::Augmenter;
use crate::core::operations::delete_file;

use super::planner::{
    calculate_balance_plan, BalanceAction, BalanceConfig, BalanceOutcome, BalancePlan, ClassPlan,
};

/// Send a progress update every N actions
const PROGRESS_INTERVAL: usize = 5;

/// What happened to one class folder
#[derive(Debug, Clone, PartialEq)]
pub struct ClassReport {
    pub class_name: String,
    pub outcome: BalanceOutcome,
    /// Image count before balancing
    pub before: usize,
    /// Image count after balancing
    pub after: usize,
    /// Augmented files written
    pub created: Vec<PathBuf>,
    /// Files deleted
    pub deleted: Vec<PathBuf>,
}

/// Result of a full balancing run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceSummary {
    pub target_count: usize,
    pub reports: Vec<ClassReport>,
}

impl BalanceSummary {
    pub fn total_created(&self) -> usize {
        self.reports.iter().map(|r| r.created.len()).sum()
    }

    pub fn total_deleted(&self) -> usize {
        self.reports.iter().map(|r| r.deleted.len()).sum()
    }

    /// Number of classes that were oversampled or undersampled
    pub fn classes_changed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome != BalanceOutcome::Unchanged)
            .count()
    }

    pub fn report(&self, class_name: &str) -> Option<&ClassReport> {
        self.reports.iter().find(|r| r.class_name == class_name)
    }
}

/// Progress message for balance execution
#[derive(Debug, Clone)]
pub enum BalanceProgressMessage {
    Progress {
        current: usize,
        total: usize,
        class_name: String,
        last_file: String,
    },
    ClassComplete(ClassReport),
    Complete(BalanceSummary),
    Error(String),
}

fn send_error(progress_tx: &Option<Sender<BalanceProgressMessage>>, err: &BalanceError) {
    if let Some(tx) = progress_tx {
        let _ = tx.send(BalanceProgressMessage::Error(err.to_string()));
    }
}

/// Execute the actions of one class plan in order.
///
/// `on_action` runs after each action succeeds.
pub fn execute_class_plan<R, F>(
    plan: &ClassPlan,
    augmenter: &Augmenter,
    rng: &mut R,
    mut on_action: F,
) -> Result<ClassReport>
where
    R: Rng + ?Sized,
    F: FnMut(&BalanceAction),
{
    let _span = info_span!("class", name = %plan.class_name).entered();
    let mut created = Vec::new();
    let mut deleted = Vec::new();

    for action in &plan.actions {
        match action {
            BalanceAction::Augment {
                source,
                destination,
            } => {
                augmenter.augment_file(source, destination, rng)?;
                created.push(destination.clone());
            }
            BalanceAction::Delete { path } => {
                delete_file(path)?;
                deleted.push(path.clone());
            }
        }
        on_action(action);
    }

    let after = plan.current_count + created.len() - deleted.len();
    info!(
        "Class '{}': {} -> {} ({} created, {} deleted)",
        plan.class_name,
        plan.current_count,
        after,
        created.len(),
        deleted.len()
    );

    Ok(ClassReport {
        class_name: plan.class_name.clone(),
        outcome: plan.outcome,
        before: plan.current_count,
        after,
        created,
        deleted,
    })
}

/// Execute a balance plan, class by class
pub fn execute_balance_plan<R: Rng + ?Sized>(
    plan: &BalancePlan,
    augmenter: &Augmenter,
    rng: &mut R,
    progress_tx: Option<Sender<BalanceProgressMessage>>,
) -> Result<BalanceSummary> {
    let total = plan.total_actions();
    let mut processed = 0;
    let mut summary = BalanceSummary {
        target_count: plan.target_count,
        reports: Vec::with_capacity(plan.classes.len()),
    };

    info!(
        "Executing balance plan: {} actions across {} classes",
        total,
        plan.classes.len()
    );

    for class_plan in &plan.classes {
        let result = execute_class_plan(class_plan, augmenter, rng, |action| {
            processed += 1;
            if let Some(ref tx) = progress_tx {
                if processed % PROGRESS_INTERVAL == 0 || processed == total {
                    let _ = tx.send(BalanceProgressMessage::Progress {
                        current: processed,
                        total,
                        class_name: class_plan.class_name.clone(),
                        last_file: action.file_name(),
                    });
                }
            }
        });

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                error!(
                    "Balancing stopped in class '{}' after {}/{} actions: {}",
                    class_plan.class_name, processed, total, e
                );
                send_error(&progress_tx, &e);
                return Err(e);
            }
        };

        if let Some(ref tx) = progress_tx {
            let _ = tx.send(BalanceProgressMessage::ClassComplete(report.clone()));
        }
        summary.reports.push(report);
    }

    info!(
        "Balance complete: {} created, {} deleted, {} of {} classes changed",
        summary.total_created(),
        summary.total_deleted(),
        summary.classes_changed(),
        summary.reports.len()
    );

    if let Some(tx) = progress_tx {
        let _ = tx.send(BalanceProgressMessage::Complete(summary.clone()));
    }

    Ok(summary)
}

/// Scan, plan and execute in one go.
///
/// Every class is planned before any file is touched, so scan and planning
/// errors leave the dataset unmodified.
pub fn balance_with_config<R: Rng + ?Sized>(
    parent: &Path,
    config: &BalanceConfig,
    rng: &mut R,
    progress_tx: Option<Sender<BalanceProgressMessage>>,
) -> Result<BalanceSummary> {
    let _span = info_span!("balance", target = config.target_count).entered();
    info!(
        "Balancing {:?} to {} images per class",
        parent, config.target_count
    );

    let plan = scan_class_directories(parent, &config.extensions)
        .and_then(|classes| calculate_balance_plan(&classes, config, rng));

    let plan = match plan {
        Ok(plan) => plan,
        Err(e) => {
            error!("Balance aborted before any change: {}", e);
            send_error(&progress_tx, &e);
            return Err(e);
        }
    };

    let augmenter = Augmenter::new(config.augmentation.clone());
    execute_balance_plan(&plan, &augmenter, rng, progress_tx)
}

/// Balance every class folder under `parent` to exactly `target` files
/// with the default configuration
pub fn balance<R: Rng + ?Sized>(parent: &Path, target: usize, rng: &mut R) -> Result<BalanceSummary> {
    balance_with_config(parent, &BalanceConfig::new(target), rng, None)
}
