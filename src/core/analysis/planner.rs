//! Balance planning.
//!
//! Turns a pre-scanned list of class folders and a target count into a
//! concrete plan of augment and delete actions. Nothing here touches the
//! filesystem; all randomness comes from the caller's RNG.

use std::collections::HashSet;
use std::path::PathBuf;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

use crate::core::dataset::ClassDirectory;
use crate::core::error::{BalanceError, Result};
use crate::core::image::AugmentationConfig;

/// Prefix of every file written by oversampling
pub const AUGMENTED_PREFIX: &str = "augmented";

/// Length of the random token in augmented file names
pub const TOKEN_LENGTH: usize = 4;

/// Token draws per augmented copy before giving up on a free name
const MAX_NAME_ATTEMPTS: usize = 1000;

/// What balancing does to one class folder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceOutcome {
    /// Write this many augmented copies
    Oversample(usize),
    /// Delete this many existing files
    Undersample(usize),
    /// Already at the target
    Unchanged,
}

impl BalanceOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            BalanceOutcome::Oversample(_) => "Oversample",
            BalanceOutcome::Undersample(_) => "Undersample",
            BalanceOutcome::Unchanged => "Unchanged",
        }
    }

    /// Number of files that will be created or deleted
    pub fn amount(&self) -> usize {
        match self {
            BalanceOutcome::Oversample(n) | BalanceOutcome::Undersample(n) => *n,
            BalanceOutcome::Unchanged => 0,
        }
    }

    /// Short human-readable description, e.g. "+3" or "-2"
    pub fn describe(&self) -> String {
        match self {
            BalanceOutcome::Oversample(n) => format!("+{}", n),
            BalanceOutcome::Undersample(n) => format!("-{}", n),
            BalanceOutcome::Unchanged => "±0".to_string(),
        }
    }
}

/// Decide how a class with `current` files reaches `target`
pub fn decide_outcome(current: usize, target: usize) -> BalanceOutcome {
    if current < target {
        BalanceOutcome::Oversample(target - current)
    } else if current > target {
        BalanceOutcome::Undersample(current - target)
    } else {
        BalanceOutcome::Unchanged
    }
}

/// Configuration for a balancing run
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceConfig {
    /// Number of files every class should end up with
    pub target_count: usize,
    /// Prefix of augmented file names
    pub prefix: String,
    /// Length of the random token in augmented file names
    pub token_length: usize,
    /// Extension allow-list for counting images (empty = every file)
    pub extensions: Vec<String>,
    /// Augmentation applied to oversampled copies
    pub augmentation: AugmentationConfig,
}

impl BalanceConfig {
    pub fn new(target_count: usize) -> Self {
        Self {
            target_count,
            prefix: AUGMENTED_PREFIX.to_string(),
            token_length: TOKEN_LENGTH,
            extensions: Vec::new(),
            augmentation: AugmentationConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_count == 0 {
            return Err(BalanceError::InvalidTarget(self.target_count));
        }
        Ok(())
    }
}

/// A single file operation in a balance plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceAction {
    /// Write an augmented copy of `source` to `destination`
    Augment {
        source: PathBuf,
        destination: PathBuf,
    },
    /// Permanently delete `path`
    Delete { path: PathBuf },
}

impl BalanceAction {
    /// File name the action writes or removes
    pub fn file_name(&self) -> String {
        let path = match self {
            BalanceAction::Augment { destination, .. } => destination,
            BalanceAction::Delete { path } => path,
        };
        path.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Planned changes for one class folder
#[derive(Debug, Clone, PartialEq)]
pub struct ClassPlan {
    pub class_name: String,
    pub class_path: PathBuf,
    /// Image count before balancing
    pub current_count: usize,
    pub outcome: BalanceOutcome,
    pub actions: Vec<BalanceAction>,
}

impl ClassPlan {
    /// Image count once the plan is executed
    pub fn projected_count(&self) -> usize {
        match self.outcome {
            BalanceOutcome::Oversample(n) => self.current_count + n,
            BalanceOutcome::Undersample(n) => self.current_count - n,
            BalanceOutcome::Unchanged => self.current_count,
        }
    }
}

/// A complete balance plan over every class folder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalancePlan {
    pub target_count: usize,
    pub classes: Vec<ClassPlan>,
}

impl BalancePlan {
    pub fn new(target_count: usize) -> Self {
        Self {
            target_count,
            classes: Vec::new(),
        }
    }

    /// True when no class needs any change
    pub fn is_empty(&self) -> bool {
        self.total_actions() == 0
    }

    pub fn total_actions(&self) -> usize {
        self.classes.iter().map(|c| c.actions.len()).sum()
    }

    /// Number of augmented copies the plan writes
    pub fn augment_count(&self) -> usize {
        self.classes
            .iter()
            .flat_map(|c| c.actions.iter())
            .filter(|a| matches!(a, BalanceAction::Augment { .. }))
            .count()
    }

    /// Number of files the plan deletes
    pub fn delete_count(&self) -> usize {
        self.total_actions() - self.augment_count()
    }
}

/// Random lowercase ASCII token
pub fn generate_token<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| rng.gen_range(b'a'..=b'z') as char)
        .collect()
}

/// Name of an augmented copy: `<prefix>_<token>_<original>`
pub fn augmented_file_name(prefix: &str, token: &str, original: &str) -> String {
    format!("{}_{}_{}", prefix, token, original)
}

/// Plan the changes for one class folder.
///
/// Oversampling draws source files with replacement; undersampling draws
/// distinct files. Augmented names never collide with an existing file or
/// with another planned copy.
pub fn plan_class<R: Rng + ?Sized>(
    class: &ClassDirectory,
    config: &BalanceConfig,
    rng: &mut R,
) -> Result<ClassPlan> {
    let outcome = decide_outcome(class.count(), config.target_count);
    let mut actions = Vec::with_capacity(outcome.amount());

    match outcome {
        BalanceOutcome::Oversample(deficit) => {
            if class.is_empty() {
                return Err(BalanceError::EmptyClass {
                    class: class.name.clone(),
                    deficit,
                });
            }

            let mut taken: HashSet<String> = class.files.iter().cloned().collect();

            for _ in 0..deficit {
                let source = class
                    .files
                    .choose(rng)
                    .ok_or_else(|| BalanceError::EmptyClass {
                        class: class.name.clone(),
                        deficit,
                    })?;

                let target_name = pick_free_name(&mut taken, config, source, rng)
                    .ok_or_else(|| {
                        BalanceError::io(
                            class.file_path(source),
                            std::io::Error::new(
                                std::io::ErrorKind::AlreadyExists,
                                "no free name left for an augmented copy",
                            ),
                        )
                    })?;

                actions.push(BalanceAction::Augment {
                    source: class.file_path(source),
                    destination: class.file_path(&target_name),
                });
            }
        }
        BalanceOutcome::Undersample(surplus) => {
            for file in class.files.choose_multiple(rng, surplus) {
                actions.push(BalanceAction::Delete {
                    path: class.file_path(file),
                });
            }
        }
        BalanceOutcome::Unchanged => {}
    }

    debug!(
        "Planned class '{}': {} images, {:?}",
        class.name,
        class.count(),
        outcome
    );

    Ok(ClassPlan {
        class_name: class.name.clone(),
        class_path: class.path.clone(),
        current_count: class.count(),
        outcome,
        actions,
    })
}

fn pick_free_name<R: Rng + ?Sized>(
    taken: &mut HashSet<String>,
    config: &BalanceConfig,
    source: &str,
    rng: &mut R,
) -> Option<String> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let token = generate_token(rng, config.token_length);
        let name = augmented_file_name(&config.prefix, &token, source);
        if taken.insert(name.clone()) {
            return Some(name);
        }
    }
    None
}

/// Plan every class folder against the configured target.
///
/// Fails before any file is touched if a class cannot be balanced.
pub fn calculate_balance_plan<R: Rng + ?Sized>(
    classes: &[ClassDirectory],
    config: &BalanceConfig,
    rng: &mut R,
) -> Result<BalancePlan> {
    config.validate()?;

    let mut plan = BalancePlan::new(config.target_count);
    for class in classes {
        plan.classes.push(plan_class(class, config, rng)?);
    }

    info!(
        "Balance plan for target {}: {} classes, {} augmented copies, {} deletions",
        plan.target_count,
        plan.classes.len(),
        plan.augment_count(),
        plan.delete_count()
    );

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn class_with(name: &str, count: usize) -> ClassDirectory {
        let files = (0..count).map(|i| format!("img_{:02}.png", i)).collect();
        ClassDirectory::new(name, format!("/data/{}", name), files)
    }

    fn is_augmented_name(name: &str, original_names: &[String]) -> bool {
        let Some(rest) = name.strip_prefix("augmented_") else {
            return false;
        };
        let (token, original) = rest.split_at(4.min(rest.len()));
        token.len() == 4
            && token.chars().all(|c| c.is_ascii_lowercase())
            && original
                .strip_prefix('_')
                .map(|o| original_names.iter().any(|n| n == o))
                .unwrap_or(false)
    }

    #[test]
    fn test_decide_outcome() {
        assert_eq!(decide_outcome(3, 5), BalanceOutcome::Oversample(2));
        assert_eq!(decide_outcome(7, 5), BalanceOutcome::Undersample(2));
        assert_eq!(decide_outcome(5, 5), BalanceOutcome::Unchanged);
        assert_eq!(decide_outcome(0, 4), BalanceOutcome::Oversample(4));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(BalanceOutcome::Oversample(3).describe(), "+3");
        assert_eq!(BalanceOutcome::Undersample(2).describe(), "-2");
        assert_eq!(BalanceOutcome::Unchanged.amount(), 0);
        assert_eq!(BalanceOutcome::Undersample(2).as_str(), "Undersample");
    }

    #[test]
    fn test_generate_token() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            let token = generate_token(&mut rng, TOKEN_LENGTH);
            assert_eq!(token.len(), 4);
            assert!(token.chars().all(|c| c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_augmented_file_name() {
        assert_eq!(
            augmented_file_name("augmented", "qwer", "cat_01.jpg"),
            "augmented_qwer_cat_01.jpg"
        );
    }

    #[test]
    fn test_oversample_plan() {
        let class = class_with("cat", 3);
        let config = BalanceConfig::new(10);
        let mut rng = StdRng::seed_from_u64(1);

        let plan = plan_class(&class, &config, &mut rng).unwrap();
        assert_eq!(plan.outcome, BalanceOutcome::Oversample(7));
        assert_eq!(plan.actions.len(), 7);
        assert_eq!(plan.projected_count(), 10);

        let mut destinations = HashSet::new();
        for action in &plan.actions {
            match action {
                BalanceAction::Augment {
                    source,
                    destination,
                } => {
                    let source_name = source.file_name().unwrap().to_string_lossy().to_string();
                    assert!(class.files.contains(&source_name));
                    assert!(is_augmented_name(&action.file_name(), &class.files));
                    assert!(action.file_name().ends_with(&source_name));
                    assert_eq!(destination.parent(), Some(class.path.as_path()));
                    assert!(destinations.insert(destination.clone()));
                }
                BalanceAction::Delete { .. } => panic!("oversampling must not delete"),
            }
        }
    }

    #[test]
    fn test_oversample_draws_with_replacement() {
        // One source file, many copies: every copy must come from it
        let class = class_with("solo", 1);
        let config = BalanceConfig::new(6);
        let mut rng = StdRng::seed_from_u64(2);

        let plan = plan_class(&class, &config, &mut rng).unwrap();
        assert_eq!(plan.actions.len(), 5);
        assert!(plan.actions.iter().all(|a| matches!(
            a,
            BalanceAction::Augment { source, .. } if source.ends_with("img_00.png")
        )));
    }

    #[test]
    fn test_undersample_plan_is_distinct_subset() {
        let class = class_with("dog", 7);
        let config = BalanceConfig::new(5);
        let mut rng = StdRng::seed_from_u64(3);

        let plan = plan_class(&class, &config, &mut rng).unwrap();
        assert_eq!(plan.outcome, BalanceOutcome::Undersample(2));
        assert_eq!(plan.projected_count(), 5);

        let deleted: HashSet<String> = plan.actions.iter().map(|a| a.file_name()).collect();
        assert_eq!(deleted.len(), 2);
        assert!(deleted.iter().all(|name| class.files.contains(name)));
        assert!(plan
            .actions
            .iter()
            .all(|a| matches!(a, BalanceAction::Delete { .. })));
    }

    #[test]
    fn test_unchanged_plan_has_no_actions() {
        let class = class_with("bird", 5);
        let mut rng = StdRng::seed_from_u64(4);
        let plan = plan_class(&class, &BalanceConfig::new(5), &mut rng).unwrap();
        assert_eq!(plan.outcome, BalanceOutcome::Unchanged);
        assert!(plan.actions.is_empty());
    }

    #[test]
    fn test_empty_class_cannot_be_oversampled() {
        let class = class_with("empty", 0);
        let mut rng = StdRng::seed_from_u64(5);
        let result = plan_class(&class, &BalanceConfig::new(3), &mut rng);

        match result {
            Err(BalanceError::EmptyClass { class, deficit }) => {
                assert_eq!(class, "empty");
                assert_eq!(deficit, 3);
            }
            other => panic!("expected EmptyClass, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_target_rejected() {
        let classes = vec![class_with("cat", 2)];
        let mut rng = StdRng::seed_from_u64(6);
        let result = calculate_balance_plan(&classes, &BalanceConfig::new(0), &mut rng);
        assert!(matches!(result, Err(BalanceError::InvalidTarget(0))));
    }

    #[test]
    fn test_augmented_names_avoid_existing_files() {
        // Token length 1 leaves only 26 names per source, forcing re-draws
        let mut class = class_with("tiny", 1);
        class.files.push("augmented_a_img_00.png".to_string());
        class.files.sort();
        let mut config = BalanceConfig::new(20);
        config.token_length = 1;
        let mut rng = StdRng::seed_from_u64(7);

        let plan = plan_class(&class, &config, &mut rng).unwrap();
        let names: HashSet<String> = plan.actions.iter().map(|a| a.file_name()).collect();
        assert_eq!(names.len(), 18);
        assert!(names.iter().all(|n| !class.files.contains(n)));
    }

    #[test]
    fn test_same_seed_same_plan() {
        let classes = vec![class_with("cat", 3), class_with("dog", 9)];
        let config = BalanceConfig::new(6);

        let a = calculate_balance_plan(&classes, &config, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = calculate_balance_plan(&classes, &config, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.augment_count(), 3);
        assert_eq!(a.delete_count(), 3);
        assert!(!a.is_empty());
    }

    #[test]
    fn test_plan_fails_before_anything_on_empty_class() {
        let classes = vec![class_with("cat", 3), class_with("empty", 0)];
        let mut rng = StdRng::seed_from_u64(8);
        let result = calculate_balance_plan(&classes, &BalanceConfig::new(4), &mut rng);
        assert!(matches!(result, Err(BalanceError::EmptyClass { .. })));
    }
}
