use std::path::Path;

use tracing::info;

use crate::core::dataset::{scan_class_directories, ClassDirectory};
use crate::core::error::Result;

use super::planner::{decide_outcome, BalanceOutcome};

/// Image count for a single class folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassCount {
    pub name: String,
    pub count: usize,
}

/// Statistics about per-class balance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceStats {
    pub classes: Vec<ClassCount>,
    pub total_images: usize,
}

impl BalanceStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_classes(classes: &[ClassDirectory]) -> Self {
        let classes: Vec<ClassCount> = classes
            .iter()
            .map(|c| ClassCount {
                name: c.name.clone(),
                count: c.count(),
            })
            .collect();
        let total_images = classes.iter().map(|c| c.count).sum();

        Self {
            classes,
            total_images,
        }
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Get count for a specific class
    pub fn get_count(&self, name: &str) -> Option<usize> {
        self.classes.iter().find(|c| c.name == name).map(|c| c.count)
    }

    /// Get share of all images held by a class, in percent
    pub fn get_percentage(&self, name: &str) -> f32 {
        if self.total_images == 0 {
            return 0.0;
        }
        let count = self.get_count(name).unwrap_or(0);
        (count as f32 / self.total_images as f32) * 100.0
    }

    pub fn min_count(&self) -> usize {
        self.classes.iter().map(|c| c.count).min().unwrap_or(0)
    }

    pub fn max_count(&self) -> usize {
        self.classes.iter().map(|c| c.count).max().unwrap_or(0)
    }

    pub fn mean_count(&self) -> f32 {
        if self.classes.is_empty() {
            return 0.0;
        }
        self.total_images as f32 / self.classes.len() as f32
    }

    /// Largest class size over smallest class size.
    ///
    /// 1.0 for an empty or perfectly balanced dataset, infinite when a
    /// class is empty and another is not.
    pub fn imbalance_ratio(&self) -> f32 {
        let (min, max) = (self.min_count(), self.max_count());
        if max == 0 {
            1.0
        } else if min == 0 {
            f32::INFINITY
        } else {
            max as f32 / min as f32
        }
    }

    /// Names of classes with no images
    pub fn empty_classes(&self) -> Vec<&str> {
        self.classes
            .iter()
            .filter(|c| c.count == 0)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// What balancing to `target` would do to each class
    pub fn projected_outcomes(&self, target: usize) -> Vec<(String, BalanceOutcome)> {
        self.classes
            .iter()
            .map(|c| (c.name.clone(), decide_outcome(c.count, target)))
            .collect()
    }
}

/// Ways to derive a target count from the current class sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetStrategy {
    /// Undersample everything down to the smallest class
    Smallest,
    /// Oversample everything up to the largest class
    Largest,
    /// Meet in the middle at the rounded mean
    #[default]
    Mean,
}

impl TargetStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            TargetStrategy::Smallest => "Smallest",
            TargetStrategy::Largest => "Largest",
            TargetStrategy::Mean => "Mean",
        }
    }

    pub fn all() -> Vec<TargetStrategy> {
        vec![
            TargetStrategy::Smallest,
            TargetStrategy::Mean,
            TargetStrategy::Largest,
        ]
    }
}

/// Suggest a target count for the given strategy
pub fn suggested_target(stats: &BalanceStats, strategy: TargetStrategy) -> usize {
    match strategy {
        TargetStrategy::Smallest => stats.min_count(),
        TargetStrategy::Largest => stats.max_count(),
        TargetStrategy::Mean => stats.mean_count().round() as usize,
    }
}

/// Count the images in every class folder under `parent`
pub fn analyze_dataset(parent: &Path, extensions: &[String]) -> Result<BalanceStats> {
    let classes = scan_class_directories(parent, extensions)?;
    let stats = BalanceStats::from_classes(&classes);

    info!(
        "Analysis complete: {} images in {} classes (min {}, max {}, mean {:.1})",
        stats.total_images,
        stats.class_count(),
        stats.min_count(),
        stats.max_count(),
        stats.mean_count()
    );

    Ok(stats)
}

/// Generate recommendations for balancing to `target`
pub fn get_recommendations(stats: &BalanceStats, target: usize) -> Vec<String> {
    let mut recommendations = Vec::new();

    if stats.classes.is_empty() {
        recommendations.push("No class folders found in dataset.".to_string());
        return recommendations;
    }

    if target == 0 {
        recommendations.push("⚠ Target count must be at least 1.".to_string());
        return recommendations;
    }

    let ratio = stats.imbalance_ratio();
    if ratio.is_finite() {
        recommendations.push(format!(
            "Imbalance ratio {:.2}:1 (smallest {}, largest {})",
            ratio,
            stats.min_count(),
            stats.max_count()
        ));
    }

    for class in &stats.classes {
        match decide_outcome(class.count, target) {
            BalanceOutcome::Oversample(n) if class.count == 0 => {
                recommendations.push(format!(
                    "⚠ '{}' is empty and cannot be oversampled by {}; add source images first",
                    class.name, n
                ));
            }
            BalanceOutcome::Oversample(n) => {
                recommendations.push(format!(
                    "📈 Add {} augmented images to '{}' ({} → {})",
                    n, class.name, class.count, target
                ));
            }
            BalanceOutcome::Undersample(n) => {
                recommendations.push(format!(
                    "📉 Delete {} images from '{}' ({} → {})",
                    n, class.name, class.count, target
                ));
            }
            BalanceOutcome::Unchanged => {
                recommendations.push(format!(
                    "✓ '{}' already has {} images",
                    class.name, target
                ));
            }
        }
    }

    let deletions: usize = stats
        .classes
        .iter()
        .map(|c| c.count.saturating_sub(target))
        .sum();
    if deletions > 0 {
        recommendations.push(format!(
            "⚠ {} files will be permanently deleted; back up the dataset first",
            deletions
        ));
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn stats_of(counts: &[(&str, usize)]) -> BalanceStats {
        let classes: Vec<ClassDirectory> = counts
            .iter()
            .map(|(name, count)| {
                let files = (0..*count).map(|i| format!("{}.png", i)).collect();
                ClassDirectory::new(*name, format!("/data/{}", name), files)
            })
            .collect();
        BalanceStats::from_classes(&classes)
    }

    #[test]
    fn test_basic_stats() {
        let stats = stats_of(&[("cat", 3), ("dog", 7), ("bird", 5)]);
        assert_eq!(stats.total_images, 15);
        assert_eq!(stats.min_count(), 3);
        assert_eq!(stats.max_count(), 7);
        assert!((stats.mean_count() - 5.0).abs() < 1e-6);
        assert!((stats.imbalance_ratio() - 7.0 / 3.0).abs() < 1e-6);
        assert_eq!(stats.get_count("dog"), Some(7));
        assert_eq!(stats.get_count("fish"), None);
        assert!((stats.get_percentage("bird") - 100.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_imbalance_ratio_edge_cases() {
        assert_eq!(BalanceStats::new().imbalance_ratio(), 1.0);
        assert_eq!(stats_of(&[("a", 0), ("b", 0)]).imbalance_ratio(), 1.0);
        assert!(stats_of(&[("a", 0), ("b", 4)]).imbalance_ratio().is_infinite());
        assert_eq!(stats_of(&[("a", 4), ("b", 4)]).imbalance_ratio(), 1.0);
    }

    #[test]
    fn test_suggested_targets() {
        let stats = stats_of(&[("cat", 2), ("dog", 9), ("bird", 4)]);
        assert_eq!(suggested_target(&stats, TargetStrategy::Smallest), 2);
        assert_eq!(suggested_target(&stats, TargetStrategy::Largest), 9);
        assert_eq!(suggested_target(&stats, TargetStrategy::Mean), 5);
    }

    #[test]
    fn test_projected_outcomes() {
        let stats = stats_of(&[("cat", 3), ("dog", 7), ("bird", 5)]);
        let outcomes = stats.projected_outcomes(5);
        assert_eq!(
            outcomes,
            vec![
                ("cat".to_string(), BalanceOutcome::Oversample(2)),
                ("dog".to_string(), BalanceOutcome::Undersample(2)),
                ("bird".to_string(), BalanceOutcome::Unchanged),
            ]
        );
    }

    #[test]
    fn test_recommendations_flag_empty_class() {
        let stats = stats_of(&[("cat", 3), ("empty", 0)]);
        assert_eq!(stats.empty_classes(), vec!["empty"]);

        let recs = get_recommendations(&stats, 3);
        assert!(recs.iter().any(|r| r.contains("'empty' is empty")));
        assert!(recs.iter().any(|r| r.contains("'cat' already has 3")));
    }

    #[test]
    fn test_recommendations_warn_about_deletions() {
        let stats = stats_of(&[("cat", 3), ("dog", 7)]);
        let recs = get_recommendations(&stats, 5);
        assert!(recs.iter().any(|r| r.contains("Add 2 augmented images to 'cat'")));
        assert!(recs.iter().any(|r| r.contains("Delete 2 images from 'dog'")));
        assert!(recs.iter().any(|r| r.contains("2 files will be permanently deleted")));
    }

    #[test]
    fn test_recommendations_for_empty_dataset_and_zero_target() {
        let empty = BalanceStats::new();
        assert_eq!(
            get_recommendations(&empty, 5),
            vec!["No class folders found in dataset.".to_string()]
        );

        let stats = stats_of(&[("cat", 1)]);
        assert!(get_recommendations(&stats, 0)[0].contains("at least 1"));
    }

    #[test]
    fn test_analyze_dataset_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        for (name, count) in [("cat", 2), ("dog", 3)] {
            let dir = temp_dir.path().join(name);
            fs::create_dir(&dir).unwrap();
            for i in 0..count {
                fs::write(dir.join(format!("{}.png", i)), b"x").unwrap();
            }
        }
        fs::write(temp_dir.path().join("readme.md"), b"x").unwrap();

        let stats = analyze_dataset(temp_dir.path(), &[]).unwrap();
        assert_eq!(stats.class_count(), 2);
        assert_eq!(stats.total_images, 5);
        assert_eq!(stats.get_count("dog"), Some(3));
    }
}
