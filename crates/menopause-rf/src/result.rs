//! What a fit returns besides the forest itself.

use serde::Serialize;

use crate::forest::RandomForest;
use crate::importance::RankedFeature;

/// Shape of a fitted forest and the data it saw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitSummary {
    pub n_trees: usize,
    pub n_features: usize,
    pub n_classes: usize,
    /// Training rows, before bootstrap resampling.
    pub n_samples: usize,
    /// Features scanned per split after resolving [`MaxFeatures`](crate::MaxFeatures).
    pub max_features: usize,
    pub mean_depth: f64,
    pub mean_leaves: f64,
}

impl FitSummary {
    pub(crate) fn of(forest: &RandomForest, n_samples: usize, max_features: usize) -> Self {
        let n_trees = forest.n_trees();
        let per_tree = |total: usize| {
            if n_trees == 0 {
                0.0
            } else {
                total as f64 / n_trees as f64
            }
        };
        Self {
            n_trees,
            n_features: forest.n_features(),
            n_classes: forest.n_classes(),
            n_samples,
            max_features,
            mean_depth: per_tree(forest.trees().iter().map(|t| t.depth()).sum()),
            mean_leaves: per_tree(forest.trees().iter().map(|t| t.n_leaves()).sum()),
        }
    }
}

/// A fitted forest with its importances and [`FitSummary`].
#[derive(Debug)]
pub struct RandomForestResult {
    forest: RandomForest,
    importances: Vec<RankedFeature>,
    summary: FitSummary,
}

impl RandomForestResult {
    pub(crate) fn new(
        forest: RandomForest,
        importances: Vec<RankedFeature>,
        summary: FitSummary,
    ) -> Self {
        Self {
            forest,
            importances,
            summary,
        }
    }

    #[must_use]
    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    #[must_use]
    pub fn into_forest(self) -> RandomForest {
        self.forest
    }

    /// Features ranked by mean decrease in impurity, most important first.
    #[must_use]
    pub fn importances(&self) -> &[RankedFeature] {
        &self.importances
    }

    #[must_use]
    pub fn summary(&self) -> &FitSummary {
        &self.summary
    }
}
