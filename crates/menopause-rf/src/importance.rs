//! Feature importance aggregation across trees.

/// A feature with its forest-level importance and rank.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RankedFeature {
    /// Feature name.
    pub name: String,
    /// Mean Decrease in Impurity; sums to 1.0 across features.
    pub importance: f64,
    /// 1-based rank (1 = most important).
    pub rank: usize,
}

/// Average per-tree MDI vectors into ranked features.
///
/// Single-leaf trees (all-zero vectors) are left out of the average. The
/// mean is renormalized to sum to 1.0 and sorted descending; equal scores
/// keep column order.
pub(crate) fn aggregate_importances(per_tree: &[Vec<f64>], names: &[String]) -> Vec<RankedFeature> {
    let n_features = names.len();
    let mut totals = vec![0.0f64; n_features];
    let mut n_contributing = 0usize;

    for tree_imp in per_tree {
        if tree_imp.iter().all(|&v| v == 0.0) {
            continue;
        }
        n_contributing += 1;
        for (total, &val) in totals.iter_mut().zip(tree_imp) {
            *total += val;
        }
    }

    if n_contributing > 0 {
        let mean_sum: f64 = totals.iter().map(|t| t / n_contributing as f64).sum();
        totals
            .iter_mut()
            .for_each(|v| *v = *v / n_contributing as f64 / mean_sum);
    }

    let mut features: Vec<RankedFeature> = names
        .iter()
        .zip(totals)
        .map(|(name, importance)| RankedFeature {
            name: name.clone(),
            importance,
            rank: 0,
        })
        .collect();

    features.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    for (i, feat) in features.iter_mut().enumerate() {
        feat.rank = i + 1;
    }
    features
}
