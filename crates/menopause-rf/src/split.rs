use rand::Rng;

use crate::node::{FeatureIndex, Impurity};

/// Values closer than this are treated as equal when looking for split
/// boundaries.
const FEATURE_THRESHOLD: f64 = 1e-7;

/// Gini impurity `1 - Σ(p_i²)` of a node from its class counts.
///
/// Returns an impurity of zero when `n_samples` is zero.
#[must_use]
pub fn gini(class_counts: &[usize], n_samples: usize) -> Impurity {
    if n_samples == 0 {
        return Impurity::new(0.0);
    }
    let n = n_samples as f64;
    let sum_sq: f64 = class_counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum();
    Impurity::new(1.0 - sum_sq)
}

/// Best split found for a node.
#[derive(Debug, Clone)]
pub(crate) struct SplitResult {
    pub(crate) feature: FeatureIndex,
    /// Samples with `value <= threshold` go left.
    pub(crate) threshold: f64,
    /// `n·I(parent) - n_l·I(left) - n_r·I(right)`, unnormalized.
    pub(crate) impurity_decrease: f64,
    pub(crate) left_indices: Vec<usize>,
    pub(crate) right_indices: Vec<usize>,
}

/// Search for the Gini-optimal threshold split of `sample_indices`.
///
/// Features are drawn without replacement in random order. Drawing stops
/// once `max_features` non-constant features have been scanned, or when
/// every feature has been drawn, so a node whose first draws are all
/// constant keeps looking instead of becoming a leaf.
///
/// Returns `None` when no feature admits a split that leaves at least
/// `min_samples_leaf` samples on each side.
///
/// `columns` is column-major: `columns[feature][sample]`. `sample_indices`
/// may contain repeats (bootstrap draws); each repeat counts once more.
#[allow(clippy::too_many_arguments)]
pub(crate) fn find_best_split(
    columns: &[Vec<f64>],
    labels: &[usize],
    sample_indices: &[usize],
    class_counts: &[usize],
    parent_impurity: Impurity,
    max_features: usize,
    min_samples_leaf: usize,
    rng: &mut impl Rng,
) -> Option<SplitResult> {
    let n_features = columns.len();
    let n_samples = sample_indices.len();
    if n_samples < 2 || n_features == 0 {
        return None;
    }

    let mut feature_order: Vec<usize> = (0..n_features).collect();
    let mut n_drawn = 0usize;
    let mut n_scanned = 0usize;

    let mut best_decrease = f64::NEG_INFINITY;
    let mut best: Option<(usize, f64)> = None;
    let mut sorted: Vec<(f64, usize)> = Vec::with_capacity(n_samples);

    while n_scanned < max_features && n_drawn < n_features {
        let j = rng.gen_range(n_drawn..n_features);
        feature_order.swap(n_drawn, j);
        let feat_idx = feature_order[n_drawn];
        n_drawn += 1;

        let column = &columns[feat_idx];
        sorted.clear();
        sorted.extend(sample_indices.iter().map(|&si| (column[si], labels[si])));
        sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

        if sorted[n_samples - 1].0 <= sorted[0].0 + FEATURE_THRESHOLD {
            continue;
        }
        n_scanned += 1;

        let mut left_counts = vec![0usize; class_counts.len()];
        let mut right_counts = class_counts.to_vec();

        for i in 0..(n_samples - 1) {
            let (value, class) = sorted[i];
            left_counts[class] += 1;
            right_counts[class] -= 1;

            let next = sorted[i + 1].0;
            if next <= value + FEATURE_THRESHOLD {
                continue;
            }

            let n_left = i + 1;
            let n_right = n_samples - n_left;
            if n_left < min_samples_leaf || n_right < min_samples_leaf {
                continue;
            }

            let decrease = n_samples as f64 * parent_impurity.value()
                - n_left as f64 * gini(&left_counts, n_left).value()
                - n_right as f64 * gini(&right_counts, n_right).value();

            if decrease > best_decrease {
                best_decrease = decrease;
                let mut threshold = value / 2.0 + next / 2.0;
                if threshold >= next || !threshold.is_finite() {
                    threshold = value;
                }
                best = Some((feat_idx, threshold));
            }
        }
    }

    let (feature, threshold) = best?;

    let column = &columns[feature];
    let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = sample_indices
        .iter()
        .partition(|&&si| column[si] <= threshold);

    Some(SplitResult {
        feature: FeatureIndex::new(feature),
        threshold,
        impurity_decrease: best_decrease,
        left_indices,
        right_indices,
    })
}
