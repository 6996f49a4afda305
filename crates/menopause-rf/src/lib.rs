//! Random Forest classification: train, evaluate, predict, serialize.
//!
//! CART trees split on Gini impurity over a random feature subset, each
//! grown on a bootstrap resample. Trees train in parallel via rayon from
//! seeds drawn up front, so a given seed always yields the same forest.
//! Class probabilities are the mean of the trees' leaf distributions.

mod config;
mod confusion;
mod error;
mod eval;
mod forest;
mod importance;
mod node;
mod predict;
mod result;
mod serialize;
mod split;
mod tree;

pub use config::{MaxFeatures, RandomForestConfig};
pub use confusion::{ClassMetrics, ConfusionMatrix};
pub use error::RfError;
pub use eval::HoldoutEvaluation;
pub use forest::RandomForest;
pub use importance::RankedFeature;
pub use node::{FeatureIndex, Impurity, Node, NodeIndex};
pub use predict::ClassDistribution;
pub use result::{FitSummary, RandomForestResult};
pub use split::gini;
pub use tree::{DecisionTree, DecisionTreeConfig};
