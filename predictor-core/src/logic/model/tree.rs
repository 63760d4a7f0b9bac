//! Binary decision trees shared by the forest and boosting candidates.
//!
//! One greedy builder grows a tree for any per-node statistic implementing
//! [`NodeStats`]: class counts with Gini impurity for the random forest,
//! gradient/hessian sums for boosting.

use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

// =============================================================================
// Node storage
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Flat node arena; node 0 is the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Leaf value reached by one sample (`x[feature] <= threshold` goes left)
    pub fn predict_row(&self, x: ArrayView1<f64>) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { value } => return *value,
                Node::Split { feature, threshold, left, right } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }

    /// Structural sanity check used when loading persisted models
    pub fn is_well_formed(&self, n_features: usize) -> bool {
        !self.nodes.is_empty()
            && self.nodes.iter().enumerate().all(|(i, node)| match node {
                Node::Leaf { value } => value.is_finite(),
                Node::Split { feature, threshold, left, right } => {
                    *feature < n_features
                        && threshold.is_finite()
                        && *left > i
                        && *right > i
                        && *left < self.nodes.len()
                        && *right < self.nodes.len()
                }
            })
    }
}

// =============================================================================
// Split statistics
// =============================================================================

/// Additive per-node statistics driving split search
pub trait NodeStats: Clone {
    /// Per-sample payload the statistic accumulates
    type Sample;
    /// Per-tree settings shared by every node (e.g. regularization)
    type Config;

    fn empty(config: &Self::Config) -> Self;
    fn add(&mut self, sample: &Self::Sample);
    fn remove(&mut self, sample: &Self::Sample);
    /// Split quality contribution; a split's gain is
    /// `score(left) + score(right) - score(parent)`
    fn score(&self) -> f64;
    /// Whether a child with these stats is allowed to exist
    fn is_valid_child(&self) -> bool;
    /// Whether no further split can help (e.g. a pure node)
    fn is_terminal(&self) -> bool;
    fn leaf_value(&self) -> f64;
}

/// Gini statistics over binary labels; leaf value is P(class 1)
#[derive(Debug, Clone, Copy, Default)]
pub struct GiniStats {
    counts: [f64; 2],
}

impl NodeStats for GiniStats {
    type Sample = usize;
    type Config = ();

    fn empty(_: &()) -> Self {
        Self::default()
    }

    fn add(&mut self, label: &usize) {
        self.counts[*label] += 1.0;
    }

    fn remove(&mut self, label: &usize) {
        self.counts[*label] -= 1.0;
    }

    // n·(1 - gini) = Σ n_k² / n; maximizing the children's sum minimizes
    // their weighted impurity.
    fn score(&self) -> f64 {
        let n = self.counts[0] + self.counts[1];
        if n <= 0.0 {
            0.0
        } else {
            (self.counts[0] * self.counts[0] + self.counts[1] * self.counts[1]) / n
        }
    }

    fn is_valid_child(&self) -> bool {
        self.counts[0] + self.counts[1] >= 1.0
    }

    fn is_terminal(&self) -> bool {
        self.counts[0] == 0.0 || self.counts[1] == 0.0
    }

    fn leaf_value(&self) -> f64 {
        let n = self.counts[0] + self.counts[1];
        if n <= 0.0 { 0.5 } else { self.counts[1] / n }
    }
}

/// Leaf regularization for gradient trees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientConfig {
    /// L2 penalty on leaf values
    pub lambda: f64,
    /// Minimum hessian sum per child
    pub min_child_weight: f64,
}

/// First and second order gradient sums (logistic loss boosting)
#[derive(Debug, Clone, Copy)]
pub struct GradientStats {
    grad: f64,
    hess: f64,
    config: GradientConfig,
}

/// Gradient and hessian of one sample
#[derive(Debug, Clone, Copy)]
pub struct GradientSample {
    pub grad: f64,
    pub hess: f64,
}

impl NodeStats for GradientStats {
    type Sample = GradientSample;
    type Config = GradientConfig;

    fn empty(config: &GradientConfig) -> Self {
        Self { grad: 0.0, hess: 0.0, config: *config }
    }

    fn add(&mut self, s: &GradientSample) {
        self.grad += s.grad;
        self.hess += s.hess;
    }

    fn remove(&mut self, s: &GradientSample) {
        self.grad -= s.grad;
        self.hess -= s.hess;
    }

    fn score(&self) -> f64 {
        self.grad * self.grad / (self.hess + self.config.lambda)
    }

    fn is_valid_child(&self) -> bool {
        self.hess >= self.config.min_child_weight
    }

    fn is_terminal(&self) -> bool {
        false
    }

    fn leaf_value(&self) -> f64 {
        -self.grad / (self.hess + self.config.lambda)
    }
}

// =============================================================================
// Builder
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Features considered per split; `None` = all
    pub max_features: Option<usize>,
    /// Minimum gain required to accept a split
    pub min_gain: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_split: 2,
            max_features: None,
            min_gain: 1e-12,
        }
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

/// Grow a tree over `rows` (indices into `x`, duplicates allowed)
pub fn grow<S: NodeStats>(
    x: ArrayView2<f64>,
    samples: &[S::Sample],
    config: &S::Config,
    rows: Vec<usize>,
    params: &TreeParams,
    rng: &mut StdRng,
) -> Tree {
    let mut nodes = Vec::new();
    let ctx = Context { x: x.view(), samples, config, params };
    build::<S>(&ctx, rows, 0, rng, &mut nodes);
    Tree { nodes }
}

/// Inputs fixed for the whole tree
struct Context<'a, S: NodeStats> {
    x: ArrayView2<'a, f64>,
    samples: &'a [S::Sample],
    config: &'a S::Config,
    params: &'a TreeParams,
}

fn stats_of<S: NodeStats>(ctx: &Context<'_, S>, rows: &[usize]) -> S {
    let samples = ctx.samples;
    let mut stats = S::empty(ctx.config);
    for &r in rows {
        stats.add(&samples[r]);
    }
    stats
}

fn build<S: NodeStats>(
    ctx: &Context<'_, S>,
    rows: Vec<usize>,
    depth: usize,
    rng: &mut StdRng,
    nodes: &mut Vec<Node>,
) -> usize {
    let (x, params) = (ctx.x, ctx.params);
    let idx = nodes.len();
    let stats: S = stats_of(ctx, &rows);
    nodes.push(Node::Leaf { value: stats.leaf_value() });

    if depth >= params.max_depth || rows.len() < params.min_samples_split || stats.is_terminal() {
        return idx;
    }

    let Some(best) = find_split(ctx, &rows, &stats, rng) else {
        return idx;
    };

    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
        .into_iter()
        .partition(|&r| x[[r, best.feature]] <= best.threshold);

    let left = build::<S>(ctx, left_rows, depth + 1, rng, nodes);
    let right = build::<S>(ctx, right_rows, depth + 1, rng, nodes);
    nodes[idx] = Node::Split {
        feature: best.feature,
        threshold: best.threshold,
        left,
        right,
    };
    idx
}

fn find_split<S: NodeStats>(
    ctx: &Context<'_, S>,
    rows: &[usize],
    parent: &S,
    rng: &mut StdRng,
) -> Option<BestSplit> {
    let (x, samples, params) = (ctx.x, ctx.samples, ctx.params);
    let n_features = x.ncols();
    let candidates: Vec<usize> = match params.max_features {
        Some(k) if k < n_features => index::sample(rng, n_features, k.max(1)).into_vec(),
        _ => (0..n_features).collect(),
    };

    let parent_score = parent.score();
    let mut best: Option<BestSplit> = None;
    let mut sorted = rows.to_vec();

    for feature in candidates {
        sorted.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));

        let mut left = S::empty(ctx.config);
        let mut right = parent.clone();

        for pos in 0..sorted.len().saturating_sub(1) {
            let r = sorted[pos];
            left.add(&samples[r]);
            right.remove(&samples[r]);

            let here = x[[r, feature]];
            let next = x[[sorted[pos + 1], feature]];
            if here == next || !left.is_valid_child() || !right.is_valid_child() {
                continue;
            }

            let gain = left.score() + right.score() - parent_score;
            if gain > params.min_gain && best.as_ref().map_or(true, |b| gain > b.gain) {
                best = Some(BestSplit {
                    feature,
                    threshold: here + (next - here) / 2.0,
                    gain,
                });
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;

    #[test]
    fn test_gini_tree_separates_classes() {
        let x = array![[0.0, 5.0], [1.0, 5.0], [2.0, 5.0], [10.0, 5.0], [11.0, 5.0], [12.0, 5.0]];
        let labels = vec![0usize, 0, 0, 1, 1, 1];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = grow::<GiniStats>(x.view(), &labels, &(), (0..6).collect(), &TreeParams::default(), &mut rng);

        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.predict_row(array![1.5, 5.0].view()), 0.0);
        assert_eq!(tree.predict_row(array![9.0, 5.0].view()), 1.0);
        assert!(tree.is_well_formed(2));
    }

    #[test]
    fn test_max_depth_zero_is_single_leaf() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let labels = vec![0usize, 1, 1, 1];
        let params = TreeParams { max_depth: 0, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(0);
        let tree = grow::<GiniStats>(x.view(), &labels, &(), (0..4).collect(), &params, &mut rng);
        assert_eq!(tree.n_nodes(), 1);
        assert_eq!(tree.predict_row(array![0.0].view()), 0.75);
    }

    #[test]
    fn test_constant_feature_never_splits() {
        let x = array![[1.0], [1.0], [1.0]];
        let labels = vec![0usize, 1, 0];
        let mut rng = StdRng::seed_from_u64(0);
        let tree = grow::<GiniStats>(x.view(), &labels, &(), (0..3).collect(), &TreeParams::default(), &mut rng);
        assert_eq!(tree.n_nodes(), 1);
    }

    #[test]
    fn test_gradient_leaf_value() {
        let x = array![[0.0], [1.0]];
        let samples = vec![GradientSample { grad: -0.5, hess: 0.25 }; 2];
        let config = GradientConfig { lambda: 1.0, min_child_weight: 0.0 };
        let params = TreeParams { max_depth: 0, ..Default::default() };
        let mut rng = StdRng::seed_from_u64(0);
        let tree = grow::<GradientStats>(x.view(), &samples, &config, vec![0, 1], &params, &mut rng);
        // -G / (H + λ) = 1.0 / 1.5
        assert!((tree.predict_row(array![0.0].view()) - 1.0 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_min_child_weight_blocks_split() {
        let x = array![[0.0], [1.0], [2.0], [3.0]];
        let samples = vec![
            GradientSample { grad: -1.0, hess: 0.5 },
            GradientSample { grad: -1.0, hess: 0.5 },
            GradientSample { grad: 1.0, hess: 0.5 },
            GradientSample { grad: 1.0, hess: 0.5 },
        ];
        let mut rng = StdRng::seed_from_u64(0);
        let params = TreeParams::default();

        let loose = GradientConfig { lambda: 1.0, min_child_weight: 0.0 };
        let tree = grow::<GradientStats>(x.view(), &samples, &loose, (0..4).collect(), &params, &mut rng);
        assert!(tree.n_nodes() > 1);

        // Each half carries a hessian sum of 1.0.
        let strict = GradientConfig { lambda: 1.0, min_child_weight: 1.5 };
        let tree = grow::<GradientStats>(x.view(), &samples, &strict, (0..4).collect(), &params, &mut rng);
        assert_eq!(tree.n_nodes(), 1);
    }

    #[test]
    fn test_malformed_tree_detected() {
        let tree = Tree {
            nodes: vec![Node::Split { feature: 3, threshold: 0.0, left: 1, right: 2 }],
        };
        assert!(!tree.is_well_formed(2));
    }
}
