//! Binary CART classification tree using Gini impurity.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Growth limits shared by every tree of a forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Features drawn per split.
    pub max_features: usize,
    /// Depth at which nodes become leaves regardless of purity.
    pub max_depth: Option<usize>,
    /// Nodes with fewer samples are not split.
    pub min_samples_split: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Leaf {
        /// Fraction of planet samples that reached this leaf.
        planet_fraction: f64,
        samples: usize,
    },
    Split {
        feature: usize,
        /// Samples with `value <= threshold` go left.
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// Arena-allocated tree; node 0 is the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

impl DecisionTree {
    /// Grow a tree over the rows selected by `indices`.
    ///
    /// `indices` may repeat rows (bootstrap samples); repeats count as
    /// additional weight. `labels` holds classes 0/1.
    pub fn fit<R: Rng>(
        rows: &[Vec<f64>],
        labels: &[u8],
        indices: Vec<usize>,
        params: &TreeParams,
        rng: &mut R,
    ) -> Self {
        let placeholder = Node::Leaf {
            planet_fraction: 0.0,
            samples: 0,
        };
        let mut nodes = vec![placeholder.clone()];
        let mut pending = vec![(0usize, indices, 0usize)];
        while let Some((slot, members, depth)) = pending.pop() {
            let planets = members.iter().filter(|&&i| labels[i] == 1).count();
            let leaf = Node::Leaf {
                planet_fraction: if members.is_empty() {
                    0.0
                } else {
                    planets as f64 / members.len() as f64
                },
                samples: members.len(),
            };
            let pure = planets == 0 || planets == members.len();
            let too_deep = params.max_depth.is_some_and(|limit| depth >= limit);
            if pure || too_deep || members.len() < params.min_samples_split {
                nodes[slot] = leaf;
                continue;
            }
            let Some(split) = best_split(rows, labels, &members, params.max_features, rng) else {
                nodes[slot] = leaf;
                continue;
            };
            let (left_members, right_members): (Vec<usize>, Vec<usize>) = members
                .iter()
                .copied()
                .partition(|&i| rows[i][split.feature] <= split.threshold);
            let left = nodes.len();
            nodes.push(placeholder.clone());
            let right = nodes.len();
            nodes.push(placeholder.clone());
            nodes[slot] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };
            pending.push((right, right_members, depth + 1));
            pending.push((left, left_members, depth + 1));
        }
        Self { nodes }
    }

    /// Planet fraction of the leaf reached by `row`.
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf {
                    planet_fraction, ..
                } => return *planet_fraction,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(0usize, 0usize)];
        while let Some((index, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            if let Node::Split { left, right, .. } = &self.nodes[index] {
                pending.push((*left, depth + 1));
                pending.push((*right, depth + 1));
            }
        }
        deepest
    }

    /// Check the structure of a tree read from outside, such as a loaded artifact.
    ///
    /// Children must come after their parent so every walk terminates, and
    /// split features must index rows of `n_features` values.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf {
                    planet_fraction, ..
                } => {
                    if !(0.0..=1.0).contains(planet_fraction) {
                        return Err(format!(
                            "node {index} has planet fraction {planet_fraction} outside [0, 1]"
                        ));
                    }
                }
                Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {index} splits on feature {feature} of {n_features}"
                        ));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(format!(
                                "node {index} links to child {child} of {}",
                                self.nodes.len()
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn gini(planets: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = planets as f64 / total as f64;
    2.0 * p * (1.0 - p)
}

/// Search randomly ordered features for the split with lowest weighted Gini.
///
/// At least `max_features` non-constant features are inspected; the search
/// continues past that budget until some valid split exists.
fn best_split<R: Rng>(
    rows: &[Vec<f64>],
    labels: &[u8],
    members: &[usize],
    max_features: usize,
    rng: &mut R,
) -> Option<SplitCandidate> {
    let width = rows.get(members[0]).map_or(0, Vec::len);
    let mut order: Vec<usize> = (0..width).collect();
    order.shuffle(rng);

    let total = members.len();
    let total_planets = members.iter().filter(|&&i| labels[i] == 1).count();
    let mut best: Option<SplitCandidate> = None;
    let mut inspected = 0usize;
    let mut column: Vec<(f64, u8)> = Vec::with_capacity(total);
    for feature in order {
        if inspected >= max_features && best.is_some() {
            break;
        }
        column.clear();
        column.extend(members.iter().map(|&i| (rows[i][feature], labels[i])));
        column.sort_by(|a, b| a.0.total_cmp(&b.0));
        if column[0].0 >= column[total - 1].0 {
            continue;
        }
        inspected += 1;
        let mut left_planets = 0usize;
        for position in 0..total - 1 {
            left_planets += usize::from(column[position].1 == 1);
            let (current, next) = (column[position].0, column[position + 1].0);
            if current >= next {
                continue;
            }
            let left_total = position + 1;
            let right_total = total - left_total;
            let impurity = (left_total as f64 * gini(left_planets, left_total)
                + right_total as f64 * gini(total_planets - left_planets, right_total))
                / total as f64;
            if best.as_ref().is_none_or(|b| impurity < b.impurity) {
                let mut threshold = current + (next - current) / 2.0;
                if threshold >= next {
                    threshold = current;
                }
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    impurity,
                });
            }
        }
    }
    best
}
