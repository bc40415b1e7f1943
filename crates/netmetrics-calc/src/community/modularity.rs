//! Newman-Girvan modularity.
//!
//! Evaluated on the simple undirected collapse of the graph: direction is
//! ignored, parallel edges count once and self-loops not at all. With `m`
//! such edges,
//!
//! ```text
//! Q = sum over communities c of (L_c / m - (d_c / 2m)^2)
//! ```
//!
//! where `L_c` is the number of edges inside `c` and `d_c` the total degree
//! of its members. A graph without edges has modularity 0.

use netmetrics_core::DenseIndex;

/// Modularity of the partition that gives dense position `v` the label
/// `labels[v]`.
#[must_use]
pub fn modularity(index: &DenseIndex, labels: &[usize]) -> f64 {
    let ends: usize = (0..index.len()).map(|v| index.neighbors(v).len()).sum();
    if ends == 0 {
        return 0.0;
    }

    let slots = labels.iter().copied().max().map_or(0, |max| max + 1);
    let mut inside = vec![0usize; slots];
    let mut degree = vec![0usize; slots];
    for (v, &label) in labels.iter().enumerate() {
        let neighbors = index.neighbors(v);
        degree[label] += neighbors.len();
        inside[label] += neighbors.iter().filter(|&&u| labels[u] == label).count();
    }

    // `inside` counts every internal edge from both ends, like `ends`.
    let two_m = ends as f64;
    inside
        .iter()
        .zip(&degree)
        .map(|(&internal, &d)| {
            let share = d as f64 / two_m;
            share.mul_add(-share, internal as f64 / two_m)
        })
        .sum()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
