//! Greedy modularity agglomeration.
//!
//! # Algorithm
//!
//! Clauset, Newman & Moore (2004). Every vertex starts as its own
//! community. For each pair of adjacent communities `i`, `j` the algorithm
//! keeps the modularity change `dQ[i][j]` that merging them would cause,
//! starting from `2 * (1 / 2m - a_i * a_j)` with `a_i = k_i / 2m`. Each
//! step merges the pair with the largest score, then updates the merged
//! row:
//!
//! - `k` adjacent to both: `dQ[i][k] + dQ[j][k]`;
//! - `k` adjacent to `i` only: `dQ[i][k] - 2 a_j a_k`;
//! - `k` adjacent to `j` only: `dQ[j][k] - 2 a_i a_k`.
//!
//! It stops when no merge would increase modularity.
//!
//! The score is `dQ` itself, or with [`MergeWeighting::ConsolidationRatio`]
//! `dQ * min(|i| / |j|, |j| / |i|)` (Wakita & Tsurumi 2007), which favours
//! merging communities of similar size and avoids one community swallowing
//! the graph. Only merges with positive `dQ` are ever considered.
//!
//! Ties go to the lowest community numbers, so results are deterministic.
//! Runs on the simple undirected collapse of the graph.

use std::collections::BTreeMap;

use netmetrics_core::{CalculationContext, Outcome};
use tracing::{debug, instrument};

const LABEL: &str = "Calculating clusters";

/// How candidate merges are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeWeighting {
    /// Rank by the raw modularity gain.
    Plain,
    /// Rank by the gain times the size ratio of the two communities.
    ConsolidationRatio,
}

struct Agglomeration {
    weighting: MergeWeighting,
    dq: Vec<BTreeMap<usize, f64>>,
    a: Vec<f64>,
    sizes: Vec<usize>,
    members: Vec<Vec<usize>>,
    best: Vec<Option<(f64, usize)>>,
}

impl Agglomeration {
    fn score(&self, i: usize, j: usize, dq: f64) -> f64 {
        match self.weighting {
            MergeWeighting::Plain => dq,
            MergeWeighting::ConsolidationRatio => {
                let (si, sj) = (self.sizes[i] as f64, self.sizes[j] as f64);
                dq * (si / sj).min(sj / si)
            }
        }
    }

    fn row_best(&self, i: usize) -> Option<(f64, usize)> {
        let mut best: Option<(f64, usize)> = None;
        for (&j, &dq) in &self.dq[i] {
            if dq <= 0.0 {
                continue;
            }
            let score = self.score(i, j, dq);
            if best.is_none_or(|(top, _)| score > top) {
                best = Some((score, j));
            }
        }
        best
    }

    fn pick(&self) -> Option<(usize, usize)> {
        let mut pick: Option<(f64, usize, usize)> = None;
        for (i, best) in self.best.iter().enumerate() {
            if let Some((score, j)) = *best {
                if pick.is_none_or(|(top, _, _)| score > top) {
                    pick = Some((score, i, j));
                }
            }
        }
        pick.map(|(_, i, j)| (i, j))
    }

    /// Fold community `gone` into `keep`.
    fn merge(&mut self, keep: usize, gone: usize) {
        let keep_row = std::mem::take(&mut self.dq[keep]);
        let gone_row = std::mem::take(&mut self.dq[gone]);
        let (a_keep, a_gone) = (self.a[keep], self.a[gone]);

        let mut merged = BTreeMap::new();
        for (&k, &y) in &keep_row {
            if k == gone {
                continue;
            }
            let value = gone_row
                .get(&k)
                .map_or_else(|| (-2.0 * a_gone).mul_add(self.a[k], y), |&x| x + y);
            merged.insert(k, value);
        }
        for (&k, &x) in &gone_row {
            if k == keep || merged.contains_key(&k) {
                continue;
            }
            merged.insert(k, (-2.0 * a_keep).mul_add(self.a[k], x));
        }

        for (&k, &value) in &merged {
            self.dq[k].remove(&gone);
            self.dq[k].insert(keep, value);
        }
        let touched: Vec<usize> = merged.keys().copied().collect();
        self.dq[keep] = merged;

        self.a[keep] += a_gone;
        self.a[gone] = 0.0;
        self.sizes[keep] += self.sizes[gone];
        self.sizes[gone] = 0;
        let moved = std::mem::take(&mut self.members[gone]);
        self.members[keep].extend(moved);

        self.best[gone] = None;
        self.best[keep] = self.row_best(keep);
        for k in touched {
            self.best[k] = self.row_best(k);
        }
    }
}

/// Community label for every dense position.
#[instrument(skip(ctx), fields(graph = %ctx.graph_id()))]
pub fn greedy_modularity(
    ctx: &CalculationContext<'_>,
    weighting: MergeWeighting,
) -> Outcome<Vec<usize>> {
    let index = ctx.index();
    let n = index.len();
    let ends: usize = (0..n).map(|v| index.neighbors(v).len()).sum();
    if ends == 0 {
        return Outcome::Completed((0..n).collect());
    }

    let two_m = ends as f64;
    let a: Vec<f64> = (0..n)
        .map(|v| index.neighbors(v).len() as f64 / two_m)
        .collect();
    let dq: Vec<BTreeMap<usize, f64>> = (0..n)
        .map(|i| {
            index
                .neighbors(i)
                .iter()
                .map(|&j| (j, 2.0 * (-a[i]).mul_add(a[j], 1.0 / two_m)))
                .collect()
        })
        .collect();

    let mut state = Agglomeration {
        weighting,
        dq,
        a,
        sizes: vec![1; n],
        members: (0..n).map(|v| vec![v]).collect(),
        best: vec![None; n],
    };
    for i in 0..n {
        state.best[i] = state.row_best(i);
    }

    let mut merges = 0;
    while let Some((i, j)) = state.pick() {
        if ctx.checkpoint(merges, n, LABEL) {
            return Outcome::Cancelled;
        }
        // Fold the smaller row into the larger to keep updates cheap.
        let (keep, gone) = if state.dq[j].len() > state.dq[i].len() {
            (j, i)
        } else {
            (i, j)
        };
        state.merge(keep, gone);
        merges += 1;
    }
    debug!(merges, "greedy agglomeration finished");

    let mut labels = vec![0; n];
    for (label, members) in state.members.iter().enumerate() {
        for &v in members {
            labels[v] = label;
        }
    }
    Outcome::Completed(labels)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
