//! Exhaustive decodability check for a generator family.
//!
//! Walks every pattern of exactly `m - k` erased rows, selects the
//! survivors and tries to invert them. Cauchy generators always come back
//! clean; Vandermonde ones can show singular patterns for larger `k`.

use gfec_core::EcResult;
use log::{debug, info};

use crate::generator::{generator_matrix, validate_geometry, Strategy};

/// Outcome of an [`audit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub strategy: Strategy,
    pub k: usize,
    pub m: usize,
    /// Patterns whose survivor selection was inverted.
    pub patterns_checked: usize,
    /// Erased-row lists whose survivors are singular, ascending.
    pub singular: Vec<Vec<usize>>,
    /// False when a pattern limit stopped the walk early.
    pub exhaustive: bool,
}

impl AuditReport {
    /// True when every checked pattern was decodable.
    pub fn is_mds(&self) -> bool {
        self.singular.is_empty()
    }
}

/// Check every `(m - k)`-erasure pattern of the `strategy` generator.
pub fn audit(strategy: Strategy, k: usize, m: usize) -> EcResult<AuditReport> {
    audit_limited(strategy, k, m, usize::MAX)
}

/// Like [`audit`], but stops after `limit` patterns.
pub fn audit_limited(strategy: Strategy, k: usize, m: usize, limit: usize) -> EcResult<AuditReport> {
    validate_geometry(k, m)?;
    let g = generator_matrix(strategy, k, m)?;

    let mut report = AuditReport {
        strategy,
        k,
        m,
        patterns_checked: 0,
        singular: Vec::new(),
        exhaustive: true,
    };

    let mut combo = Combinations::new(m, m - k);
    while let Some(erased) = combo.next_pattern() {
        if report.patterns_checked == limit {
            report.exhaustive = false;
            break;
        }
        let survivors: Vec<usize> = (0..m).filter(|r| !erased.contains(r)).collect();
        if !g.select_rows(&survivors)?.is_invertible() {
            debug!("{strategy} k={k} m={m}: erasing {erased:?} is not recoverable");
            report.singular.push(erased.to_vec());
        }
        report.patterns_checked += 1;
    }

    info!(
        "audited {strategy} k={k} m={m}: {} patterns, {} singular{}",
        report.patterns_checked,
        report.singular.len(),
        if report.exhaustive { "" } else { " (truncated)" }
    );
    Ok(report)
}

/// Lexicographic `r`-subsets of `0..n`.
struct Combinations {
    n: usize,
    idx: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    fn new(n: usize, r: usize) -> Self {
        Self {
            n,
            idx: (0..r).collect(),
            started: false,
            done: r > n,
        }
    }

    fn next_pattern(&mut self) -> Option<&[usize]> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.idx);
        }
        let r = self.idx.len();
        // Rightmost slot that can still move up.
        let Some(i) = (0..r).rev().find(|&i| self.idx[i] < self.n - r + i) else {
            self.done = true;
            return None;
        };
        self.idx[i] += 1;
        for j in i + 1..r {
            self.idx[j] = self.idx[j - 1] + 1;
        }
        Some(&self.idx)
    }
}
