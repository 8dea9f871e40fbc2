//! Erasure descriptors.

use gfec_core::{EcResult, Precondition};

use crate::generator::validate_geometry;

/// Which of the `m` coded rows are missing.
///
/// Holds both the dense indicator array (length `m`, 1 = missing) and the
/// ascending sparse list of missing rows; the constructors keep the two in
/// agreement. Rows below `k` are sources, the rest are parities, so the
/// sparse list always lists missing sources before missing parities.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErasureSet {
    k: usize,
    m: usize,
    dense: Vec<u8>,
    sparse: Vec<usize>,
    sources: usize,
}

impl ErasureSet {
    /// Build from a list of erased rows in any order.
    pub fn new(k: usize, m: usize, erased: &[usize]) -> EcResult<Self> {
        validate_geometry(k, m)?;
        let mut dense = vec![0u8; m];
        for &row in erased {
            if row >= m {
                return Err(Precondition::RowOutOfRange { row, rows: m }.into());
            }
            if dense[row] != 0 {
                return Err(Precondition::DuplicateErasure { row }.into());
            }
            dense[row] = 1;
        }
        Self::from_dense(k, m, &dense)
    }

    /// Build from a dense `{0, 1}` indicator array of length `m`.
    pub fn from_dense(k: usize, m: usize, dense: &[u8]) -> EcResult<Self> {
        validate_geometry(k, m)?;
        if dense.len() != m {
            return Err(Precondition::DimensionMismatch {
                what: "dense erasure array",
                expected: m,
                got: dense.len(),
            }
            .into());
        }
        if dense.iter().any(|&d| d > 1) {
            return Err(Precondition::InconsistentErasures("dense entries must be 0 or 1").into());
        }

        let sparse: Vec<usize> = (0..m).filter(|&r| dense[r] == 1).collect();
        let max = m - k;
        if sparse.len() > max {
            return Err(Precondition::TooManyErasures {
                erasures: sparse.len(),
                max,
            }
            .into());
        }
        let sources = sparse.iter().take_while(|&&r| r < k).count();
        Ok(Self {
            k,
            m,
            dense: dense.to_vec(),
            sparse,
            sources,
        })
    }

    /// Build from every representation at once, checking they agree.
    pub fn from_parts(
        k: usize,
        m: usize,
        dense: &[u8],
        sparse: &[usize],
        n_err: usize,
        n_src_err: usize,
    ) -> EcResult<Self> {
        let set = Self::from_dense(k, m, dense)?;
        if set.sparse != sparse {
            return Err(Precondition::InconsistentErasures(
                "sparse list must be the ascending rows marked in the dense array",
            )
            .into());
        }
        if set.len() != n_err {
            return Err(Precondition::InconsistentErasures("erasure count disagrees with list").into());
        }
        if set.sources != n_src_err {
            return Err(Precondition::InconsistentErasures("source erasure count disagrees with list").into());
        }
        Ok(set)
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn m(&self) -> usize {
        self.m
    }

    /// Dense indicator array, `dense()[r] == 1` iff row `r` is missing.
    #[inline]
    pub fn dense(&self) -> &[u8] {
        &self.dense
    }

    /// Missing rows in ascending order.
    #[inline]
    pub fn sparse(&self) -> &[usize] {
        &self.sparse
    }

    /// Total missing rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.sparse.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sparse.is_empty()
    }

    /// Missing rows with index below `k`.
    #[inline]
    pub fn source_count(&self) -> usize {
        self.sources
    }

    #[inline]
    pub fn parity_count(&self) -> usize {
        self.sparse.len() - self.sources
    }

    #[inline]
    pub fn missing_sources(&self) -> &[usize] {
        &self.sparse[..self.sources]
    }

    #[inline]
    pub fn missing_parities(&self) -> &[usize] {
        &self.sparse[self.sources..]
    }

    #[inline]
    pub fn is_erased(&self, row: usize) -> bool {
        self.dense.get(row).is_some_and(|&d| d == 1)
    }

    /// The first `k` surviving rows, ascending.
    pub fn survivors(&self) -> Vec<usize> {
        (0..self.m).filter(|&r| self.dense[r] == 0).take(self.k).collect()
    }
}
