//! Decode matrix derivation.
//!
//! Given the generator and an erasure pattern, pick the first `k`
//! surviving rows, invert that selection, and read off (or re-derive) one
//! decode row per missing row.

use gfec_core::{EcResult, Precondition};
use gfec_math::GfMatrix;
use log::debug;

use crate::erasure::ErasureSet;
use crate::expand::ExpandedTables;

/// Coefficients that regenerate the missing rows of one erasure pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodePlan {
    matrix: GfMatrix,
    index: Vec<usize>,
}

impl DecodePlan {
    /// `n_err x k` decode coefficients. Missing sources come first, then
    /// missing parities, each group ascending.
    #[inline]
    pub fn matrix(&self) -> &GfMatrix {
        &self.matrix
    }

    /// `index()[r]` is the generator row whose surviving block feeds decode input `r`.
    #[inline]
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Number of rows this plan regenerates.
    #[inline]
    pub fn outputs(&self) -> usize {
        self.matrix.rows()
    }

    /// Expand the decode matrix for the data plane.
    pub fn expand(&self) -> EcResult<ExpandedTables> {
        ExpandedTables::from_matrix(&self.matrix)
    }
}

/// Derive the decode matrix and decode index for `erasures`.
///
/// Fails with [`EcError::SingularMatrix`](gfec_core::EcError::SingularMatrix)
/// when the surviving selection cannot be inverted, which can happen with
/// Vandermonde generators.
pub fn derive_decode(encode: &GfMatrix, erasures: &ErasureSet) -> EcResult<DecodePlan> {
    let (k, m) = (erasures.k(), erasures.m());
    if encode.rows() != m {
        return Err(Precondition::DimensionMismatch {
            what: "generator rows",
            expected: m,
            got: encode.rows(),
        }
        .into());
    }
    if encode.cols() != k {
        return Err(Precondition::DimensionMismatch {
            what: "generator columns",
            expected: k,
            got: encode.cols(),
        }
        .into());
    }

    // 1-2. First k surviving rows and where they came from.
    let index = erasures.survivors();
    let selected = encode.select_rows(&index)?;

    // 3. Invert the selection.
    let inverse = selected.invert()?;

    // 4-5. One decode row per missing row.
    let mut matrix = GfMatrix::new(erasures.len(), k);
    for (out, &src) in erasures.missing_sources().iter().enumerate() {
        matrix.row_mut(out).copy_from_slice(inverse.row(src));
    }
    let offset = erasures.source_count();
    for (p, &row) in erasures.missing_parities().iter().enumerate() {
        let coeffs = inverse.vec_mul(encode.row(row))?;
        matrix.row_mut(offset + p).copy_from_slice(&coeffs);
    }

    debug!(
        "derived {}x{k} decode matrix for erased rows {:?} from survivors {:?}",
        erasures.len(),
        erasures.sparse(),
        index
    );
    Ok(DecodePlan { matrix, index })
}
