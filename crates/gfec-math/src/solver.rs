use crate::{mul_table, GfMatrix, GfSymbol};
use gfec_core::{EcError, EcResult, Precondition};
use log::trace;

/// Inverts a square GF(2^8) matrix using Gauss-Jordan elimination.
///
/// Works on a private copy of `matrix`; the caller only ever sees the
/// finished inverse. Returns [`EcError::SingularMatrix`] naming the first
/// column without a nonzero pivot.
pub fn invert_matrix(matrix: &GfMatrix) -> EcResult<GfMatrix> {
    if !matrix.is_square() {
        return Err(Precondition::DimensionMismatch {
            what: "square matrix columns",
            expected: matrix.rows(),
            got: matrix.cols(),
        }
        .into());
    }
    let n = matrix.rows();
    if n == 0 {
        return Err(Precondition::EmptyMatrix.into());
    }

    let mut a = matrix.as_bytes().to_vec();
    let mut inv = GfMatrix::identity(n).into_bytes();

    for i in 0..n {
        // 1. Pivot
        let pivot_row = (i..n)
            .find(|&r| a[r * n + i] != 0)
            .ok_or(EcError::SingularMatrix { column: i })?;

        // 2. Swap
        if pivot_row != i {
            trace!("column {i}: swapping in pivot row {pivot_row}");
            swap_rows(&mut a, n, i, pivot_row);
            swap_rows(&mut inv, n, i, pivot_row);
        }

        // 3. Normalize
        let scale = mul_table(GfSymbol(a[i * n + i]).inv()?.0);
        for v in &mut a[i * n..(i + 1) * n] {
            *v = scale[*v as usize];
        }
        for v in &mut inv[i * n..(i + 1) * n] {
            *v = scale[*v as usize];
        }

        // 4. Eliminate
        for row in 0..n {
            let factor = a[row * n + i];
            if row == i || factor == 0 {
                continue;
            }
            let products = mul_table(factor);
            for col in 0..n {
                let pa = products[a[i * n + col] as usize];
                let pi = products[inv[i * n + col] as usize];
                a[row * n + col] ^= pa;
                inv[row * n + col] ^= pi;
            }
        }
    }

    GfMatrix::from_bytes(n, n, inv)
}

fn swap_rows(data: &mut [u8], n: usize, r1: usize, r2: usize) {
    let (lo, hi) = if r1 < r2 { (r1, r2) } else { (r2, r1) };
    let (head, tail) = data.split_at_mut(hi * n);
    head[lo * n..(lo + 1) * n].swap_with_slice(&mut tail[..n]);
}
