//! Expanded multiply tables.
//!
//! Each coefficient `c` becomes 32 bytes: `c * x` for the sixteen low
//! nibbles followed by `c * (x << 4)` for the sixteen high nibbles. Tables
//! are laid out output-row major: the table for input `i`, output `j`
//! starts at byte `32 * (j * inputs + i)`.

use gfec_core::{EcResult, Precondition, TABLE_BYTES};
use gfec_math::{scalar::nibble_tables, GfMatrix};
use log::debug;

/// Bytes needed to expand a `rows x k` coefficient matrix.
///
/// Fails when the size does not fit in `usize`.
#[inline]
pub fn required_len(k: usize, rows: usize) -> EcResult<usize> {
    coefficient_count(k, rows)?
        .checked_mul(TABLE_BYTES)
        .ok_or_else(|| too_large("expanded table bytes"))
}

fn coefficient_count(k: usize, rows: usize) -> EcResult<usize> {
    k.checked_mul(rows).ok_or_else(|| too_large("coefficient count"))
}

fn too_large(what: &'static str) -> gfec_core::EcError {
    Precondition::SizeOverflow { what }.into()
}

/// Expand `coeffs` (`rows x k`, row-major) into caller-owned `out`.
///
/// `out` must be exactly [`required_len(k, rows)`](required_len) bytes.
pub fn expand_into(k: usize, rows: usize, coeffs: &[u8], out: &mut [u8]) -> EcResult<()> {
    let count = coefficient_count(k, rows)?;
    if coeffs.len() != count {
        return Err(Precondition::DimensionMismatch {
            what: "coefficient count",
            expected: count,
            got: coeffs.len(),
        }
        .into());
    }
    let needed = required_len(k, rows)?;
    if out.len() != needed {
        return Err(Precondition::TableSize {
            expected: needed,
            got: out.len(),
        }
        .into());
    }

    for (&c, tbl) in coeffs.iter().zip(out.chunks_exact_mut(TABLE_BYTES)) {
        tbl.copy_from_slice(&nibble_tables(c));
    }
    Ok(())
}

/// Expand `coeffs` into a freshly allocated table buffer.
pub fn expand(k: usize, rows: usize, coeffs: &[u8]) -> EcResult<Vec<u8>> {
    let mut out = vec![0u8; required_len(k, rows)?];
    expand_into(k, rows, coeffs, &mut out)?;
    Ok(out)
}

/// Expanded tables for a `outputs x inputs` coefficient matrix.
///
/// Immutable once built; share freely between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedTables {
    inputs: usize,
    outputs: usize,
    data: Vec<u8>,
}

impl ExpandedTables {
    pub fn new(inputs: usize, outputs: usize, coeffs: &[u8]) -> EcResult<Self> {
        let data = expand(inputs, outputs, coeffs)?;
        debug!("expanded {outputs}x{inputs} coefficients into {} table bytes", data.len());
        Ok(Self {
            inputs,
            outputs,
            data,
        })
    }

    /// One output per matrix row, one input per matrix column.
    pub fn from_matrix(matrix: &GfMatrix) -> EcResult<Self> {
        Self::new(matrix.cols(), matrix.rows(), matrix.as_bytes())
    }

    /// Adopt a previously persisted table buffer.
    pub fn from_bytes(inputs: usize, outputs: usize, data: Vec<u8>) -> EcResult<Self> {
        let expected = required_len(inputs, outputs)?;
        if data.len() != expected {
            return Err(Precondition::TableSize {
                expected,
                got: data.len(),
            }
            .into());
        }
        Ok(Self {
            inputs,
            outputs,
            data,
        })
    }

    #[inline]
    pub fn inputs(&self) -> usize {
        self.inputs
    }

    #[inline]
    pub fn outputs(&self) -> usize {
        self.outputs
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The 32-byte table for input `i` feeding output `j`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= inputs` or `j >= outputs`.
    #[inline]
    pub fn table(&self, i: usize, j: usize) -> &[u8] {
        assert!(i < self.inputs && j < self.outputs);
        let off = TABLE_BYTES * (j * self.inputs + i);
        &self.data[off..off + TABLE_BYTES]
    }

    /// The coefficient a table was expanded from (its entry for `x = 1`).
    #[inline]
    pub fn coefficient(&self, i: usize, j: usize) -> u8 {
        self.table(i, j)[1]
    }

    /// Apply these tables: `dest[j] = XOR_i coeff(i, j) * src[i]` over `len` bytes.
    pub fn encode<S, D>(&self, len: usize, src: &[S], dest: &mut [D]) -> EcResult<()>
    where
        S: AsRef<[u8]>,
        D: AsMut<[u8]>,
    {
        crate::dataplane::encode(len, self.inputs, self.outputs, &self.data, src, dest)
    }
}
