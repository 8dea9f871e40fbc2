use crate::GfSymbol;
use gfec_core::{EcResult, Precondition};

/// Dense row-major matrix over GF(2^8).
///
/// The backing storage is exactly `rows * cols` bytes, the same layout
/// callers persist or hand to table expansion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GfMatrix {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl GfMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0u8; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1;
        }
        m
    }

    /// Wrap an existing row-major buffer.
    pub fn from_bytes(rows: usize, cols: usize, data: Vec<u8>) -> EcResult<Self> {
        if data.len() != rows * cols {
            return Err(Precondition::DimensionMismatch {
                what: "matrix bytes",
                expected: rows * cols,
                got: data.len(),
            }
            .into());
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from equally sized rows.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> EcResult<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for r in rows {
            let r = r.as_ref();
            if r.len() != cols {
                return Err(Precondition::DimensionMismatch {
                    what: "row length",
                    expected: cols,
                    got: r.len(),
                }
                .into());
            }
            data.extend_from_slice(r);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Row-major coefficient bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn get(&self, r: usize, c: usize) -> Option<GfSymbol> {
        if r >= self.rows || c >= self.cols {
            return None;
        }
        Some(GfSymbol(self.data[r * self.cols + c]))
    }

    pub fn set(&mut self, r: usize, c: usize, val: GfSymbol) {
        if r < self.rows && c < self.cols {
            self.data[r * self.cols + c] = val.0;
        }
    }

    /// Row `r` as bytes.
    ///
    /// # Panics
    ///
    /// Panics if `r >= self.rows()`.
    #[inline]
    pub fn row(&self, r: usize) -> &[u8] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    #[inline]
    pub fn row_mut(&mut self, r: usize) -> &mut [u8] {
        &mut self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        (0..self.rows).map(move |r| self.row(r))
    }

    /// New matrix made of the listed rows, in the listed order.
    pub fn select_rows(&self, indices: &[usize]) -> EcResult<Self> {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &r in indices {
            if r >= self.rows {
                return Err(Precondition::RowOutOfRange {
                    row: r,
                    rows: self.rows,
                }
                .into());
            }
            data.extend_from_slice(self.row(r));
        }
        Ok(Self {
            rows: indices.len(),
            cols: self.cols,
            data,
        })
    }

    /// Rows `start..end` as a new matrix.
    pub fn sub_rows(&self, start: usize, end: usize) -> EcResult<Self> {
        if start > end || end > self.rows {
            return Err(Precondition::RowOutOfRange {
                row: end,
                rows: self.rows,
            }
            .into());
        }
        Ok(Self {
            rows: end - start,
            cols: self.cols,
            data: self.data[start * self.cols..end * self.cols].to_vec(),
        })
    }

    pub fn is_identity(&self) -> bool {
        self.is_square()
            && self
                .data
                .iter()
                .enumerate()
                .all(|(i, &v)| v == u8::from(i / self.cols == i % self.cols))
    }

    /// Matrix-Vector Multiplication (Y = A * X)
    pub fn mul_vec(&self, x: &[GfSymbol]) -> EcResult<Vec<GfSymbol>> {
        if x.len() != self.cols {
            return Err(Precondition::DimensionMismatch {
                what: "vector length",
                expected: self.cols,
                got: x.len(),
            }
            .into());
        }

        let y = self
            .iter_rows()
            .map(|row| {
                row.iter()
                    .zip(x)
                    .fold(GfSymbol::ZERO, |acc, (&c, &v)| acc + GfSymbol(c) * v)
            })
            .collect();
        Ok(y)
    }

    /// Row-vector times matrix (y = v * A), `v` has `self.rows()` entries.
    pub fn vec_mul(&self, v: &[u8]) -> EcResult<Vec<u8>> {
        if v.len() != self.rows {
            return Err(Precondition::DimensionMismatch {
                what: "vector length",
                expected: self.rows,
                got: v.len(),
            }
            .into());
        }
        let mut y = vec![0u8; self.cols];
        for (row, &coeff) in self.iter_rows().zip(v) {
            if coeff == 0 {
                continue;
            }
            let products = crate::mul_table(coeff);
            for (acc, &a) in y.iter_mut().zip(row) {
                *acc ^= products[a as usize];
            }
        }
        Ok(y)
    }

    /// Matrix product `self * rhs`.
    pub fn mul(&self, rhs: &GfMatrix) -> EcResult<GfMatrix> {
        if self.cols != rhs.rows {
            return Err(Precondition::DimensionMismatch {
                what: "inner dimension",
                expected: self.cols,
                got: rhs.rows,
            }
            .into());
        }
        let mut out = GfMatrix::new(self.rows, rhs.cols);
        for r in 0..self.rows {
            let y = rhs.vec_mul(self.row(r))?;
            out.row_mut(r).copy_from_slice(&y);
        }
        Ok(out)
    }

    /// Inverse via Gauss-Jordan elimination. See [`crate::invert_matrix`].
    pub fn invert(&self) -> EcResult<GfMatrix> {
        crate::solver::invert_matrix(self)
    }

    /// True if the matrix is square and has an inverse.
    pub fn is_invertible(&self) -> bool {
        self.invert().is_ok()
    }
}

impl core::fmt::Display for GfMatrix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for row in self.iter_rows() {
            let mut first = true;
            for v in row {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{v:02x}")?;
                first = false;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
