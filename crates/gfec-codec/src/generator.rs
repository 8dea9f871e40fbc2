//! Generator (encode) matrix construction.
//!
//! Both families place `I_k` in the top `k` rows so sources pass through
//! unchanged; only the bottom `m - k` parity rows differ.

use gfec_core::{EcResult, Precondition, MAX_ROWS};
use gfec_math::{GfMatrix, GfSymbol};
use log::debug;

/// Coefficient family for the parity rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// `2^(j*(i+1))` for parity row `i`, source column `j`. Some erasure
    /// patterns produce singular decode selections when `k` is large.
    Vandermonde,
    /// `1 / (r ^ j)` for absolute parity row `r`, source column `j`. Every
    /// square selection is invertible.
    #[default]
    Cauchy,
}

impl core::fmt::Display for Strategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Strategy::Vandermonde => f.write_str("vandermonde"),
            Strategy::Cauchy => f.write_str("cauchy"),
        }
    }
}

impl core::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vandermonde" | "rs" => Ok(Strategy::Vandermonde),
            "cauchy" => Ok(Strategy::Cauchy),
            other => Err(format!("unknown strategy `{other}` (expected cauchy or vandermonde)")),
        }
    }
}

/// Checks `1 <= k < m <= MAX_ROWS`.
pub fn validate_geometry(k: usize, m: usize) -> EcResult<()> {
    if k == 0 || k >= m || m > MAX_ROWS {
        return Err(Precondition::InvalidGeometry { k, m }.into());
    }
    Ok(())
}

/// Build the `m x k` generator matrix for `strategy`.
pub fn generator_matrix(strategy: Strategy, k: usize, m: usize) -> EcResult<GfMatrix> {
    match strategy {
        Strategy::Vandermonde => vandermonde_matrix(k, m),
        Strategy::Cauchy => cauchy_matrix(k, m),
    }
}

/// Vandermonde-derived generator: parity row `i`, column `j` is `2^(j*(i+1))`.
pub fn vandermonde_matrix(k: usize, m: usize) -> EcResult<GfMatrix> {
    validate_geometry(k, m)?;
    let mut out = GfMatrix::new(m, k);
    for i in 0..k {
        out.set(i, i, GfSymbol::ONE);
    }

    let mut gen = GfSymbol(2);
    for i in k..m {
        let mut p = GfSymbol::ONE;
        for v in out.row_mut(i) {
            *v = p.0;
            p *= gen;
        }
        gen *= GfSymbol(2);
    }

    debug!("built {m}x{k} vandermonde generator");
    Ok(out)
}

/// Cauchy-derived generator: parity row `r` (absolute, `k <= r < m`),
/// column `j` is `inverse(r ^ j)`. Since `r >= k > j` the XOR is never zero.
pub fn cauchy_matrix(k: usize, m: usize) -> EcResult<GfMatrix> {
    validate_geometry(k, m)?;
    let mut out = GfMatrix::new(m, k);
    for i in 0..k {
        out.set(i, i, GfSymbol::ONE);
    }
    for r in k..m {
        for j in 0..k {
            let denom = GfSymbol((r ^ j) as u8);
            out.set(r, j, denom.inv()?);
        }
    }

    debug!("built {m}x{k} cauchy generator");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfec_core::EcError;

    #[test]
    fn test_top_rows_are_identity() {
        for strategy in [Strategy::Vandermonde, Strategy::Cauchy] {
            for (k, m) in [(1, 2), (4, 6), (8, 12), (10, 16), (200, 256)] {
                let g = generator_matrix(strategy, k, m).unwrap();
                assert_eq!((g.rows(), g.cols()), (m, k));
                assert!(g.sub_rows(0, k).unwrap().is_identity(), "{strategy} k={k} m={m}");
            }
        }
    }

    #[test]
    fn test_vandermonde_coefficients() {
        let g = vandermonde_matrix(3, 5).unwrap();
        // First parity row: powers of 2.
        assert_eq!(g.row(3), &[1, 2, 4]);
        // Second parity row: powers of 4.
        assert_eq!(g.row(4), &[1, 4, 16]);
        for i in 0..2 {
            for j in 0..3 {
                let expected = GfSymbol(2).pow(j * (i + 1));
                assert_eq!(g.get(3 + i, j), Some(expected));
            }
        }
    }

    #[test]
    fn test_cauchy_coefficients() {
        let g = cauchy_matrix(4, 6).unwrap();
        for r in 4..6 {
            for j in 0..4 {
                let c = g.get(r, j).unwrap();
                assert_eq!(c * GfSymbol((r ^ j) as u8), GfSymbol::ONE);
            }
        }
    }

    #[test]
    fn test_invalid_geometry() {
        for (k, m) in [(0, 4), (4, 4), (5, 4), (10, 257)] {
            let err = cauchy_matrix(k, m).unwrap_err();
            assert_eq!(err, EcError::Precondition(Precondition::InvalidGeometry { k, m }));
            assert!(vandermonde_matrix(k, m).is_err());
        }
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("Cauchy".parse::<Strategy>(), Ok(Strategy::Cauchy));
        assert_eq!("rs".parse::<Strategy>(), Ok(Strategy::Vandermonde));
        assert!("lrc".parse::<Strategy>().is_err());
        assert_eq!(Strategy::default(), Strategy::Cauchy);
    }
}
