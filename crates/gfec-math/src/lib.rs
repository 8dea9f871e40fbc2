//! GF(2^8) arithmetic and dense matrices over the field.
//!
//! Three multiplication strategies are provided and agree bit-for-bit:
//! log/exp lookups ([`GfSymbol::mul`]), the lazily built 256x256 product
//! table ([`GfSymbol::mul_large`]) and table-free polynomial reduction
//! ([`GfSymbol::mul_safe`]). With the `large-tables` feature `mul` routes
//! through the product table.

pub mod matrix;
pub mod scalar;
pub mod solver;
pub mod tables;

pub use matrix::GfMatrix;
pub use solver::invert_matrix;
pub use tables::{mul_table, TABLES};

use gfec_core::{EcError, EcResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[repr(transparent)]
pub struct GfSymbol(pub u8);

impl GfSymbol {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1);

    #[inline(always)]
    pub fn add(self, rhs: Self) -> Self {
        Self(self.0 ^ rhs.0)
    }

    #[inline(always)]
    pub fn sub(self, rhs: Self) -> Self {
        self.add(rhs)
    }

    #[cfg(not(feature = "large-tables"))]
    #[inline]
    pub fn mul(self, rhs: Self) -> Self {
        if self.0 == 0 || rhs.0 == 0 {
            return Self::ZERO;
        }
        let idx = (TABLES.log[self.0 as usize] as usize) + (TABLES.log[rhs.0 as usize] as usize);
        Self(TABLES.exp[idx])
    }

    #[cfg(feature = "large-tables")]
    #[inline]
    pub fn mul(self, rhs: Self) -> Self {
        self.mul_large(rhs)
    }

    /// Product through the full 256x256 table.
    #[inline]
    pub fn mul_large(self, rhs: Self) -> Self {
        Self(mul_table(self.0)[rhs.0 as usize])
    }

    /// Product by shift-and-reduce. Branch-free in the operand bits.
    pub fn mul_safe(self, rhs: Self) -> Self {
        let mut p = 0u8;
        let mut a = self.0;
        let mut b = rhs.0;
        for _ in 0..8 {
            let mask = 0u8.wrapping_sub(b & 1);
            p ^= a & mask;
            let high = 0u8.wrapping_sub(a >> 7);
            a = (a << 1) ^ (high & 0x1D);
            b >>= 1;
        }
        Self(p)
    }

    /// Multiplicative inverse. Zero has none.
    pub fn inv(self) -> EcResult<Self> {
        if self.0 == 0 {
            return Err(EcError::Domain {
                op: "inverse",
                value: 0,
            });
        }
        let log_a = TABLES.log[self.0 as usize] as usize;
        Ok(Self(TABLES.exp[255 - log_a]))
    }

    /// `self / rhs`. Division by zero is a domain error.
    pub fn div(self, rhs: Self) -> EcResult<Self> {
        if rhs.0 == 0 {
            return Err(EcError::Domain {
                op: "divide",
                value: 0,
            });
        }
        if self.0 == 0 {
            return Ok(Self::ZERO);
        }
        let la = TABLES.log[self.0 as usize] as usize;
        let lb = TABLES.log[rhs.0 as usize] as usize;
        Ok(Self(TABLES.exp[la + 255 - lb]))
    }

    /// `self^n`, with `0^0 == 1`.
    pub fn pow(self, n: usize) -> Self {
        if n == 0 {
            return Self::ONE;
        }
        if self.0 == 0 {
            return Self::ZERO;
        }
        let l = TABLES.log[self.0 as usize] as usize;
        Self(TABLES.exp[(l * (n % 255)) % 255])
    }
}

impl From<u8> for GfSymbol {
    fn from(v: u8) -> Self {
        Self(v)
    }
}

impl From<GfSymbol> for u8 {
    fn from(s: GfSymbol) -> Self {
        s.0
    }
}

// Operator Overloads
impl core::ops::Add for GfSymbol {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        GfSymbol::add(self, rhs)
    }
}

impl core::ops::Sub for GfSymbol {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        GfSymbol::sub(self, rhs)
    }
}

impl core::ops::Mul for GfSymbol {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        GfSymbol::mul(self, rhs)
    }
}

impl core::ops::AddAssign for GfSymbol {
    fn add_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl core::ops::MulAssign for GfSymbol {
    fn mul_assign(&mut self, rhs: Self) {
        *self = GfSymbol::mul(*self, rhs);
    }
}

/// Field multiply on raw bytes.
#[inline]
pub fn gf_mul(a: u8, b: u8) -> u8 {
    GfSymbol(a).mul(GfSymbol(b)).0
}

/// Field inverse on raw bytes.
#[inline]
pub fn gf_inv(a: u8) -> EcResult<u8> {
    GfSymbol(a).inv().map(|s| s.0)
}
