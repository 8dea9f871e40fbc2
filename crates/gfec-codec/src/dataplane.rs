//! The data plane: apply expanded tables to byte buffers.
//!
//! All size contracts are checked once on entry. Past that point the
//! loops only look up nibble tables and XOR.

use gfec_core::{EcResult, Precondition, TABLE_BYTES};

use crate::expand::required_len;
use crate::kernel::{self, MulAcc};

/// Bytes processed per destination before moving to the next sources pass.
/// Keeps the destination stripe resident in L1 while every source is folded in.
const STRIPE: usize = 4096;

/// GF(2^8) dot product into a single destination.
///
/// `dest[pos] = XOR over i of coeff(i) * src[i][pos]` for `pos in 0..len`,
/// where `tables` holds `32 * vlen` bytes expanded from the coefficients.
pub fn dot_product<S: AsRef<[u8]>>(
    len: usize,
    vlen: usize,
    tables: &[u8],
    src: &[S],
    dest: &mut [u8],
) -> EcResult<()> {
    encode(len, vlen, 1, tables, src, core::slice::from_mut(&mut &mut *dest))
}

/// Generate `dests` outputs from `srcs` inputs.
///
/// `dest[j][pos] = XOR over i of coeff(i, j) * src[i][pos]`. `tables` must
/// be `32 * srcs * dests` bytes from [`expand`](crate::expand()). Every
/// buffer needs at least `len` bytes; bytes past `len` are left untouched,
/// so callers may split one job into disjoint ranges of `len`.
pub fn encode<S, D>(
    len: usize,
    srcs: usize,
    dests: usize,
    tables: &[u8],
    src: &[S],
    dest: &mut [D],
) -> EcResult<()>
where
    S: AsRef<[u8]>,
    D: AsMut<[u8]>,
{
    if len == 0 {
        return Err(Precondition::EmptyBlock.into());
    }
    let expected = required_len(srcs, dests)?;
    if tables.len() != expected {
        return Err(Precondition::TableSize {
            expected,
            got: tables.len(),
        }
        .into());
    }
    check_buffers("source", len, srcs, src.iter().map(|s| s.as_ref().len()))?;
    check_buffers("destination", len, dests, dest.iter_mut().map(|d| d.as_mut().len()))?;

    encode_unchecked(kernel::select(), len, srcs, tables, src, dest);
    Ok(())
}

fn check_buffers(
    what: &'static str,
    len: usize,
    expected: usize,
    lens: impl ExactSizeIterator<Item = usize>,
) -> EcResult<()> {
    if lens.len() != expected {
        return Err(Precondition::BufferCount {
            what,
            expected,
            got: lens.len(),
        }
        .into());
    }
    for (index, got) in lens.enumerate() {
        if got < len {
            return Err(Precondition::BufferTooShort {
                what,
                index,
                needed: len,
                got,
            }
            .into());
        }
    }
    Ok(())
}

/// Hot loop. Sizes were validated by the caller.
fn encode_unchecked<S, D>(
    mul_acc: MulAcc,
    len: usize,
    srcs: usize,
    tables: &[u8],
    src: &[S],
    dest: &mut [D],
) where
    S: AsRef<[u8]>,
    D: AsMut<[u8]>,
{
    let mut start = 0;
    while start < len {
        let end = (start + STRIPE).min(len);
        for (j, d) in dest.iter_mut().enumerate() {
            let d = &mut d.as_mut()[start..end];
            d.fill(0);
            let row = &tables[TABLE_BYTES * j * srcs..TABLE_BYTES * (j + 1) * srcs];
            for (tbl, s) in row.chunks_exact(TABLE_BYTES).zip(src) {
                mul_acc(tbl, &s.as_ref()[start..end], d);
            }
        }
        start = end;
    }
}
