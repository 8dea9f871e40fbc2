/// Reference multiply-accumulate: `dest[i] ^= c * src[i]` for the
/// coefficient `c` that `tbl` was expanded from.
///
/// Two nibble lookups and two XORs per byte, any length.
#[inline(always)]
pub fn mul_acc(tbl: &[u8], src: &[u8], dest: &mut [u8]) {
    let (lo, hi) = (&tbl[..16], &tbl[16..32]);
    for (d, &s) in dest.iter_mut().zip(src) {
        *d ^= lo[(s & 0x0F) as usize] ^ hi[(s >> 4) as usize];
    }
}
