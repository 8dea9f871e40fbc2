/// Raw polynomial multiplication modulo 0x11D, no tables involved.
///
/// Reference for the table driven paths and the builder of the product table.
pub const fn mul_gf8(a: u8, b: u8) -> u8 {
    let mut p = 0u8;
    let mut a = a;
    let mut b = b;
    let mut i = 0;
    while i < 8 {
        if (b & 1) != 0 {
            p ^= a;
        }
        let carry = (a & 0x80) != 0;
        a <<= 1;
        if carry {
            a ^= (crate::tables::POLY & 0xFF) as u8;
        }
        b >>= 1;
        i += 1;
    }
    p
}

/// `a * x` for every low nibble `x`, followed by `a * (x << 4)`.
///
/// This is the 32-byte per-coefficient layout consumed by the data plane:
/// `a * b == nib[b & 0x0F] ^ nib[16 + (b >> 4)]`.
pub fn nibble_tables(a: u8) -> [u8; 32] {
    let row = crate::tables::mul_table(a);
    let mut out = [0u8; 32];
    for x in 0..16usize {
        out[x] = row[x];
        out[16 + x] = row[x << 4];
    }
    out
}
