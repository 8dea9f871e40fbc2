use once_cell::sync::Lazy;

/// x^8 + x^4 + x^3 + x^2 + 1 (0x11D)
pub const POLY: u16 = 0x11D;

/// Primitive element used to build the log/exp tables.
pub const GENERATOR: u8 = 0x02;

pub struct GfTables {
    pub exp: [u8; 512], // Doubled to avoid modulo in inner loops
    pub log: [u8; 256],
}

/// Generates tables at compile time by repeated multiplication with 2.
/// 2 generates the multiplicative group of GF(2^8) mod 0x11D.
const fn gen_tables() -> GfTables {
    let mut exp = [0u8; 512];
    let mut log = [0u8; 256];
    let mut x = 1u16; // 2^0
    let mut i = 0;

    while i < 255 {
        exp[i] = x as u8;
        exp[i + 255] = x as u8;
        log[x as usize] = i as u8;

        x <<= 1;
        if x & 0x100 != 0 {
            x ^= POLY;
        }
        i += 1;
    }

    exp[510] = exp[0];
    exp[511] = exp[1];

    GfTables { exp, log }
}

/// The compile-time generated tables. Lives in .rodata.
pub static TABLES: GfTables = gen_tables();

/// Full 256x256 product table, row `a` holds `a * b` for every `b`.
///
/// Built once on first access and never mutated afterwards, so readers on
/// any thread share it without locking.
static MUL_TABLE: Lazy<Box<[[u8; 256]; 256]>> = Lazy::new(|| {
    log::debug!("building 64 KiB GF(2^8) product table");
    let mut table = Box::new([[0u8; 256]; 256]);
    for (a, row) in table.iter_mut().enumerate() {
        for (b, out) in row.iter_mut().enumerate() {
            *out = crate::scalar::mul_gf8(a as u8, b as u8);
        }
    }
    table
});

/// Products of `a` with every field element.
#[inline]
pub fn mul_table(a: u8) -> &'static [u8; 256] {
    &MUL_TABLE[a as usize]
}
