#[cfg(target_arch = "aarch64")]
use core::arch::aarch64::*;

use super::scalar;

/// NEON multiply-accumulate over 16-byte lanes, scalar tail.
///
/// # Safety
///
/// `tbl` must hold at least 32 bytes.
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
pub unsafe fn mul_acc_neon(tbl: &[u8], src: &[u8], dest: &mut [u8]) {
    debug_assert!(tbl.len() >= 32);
    let len = dest.len().min(src.len());
    let mut i = 0;

    let tbl_lo = vld1q_u8(tbl.as_ptr());
    let tbl_hi = vld1q_u8(tbl.as_ptr().add(16));
    let mask = vdupq_n_u8(0x0F);

    while i + 16 <= len {
        let s_ptr = src.as_ptr().add(i);
        let d_ptr = dest.as_mut_ptr().add(i);

        let v_src = vld1q_u8(s_ptr);
        let v_dest = vld1q_u8(d_ptr);

        let lo = vandq_u8(v_src, mask);
        let hi = vshrq_n_u8(v_src, 4);

        let res_lo = vqtbl1q_u8(tbl_lo, lo);
        let res_hi = vqtbl1q_u8(tbl_hi, hi);

        let product = veorq_u8(res_lo, res_hi);
        vst1q_u8(d_ptr, veorq_u8(v_dest, product));
        i += 16;
    }

    if i < len {
        scalar::mul_acc(tbl, &src[i..len], &mut dest[i..len]);
    }
}
