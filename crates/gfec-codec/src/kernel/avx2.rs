#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use super::scalar;

/// AVX2 multiply-accumulate over 32-byte lanes, scalar tail.
///
/// # Safety
///
/// The CPU must support AVX2 and `tbl` must hold at least 32 bytes.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub unsafe fn mul_acc_avx2(tbl: &[u8], src: &[u8], dest: &mut [u8]) {
    debug_assert!(tbl.len() >= 32);
    let len = dest.len().min(src.len());
    let mut i = 0;

    let v_lo_128 = _mm_loadu_si128(tbl.as_ptr() as *const __m128i);
    let v_hi_128 = _mm_loadu_si128(tbl.as_ptr().add(16) as *const __m128i);
    let tbl_lo = _mm256_broadcastsi128_si256(v_lo_128);
    let tbl_hi = _mm256_broadcastsi128_si256(v_hi_128);
    let mask = _mm256_set1_epi8(0x0F);

    while i + 32 <= len {
        let s_ptr = src.as_ptr().add(i) as *const __m256i;
        let d_ptr = dest.as_mut_ptr().add(i) as *mut __m256i;

        let v_src = _mm256_loadu_si256(s_ptr);
        let v_dest = _mm256_loadu_si256(d_ptr);

        let lo = _mm256_and_si256(v_src, mask);
        let hi = _mm256_and_si256(_mm256_srli_epi64(v_src, 4), mask);

        let res_lo = _mm256_shuffle_epi8(tbl_lo, lo);
        let res_hi = _mm256_shuffle_epi8(tbl_hi, hi);

        let product = _mm256_xor_si256(res_lo, res_hi);
        _mm256_storeu_si256(d_ptr, _mm256_xor_si256(v_dest, product));
        i += 32;
    }

    if i < len {
        scalar::mul_acc(tbl, &src[i..len], &mut dest[i..len]);
    }
}
