//! Multiply-accumulate kernels over one 32-byte expanded table.
//!
//! Every kernel computes `dest[i] ^= c * src[i]` and must agree with
//! [`scalar::mul_acc`] byte-for-byte.

pub mod scalar;

#[cfg(target_arch = "x86_64")]
mod avx2;

#[cfg(target_arch = "aarch64")]
mod neon;

/// A multiply-accumulate routine, chosen once per data-plane call.
pub(crate) type MulAcc = fn(&[u8], &[u8], &mut [u8]);

// --- THE SIMD DISPATCHER ---
#[allow(unreachable_code)]
pub(crate) fn select() -> MulAcc {
    // 1. INTEL / AMD
    #[cfg(target_arch = "x86_64")]
    {
        if std::arch::is_x86_feature_detected!("avx2") {
            return mul_acc_avx2;
        }
    }

    // 2. ARM
    #[cfg(target_arch = "aarch64")]
    {
        return mul_acc_neon;
    }

    // 3. FALLBACK
    scalar::mul_acc
}

#[cfg(target_arch = "x86_64")]
fn mul_acc_avx2(tbl: &[u8], src: &[u8], dest: &mut [u8]) {
    assert!(tbl.len() >= 32);
    // SAFETY: only handed out by `select` after AVX2 detection.
    unsafe { avx2::mul_acc_avx2(tbl, src, dest) }
}

#[cfg(target_arch = "aarch64")]
fn mul_acc_neon(tbl: &[u8], src: &[u8], dest: &mut [u8]) {
    assert!(tbl.len() >= 32);
    // SAFETY: NEON is mandatory on aarch64.
    unsafe { neon::mul_acc_neon(tbl, src, dest) }
}

/// Name of the kernel the data plane will use on this machine.
#[allow(unreachable_code)]
pub fn active_engine() -> &'static str {
    #[cfg(target_arch = "x86_64")]
    {
        if std::arch::is_x86_feature_detected!("avx2") {
            return "avx2 [32B/iter]";
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        return "neon [16B/iter]";
    }

    "scalar [1B/iter]"
}
