//! C ABI entry point for computing the shape-based distance from a host
//! statistical environment.
//!
//! Every argument is passed by reference, matching a `.C`-style calling
//! convention where the host hands over pointers to its own vectors and
//! scalars. The distance is computed with the default ball-probability model.

use std::ffi::c_int;

use sbd_core::{FitModelFactory, Partition, SbdError, distance_flat};
use sbd_fit::BallFitConfig;
use tracing::warn;

/// The distance was written to `sbd_value`.
pub const SBD_OK: c_int = 0;
/// A required pointer was null.
pub const SBD_NULL_POINTER: c_int = 1;
/// A count was zero or negative, or the buffer is shorter than the counts require.
pub const SBD_INVALID_DIMENSIONS: c_int = 2;
/// A Fit Model could not be trained or queried.
pub const SBD_FIT_FAILED: c_int = 3;
/// A group term or the total evaluated to NaN or infinity.
///
/// The default model yields terms in `[0, 1]`, so `sbd_C` itself does not
/// return this; models plugged in through the library can.
pub const SBD_NON_FINITE: c_int = 4;

/// Compute the shape-based distance of a flattened row-major matrix.
///
/// `x` holds `x_len` values; the matrix is `(n1 + n2) x (n1_total + n2_total)`.
/// On success the distance is stored in `*sbd_value` and [`SBD_OK`] is
/// returned. On failure `*sbd_value` is set to NaN (when `sbd_value` is
/// non-null) and one of the other `SBD_*` codes is returned.
///
/// # Safety
///
/// - every pointer must be null or valid for reads (`sbd_value` for writes);
/// - `x` must point to at least `*x_len` initialized `f64` values that are
///   not mutated for the duration of the call.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub unsafe extern "C" fn sbd_C(
    sbd_value: *mut f64,
    x: *const f64,
    x_len: *const c_int,
    n1: *const c_int,
    n1_total: *const c_int,
    n2: *const c_int,
    n2_total: *const c_int,
) -> c_int {
    if sbd_value.is_null() {
        return SBD_NULL_POINTER;
    }
    // SAFETY: caller guarantees the pointers are null or valid for reads.
    let scalars = unsafe { read_scalars([x_len, n1, n1_total, n2, n2_total]) };
    let outcome = match scalars {
        Some([len, n1, n1_total, n2, n2_total]) if !x.is_null() => {
            match usize::try_from(len) {
                // SAFETY: caller guarantees `x` is valid for `*x_len` reads.
                Ok(len) => run(
                    unsafe { std::slice::from_raw_parts(x, len) },
                    [n1, n1_total, n2, n2_total],
                    &BallFitConfig::new(),
                ),
                Err(_) => Err(SBD_INVALID_DIMENSIONS),
            }
        }
        _ => Err(SBD_NULL_POINTER),
    };

    let (value, code) = match outcome {
        Ok(value) => (value, SBD_OK),
        Err(code) => (f64::NAN, code),
    };
    // SAFETY: checked non-null above; caller guarantees it is valid for writes.
    unsafe { sbd_value.write(value) };
    code
}

/// Read five by-reference scalars, or `None` if any pointer is null.
///
/// # Safety
///
/// Each non-null pointer must be valid for reads.
unsafe fn read_scalars(ptrs: [*const c_int; 5]) -> Option<[c_int; 5]> {
    let mut out = [0; 5];
    for (slot, ptr) in out.iter_mut().zip(ptrs) {
        if ptr.is_null() {
            return None;
        }
        // SAFETY: non-null, and the caller guarantees validity.
        *slot = unsafe { ptr.read() };
    }
    Some(out)
}

fn run<F: FitModelFactory>(x: &[f64], counts: [c_int; 4], factory: &F) -> Result<f64, c_int> {
    let [n1, n1_total, n2, n2_total] = counts.map(|c| usize::try_from(c).ok());
    let (Some(n1), Some(n1_total), Some(n2), Some(n2_total)) = (n1, n1_total, n2, n2_total) else {
        warn!(?counts, "negative group count");
        return Err(SBD_INVALID_DIMENSIONS);
    };

    Partition::new(n1, n1_total, n2, n2_total)
        .and_then(|partition| distance_flat(x, &partition, factory))
        .map(|result| result.distance.value())
        .map_err(|e| {
            warn!(error = %e, "shape-based distance failed");
            status_code(&e)
        })
}

fn status_code(error: &SbdError) -> c_int {
    match error {
        SbdError::ZeroDimension { .. }
        | SbdError::InvalidDimensions { .. }
        | SbdError::DimensionOverflow { .. }
        | SbdError::ShapeMismatch { .. } => SBD_INVALID_DIMENSIONS,
        SbdError::Fit { .. } => SBD_FIT_FAILED,
        SbdError::NonFiniteTerm { .. } | SbdError::NonFiniteDistance { .. } => SBD_NON_FINITE,
    }
}
