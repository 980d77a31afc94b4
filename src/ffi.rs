//! C ABI entry points.
//!
//! ```c
//! int score_route_from_weather_matrix(const double* weather, int rows, int cols);
//! int risk_label_from_score(int score, char* out_buf, int out_buf_len);
//! ```
//!
//! Scores are 1..=100 on success. Errors: `-1` for a null matrix, `rows <= 0`
//! or `cols < 11`; `-2` for more than 32 rows. Labeling returns `0`, or `-1`
//! for a null or empty buffer.

use std::os::raw::{c_char, c_int};

use crate::config::MAX_SEGMENTS;
use crate::error::{LabelError, ScoreError};
use crate::scoring::{label, scorer};
use crate::weather::COLUMN_COUNT;

/// Scores a row-major `rows` × `cols` matrix of doubles.
///
/// # Safety
///
/// When non-null, `weather` must point to at least `rows * cols` readable,
/// initialized doubles that stay valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn score_route_from_weather_matrix(
    weather: *const f64,
    rows: c_int,
    cols: c_int,
) -> c_int {
    if weather.is_null() || rows <= 0 || cols < COLUMN_COUNT as c_int {
        return ScoreError::InvalidInput(String::new()).code();
    }
    let (rows, cols) = (rows as usize, cols as usize);
    if rows > MAX_SEGMENTS {
        return ScoreError::OverCapacity {
            rows,
            cap: MAX_SEGMENTS,
        }
        .code();
    }

    // SAFETY: non-null and, per the contract above, spans rows * cols doubles.
    let data = unsafe { std::slice::from_raw_parts(weather, rows * cols) };
    match scorer::score_route_from_weather_matrix(data, rows, cols) {
        Ok(score) => score.value(),
        Err(e) => e.code(),
    }
}

/// Writes the policy label for `score` into `out_buf`, NUL-terminated and
/// truncated to `out_buf_len - 1` bytes.
///
/// # Safety
///
/// When non-null, `out_buf` must point to `out_buf_len` writable bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn risk_label_from_score(
    score: c_int,
    out_buf: *mut c_char,
    out_buf_len: c_int,
) -> c_int {
    if out_buf.is_null() || out_buf_len <= 0 {
        return LabelError::InvalidBuffer.code();
    }

    // SAFETY: non-null and, per the contract above, spans out_buf_len bytes.
    let buf =
        unsafe { std::slice::from_raw_parts_mut(out_buf.cast::<u8>(), out_buf_len as usize) };
    match label::risk_label_from_score(score, buf) {
        Ok(()) => 0,
        Err(e) => e.code(),
    }
}
