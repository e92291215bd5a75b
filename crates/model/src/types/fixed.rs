// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Quantflow Contributors. All rights reserved.
//  https://github.com/quantflow-rs/quantflow
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Fixed-point scaling shared by [`Price`](super::Price), [`Quantity`](super::Quantity) and
//! [`Money`](super::Money).
//!
//! All three types store their value as a scaled `i64`/`u64` so that arithmetic never drifts
//! through binary floating point; conversions to `f64`/`Decimal` happen only at the boundary
//! (display, logging, serialization to an external system).

/// The number of decimal places every raw fixed-point value is scaled to internally.
pub const FIXED_PRECISION: u8 = 9;

/// `10^FIXED_PRECISION`, the scalar used to convert between `f64` and raw fixed-point values.
pub const FIXED_SCALAR: f64 = 1_000_000_000.0;

/// The maximum display precision supported by [`Price`](super::Price) and
/// [`Quantity`](super::Quantity).
pub const MAX_PRECISION: u8 = FIXED_PRECISION;

/// Converts an `f64` to a raw fixed-point `i64`, rounding to the nearest representable value.
#[must_use]
pub fn f64_to_fixed_i64(value: f64) -> i64 {
    (value * FIXED_SCALAR).round() as i64
}

/// Converts a raw fixed-point `i64` back to `f64`.
#[must_use]
pub fn fixed_i64_to_f64(raw: i64) -> f64 {
    raw as f64 / FIXED_SCALAR
}

/// Checks that `precision` does not exceed [`MAX_PRECISION`].
///
/// # Errors
///
/// Returns an error if `precision` is out of range.
pub fn check_fixed_precision(precision: u8) -> anyhow::Result<()> {
    if precision > MAX_PRECISION {
        anyhow::bail!("precision {precision} exceeded maximum of {MAX_PRECISION}")
    }
    Ok(())
}
