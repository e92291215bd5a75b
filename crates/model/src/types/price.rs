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

//! A venue-quoted price, represented internally as a scaled `i64`.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    hash::Hash,
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

use quantflow_core::correctness::FAILED;
use serde::{Deserialize, Serialize};

use super::fixed::{check_fixed_precision, f64_to_fixed_i64, fixed_i64_to_f64};

/// Represents a price in a market, scaled internally so arithmetic never drifts through binary
/// floating point.
#[derive(Copy, Clone, Default, Eq, Serialize, Deserialize)]
pub struct Price {
    raw: i64,
    pub precision: u8,
}

impl Price {
    /// Creates a new [`Price`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error if `precision` exceeds [`super::fixed::MAX_PRECISION`].
    pub fn new_checked(value: f64, precision: u8) -> anyhow::Result<Self> {
        check_fixed_precision(precision)?;
        Ok(Self {
            raw: f64_to_fixed_i64(value),
            precision,
        })
    }

    /// Creates a new [`Price`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `precision` exceeds [`super::fixed::MAX_PRECISION`].
    #[must_use]
    pub fn new(value: f64, precision: u8) -> Self {
        Self::new_checked(value, precision).expect(FAILED)
    }

    /// Creates a [`Price`] directly from a pre-scaled raw value, bypassing conversion.
    #[must_use]
    pub fn from_raw(raw: i64, precision: u8) -> Self {
        Self { raw, precision }
    }

    #[must_use]
    pub fn zero(precision: u8) -> Self {
        Self { raw: 0, precision }
    }

    #[must_use]
    pub fn raw(&self) -> i64 {
        self.raw
    }

    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_i64_to_f64(self.raw)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.raw == 0
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.raw > 0
    }
}

impl FromStr for Price {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let precision = input.split('.').nth(1).map_or(0, |part| part.len() as u8);
        let value: f64 = input
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid price string '{input}'"))?;
        Self::new_checked(value, precision)
    }
}

impl PartialEq for Price {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Hash for Price {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialOrd for Price {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Price {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            raw: self.raw + rhs.raw,
            precision: self.precision.max(rhs.precision),
        }
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            raw: self.raw - rhs.raw,
            precision: self.precision.max(rhs.precision),
        }
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.raw += rhs.raw;
    }
}

impl SubAssign for Price {
    fn sub_assign(&mut self, rhs: Self) {
        self.raw -= rhs.raw;
    }
}

impl Debug for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Price({self})")
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.as_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rounds_to_precision() {
        let price = Price::new(100.123_456, 2);
        assert_eq!(price.to_string(), "100.12");
    }

    #[test]
    fn test_ordering_and_arithmetic() {
        let a = Price::new(10.0, 2);
        let b = Price::new(5.0, 2);
        assert!(a > b);
        assert_eq!((a - b).as_f64(), 5.0);
    }

    #[test]
    fn test_from_str_infers_precision() {
        let price: Price = "123.450".parse().unwrap();
        assert_eq!(price.precision, 3);
    }
}
