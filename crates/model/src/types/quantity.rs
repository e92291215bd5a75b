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

//! An order/position size, represented internally as a scaled non-negative `i64`.

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

/// Represents a quantity (order size or position size), always non-negative.
#[derive(Copy, Clone, Default, Eq, Serialize, Deserialize)]
pub struct Quantity {
    raw: u64,
    pub precision: u8,
}

impl Quantity {
    /// Creates a new [`Quantity`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is negative or `precision` exceeds the maximum.
    pub fn new_checked(value: f64, precision: u8) -> anyhow::Result<Self> {
        check_fixed_precision(precision)?;
        if value < 0.0 {
            anyhow::bail!("invalid quantity, was negative: {value}");
        }
        Ok(Self {
            raw: f64_to_fixed_i64(value) as u64,
            precision,
        })
    }

    /// Creates a new [`Quantity`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `value` is negative or `precision` exceeds the maximum.
    #[must_use]
    pub fn new(value: f64, precision: u8) -> Self {
        Self::new_checked(value, precision).expect(FAILED)
    }

    #[must_use]
    pub fn from_raw(raw: u64, precision: u8) -> Self {
        Self { raw, precision }
    }

    #[must_use]
    pub fn zero(precision: u8) -> Self {
        Self { raw: 0, precision }
    }

    #[must_use]
    pub fn raw(&self) -> u64 {
        self.raw
    }

    #[must_use]
    pub fn as_f64(&self) -> f64 {
        fixed_i64_to_f64(self.raw as i64)
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

impl FromStr for Quantity {
    type Err = anyhow::Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let cleaned = input.replace(',', "");
        let precision = cleaned
            .split('.')
            .nth(1)
            .map_or(0, |part| part.len() as u8);
        let value: f64 = cleaned
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid quantity string '{input}'"))?;
        Self::new_checked(value, precision)
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Hash for Quantity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl Add for Quantity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            raw: self.raw + rhs.raw,
            precision: self.precision.max(rhs.precision),
        }
    }
}

impl Sub for Quantity {
    type Output = Self;

    /// # Panics
    ///
    /// Panics on underflow (subtracting a larger quantity from a smaller one).
    fn sub(self, rhs: Self) -> Self {
        Self {
            raw: self.raw.checked_sub(rhs.raw).expect("quantity underflow"),
            precision: self.precision.max(rhs.precision),
        }
    }
}

impl AddAssign for Quantity {
    fn add_assign(&mut self, rhs: Self) {
        self.raw += rhs.raw;
    }
}

impl SubAssign for Quantity {
    fn sub_assign(&mut self, rhs: Self) {
        self.raw = self.raw.checked_sub(rhs.raw).expect("quantity underflow");
    }
}

impl Debug for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Quantity({self})")
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.*}", self.precision as usize, self.as_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_sub() {
        let a = Quantity::new(10.0, 0);
        let b = Quantity::new(4.0, 0);
        assert_eq!((a + b).as_f64(), 14.0);
        assert_eq!((a - b).as_f64(), 6.0);
    }

    #[test]
    #[should_panic(expected = "quantity underflow")]
    fn test_sub_underflow_panics() {
        let a = Quantity::new(1.0, 0);
        let b = Quantity::new(2.0, 0);
        let _ = a - b;
    }

    #[test]
    fn test_from_str_strips_commas() {
        let qty: Quantity = "1,000.50".parse().unwrap();
        assert_eq!(qty.as_f64(), 1000.5);
    }
}
