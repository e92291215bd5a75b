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

//! An amount of a specific [`Currency`], represented internally as a scaled `i64`.

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};

use super::{
    currency::Currency,
    fixed::{f64_to_fixed_i64, fixed_i64_to_f64},
};

/// Represents an amount of money in a specified currency, signed to allow debits/credits and
/// realised PnL to be expressed directly.
#[derive(Copy, Clone, Serialize, Deserialize)]
pub struct Money {
    raw: i64,
    pub currency: Currency,
}

impl Money {
    #[must_use]
    pub fn new(value: f64, currency: Currency) -> Self {
        Self {
            raw: f64_to_fixed_i64(value),
            currency,
        }
    }

    #[must_use]
    pub fn from_raw(raw: i64, currency: Currency) -> Self {
        Self { raw, currency }
    }

    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self { raw: 0, currency }
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

    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.raw < 0
    }

    /// Returns a new `Money` clamped to be non-negative, in the same currency.
    #[must_use]
    pub fn max_zero(&self) -> Self {
        Self {
            raw: self.raw.max(0),
            currency: self.currency,
        }
    }
}

impl PartialEq for Money {
    /// # Panics
    ///
    /// Panics if the two instances are not denominated in the same currency.
    fn eq(&self, other: &Self) -> bool {
        assert_eq!(
            self.currency, other.currency,
            "cannot compare Money across currencies"
        );
        self.raw == other.raw
    }
}

impl PartialOrd for Money {
    /// # Panics
    ///
    /// Panics if the two instances are not denominated in the same currency.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        assert_eq!(
            self.currency, other.currency,
            "cannot compare Money across currencies"
        );
        Some(self.raw.cmp(&other.raw))
    }
}

impl Add for Money {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if `self` and `rhs` are not denominated in the same currency.
    fn add(self, rhs: Self) -> Self {
        assert_eq!(self.currency, rhs.currency, "cannot add Money across currencies");
        Self {
            raw: self.raw + rhs.raw,
            currency: self.currency,
        }
    }
}

impl Sub for Money {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if `self` and `rhs` are not denominated in the same currency.
    fn sub(self, rhs: Self) -> Self {
        assert_eq!(
            self.currency, rhs.currency,
            "cannot subtract Money across currencies"
        );
        Self {
            raw: self.raw - rhs.raw,
            currency: self.currency,
        }
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            raw: -self.raw,
            currency: self.currency,
        }
    }
}

impl Debug for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Money({self})")
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:.*} {}",
            self.currency.precision as usize,
            self.as_f64(),
            self.currency.code
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Money::new(100.0, Currency::USD());
        let b = Money::new(40.0, Currency::USD());
        assert_eq!((a - b).as_f64(), 60.0);
        assert_eq!((a + b).as_f64(), 140.0);
    }

    #[test]
    #[should_panic(expected = "cannot add Money across currencies")]
    fn test_add_rejects_mixed_currency() {
        let a = Money::new(1.0, Currency::USD());
        let b = Money::new(1.0, Currency::BTC());
        let _ = a + b;
    }

    #[test]
    fn test_max_zero_clamps_negative() {
        let a = Money::new(-50.0, Currency::USD());
        assert_eq!(a.max_zero().as_f64(), 0.0);
    }

    #[test]
    fn test_neg() {
        let a = Money::new(25.0, Currency::USD());
        assert_eq!((-a).as_f64(), -25.0);
    }
}
