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

//! A `Currency` with an associated display precision and classification.

use std::{
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    sync::OnceLock,
};

use quantflow_core::correctness::{FAILED, check_valid_string_ascii};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ustr::Ustr;

use crate::enums::CurrencyType;

/// Represents a medium of exchange in a specified denomination, with a specified decimal
/// precision used for display.
#[derive(Copy, Clone, Eq)]
pub struct Currency {
    pub code: Ustr,
    pub precision: u8,
    pub currency_type: CurrencyType,
}

impl Currency {
    /// Creates a new [`Currency`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error if `code` is empty or contains whitespace.
    pub fn new_checked<T: AsRef<str>>(
        code: T,
        precision: u8,
        currency_type: CurrencyType,
    ) -> anyhow::Result<Self> {
        let code = code.as_ref();
        check_valid_string_ascii(code, stringify!(code))?;
        Ok(Self {
            code: Ustr::from(code),
            precision,
            currency_type,
        })
    }

    /// Creates a new [`Currency`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `code` is empty or contains whitespace.
    #[must_use]
    pub fn new<T: AsRef<str>>(code: T, precision: u8, currency_type: CurrencyType) -> Self {
        Self::new_checked(code, precision, currency_type).expect(FAILED)
    }

    #[must_use]
    pub fn is_crypto(&self) -> bool {
        self.currency_type == CurrencyType::Crypto
    }

    #[must_use]
    pub fn is_fiat(&self) -> bool {
        self.currency_type == CurrencyType::Fiat
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn USD() -> Self {
        static LOCK: OnceLock<Currency> = OnceLock::new();
        *LOCK.get_or_init(|| Self::new("USD", 2, CurrencyType::Fiat))
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn USDT() -> Self {
        static LOCK: OnceLock<Currency> = OnceLock::new();
        *LOCK.get_or_init(|| Self::new("USDT", 6, CurrencyType::Crypto))
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn BTC() -> Self {
        static LOCK: OnceLock<Currency> = OnceLock::new();
        *LOCK.get_or_init(|| Self::new("BTC", 8, CurrencyType::Crypto))
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn ETH() -> Self {
        static LOCK: OnceLock<Currency> = OnceLock::new();
        *LOCK.get_or_init(|| Self::new("ETH", 8, CurrencyType::Crypto))
    }

    #[allow(non_snake_case)]
    #[must_use]
    pub fn GBP() -> Self {
        static LOCK: OnceLock<Currency> = OnceLock::new();
        *LOCK.get_or_init(|| Self::new("GBP", 2, CurrencyType::Fiat))
    }
}

impl PartialEq for Currency {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Hash for Currency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl Debug for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Currency('{}')", self.code)
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)
    }
}

impl From<&str> for Currency {
    /// Resolves one of the well-known constants by code, falling back to a crypto-typed currency
    /// at 8-decimal precision for anything else. The wire format (see [`Deserialize`] below) only
    /// carries the code, so an unrecognised one can't recover its original precision or type —
    /// this keeps deserialization infallible rather than losing a `Money`/`AccountBalance` value
    /// to a panic over a currency the sender minted locally.
    fn from(value: &str) -> Self {
        match value {
            "USD" => Self::USD(),
            "USDT" => Self::USDT(),
            "BTC" => Self::BTC(),
            "ETH" => Self::ETH(),
            "GBP" => Self::GBP(),
            other => Self::new(other, 8, CurrencyType::Crypto),
        }
    }
}

impl Serialize for Currency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.code.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code: String = Deserialize::deserialize(deserializer)?;
        Ok(Self::from(code.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_by_code() {
        let a = Currency::new("XYZ", 2, CurrencyType::Fiat);
        let b = Currency::new("XYZ", 5, CurrencyType::Fiat);
        assert_eq!(a, b);
    }

    #[test]
    fn test_well_known_constants_are_cached() {
        assert_eq!(Currency::USD(), Currency::USD());
        assert_eq!(Currency::USD().precision, 2);
        assert!(Currency::BTC().is_crypto());
        assert!(Currency::USD().is_fiat());
    }

    #[test]
    fn test_from_str_resolves_known_codes() {
        assert_eq!(Currency::from("USDT"), Currency::USDT());
        assert_eq!(Currency::from("GBP"), Currency::GBP());
    }

    #[test]
    fn test_from_str_falls_back_for_unknown_codes_instead_of_panicking() {
        let currency = Currency::from("DOGE");
        assert_eq!(currency.code.as_str(), "DOGE");
        assert_eq!(currency.precision, 8);
        assert!(currency.is_crypto());
    }

    #[test]
    fn test_deserialize_round_trips_through_code() {
        let currency = Currency::USDT();
        let json = serde_json::to_string(&currency).unwrap();
        let back: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, currency);
        assert_eq!(back.precision, currency.precision);
    }
}
