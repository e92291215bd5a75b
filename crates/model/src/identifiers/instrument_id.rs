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

//! Identifies an instrument as `{symbol}.{venue}`, e.g. `BTCUSD.BINANCE`.

use std::fmt::{Debug, Display, Formatter};

use quantflow_core::correctness::{FAILED, check_valid_string_ascii};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ustr::Ustr;

use super::{symbol::Symbol, venue::Venue};

/// Identifies an instrument, composed of a root [`Symbol`] and a [`Venue`].
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct InstrumentId {
    pub symbol: Symbol,
    pub venue: Venue,
}

impl InstrumentId {
    /// Creates a new [`InstrumentId`] from its parts.
    #[must_use]
    pub const fn new(symbol: Symbol, venue: Venue) -> Self {
        Self { symbol, venue }
    }

    /// Parses an `InstrumentId` from a `SYMBOL.VENUE` string.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` does not contain exactly one `.` separator.
    pub fn new_checked<T: AsRef<str>>(value: T) -> anyhow::Result<Self> {
        let value = value.as_ref();
        check_valid_string_ascii(value, stringify!(InstrumentId))?;
        let (symbol, venue) = value
            .rsplit_once('.')
            .ok_or_else(|| anyhow::anyhow!("invalid InstrumentId string '{value}', expected SYMBOL.VENUE"))?;
        Ok(Self::new(Symbol::new(symbol), Venue::new(venue)))
    }
}

impl From<&str> for InstrumentId {
    /// # Panics
    ///
    /// Panics if `value` is not of the form `SYMBOL.VENUE`.
    fn from(value: &str) -> Self {
        Self::new_checked(value).expect(FAILED)
    }
}

impl Display for InstrumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.symbol, self.venue)
    }
}

impl Debug for InstrumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "InstrumentId('{self}')")
    }
}

impl Serialize for InstrumentId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InstrumentId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value: String = Deserialize::deserialize(deserializer)?;
        Self::new_checked(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_symbol_and_venue() {
        let id = InstrumentId::from("BTCUSD.BINANCE");
        assert_eq!(id.symbol.as_str(), "BTCUSD");
        assert_eq!(id.venue.as_str(), "BINANCE");
        assert_eq!(format!("{id}"), "BTCUSD.BINANCE");
    }

    #[test]
    fn test_rejects_string_without_separator() {
        assert!(InstrumentId::new_checked("BTCUSD").is_err());
    }
}
