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

//! The handful of per-instrument facts the account ledger and matching core need (fee rates,
//! margin rates, contract multiplier, inverse/quote denomination) without pulling in a full
//! instrument catalog.

use serde::{Deserialize, Serialize};

use super::{currency::Currency, money::Money, price::Price, quantity::Quantity};
use crate::identifiers::InstrumentId;

/// A minimal per-instrument fee/margin/denomination specification.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSpec {
    pub instrument_id: InstrumentId,
    pub quote_currency: Currency,
    pub base_currency: Option<Currency>,
    pub is_inverse: bool,
    pub multiplier: f64,
    pub price_precision: u8,
    pub size_precision: u8,
    pub maker_fee: f64,
    pub taker_fee: f64,
    pub margin_init: f64,
    pub margin_maint: f64,
}

impl InstrumentSpec {
    /// Creates a new, unleveraged, zero-fee [`InstrumentSpec`] (a reasonable default for
    /// instruments the caller has not configured fees/margins for).
    #[must_use]
    pub fn new(instrument_id: InstrumentId, quote_currency: Currency) -> Self {
        Self {
            instrument_id,
            quote_currency,
            base_currency: None,
            is_inverse: false,
            multiplier: 1.0,
            price_precision: 2,
            size_precision: 0,
            maker_fee: 0.0,
            taker_fee: 0.0,
            margin_init: 0.0,
            margin_maint: 0.0,
        }
    }

    /// The currency margin/fee amounts for this instrument are denominated in, accounting for
    /// inverse contracts (which settle in the base currency unless `use_quote_for_inverse`).
    #[must_use]
    pub fn settlement_currency(&self, use_quote_for_inverse: bool) -> Currency {
        if self.is_inverse && !use_quote_for_inverse {
            self.base_currency.unwrap_or(self.quote_currency)
        } else {
            self.quote_currency
        }
    }

    /// The notional value of `quantity` at `price`, in [`Self::settlement_currency`].
    #[must_use]
    pub fn calculate_notional_value(
        &self,
        quantity: Quantity,
        price: Price,
        use_quote_for_inverse: Option<bool>,
    ) -> Money {
        let use_quote_for_inverse = use_quote_for_inverse.unwrap_or(false);
        let raw = quantity.as_f64() * self.multiplier;
        let notional = if self.is_inverse {
            let inverse_notional = raw / price.as_f64();
            if use_quote_for_inverse {
                raw * price.as_f64()
            } else {
                inverse_notional
            }
        } else {
            raw * price.as_f64()
        };
        Money::new(notional, self.settlement_currency(use_quote_for_inverse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notional_value_linear_instrument() {
        let spec = InstrumentSpec::new(
            InstrumentId::from("BTCUSDT.BINANCE"),
            Currency::USDT(),
        );
        let notional =
            spec.calculate_notional_value(Quantity::new(2.0, 3), Price::new(50_000.0, 2), None);
        assert_eq!(notional.as_f64(), 100_000.0);
        assert_eq!(notional.currency, Currency::USDT());
    }
}
