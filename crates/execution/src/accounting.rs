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

//! Commission and realised-PnL arithmetic at the point a fill is applied.
//!
//! These are free functions rather than methods on a single account type: both calculations
//! dispatch on the `AccountAny` variant and pull fee/notional facts from [`InstrumentSpec`], so
//! they sit naturally alongside the engine's fill handling instead of inside any one account.

use quantflow_model::{
    accounts::AccountAny,
    enums::LiquiditySide,
    events::OrderFilled,
    position::Position,
    types::{InstrumentSpec, Money, Price, Quantity},
};

/// The commission owed on `quantity` of `instrument` filling at `price` with `liquidity_side`.
///
/// `notional × maker_fee` for a posted (MAKER) fill, `notional × taker_fee` for one that crossed
/// the book (TAKER). For inverse instruments the result is denominated in base currency unless
/// `use_quote_for_inverse` is set.
#[must_use]
pub fn calculate_commission(
    instrument: &InstrumentSpec,
    quantity: Quantity,
    price: Price,
    liquidity_side: LiquiditySide,
    use_quote_for_inverse: bool,
) -> Money {
    let notional =
        instrument.calculate_notional_value(quantity, price, Some(use_quote_for_inverse));
    let rate = match liquidity_side {
        LiquiditySide::Maker => instrument.maker_fee,
        LiquiditySide::Taker | LiquiditySide::NoLiquiditySide => instrument.taker_fee,
    };
    Money::new(notional.as_f64() * rate, notional.currency)
}

/// The PnL legs a fill produces against `account`, one [`Money`] per currency.
///
/// For a margin account, this is the realised PnL on the portion of `fill` that closes against
/// `position` (empty if the fill only adds to the position, or there is no open position yet —
/// commissions are accounted separately by [`calculate_commission`]). For a cash or betting
/// account, settlement moves both legs of the trade: the base-currency quantity and the
/// quote-currency notional, with opposite signs.
#[must_use]
pub fn calculate_pnls(
    account: &AccountAny,
    instrument: &InstrumentSpec,
    fill: &OrderFilled,
) -> Vec<Money> {
    match account {
        AccountAny::Margin(_) => Vec::new(),
        AccountAny::Cash(_) | AccountAny::Betting(_) => {
            let sign = f64::from(fill.order_side.as_sign());
            let notional =
                instrument.calculate_notional_value(fill.last_qty, fill.last_px, None);
            let mut legs = Vec::with_capacity(2);
            if let Some(base_currency) = instrument.base_currency {
                legs.push(Money::new(sign * fill.last_qty.as_f64(), base_currency));
            }
            legs.push(Money::new(-sign * notional.as_f64(), notional.currency));
            legs
        }
    }
}

/// The realised PnL on the closing portion of `fill` against `position`, if any.
///
/// Returns `None` when `fill` adds to `position` rather than reducing it (same side as its
/// current entry), since opening/adding fills realise nothing.
#[must_use]
pub fn calculate_realized_pnl(position: &Position, fill: &OrderFilled) -> Option<Money> {
    if fill.order_side == position.entry {
        return None;
    }
    let closing_qty = fill.last_qty.as_f64().min(position.quantity.as_f64());
    Some(position.calculate_pnl(fill.last_px.as_f64(), closing_qty))
}

#[cfg(test)]
mod tests {
    use quantflow_core::{UUID4, UnixNanos};
    use quantflow_model::{
        accounts::{Account, CashAccount},
        enums::{AccountType, OrderSide, OrderType},
        events::AccountState,
        identifiers::stubs::{
            account_id, instrument_id_btcusdt, strategy_id, trader_id,
        },
        identifiers::{ClientOrderId, PositionId, TradeId, VenueOrderId},
        types::{AccountBalance, Currency},
    };
    use rstest::rstest;

    use super::*;

    fn instrument() -> InstrumentSpec {
        let mut spec = InstrumentSpec::new(instrument_id_btcusdt(), Currency::USDT());
        spec.base_currency = Some(Currency::BTC());
        spec.maker_fee = 0.001;
        spec.taker_fee = 0.002;
        spec
    }

    fn fill(side: OrderSide, qty: f64, px: f64) -> OrderFilled {
        OrderFilled::new(
            trader_id(),
            strategy_id(),
            instrument_id_btcusdt(),
            ClientOrderId::new("O-1"),
            VenueOrderId::new("V-1"),
            account_id(),
            TradeId::new("T-1"),
            Some(PositionId::new("P-1")),
            side,
            OrderType::Market,
            Quantity::new(qty, 3),
            Price::new(px, 2),
            Currency::USDT(),
            None,
            LiquiditySide::Taker,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
            false,
        )
    }

    #[rstest]
    fn test_calculate_commission_uses_taker_fee_when_crossing() {
        let commission = calculate_commission(
            &instrument(),
            Quantity::new(2.0, 3),
            Price::new(20_000.0, 2),
            LiquiditySide::Taker,
            false,
        );
        assert_eq!(commission.as_f64(), 2.0 * 20_000.0 * 0.002);
    }

    #[rstest]
    fn test_calculate_pnls_cash_account_returns_opposite_signed_legs() {
        let event = AccountState::new(
            account_id(),
            AccountType::Cash,
            vec![AccountBalance::new(
                Money::new(100_000.0, Currency::USDT()),
                Money::new(0.0, Currency::USDT()),
                Money::new(100_000.0, Currency::USDT()),
            )],
            vec![],
            true,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
            None,
        );
        let account = AccountAny::Cash(CashAccount::new(event));
        let legs = calculate_pnls(&account, &instrument(), &fill(OrderSide::Buy, 2.0, 20_000.0));

        let base_leg = legs.iter().find(|m| m.currency == Currency::BTC()).unwrap();
        let quote_leg = legs.iter().find(|m| m.currency == Currency::USDT()).unwrap();
        assert_eq!(base_leg.as_f64(), 2.0);
        assert_eq!(quote_leg.as_f64(), -40_000.0);
    }

    #[rstest]
    fn test_calculate_realized_pnl_none_when_adding_to_position() {
        let open = fill(OrderSide::Buy, 10.0, 100.0);
        let position = Position::opened_from(&open, 1.0);
        let add = fill(OrderSide::Buy, 5.0, 110.0);
        assert!(calculate_realized_pnl(&position, &add).is_none());
    }

    #[rstest]
    fn test_calculate_realized_pnl_caps_at_open_quantity() {
        let open = fill(OrderSide::Buy, 10.0, 100.0);
        let position = Position::opened_from(&open, 1.0);
        let over_close = fill(OrderSide::Sell, 15.0, 110.0);
        let pnl = calculate_realized_pnl(&position, &over_close).unwrap();
        // capped at the 10 units actually open: (110-100)*10 = 100
        assert_eq!(pnl.as_f64(), 100.0);
    }
}
