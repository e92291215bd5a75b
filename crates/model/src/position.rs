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

//! The [`Position`] aggregate: net exposure to an instrument built up from a sequence of fills,
//! with open/add/reduce/close/flip arithmetic and realised PnL accounting.

use std::collections::HashMap;

use quantflow_core::UnixNanos;

use crate::{
    enums::{OrderSide, PositionSide},
    events::OrderFilled,
    identifiers::{
        AccountId, ClientOrderId, InstrumentId, PositionId, StrategyId, TradeId, TraderId,
        VenueOrderId,
    },
    types::{Currency, Money, Quantity},
};

/// Outcome of applying a single fill to a position, used by the execution engine to decide which
/// position events to publish.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PositionDelta {
    /// The position was flat and this fill opened it.
    Opened,
    /// The position's net quantity changed but remained on the same side (or partially reduced
    /// without returning to flat).
    Changed,
    /// The fill exactly closed the position back to flat.
    Closed,
    /// The fill over-filled the position: it closed out the existing side and opened a new
    /// position on the opposite side with the remaining quantity.
    Flipped {
        closed_qty: f64,
        reopened_qty: f64,
    },
}

/// A net position in a single instrument for a single strategy.
#[derive(Clone, Debug)]
pub struct Position {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub position_id: PositionId,
    pub account_id: AccountId,
    pub opening_order_id: ClientOrderId,
    pub closing_order_id: Option<ClientOrderId>,
    pub entry: OrderSide,
    pub side: PositionSide,
    /// Net quantity, positive when long, negative when short.
    pub signed_qty: f64,
    pub quantity: Quantity,
    pub peak_qty: Quantity,
    pub price_precision: u8,
    pub size_precision: u8,
    pub multiplier: f64,
    pub avg_px_open: f64,
    pub avg_px_close: Option<f64>,
    pub currency: Currency,
    pub realized_pnl: Money,
    pub commissions: HashMap<ustr::Ustr, Money>,
    pub client_order_ids: Vec<ClientOrderId>,
    pub venue_order_ids: Vec<VenueOrderId>,
    pub trade_ids: Vec<TradeId>,
    pub ts_opened: UnixNanos,
    pub ts_last: UnixNanos,
    pub ts_closed: Option<UnixNanos>,
}

impl Position {
    /// Opens a new position from the fill that first establishes non-zero net quantity.
    ///
    /// # Panics
    ///
    /// Panics if `fill.order_side` is [`OrderSide::NoOrderSide`].
    #[must_use]
    pub fn opened_from(fill: &OrderFilled, multiplier: f64) -> Self {
        let side_sign = f64::from(fill.order_side.as_sign());
        let signed_qty = side_sign * fill.last_qty.as_f64();
        let mut commissions = HashMap::new();
        if let Some(commission) = fill.commission {
            commissions.insert(commission.currency.code, commission);
        }
        Self {
            trader_id: fill.trader_id,
            strategy_id: fill.strategy_id,
            instrument_id: fill.instrument_id,
            position_id: fill
                .position_id
                .unwrap_or_else(|| PositionId::new(fill.trade_id.to_string())),
            account_id: fill.account_id,
            opening_order_id: fill.client_order_id,
            closing_order_id: None,
            entry: fill.order_side,
            side: PositionSide::from_net_qty(signed_qty),
            signed_qty,
            quantity: fill.last_qty,
            peak_qty: fill.last_qty,
            price_precision: fill.last_px.precision,
            size_precision: fill.last_qty.precision,
            multiplier,
            avg_px_open: fill.last_px.as_f64(),
            avg_px_close: None,
            currency: fill.currency,
            realized_pnl: Money::zero(fill.currency),
            commissions,
            client_order_ids: vec![fill.client_order_id],
            venue_order_ids: vec![fill.venue_order_id],
            trade_ids: vec![fill.trade_id],
            ts_opened: fill.ts_event,
            ts_last: fill.ts_event,
            ts_closed: None,
        }
    }

    #[must_use]
    pub fn is_long(&self) -> bool {
        self.side == PositionSide::Long
    }

    #[must_use]
    pub fn is_short(&self) -> bool {
        self.side == PositionSide::Short
    }

    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.side == PositionSide::Flat
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.ts_closed.is_some()
    }

    /// Realised (or unrealised, given a hypothetical `avg_px_close`) PnL for `qty` of this
    /// position closing at `avg_px_close`.
    ///
    /// `PnL = (avg_px_close − avg_px_open) × qty × sign(entry) × multiplier`.
    #[must_use]
    pub fn calculate_pnl(&self, avg_px_close: f64, qty: f64) -> Money {
        let sign = f64::from(self.entry.as_sign());
        let pnl = (avg_px_close - self.avg_px_open) * qty * sign * self.multiplier;
        Money::new(pnl, self.currency)
    }

    /// Applies a fill against this position, updating its net quantity, average price and
    /// realised PnL, and returns the resulting [`PositionDelta`].
    ///
    /// # Panics
    ///
    /// Panics if `self` is already closed (zero net quantity with `ts_closed` set).
    pub fn apply(&mut self, fill: &OrderFilled) -> PositionDelta {
        assert!(!self.is_closed(), "cannot apply a fill to a closed position");

        let side_sign = f64::from(fill.order_side.as_sign());
        let fill_qty = fill.last_qty.as_f64();
        let fill_signed = side_sign * fill_qty;
        let prior_signed = self.signed_qty;
        let new_signed = prior_signed + fill_signed;

        self.client_order_ids.push(fill.client_order_id);
        if !self.venue_order_ids.contains(&fill.venue_order_id) {
            self.venue_order_ids.push(fill.venue_order_id);
        }
        self.trade_ids.push(fill.trade_id);
        self.ts_last = fill.ts_event;
        if let Some(commission) = fill.commission {
            self.commissions
                .entry(commission.currency.code)
                .and_modify(|total| *total += commission)
                .or_insert(commission);
        }

        let delta = if prior_signed.signum() == fill_signed.signum() {
            // Adding to the position in the same direction: roll the average open price.
            let total_qty = prior_signed.abs() + fill_qty;
            self.avg_px_open = (self.avg_px_open * prior_signed.abs()
                + fill.last_px.as_f64() * fill_qty)
                / total_qty;
            self.signed_qty = new_signed;
            PositionDelta::Changed
        } else {
            // Reducing (or flipping through) the position: realise PnL on the closing portion.
            let closing_qty = fill_qty.min(prior_signed.abs());
            self.realized_pnl += self.calculate_pnl(fill.last_px.as_f64(), closing_qty);

            if new_signed == 0.0 {
                self.closing_order_id = Some(fill.client_order_id);
                self.avg_px_close = Some(fill.last_px.as_f64());
                self.ts_closed = Some(fill.ts_event);
                self.signed_qty = 0.0;
                PositionDelta::Closed
            } else if new_signed.signum() != prior_signed.signum() {
                let reopened_qty = fill_qty - closing_qty;
                self.entry = fill.order_side;
                self.avg_px_open = fill.last_px.as_f64();
                self.avg_px_close = None;
                self.signed_qty = new_signed;
                PositionDelta::Flipped {
                    closed_qty: closing_qty,
                    reopened_qty,
                }
            } else {
                self.signed_qty = new_signed;
                PositionDelta::Changed
            }
        };

        self.side = PositionSide::from_net_qty(self.signed_qty);
        self.quantity = Quantity::new(self.signed_qty.abs(), self.size_precision);
        if self.quantity.as_f64() > self.peak_qty.as_f64() {
            self.peak_qty = self.quantity;
        }
        delta
    }
}

#[cfg(test)]
mod tests {
    use quantflow_core::{UUID4, UnixNanos};

    use super::*;
    use crate::{
        enums::{LiquiditySide, OrderType},
        identifiers::stubs::{instrument_id_btcusdt, strategy_id, trader_id},
        types::Price,
    };

    fn make_fill(side: OrderSide, qty: f64, px: f64, trade: &str) -> OrderFilled {
        OrderFilled::new(
            trader_id(),
            strategy_id(),
            instrument_id_btcusdt(),
            ClientOrderId::new("O-1"),
            VenueOrderId::new("V-1"),
            AccountId::new("SIM-001"),
            TradeId::new(trade),
            Some(PositionId::new("P-1")),
            side,
            OrderType::Market,
            Quantity::new(qty, 0),
            Price::new(px, 2),
            Currency::USD(),
            None,
            LiquiditySide::Taker,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
            false,
        )
    }

    #[test]
    fn test_open_then_flip_realises_pnl_and_opens_opposite() {
        let open_fill = make_fill(OrderSide::Buy, 10.0, 100.0, "T-1");
        let mut position = Position::opened_from(&open_fill, 1.0);
        assert!(position.is_long());
        assert_eq!(position.quantity.as_f64(), 10.0);

        let flip_fill = make_fill(OrderSide::Sell, 25.0, 110.0, "T-2");
        let delta = position.apply(&flip_fill);

        match delta {
            PositionDelta::Flipped {
                closed_qty,
                reopened_qty,
            } => {
                assert_eq!(closed_qty, 10.0);
                assert_eq!(reopened_qty, 15.0);
            }
            other => panic!("expected Flipped, got {other:?}"),
        }
        assert!(position.is_short());
        assert_eq!(position.quantity.as_f64(), 15.0);
        // realised PnL on the closing 10 units: (110-100)*10*1*1 = 100
        assert_eq!(position.realized_pnl.as_f64(), 100.0);
        assert_eq!(position.avg_px_open, 110.0);
    }

    #[test]
    fn test_exact_close_sets_closed() {
        let open_fill = make_fill(OrderSide::Buy, 10.0, 100.0, "T-1");
        let mut position = Position::opened_from(&open_fill, 1.0);
        let close_fill = make_fill(OrderSide::Sell, 10.0, 105.0, "T-2");
        let delta = position.apply(&close_fill);
        assert_eq!(delta, PositionDelta::Closed);
        assert!(position.is_closed());
        assert_eq!(position.realized_pnl.as_f64(), 50.0);
    }

    #[test]
    fn test_adding_same_side_rolls_average_price() {
        let open_fill = make_fill(OrderSide::Buy, 10.0, 100.0, "T-1");
        let mut position = Position::opened_from(&open_fill, 1.0);
        let add_fill = make_fill(OrderSide::Buy, 10.0, 120.0, "T-2");
        let delta = position.apply(&add_fill);
        assert_eq!(delta, PositionDelta::Changed);
        assert_eq!(position.avg_px_open, 110.0);
        assert_eq!(position.quantity.as_f64(), 20.0);
    }
}
