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

use quantflow_core::{UUID4, UnixNanos};
use serde::{Deserialize, Serialize};

use crate::{
    enums::{LiquiditySide, OrderSide, OrderType},
    identifiers::{
        AccountId, ClientOrderId, InstrumentId, PositionId, StrategyId, TradeId, TraderId,
        VenueOrderId,
    },
    types::{Currency, Money, Price, Quantity},
};

/// A fill (whole or partial) of an order, reported by the venue.
///
/// `trade_id` uniquely identifies this specific fill; a `PARTIALLY_FILLED` order accumulates one
/// `OrderFilled` per execution, each carrying a distinct `trade_id` so re-delivery of the same
/// venue report can be detected and ignored by the cache.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderFilled {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: VenueOrderId,
    pub account_id: AccountId,
    pub trade_id: TradeId,
    pub position_id: Option<PositionId>,
    pub order_side: OrderSide,
    pub order_type: OrderType,
    pub last_qty: Quantity,
    pub last_px: Price,
    pub currency: Currency,
    pub commission: Option<Money>,
    pub liquidity_side: LiquiditySide,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
    pub reconciliation: bool,
}

impl OrderFilled {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        venue_order_id: VenueOrderId,
        account_id: AccountId,
        trade_id: TradeId,
        position_id: Option<PositionId>,
        order_side: OrderSide,
        order_type: OrderType,
        last_qty: Quantity,
        last_px: Price,
        currency: Currency,
        commission: Option<Money>,
        liquidity_side: LiquiditySide,
        event_id: UUID4,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
        reconciliation: bool,
    ) -> Self {
        Self {
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id,
            venue_order_id,
            account_id,
            trade_id,
            position_id,
            order_side,
            order_type,
            last_qty,
            last_px,
            currency,
            commission,
            liquidity_side,
            event_id,
            ts_event,
            ts_init,
            reconciliation,
        }
    }
}

#[cfg(test)]
mod tests {
    use quantflow_core::{UUID4, UnixNanos};

    use super::*;
    use crate::{enums::OrderSide, identifiers::stubs::instrument_id_btcusdt};

    #[test]
    fn test_new() {
        let fill = OrderFilled::new(
            TraderId::new("TRADER-001"),
            StrategyId::new("S-001"),
            instrument_id_btcusdt(),
            ClientOrderId::new("O-1"),
            VenueOrderId::new("V-1"),
            AccountId::new("SIM-001"),
            TradeId::new("T-1"),
            Some(PositionId::new("P-1")),
            OrderSide::Buy,
            OrderType::Market,
            Quantity::new(1.0, 0),
            Price::new(100.0, 2),
            Currency::USD(),
            None,
            LiquiditySide::Taker,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
            false,
        );
        assert_eq!(fill.last_qty.as_f64(), 1.0);
        assert!(!fill.reconciliation);
    }
}
