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

use std::collections::HashMap;

use quantflow_core::UnixNanos;

use super::transition::check_order_status_transition;
use crate::{
    enums::{ContingencyType, OmsType, OrderSide, OrderStatus, OrderType, TimeInForce},
    events::{OrderEventAny, OrderInitialized},
    identifiers::{
        AccountId, ClientOrderId, ExecAlgorithmId, InstrumentId, OrderListId, PositionId,
        StrategyId, TradeId, TraderId, VenueOrderId,
    },
    types::{Money, Price, Quantity},
};

/// An order and its full event log, with a status that only ever advances through the
/// transitions in [`check_order_status_transition`].
#[derive(Clone, Debug)]
pub struct Order {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub position_id: Option<PositionId>,
    pub account_id: Option<AccountId>,
    pub order_side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Quantity,
    pub price: Option<Price>,
    pub trigger_price: Option<Price>,
    pub time_in_force: TimeInForce,
    pub oms_type: OmsType,
    pub reduce_only: bool,
    pub contingency_type: ContingencyType,
    pub order_list_id: Option<OrderListId>,
    pub exec_algorithm_id: Option<ExecAlgorithmId>,
    pub status: OrderStatus,
    pub filled_qty: Quantity,
    pub leaves_qty: Quantity,
    pub avg_px: Option<f64>,
    pub commissions: HashMap<ustr::Ustr, Money>,
    pub venue_order_ids: Vec<VenueOrderId>,
    pub trade_ids: Vec<TradeId>,
    pub events: Vec<OrderEventAny>,
    pub ts_init: UnixNanos,
    pub ts_last: UnixNanos,
}

impl Order {
    /// Creates a new [`Order`] from its `OrderInitialized` event.
    #[must_use]
    pub fn new(init: OrderInitialized) -> Self {
        let quantity = init.quantity;
        Self {
            trader_id: init.trader_id,
            strategy_id: init.strategy_id,
            instrument_id: init.instrument_id,
            client_order_id: init.client_order_id,
            venue_order_id: None,
            position_id: None,
            account_id: None,
            order_side: init.order_side,
            order_type: init.order_type,
            quantity,
            price: init.price,
            trigger_price: init.trigger_price,
            time_in_force: init.time_in_force,
            oms_type: init.oms_type,
            reduce_only: init.reduce_only,
            contingency_type: init.contingency_type,
            order_list_id: init.order_list_id,
            exec_algorithm_id: init.exec_algorithm_id,
            status: OrderStatus::Initialized,
            filled_qty: Quantity::zero(quantity.precision),
            leaves_qty: quantity,
            avg_px: None,
            commissions: HashMap::new(),
            venue_order_ids: Vec::new(),
            trade_ids: Vec::new(),
            events: vec![OrderEventAny::Initialized(init)],
            ts_init: init.ts_init,
            ts_last: init.ts_init,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status.is_closed()
    }

    /// Applies `event` to the order, advancing its status and accumulating fill state.
    ///
    /// # Errors
    ///
    /// Returns an error if `event` does not name a valid transition from the order's current
    /// status, or if the event's `client_order_id` does not match this order.
    pub fn apply(&mut self, event: OrderEventAny) -> anyhow::Result<()> {
        anyhow::ensure!(
            event.client_order_id() == self.client_order_id,
            "event client_order_id {} did not match order {}",
            event.client_order_id(),
            self.client_order_id
        );

        let new_status = self.status_for_event(&event);
        anyhow::ensure!(
            check_order_status_transition(self.status, new_status),
            "invalid order status transition from {:?} to {:?} for order {}",
            self.status,
            new_status,
            self.client_order_id
        );

        if let OrderEventAny::Filled(fill) = &event {
            self.apply_fill(fill);
        }

        if let OrderEventAny::Accepted(accepted) = &event {
            self.venue_order_id = Some(accepted.venue_order_id);
            self.account_id = Some(accepted.account_id);
            if !self.venue_order_ids.contains(&accepted.venue_order_id) {
                self.venue_order_ids.push(accepted.venue_order_id);
            }
        }

        if let OrderEventAny::Updated(updated) = &event {
            self.quantity = updated.quantity;
            self.leaves_qty = self.quantity - self.filled_qty;
            if updated.price.is_some() {
                self.price = updated.price;
            }
            if updated.trigger_price.is_some() {
                self.trigger_price = updated.trigger_price;
            }
        }

        self.ts_last = event.ts_event();
        self.status = new_status;
        self.events.push(event);
        Ok(())
    }

    fn apply_fill(&mut self, fill: &crate::events::OrderFilled) {
        self.filled_qty += fill.last_qty;
        self.leaves_qty = self.quantity - self.filled_qty;

        let fill_value = fill.last_px.as_f64() * fill.last_qty.as_f64();
        let prior_value = self.avg_px.unwrap_or(0.0) * (self.filled_qty - fill.last_qty).as_f64();
        self.avg_px = Some((prior_value + fill_value) / self.filled_qty.as_f64());

        self.position_id = fill.position_id.or(self.position_id);
        self.trade_ids.push(fill.trade_id);

        if let Some(commission) = fill.commission {
            self.commissions
                .entry(commission.currency.code)
                .and_modify(|total| *total += commission)
                .or_insert(commission);
        }
    }

    fn status_for_event(&self, event: &OrderEventAny) -> OrderStatus {
        match event {
            OrderEventAny::Initialized(_) => OrderStatus::Initialized,
            OrderEventAny::Submitted(_) => OrderStatus::Submitted,
            OrderEventAny::Accepted(_) => OrderStatus::Accepted,
            OrderEventAny::Rejected(_) => OrderStatus::Rejected,
            OrderEventAny::Canceled(_) => OrderStatus::Canceled,
            OrderEventAny::Expired(_) => OrderStatus::Expired,
            OrderEventAny::Triggered(_) => OrderStatus::Triggered,
            OrderEventAny::PendingUpdate(_) => OrderStatus::PendingUpdate,
            OrderEventAny::PendingCancel(_) => OrderStatus::PendingCancel,
            OrderEventAny::ModifyRejected(_) => self.status,
            OrderEventAny::Updated(_) => self.status,
            OrderEventAny::Filled(fill) => {
                if self.filled_qty + fill.last_qty >= self.quantity {
                    OrderStatus::Filled
                } else {
                    OrderStatus::PartiallyFilled
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use quantflow_core::{UUID4, UnixNanos};

    use super::*;
    use crate::{
        events::{OrderAccepted, OrderFilled},
        identifiers::stubs::{instrument_id_btcusdt, strategy_id, trader_id},
        types::Currency,
    };

    fn new_initialized() -> Order {
        let init = OrderInitialized::new(
            trader_id(),
            strategy_id(),
            instrument_id_btcusdt(),
            ClientOrderId::new("O-1"),
            OrderSide::Buy,
            OrderType::Market,
            Quantity::new(10.0, 0),
            None,
            None,
            TimeInForce::Gtc,
            OmsType::Netting,
            false,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
        );
        Order::new(init)
    }

    #[test]
    fn test_accept_then_partial_fills_to_filled() {
        let mut order = new_initialized();
        order
            .apply(OrderEventAny::Accepted(OrderAccepted::new(
                order.trader_id,
                order.strategy_id,
                order.instrument_id,
                order.client_order_id,
                VenueOrderId::new("V-1"),
                AccountId::new("SIM-001"),
                UUID4::new(),
                UnixNanos::default(),
                UnixNanos::default(),
                false,
            )))
            .unwrap();
        assert_eq!(order.status, OrderStatus::Accepted);

        let fill_one = OrderFilled::new(
            order.trader_id,
            order.strategy_id,
            order.instrument_id,
            order.client_order_id,
            VenueOrderId::new("V-1"),
            AccountId::new("SIM-001"),
            TradeId::new("T-1"),
            Some(PositionId::new("P-1")),
            order.order_side,
            order.order_type,
            Quantity::new(4.0, 0),
            Price::new(100.0, 2),
            Currency::USD(),
            None,
            crate::enums::LiquiditySide::Taker,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
            false,
        );
        order.apply(OrderEventAny::Filled(fill_one)).unwrap();
        assert_eq!(order.status, OrderStatus::PartiallyFilled);
        assert_eq!(order.filled_qty.as_f64(), 4.0);
        assert_eq!(order.leaves_qty.as_f64(), 6.0);

        let fill_two = OrderFilled::new(
            order.trader_id,
            order.strategy_id,
            order.instrument_id,
            order.client_order_id,
            VenueOrderId::new("V-1"),
            AccountId::new("SIM-001"),
            TradeId::new("T-2"),
            Some(PositionId::new("P-1")),
            order.order_side,
            order.order_type,
            Quantity::new(6.0, 0),
            Price::new(110.0, 2),
            Currency::USD(),
            None,
            crate::enums::LiquiditySide::Taker,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
            false,
        );
        order.apply(OrderEventAny::Filled(fill_two)).unwrap();
        assert_eq!(order.status, OrderStatus::Filled);
        assert!(order.is_closed());
        // weighted avg: (4*100 + 6*110) / 10 = 106.0
        assert!((order.avg_px.unwrap() - 106.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_transition_is_rejected() {
        let mut order = new_initialized();
        let cancel = crate::events::order::OrderCanceled::new(
            order.trader_id,
            order.strategy_id,
            order.instrument_id,
            order.client_order_id,
            None,
            None,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
            false,
        );
        order.apply(OrderEventAny::Canceled(cancel.clone())).unwrap();
        assert!(order.apply(OrderEventAny::Canceled(cancel)).is_err());
    }
}
