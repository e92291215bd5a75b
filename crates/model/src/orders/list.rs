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

use quantflow_core::UnixNanos;

use super::order::Order;
use crate::identifiers::{InstrumentId, OrderListId, StrategyId, TraderId};

/// A group of orders submitted together (e.g. a bracket: entry + stop-loss + take-profit), linked
/// by a shared [`OrderListId`] and the `contingency_type` each member order carries.
#[derive(Clone, Debug)]
pub struct OrderList {
    pub order_list_id: OrderListId,
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub orders: Vec<Order>,
    pub ts_init: UnixNanos,
}

impl OrderList {
    #[must_use]
    pub fn new(
        order_list_id: OrderListId,
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        orders: Vec<Order>,
        ts_init: UnixNanos,
    ) -> Self {
        Self {
            order_list_id,
            trader_id,
            strategy_id,
            instrument_id,
            orders,
            ts_init,
        }
    }

    #[must_use]
    pub fn first(&self) -> Option<&Order> {
        self.orders.first()
    }

    #[must_use]
    pub fn is_fully_closed(&self) -> bool {
        self.orders.iter().all(Order::is_closed)
    }
}
