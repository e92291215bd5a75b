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

use ahash::{AHashMap, AHashSet};
use quantflow_model::identifiers::{
    AccountId, ClientOrderId, InstrumentId, PositionId, StrategyId, Venue,
};

/// The bi-directional index set backing a [`Cache`](super::Cache).
///
/// Every add/update on the cache keeps these maps and sets in lockstep; `check_integrity`
/// re-derives each one from the object caches and diffs against what's stored here.
#[derive(Debug)]
pub struct CacheIndex {
    pub(crate) venue_account: AHashMap<Venue, AccountId>,
    pub(crate) venue_order_ids: AHashMap<quantflow_model::identifiers::VenueOrderId, ClientOrderId>,
    pub(crate) client_order_ids: AHashMap<ClientOrderId, quantflow_model::identifiers::VenueOrderId>,
    pub(crate) order_position: AHashMap<ClientOrderId, PositionId>,
    pub(crate) order_strategy: AHashMap<ClientOrderId, StrategyId>,
    pub(crate) position_strategy: AHashMap<PositionId, StrategyId>,
    pub(crate) position_orders: AHashMap<PositionId, AHashSet<ClientOrderId>>,
    pub(crate) instrument_orders: AHashMap<InstrumentId, AHashSet<ClientOrderId>>,
    pub(crate) instrument_positions: AHashMap<InstrumentId, AHashSet<PositionId>>,
    pub(crate) strategy_orders: AHashMap<StrategyId, AHashSet<ClientOrderId>>,
    pub(crate) strategy_positions: AHashMap<StrategyId, AHashSet<PositionId>>,
    pub(crate) orders: AHashSet<ClientOrderId>,
    pub(crate) orders_open: AHashSet<ClientOrderId>,
    pub(crate) orders_closed: AHashSet<ClientOrderId>,
    pub(crate) positions: AHashSet<PositionId>,
    pub(crate) positions_open: AHashSet<PositionId>,
    pub(crate) positions_closed: AHashSet<PositionId>,
    pub(crate) strategies: AHashSet<StrategyId>,
}

impl Default for CacheIndex {
    fn default() -> Self {
        Self {
            venue_account: AHashMap::new(),
            venue_order_ids: AHashMap::new(),
            client_order_ids: AHashMap::new(),
            order_position: AHashMap::new(),
            order_strategy: AHashMap::new(),
            position_strategy: AHashMap::new(),
            position_orders: AHashMap::new(),
            instrument_orders: AHashMap::new(),
            instrument_positions: AHashMap::new(),
            strategy_orders: AHashMap::new(),
            strategy_positions: AHashMap::new(),
            orders: AHashSet::new(),
            orders_open: AHashSet::new(),
            orders_closed: AHashSet::new(),
            positions: AHashSet::new(),
            positions_open: AHashSet::new(),
            positions_closed: AHashSet::new(),
            strategies: AHashSet::new(),
        }
    }
}

impl CacheIndex {
    /// Clears every index map and set.
    pub fn clear(&mut self) {
        self.venue_account.clear();
        self.venue_order_ids.clear();
        self.client_order_ids.clear();
        self.order_position.clear();
        self.order_strategy.clear();
        self.position_strategy.clear();
        self.position_orders.clear();
        self.instrument_orders.clear();
        self.instrument_positions.clear();
        self.strategy_orders.clear();
        self.strategy_positions.clear();
        self.orders.clear();
        self.orders_open.clear();
        self.orders_closed.clear();
        self.positions.clear();
        self.positions_open.clear();
        self.positions_closed.clear();
        self.strategies.clear();
    }

    /// Removes every trace of `strategy_id` from the working-state indexes.
    ///
    /// Orders/positions already recorded in the object caches are left untouched; callers
    /// evict those separately (see [`Cache::delete_strategy`](super::Cache::delete_strategy)).
    pub fn remove_strategy(&mut self, strategy_id: &StrategyId) {
        self.strategies.remove(strategy_id);
        if let Some(order_ids) = self.strategy_orders.remove(strategy_id) {
            for client_order_id in order_ids {
                self.order_strategy.remove(&client_order_id);
            }
        }
        if let Some(position_ids) = self.strategy_positions.remove(strategy_id) {
            for position_id in position_ids {
                self.position_strategy.remove(&position_id);
            }
        }
    }
}
