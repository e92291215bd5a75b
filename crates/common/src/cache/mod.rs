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

//! The authoritative in-process store of accounts, orders and positions, plus the indexes that
//! make id-based and filtered lookups cheap.

pub mod config;
pub mod index;

use std::collections::HashMap;

use ahash::AHashSet;
pub use config::CacheConfig;
use index::CacheIndex;
use quantflow_core::UnixNanos;
use quantflow_model::{
    accounts::AccountAny,
    identifiers::{AccountId, ClientOrderId, InstrumentId, PositionId, StrategyId, VenueOrderId},
    orders::Order,
    position::Position,
};

/// Error kinds a caller of the cache is expected to react to.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    #[error("{entity} with id {id} already exists in the cache")]
    DuplicateId { entity: &'static str, id: String },
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    #[error("{entity} with id {id} not found in the cache")]
    NotFound { entity: &'static str, id: String },
}

/// An in-memory store of accounts, orders and positions with bi-directional indexes.
#[derive(Debug, Default)]
pub struct Cache {
    config: CacheConfig,
    index: CacheIndex,
    accounts: HashMap<AccountId, AccountAny>,
    orders: HashMap<ClientOrderId, Order>,
    positions: HashMap<PositionId, Position>,
}

impl Cache {
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            index: CacheIndex::default(),
            accounts: HashMap::new(),
            orders: HashMap::new(),
            positions: HashMap::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    // -- COMMANDS ----------------------------------------------------------------------------

    /// Adds `account` to the cache.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::DuplicateId`] if an account with this id is already cached.
    pub fn add_account(&mut self, account: AccountAny) -> Result<(), CacheError> {
        let account_id = account.id();
        if self.accounts.contains_key(&account_id) {
            return Err(CacheError::DuplicateId {
                entity: "account",
                id: account_id.to_string(),
            });
        }

        tracing::debug!(%account_id, "adding account");
        self.index.venue_account.insert(account_id.get_issuer(), account_id);
        self.accounts.insert(account_id, account);
        Ok(())
    }

    /// Updates the cached copy of `account`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] if no account with this id is cached yet.
    pub fn update_account(&mut self, account: AccountAny) -> Result<(), CacheError> {
        let account_id = account.id();
        if !self.accounts.contains_key(&account_id) {
            return Err(CacheError::NotFound {
                entity: "account",
                id: account_id.to_string(),
            });
        }
        self.accounts.insert(account_id, account);
        Ok(())
    }

    /// Indexes `client_order_id` against `venue_order_id`.
    ///
    /// When `overwrite` is `false` and a different `venue_order_id` is already indexed for this
    /// `client_order_id`, the existing mapping wins and no change is made.
    pub fn add_venue_order_id(
        &mut self,
        client_order_id: ClientOrderId,
        venue_order_id: VenueOrderId,
        overwrite: bool,
    ) {
        if let Some(existing) = self.index.client_order_ids.get(&client_order_id) {
            if !overwrite && *existing != venue_order_id {
                return;
            }
        }
        self.index.client_order_ids.insert(client_order_id, venue_order_id);
        self.index.venue_order_ids.insert(venue_order_id, client_order_id);
    }

    /// Adds `order` to the cache, indexed by every relevant axis.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::DuplicateId`] if this `client_order_id` is already cached.
    pub fn add_order(
        &mut self,
        order: Order,
        position_id: Option<PositionId>,
    ) -> Result<(), CacheError> {
        let client_order_id = order.client_order_id;
        if self.orders.contains_key(&client_order_id) {
            return Err(CacheError::DuplicateId {
                entity: "order",
                id: client_order_id.to_string(),
            });
        }

        let instrument_id = order.instrument_id;
        let strategy_id = order.strategy_id;

        tracing::debug!(%client_order_id, "adding order");

        self.index.orders.insert(client_order_id);
        self.index.orders_open.insert(client_order_id);
        self.index.order_strategy.insert(client_order_id, strategy_id);
        self.index.strategies.insert(strategy_id);
        self.index
            .instrument_orders
            .entry(instrument_id)
            .or_default()
            .insert(client_order_id);
        self.index
            .strategy_orders
            .entry(strategy_id)
            .or_default()
            .insert(client_order_id);

        if let Some(venue_order_id) = order.venue_order_id {
            self.add_venue_order_id(client_order_id, venue_order_id, false);
        }

        if let Some(position_id) = position_id {
            self.add_position_id(position_id, client_order_id, strategy_id);
        }

        self.orders.insert(client_order_id, order);
        Ok(())
    }

    /// Indexes `position_id` against `client_order_id` and `strategy_id`.
    pub fn add_position_id(
        &mut self,
        position_id: PositionId,
        client_order_id: ClientOrderId,
        strategy_id: StrategyId,
    ) {
        self.index.order_position.insert(client_order_id, position_id);
        self.index.position_strategy.insert(position_id, strategy_id);
        self.index
            .position_orders
            .entry(position_id)
            .or_default()
            .insert(client_order_id);
        self.index
            .strategy_positions
            .entry(strategy_id)
            .or_default()
            .insert(position_id);
    }

    /// Adds `position` to the cache.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::DuplicateId`] if this `position_id` is already cached.
    pub fn add_position(&mut self, position: Position) -> Result<(), CacheError> {
        let position_id = position.position_id;
        if self.positions.contains_key(&position_id) {
            return Err(CacheError::DuplicateId {
                entity: "position",
                id: position_id.to_string(),
            });
        }

        tracing::debug!(%position_id, "adding position");

        self.index.positions.insert(position_id);
        self.index.positions_open.insert(position_id);
        self.index
            .instrument_positions
            .entry(position.instrument_id)
            .or_default()
            .insert(position_id);

        self.add_position_id(position_id, position.opening_order_id, position.strategy_id);

        self.positions.insert(position_id, position);
        Ok(())
    }

    /// Reclassifies `order`'s working/completed bucket membership from its current status.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] if no order with this id is cached yet.
    pub fn update_order(&mut self, order: &Order) -> Result<(), CacheError> {
        let client_order_id = order.client_order_id;
        if !self.orders.contains_key(&client_order_id) {
            return Err(CacheError::NotFound {
                entity: "order",
                id: client_order_id.to_string(),
            });
        }

        if let Some(venue_order_id) = order.venue_order_id {
            if !self.index.venue_order_ids.contains_key(&venue_order_id) {
                self.add_venue_order_id(client_order_id, venue_order_id, false);
            }
        }

        if order.is_open() {
            self.index.orders_closed.remove(&client_order_id);
            self.index.orders_open.insert(client_order_id);
        } else if order.is_closed() {
            self.index.orders_open.remove(&client_order_id);
            self.index.orders_closed.insert(client_order_id);
        }

        self.orders.insert(client_order_id, order.clone());
        Ok(())
    }

    /// Moves `position` to the `closed` bucket once its net quantity reaches zero.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] if no position with this id is cached yet.
    pub fn update_position(&mut self, position: &Position) -> Result<(), CacheError> {
        let position_id = position.position_id;
        if !self.positions.contains_key(&position_id) {
            return Err(CacheError::NotFound {
                entity: "position",
                id: position_id.to_string(),
            });
        }

        if position.is_closed() {
            self.index.positions_open.remove(&position_id);
            self.index.positions_closed.insert(position_id);
        } else {
            self.index.positions_closed.remove(&position_id);
            self.index.positions_open.insert(position_id);
        }

        self.positions.insert(position_id, position.clone());
        Ok(())
    }

    /// Removes `strategy_id`'s orders/positions from the working-state indexes and its roster
    /// entry. The object caches themselves are left untouched.
    pub fn delete_strategy(&mut self, strategy_id: &StrategyId) {
        self.index.remove_strategy(strategy_id);
    }

    /// Clears the object caches, then the indexes, in that order.
    pub fn reset(&mut self) {
        tracing::debug!("resetting cache");
        self.accounts.clear();
        self.orders.clear();
        self.positions.clear();
        self.index.clear();
    }

    /// Purges closed orders whose `ts_closed` lies more than `buffer_secs` in the past.
    ///
    /// A `buffer_secs` of 0 purges every closed order regardless of when it closed.
    pub fn purge_closed_orders(&mut self, ts_now: UnixNanos, buffer_secs: u64) {
        let buffer_ns = buffer_secs.saturating_mul(1_000_000_000);
        let stale: Vec<ClientOrderId> = self
            .index
            .orders_closed
            .iter()
            .filter(|id| {
                self.orders
                    .get(id)
                    .is_some_and(|o| o.ts_last + buffer_ns <= ts_now)
            })
            .copied()
            .collect();

        for client_order_id in stale {
            self.orders.remove(&client_order_id);
            self.index.orders.remove(&client_order_id);
            self.index.orders_closed.remove(&client_order_id);
        }
    }

    // -- QUERIES -------------------------------------------------------------------------------

    #[must_use]
    pub fn account(&self, account_id: &AccountId) -> Option<&AccountAny> {
        self.accounts.get(account_id)
    }

    #[must_use]
    pub fn account_for_venue(&self, venue: &quantflow_model::identifiers::Venue) -> Option<&AccountAny> {
        self.index.venue_account.get(venue).and_then(|id| self.accounts.get(id))
    }

    #[must_use]
    pub fn accounts(&self) -> Vec<&AccountAny> {
        self.accounts.values().collect()
    }

    #[must_use]
    pub fn order(&self, client_order_id: &ClientOrderId) -> Option<&Order> {
        self.orders.get(client_order_id)
    }

    #[must_use]
    pub fn position(&self, position_id: &PositionId) -> Option<&Position> {
        self.positions.get(position_id)
    }

    #[must_use]
    pub fn position_id(&self, client_order_id: &ClientOrderId) -> Option<&PositionId> {
        self.index.order_position.get(client_order_id)
    }

    /// Resolves the `client_order_id` a venue knows by `venue_order_id`, if any order has been
    /// indexed against it.
    #[must_use]
    pub fn client_order_id(&self, venue_order_id: &VenueOrderId) -> Option<&ClientOrderId> {
        self.index.venue_order_ids.get(venue_order_id)
    }

    #[must_use]
    pub fn strategies(&self) -> Vec<&StrategyId> {
        self.index.strategies.iter().collect()
    }

    fn filter_orders(
        &self,
        bucket: &AHashSet<ClientOrderId>,
        instrument_id: Option<InstrumentId>,
        strategy_id: Option<StrategyId>,
    ) -> Vec<&Order> {
        bucket
            .iter()
            .filter(|id| {
                instrument_id.is_none_or(|i| self.index.instrument_orders.get(&i).is_some_and(|s| s.contains(id)))
                    && strategy_id.is_none_or(|s| self.index.strategy_orders.get(&s).is_some_and(|set| set.contains(id)))
            })
            .filter_map(|id| self.orders.get(id))
            .collect()
    }

    #[must_use]
    pub fn orders_open(
        &self,
        instrument_id: Option<InstrumentId>,
        strategy_id: Option<StrategyId>,
    ) -> Vec<&Order> {
        self.filter_orders(&self.index.orders_open, instrument_id, strategy_id)
    }

    #[must_use]
    pub fn orders_closed(
        &self,
        instrument_id: Option<InstrumentId>,
        strategy_id: Option<StrategyId>,
    ) -> Vec<&Order> {
        self.filter_orders(&self.index.orders_closed, instrument_id, strategy_id)
    }

    fn filter_positions(
        &self,
        bucket: &AHashSet<PositionId>,
        instrument_id: Option<InstrumentId>,
        strategy_id: Option<StrategyId>,
    ) -> Vec<&Position> {
        bucket
            .iter()
            .filter(|id| {
                instrument_id.is_none_or(|i| self.index.instrument_positions.get(&i).is_some_and(|s| s.contains(id)))
                    && strategy_id.is_none_or(|s| self.index.strategy_positions.get(&s).is_some_and(|set| set.contains(id)))
            })
            .filter_map(|id| self.positions.get(id))
            .collect()
    }

    #[must_use]
    pub fn positions_open(
        &self,
        instrument_id: Option<InstrumentId>,
        strategy_id: Option<StrategyId>,
    ) -> Vec<&Position> {
        self.filter_positions(&self.index.positions_open, instrument_id, strategy_id)
    }

    #[must_use]
    pub fn positions_closed(
        &self,
        instrument_id: Option<InstrumentId>,
        strategy_id: Option<StrategyId>,
    ) -> Vec<&Position> {
        self.filter_positions(&self.index.positions_closed, instrument_id, strategy_id)
    }

    /// Re-derives every index entry from the object caches and diffs it against what's stored,
    /// logging each mismatch. Never panics.
    #[must_use]
    pub fn check_integrity(&self) -> bool {
        let mut error_count = 0usize;
        const FAILURE: &str = "integrity failure";

        for account_id in self.accounts.keys() {
            if !self.index.venue_account.contains_key(&account_id.get_issuer()) {
                tracing::error!(%account_id, "{FAILURE}: missing from venue_account index");
                error_count += 1;
            }
        }

        for (client_order_id, order) in &self.orders {
            if !self.index.order_strategy.contains_key(client_order_id) {
                tracing::error!(%client_order_id, "{FAILURE}: missing from order_strategy index");
                error_count += 1;
            }
            if order.is_open() && !self.index.orders_open.contains(client_order_id) {
                tracing::error!(%client_order_id, "{FAILURE}: open order missing from orders_open");
                error_count += 1;
            }
            if order.is_closed() && !self.index.orders_closed.contains(client_order_id) {
                tracing::error!(%client_order_id, "{FAILURE}: closed order missing from orders_closed");
                error_count += 1;
            }
            if !self
                .index
                .instrument_orders
                .get(&order.instrument_id)
                .is_some_and(|orders| orders.contains(client_order_id))
            {
                tracing::error!(%client_order_id, "{FAILURE}: missing from instrument_orders index");
                error_count += 1;
            }
            if !self
                .index
                .strategy_orders
                .get(&order.strategy_id)
                .is_some_and(|orders| orders.contains(client_order_id))
            {
                tracing::error!(%client_order_id, "{FAILURE}: missing from strategy_orders index");
                error_count += 1;
            }
            if let Some(venue_order_id) = order.venue_order_id {
                if self.index.client_order_ids.get(client_order_id) != Some(&venue_order_id) {
                    tracing::error!(%client_order_id, "{FAILURE}: missing from client_order_ids index");
                    error_count += 1;
                }
                if self.index.venue_order_ids.get(&venue_order_id) != Some(client_order_id) {
                    tracing::error!(%client_order_id, %venue_order_id, "{FAILURE}: missing from venue_order_ids index");
                    error_count += 1;
                }
            }
        }

        for (position_id, position) in &self.positions {
            if !self.index.position_strategy.contains_key(position_id) {
                tracing::error!(%position_id, "{FAILURE}: missing from position_strategy index");
                error_count += 1;
            }
            if position.is_closed() && !self.index.positions_closed.contains(position_id) {
                tracing::error!(%position_id, "{FAILURE}: closed position missing from positions_closed");
                error_count += 1;
            } else if !position.is_closed() && !self.index.positions_open.contains(position_id) {
                tracing::error!(%position_id, "{FAILURE}: open position missing from positions_open");
                error_count += 1;
            }
            if !self
                .index
                .instrument_positions
                .get(&position.instrument_id)
                .is_some_and(|positions| positions.contains(position_id))
            {
                tracing::error!(%position_id, "{FAILURE}: missing from instrument_positions index");
                error_count += 1;
            }
            if !self
                .index
                .strategy_positions
                .get(&position.strategy_id)
                .is_some_and(|positions| positions.contains(position_id))
            {
                tracing::error!(%position_id, "{FAILURE}: missing from strategy_positions index");
                error_count += 1;
            }
            if self.index.order_position.get(&position.opening_order_id) != Some(position_id) {
                tracing::error!(%position_id, "{FAILURE}: opening order missing from order_position index");
                error_count += 1;
            }
            if !self
                .index
                .position_orders
                .get(position_id)
                .is_some_and(|orders| orders.contains(&position.opening_order_id))
            {
                tracing::error!(%position_id, "{FAILURE}: opening order missing from position_orders index");
                error_count += 1;
            }
        }

        if error_count > 0 {
            tracing::error!(error_count, "cache integrity check failed");
        }

        error_count == 0
    }

    /// Reports every working order and open position as a warning. Used at shutdown to surface
    /// state that wasn't cleanly unwound.
    #[must_use]
    pub fn check_residuals(&self) -> bool {
        let mut residuals = false;

        for order in self.orders_open(None, None) {
            residuals = true;
            tracing::warn!(client_order_id = %order.client_order_id, "residual order");
        }

        for position in self.positions_open(None, None) {
            residuals = true;
            tracing::warn!(position_id = %position.position_id, "residual position");
        }

        residuals
    }
}

#[cfg(test)]
mod tests {
    use quantflow_core::clock::{Clock, TestClock};
    use quantflow_model::{
        enums::{OmsType, OrderSide, OrderType, TimeInForce},
        events::order::OrderInitialized,
        identifiers::stubs::{instrument_id_btcusdt, strategy_id, trader_id, uuid4},
        types::Quantity,
    };

    use super::*;

    fn new_order(client_order_id: &str) -> Order {
        let clock = TestClock::new();
        let event = OrderInitialized::new(
            trader_id(),
            strategy_id(),
            instrument_id_btcusdt(),
            ClientOrderId::new(client_order_id),
            OrderSide::Buy,
            OrderType::Market,
            Quantity::new(1.0, 0),
            None,
            None,
            TimeInForce::Gtc,
            OmsType::Netting,
            false,
            uuid4(),
            clock.timestamp_ns(),
            clock.timestamp_ns(),
        );
        Order::new(event)
    }

    #[test]
    fn test_add_order_is_duplicate_failing() {
        let mut cache = Cache::new(CacheConfig::default());
        cache.add_order(new_order("O-1"), None).unwrap();
        let err = cache.add_order(new_order("O-1"), None).unwrap_err();
        assert!(matches!(err, CacheError::DuplicateId { .. }));
    }

    #[test]
    fn test_add_order_indexes_by_strategy_and_instrument() {
        let mut cache = Cache::new(CacheConfig::default());
        cache.add_order(new_order("O-1"), None).unwrap();

        let open = cache.orders_open(Some(instrument_id_btcusdt()), Some(strategy_id()));
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].client_order_id, ClientOrderId::new("O-1"));
    }

    #[test]
    fn test_check_integrity_passes_for_freshly_added_order() {
        let mut cache = Cache::new(CacheConfig::default());
        cache.add_order(new_order("O-1"), None).unwrap();
        assert!(cache.check_integrity());
    }

    #[test]
    fn test_reset_clears_caches_and_indexes() {
        let mut cache = Cache::new(CacheConfig::default());
        cache.add_order(new_order("O-1"), None).unwrap();
        cache.reset();
        assert!(cache.order(&ClientOrderId::new("O-1")).is_none());
        assert!(cache.strategies().is_empty());
    }

    #[test]
    fn test_delete_strategy_removes_roster_entry() {
        let mut cache = Cache::new(CacheConfig::default());
        cache.add_order(new_order("O-1"), None).unwrap();
        cache.delete_strategy(&strategy_id());
        assert!(cache.strategies().is_empty());
    }

    #[test]
    fn test_check_residuals_reports_open_order() {
        let mut cache = Cache::new(CacheConfig::default());
        cache.add_order(new_order("O-1"), None).unwrap();
        assert!(cache.check_residuals());
    }
}
