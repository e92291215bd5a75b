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

//! The persistence boundary [`Cache`](crate::cache::Cache) writes through. Concrete
//! implementations (in-memory, on-disk, networked) live outside this crate; the cache only
//! requires that writes it issues in a given order persist in that order.

use std::collections::HashMap;

use quantflow_model::{accounts::AccountAny, identifiers::StrategyId, orders::Order, position::Position};

/// Abstract store backing a [`Cache`](crate::cache::Cache).
pub trait ExecutionDatabase {
    fn load_accounts(&self) -> anyhow::Result<Vec<AccountAny>>;
    fn load_orders(&self) -> anyhow::Result<Vec<Order>>;
    fn load_positions(&self) -> anyhow::Result<Vec<Position>>;

    fn add_account(&mut self, account: &AccountAny) -> anyhow::Result<()>;
    fn add_order(&mut self, order: &Order) -> anyhow::Result<()>;
    fn add_position(&mut self, position: &Position) -> anyhow::Result<()>;

    fn update_account(&mut self, account: &AccountAny) -> anyhow::Result<()>;
    fn update_order(&mut self, order: &Order) -> anyhow::Result<()>;
    fn update_position(&mut self, position: &Position) -> anyhow::Result<()>;

    /// Removes `strategy_id`'s orders/positions from the store's working state (not necessarily
    /// from durable history) and its roster entry.
    fn delete_strategy(&mut self, strategy_id: StrategyId) -> anyhow::Result<()>;

    /// Arbitrary key-value state a strategy persists across restarts.
    fn load_strategy(&self, strategy_id: StrategyId) -> anyhow::Result<HashMap<String, Vec<u8>>>;
    fn update_strategy(
        &mut self,
        strategy_id: StrategyId,
        state: HashMap<String, Vec<u8>>,
    ) -> anyhow::Result<()>;

    /// Forces any buffered writes out to the backing store.
    fn flush(&mut self) -> anyhow::Result<()>;
}
