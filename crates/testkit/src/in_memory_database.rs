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

//! A `HashMap`-backed [`ExecutionDatabase`], a reasonable minimal real implementation for a
//! single-process deployment where durability across restarts is not required.

use std::collections::HashMap;

use quantflow_common::database::ExecutionDatabase;
use quantflow_model::{
    accounts::{Account, AccountAny},
    identifiers::{AccountId, ClientOrderId, PositionId, StrategyId},
    orders::Order,
    position::Position,
};

/// Stores accounts, orders and positions in memory, keyed by their identifiers.
///
/// `flush` is a no-op: there is nothing buffered that isn't already visible to readers.
#[derive(Debug, Default)]
pub struct InMemoryExecutionDatabase {
    accounts: HashMap<AccountId, AccountAny>,
    orders: HashMap<ClientOrderId, Order>,
    positions: HashMap<PositionId, Position>,
    strategy_state: HashMap<StrategyId, HashMap<String, Vec<u8>>>,
}

impl InMemoryExecutionDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ExecutionDatabase for InMemoryExecutionDatabase {
    fn load_accounts(&self) -> anyhow::Result<Vec<AccountAny>> {
        Ok(self.accounts.values().cloned().collect())
    }

    fn load_orders(&self) -> anyhow::Result<Vec<Order>> {
        Ok(self.orders.values().cloned().collect())
    }

    fn load_positions(&self) -> anyhow::Result<Vec<Position>> {
        Ok(self.positions.values().cloned().collect())
    }

    fn add_account(&mut self, account: &AccountAny) -> anyhow::Result<()> {
        self.accounts.insert(account.id(), account.clone());
        Ok(())
    }

    fn add_order(&mut self, order: &Order) -> anyhow::Result<()> {
        self.orders.insert(order.client_order_id, order.clone());
        Ok(())
    }

    fn add_position(&mut self, position: &Position) -> anyhow::Result<()> {
        self.positions.insert(position.position_id, position.clone());
        Ok(())
    }

    fn update_account(&mut self, account: &AccountAny) -> anyhow::Result<()> {
        self.add_account(account)
    }

    fn update_order(&mut self, order: &Order) -> anyhow::Result<()> {
        self.add_order(order)
    }

    fn update_position(&mut self, position: &Position) -> anyhow::Result<()> {
        self.add_position(position)
    }

    fn delete_strategy(&mut self, strategy_id: StrategyId) -> anyhow::Result<()> {
        self.orders.retain(|_, order| order.strategy_id != strategy_id);
        self.positions.retain(|_, position| position.strategy_id != strategy_id);
        self.strategy_state.remove(&strategy_id);
        Ok(())
    }

    fn load_strategy(&self, strategy_id: StrategyId) -> anyhow::Result<HashMap<String, Vec<u8>>> {
        Ok(self.strategy_state.get(&strategy_id).cloned().unwrap_or_default())
    }

    fn update_strategy(
        &mut self,
        strategy_id: StrategyId,
        state: HashMap<String, Vec<u8>>,
    ) -> anyhow::Result<()> {
        self.strategy_state.insert(strategy_id, state);
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use quantflow_core::{UUID4, UnixNanos};
    use quantflow_model::{
        enums::AccountType,
        events::AccountState,
        identifiers::stubs::account_id,
        types::{AccountBalance, Currency, Money},
    };

    use super::*;

    fn account() -> AccountAny {
        let event = AccountState::new(
            account_id(),
            AccountType::Cash,
            vec![AccountBalance::new(
                Money::new(1_000.0, Currency::USD()),
                Money::new(0.0, Currency::USD()),
                Money::new(1_000.0, Currency::USD()),
            )],
            vec![],
            true,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
            None,
        );
        AccountAny::from_state(event, 1.0)
    }

    #[test]
    fn test_add_then_load_account_round_trips() {
        let mut db = InMemoryExecutionDatabase::new();
        db.add_account(&account()).unwrap();

        let loaded = db.load_accounts().unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id(), account_id());
    }

    #[test]
    fn test_delete_strategy_clears_its_state() {
        let mut db = InMemoryExecutionDatabase::new();
        let strategy_id = quantflow_model::identifiers::stubs::strategy_id();
        db.update_strategy(strategy_id, HashMap::from([("k".to_string(), vec![1, 2, 3])]))
            .unwrap();

        db.delete_strategy(strategy_id).unwrap();

        assert!(db.load_strategy(strategy_id).unwrap().is_empty());
    }
}
