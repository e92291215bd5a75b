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

//! A closed enum over the three concrete account types, so callers that hold accounts
//! heterogeneously (caches, the execution engine) can dispatch through [`Account`] without a
//! trait object.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    accounts::{Account, BettingAccount, CashAccount, MarginAccount},
    enums::AccountType,
    events::AccountState,
    identifiers::AccountId,
    types::{AccountBalance, Currency, Money},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AccountAny {
    Cash(CashAccount),
    Margin(MarginAccount),
    Betting(BettingAccount),
}

impl AccountAny {
    /// Builds the matching account variant from an initial account state's `account_type`.
    #[must_use]
    pub fn from_state(event: AccountState, default_leverage: f64) -> Self {
        match event.account_type {
            AccountType::Cash => Self::Cash(CashAccount::new(event)),
            AccountType::Margin => Self::Margin(MarginAccount::new(event, default_leverage)),
            AccountType::Betting => Self::Betting(BettingAccount::new(event)),
        }
    }

    #[must_use]
    pub fn as_cash(&self) -> Option<&CashAccount> {
        match self {
            Self::Cash(account) => Some(account),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_margin(&self) -> Option<&MarginAccount> {
        match self {
            Self::Margin(account) => Some(account),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_betting(&self) -> Option<&BettingAccount> {
        match self {
            Self::Betting(account) => Some(account),
            _ => None,
        }
    }
}

impl Account for AccountAny {
    fn id(&self) -> AccountId {
        match self {
            Self::Cash(a) => a.id(),
            Self::Margin(a) => a.id(),
            Self::Betting(a) => a.id(),
        }
    }

    fn account_type(&self) -> AccountType {
        match self {
            Self::Cash(a) => a.account_type(),
            Self::Margin(a) => a.account_type(),
            Self::Betting(a) => a.account_type(),
        }
    }

    fn base_currency(&self) -> Option<Currency> {
        match self {
            Self::Cash(a) => a.base_currency(),
            Self::Margin(a) => a.base_currency(),
            Self::Betting(a) => a.base_currency(),
        }
    }

    fn is_cash_account(&self) -> bool {
        matches!(self, Self::Cash(_))
    }

    fn is_margin_account(&self) -> bool {
        matches!(self, Self::Margin(_))
    }

    fn is_betting_account(&self) -> bool {
        matches!(self, Self::Betting(_))
    }

    fn balance(&self, currency: Option<Currency>) -> Option<&AccountBalance> {
        match self {
            Self::Cash(a) => a.balance(currency),
            Self::Margin(a) => a.balance(currency),
            Self::Betting(a) => a.balance(currency),
        }
    }

    fn balance_total(&self, currency: Option<Currency>) -> Option<Money> {
        match self {
            Self::Cash(a) => a.balance_total(currency),
            Self::Margin(a) => a.balance_total(currency),
            Self::Betting(a) => a.balance_total(currency),
        }
    }

    fn balances_total(&self) -> HashMap<Currency, Money> {
        match self {
            Self::Cash(a) => a.balances_total(),
            Self::Margin(a) => a.balances_total(),
            Self::Betting(a) => a.balances_total(),
        }
    }

    fn balance_free(&self, currency: Option<Currency>) -> Option<Money> {
        match self {
            Self::Cash(a) => a.balance_free(currency),
            Self::Margin(a) => a.balance_free(currency),
            Self::Betting(a) => a.balance_free(currency),
        }
    }

    fn balances_free(&self) -> HashMap<Currency, Money> {
        match self {
            Self::Cash(a) => a.balances_free(),
            Self::Margin(a) => a.balances_free(),
            Self::Betting(a) => a.balances_free(),
        }
    }

    fn balance_locked(&self, currency: Option<Currency>) -> Option<Money> {
        match self {
            Self::Cash(a) => a.balance_locked(currency),
            Self::Margin(a) => a.balance_locked(currency),
            Self::Betting(a) => a.balance_locked(currency),
        }
    }

    fn balances_locked(&self) -> HashMap<Currency, Money> {
        match self {
            Self::Cash(a) => a.balances_locked(),
            Self::Margin(a) => a.balances_locked(),
            Self::Betting(a) => a.balances_locked(),
        }
    }

    fn balances(&self) -> HashMap<Currency, AccountBalance> {
        match self {
            Self::Cash(a) => a.balances(),
            Self::Margin(a) => a.balances(),
            Self::Betting(a) => a.balances(),
        }
    }

    fn starting_balances(&self) -> HashMap<Currency, Money> {
        match self {
            Self::Cash(a) => a.starting_balances(),
            Self::Margin(a) => a.starting_balances(),
            Self::Betting(a) => a.starting_balances(),
        }
    }

    fn last_event(&self) -> Option<AccountState> {
        match self {
            Self::Cash(a) => a.last_event(),
            Self::Margin(a) => a.last_event(),
            Self::Betting(a) => a.last_event(),
        }
    }

    fn events(&self) -> &[AccountState] {
        match self {
            Self::Cash(a) => a.events(),
            Self::Margin(a) => a.events(),
            Self::Betting(a) => a.events(),
        }
    }

    fn apply(&mut self, event: AccountState) {
        match self {
            Self::Cash(a) => a.apply(event),
            Self::Margin(a) => a.apply(event),
            Self::Betting(a) => a.apply(event),
        }
    }

    fn update_commissions(&mut self, commission: Money) {
        match self {
            Self::Cash(a) => a.update_commissions(commission),
            Self::Margin(a) => a.update_commissions(commission),
            Self::Betting(a) => a.update_commissions(commission),
        }
    }

    fn purge_account_events(&mut self, ts_now: quantflow_core::UnixNanos, lookback_secs: u64) {
        match self {
            Self::Cash(a) => a.purge_account_events(ts_now, lookback_secs),
            Self::Margin(a) => a.purge_account_events(ts_now, lookback_secs),
            Self::Betting(a) => a.purge_account_events(ts_now, lookback_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use quantflow_core::{UUID4, UnixNanos};
    use rstest::rstest;

    use super::*;
    use crate::{identifiers::stubs::account_id, types::{AccountBalance, Currency}};

    #[rstest]
    fn test_from_state_dispatches_on_account_type() {
        let event = AccountState::new(
            account_id(),
            AccountType::Margin,
            vec![AccountBalance::new(
                Money::new(1000.0, Currency::USD()),
                Money::new(0.0, Currency::USD()),
                Money::new(1000.0, Currency::USD()),
            )],
            vec![],
            true,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
            Some(Currency::USD()),
        );
        let account = AccountAny::from_state(event, 10.0);
        assert!(account.is_margin_account());
        assert!(account.as_margin().is_some());
    }
}
