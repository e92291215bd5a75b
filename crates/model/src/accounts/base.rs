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

//! Base fields and bookkeeping shared by every account implementation.
//!
//! Concrete account types (`CashAccount`, `MarginAccount`, `BettingAccount`) build on the
//! abstractions defined in this file via composition (a `base: BaseAccount` field), rather than
//! inheritance.

use std::collections::HashMap;

use quantflow_core::{UnixNanos, datetime::secs_to_nanos};
use serde::{Deserialize, Serialize};

use crate::{
    enums::AccountType,
    events::AccountState,
    identifiers::AccountId,
    types::{AccountBalance, Currency, Money},
};

/// Fields and bookkeeping common to every account type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseAccount {
    pub id: AccountId,
    pub account_type: AccountType,
    pub base_currency: Option<Currency>,
    pub events: Vec<AccountState>,
    pub commissions: HashMap<ustr::Ustr, f64>,
    pub balances: HashMap<Currency, AccountBalance>,
    pub balances_starting: HashMap<Currency, Money>,
}

impl BaseAccount {
    #[must_use]
    pub fn new(event: AccountState) -> Self {
        let mut balances_starting = HashMap::new();
        let mut balances = HashMap::new();
        for balance in &event.balances {
            balances_starting.insert(balance.currency, balance.total);
            balances.insert(balance.currency, *balance);
        }
        Self {
            id: event.account_id,
            account_type: event.account_type,
            base_currency: event.base_currency,
            events: vec![event],
            commissions: HashMap::new(),
            balances,
            balances_starting,
        }
    }

    /// # Panics
    ///
    /// Panics if `currency` is `None` and `self.base_currency` is also `None`.
    #[must_use]
    pub fn base_balance(&self, currency: Option<Currency>) -> Option<&AccountBalance> {
        let currency = currency.or(self.base_currency).expect("currency must be specified");
        self.balances.get(&currency)
    }

    #[must_use]
    pub fn base_balance_total(&self, currency: Option<Currency>) -> Option<Money> {
        self.base_balance(currency).map(|b| b.total)
    }

    #[must_use]
    pub fn base_balances_total(&self) -> HashMap<Currency, Money> {
        self.balances.iter().map(|(c, b)| (*c, b.total)).collect()
    }

    #[must_use]
    pub fn base_balance_free(&self, currency: Option<Currency>) -> Option<Money> {
        self.base_balance(currency).map(|b| b.free)
    }

    #[must_use]
    pub fn base_balances_free(&self) -> HashMap<Currency, Money> {
        self.balances.iter().map(|(c, b)| (*c, b.free)).collect()
    }

    #[must_use]
    pub fn base_balance_locked(&self, currency: Option<Currency>) -> Option<Money> {
        self.base_balance(currency).map(|b| b.locked)
    }

    #[must_use]
    pub fn base_balances_locked(&self) -> HashMap<Currency, Money> {
        self.balances.iter().map(|(c, b)| (*c, b.locked)).collect()
    }

    #[must_use]
    pub fn base_last_event(&self) -> Option<AccountState> {
        self.events.last().cloned()
    }

    /// # Panics
    ///
    /// Panics if any updated balance has a negative total (a true accounting error, not a
    /// recoverable margin/lock condition).
    pub fn update_balances(&mut self, balances: Vec<AccountBalance>) {
        for balance in balances {
            assert!(
                !balance.total.is_negative(),
                "cannot update balance with a negative total"
            );
            self.balances.insert(balance.currency, balance);
        }
    }

    pub fn update_commissions(&mut self, commission: Money) {
        if commission.is_zero() {
            return;
        }
        self.commissions
            .entry(commission.currency.code)
            .and_modify(|total| *total += commission.as_f64())
            .or_insert_with(|| commission.as_f64());
    }

    pub fn base_apply(&mut self, event: AccountState) {
        self.update_balances(event.balances.clone());
        self.events.push(event);
    }

    /// Purges account state events older than `lookback_secs` relative to `ts_now`, always
    /// retaining at least the most recent event.
    pub fn base_purge_account_events(&mut self, ts_now: UnixNanos, lookback_secs: u64) {
        let lookback_ns = UnixNanos::from(secs_to_nanos(lookback_secs as f64));
        let mut retained: Vec<_> = self
            .events
            .iter()
            .filter(|e| e.ts_event + lookback_ns > ts_now)
            .cloned()
            .collect();

        if retained.is_empty() {
            if let Some(last) = self.events.last() {
                retained.push(last.clone());
            }
        }
        self.events = retained;
    }
}

#[cfg(test)]
mod tests {
    use quantflow_core::UUID4;
    use rstest::rstest;

    use super::*;
    use crate::{identifiers::stubs::account_id, types::AccountBalance};

    fn stub_event(ts: u64) -> AccountState {
        AccountState::new(
            account_id(),
            AccountType::Cash,
            vec![AccountBalance::new(
                Money::new(1000.0, Currency::USD()),
                Money::new(0.0, Currency::USD()),
                Money::new(1000.0, Currency::USD()),
            )],
            vec![],
            true,
            UUID4::new(),
            UnixNanos::from(ts),
            UnixNanos::from(ts),
            Some(Currency::USD()),
        )
    }

    #[rstest]
    fn test_purge_retains_latest_when_all_purged() {
        let mut account = BaseAccount::new(stub_event(100));
        account.base_apply(stub_event(200));
        account.base_apply(stub_event(300));
        assert_eq!(account.events.len(), 3);

        account.base_purge_account_events(UnixNanos::from(1_000_000), 0);

        assert_eq!(account.events.len(), 1);
        assert_eq!(account.events[0].ts_event, UnixNanos::from(300));
    }

    #[test]
    fn test_update_commissions_accumulates() {
        let mut account = BaseAccount::new(stub_event(100));
        account.update_commissions(Money::new(1.5, Currency::USD()));
        account.update_commissions(Money::new(2.5, Currency::USD()));
        assert_eq!(
            *account.commissions.get(&Currency::USD().code).unwrap(),
            4.0
        );
    }
}
