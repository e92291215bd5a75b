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

//! Betting accounts settle against a stake/liability model instead of notional value: a BACK bet
//! risks the stake, a LAY bet risks the stake multiplied out by the odds offered.
//!
//! Liability is locked per-bet the same way [`crate::accounts::CashAccount`] locks funds per
//! instrument, since a single account commonly has several open bets across different selections
//! at once.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    accounts::{Account, base::BaseAccount},
    enums::{AccountType, BetSide},
    events::AccountState,
    identifiers::{AccountId, InstrumentId},
    types::{AccountBalance, Currency, Money},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BettingAccount {
    pub base: BaseAccount,
    pub locked_by_instrument: HashMap<InstrumentId, Money>,
}

impl BettingAccount {
    #[must_use]
    pub fn new(event: AccountState) -> Self {
        Self {
            base: BaseAccount::new(event),
            locked_by_instrument: HashMap::new(),
        }
    }

    /// The liability a bet of `stake` at decimal `odds` carries for `side`.
    ///
    /// A BACK bet risks exactly the stake; a LAY bet (the account takes the other side of the
    /// bet) risks the stake multiplied by `odds - 1`, the standard betting-exchange convention
    /// for the payout owed if the backer wins.
    #[must_use]
    pub fn liability(side: BetSide, stake: Money, odds: f64) -> Money {
        match side {
            BetSide::Back => stake,
            BetSide::Lay => Money::new(stake.as_f64() * (odds - 1.0), stake.currency),
        }
    }

    pub fn lock_liability(&mut self, instrument_id: InstrumentId, amount: Money) {
        self.locked_by_instrument
            .entry(instrument_id)
            .and_modify(|locked| *locked += amount)
            .or_insert(amount);
        self.recalculate_balance(amount.currency);
    }

    pub fn unlock_liability(&mut self, instrument_id: InstrumentId, amount: Money) {
        if let Some(locked) = self.locked_by_instrument.get_mut(&instrument_id) {
            *locked -= amount;
            if locked.is_zero() {
                self.locked_by_instrument.remove(&instrument_id);
            }
        }
        self.recalculate_balance(amount.currency);
    }

    pub fn recalculate_balance(&mut self, currency: Currency) {
        let Some(current) = self.base.balances.get(&currency).copied() else {
            return;
        };

        let total_locked: f64 = self
            .locked_by_instrument
            .values()
            .filter(|m| m.currency == currency)
            .map(Money::as_f64)
            .sum();

        let locked = Money::new(total_locked, currency);
        let free = Money::new(current.total.as_f64() - total_locked, currency);
        self.base
            .balances
            .insert(currency, AccountBalance::new(current.total, locked, free));
    }
}

impl Account for BettingAccount {
    fn id(&self) -> AccountId {
        self.base.id
    }

    fn account_type(&self) -> AccountType {
        self.base.account_type
    }

    fn base_currency(&self) -> Option<Currency> {
        self.base.base_currency
    }

    fn is_cash_account(&self) -> bool {
        false
    }

    fn is_margin_account(&self) -> bool {
        false
    }

    fn is_betting_account(&self) -> bool {
        true
    }

    fn balance(&self, currency: Option<Currency>) -> Option<&AccountBalance> {
        self.base.base_balance(currency)
    }

    fn balance_total(&self, currency: Option<Currency>) -> Option<Money> {
        self.base.base_balance_total(currency)
    }

    fn balances_total(&self) -> HashMap<Currency, Money> {
        self.base.base_balances_total()
    }

    fn balance_free(&self, currency: Option<Currency>) -> Option<Money> {
        self.base.base_balance_free(currency)
    }

    fn balances_free(&self) -> HashMap<Currency, Money> {
        self.base.base_balances_free()
    }

    fn balance_locked(&self, currency: Option<Currency>) -> Option<Money> {
        self.base.base_balance_locked(currency)
    }

    fn balances_locked(&self) -> HashMap<Currency, Money> {
        self.base.base_balances_locked()
    }

    fn balances(&self) -> HashMap<Currency, AccountBalance> {
        self.base.balances.clone()
    }

    fn starting_balances(&self) -> HashMap<Currency, Money> {
        self.base.balances_starting.clone()
    }

    fn last_event(&self) -> Option<AccountState> {
        self.base.base_last_event()
    }

    fn events(&self) -> &[AccountState] {
        &self.base.events
    }

    fn apply(&mut self, event: AccountState) {
        self.base.base_apply(event);
    }

    fn update_commissions(&mut self, commission: Money) {
        self.base.update_commissions(commission);
    }

    fn purge_account_events(&mut self, ts_now: quantflow_core::UnixNanos, lookback_secs: u64) {
        self.base.base_purge_account_events(ts_now, lookback_secs);
    }
}

#[cfg(test)]
mod tests {
    use quantflow_core::{UUID4, UnixNanos};
    use rstest::rstest;

    use super::*;
    use crate::identifiers::stubs::{account_id, instrument_id_btcusdt};

    fn stub_account() -> BettingAccount {
        let event = AccountState::new(
            account_id(),
            AccountType::Betting,
            vec![AccountBalance::new(
                Money::new(1_000.0, Currency::GBP()),
                Money::new(0.0, Currency::GBP()),
                Money::new(1_000.0, Currency::GBP()),
            )],
            vec![],
            true,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
            None,
        );
        BettingAccount::new(event)
    }

    #[rstest]
    #[case(BetSide::Back, 10.0, 2.5, 10.0)]
    #[case(BetSide::Lay, 10.0, 2.5, 15.0)]
    fn test_liability_formula(
        #[case] side: BetSide,
        #[case] stake: f64,
        #[case] odds: f64,
        #[case] expected: f64,
    ) {
        let liability = BettingAccount::liability(side, Money::new(stake, Currency::GBP()), odds);
        assert_eq!(liability.as_f64(), expected);
    }

    #[test]
    fn test_lock_liability_updates_locked_and_free() {
        let mut account = stub_account();
        let liability = BettingAccount::liability(
            BetSide::Lay,
            Money::new(100.0, Currency::GBP()),
            3.0,
        );
        account.lock_liability(instrument_id_btcusdt(), liability);

        let balance = account.balance(Some(Currency::GBP())).unwrap();
        assert_eq!(balance.locked.as_f64(), 200.0);
        assert_eq!(balance.free.as_f64(), 800.0);
    }
}
