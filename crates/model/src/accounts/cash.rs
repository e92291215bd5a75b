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

//! Cash accounts settle every fill immediately against a balance; nothing is leveraged.
//!
//! Funds committed to working orders are tracked per instrument in [`CashAccount::locked_by_instrument`]
//! rather than as a single currency-wide figure, since an account can have several open orders on
//! different instruments denominated in the same currency simultaneously.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    accounts::{Account, base::BaseAccount},
    enums::{AccountType, OrderSide},
    events::AccountState,
    identifiers::{AccountId, InstrumentId},
    types::{AccountBalance, Currency, InstrumentSpec, Money, Price, Quantity},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashAccount {
    pub base: BaseAccount,
    pub locked_by_instrument: HashMap<InstrumentId, Money>,
}

impl CashAccount {
    #[must_use]
    pub fn new(event: AccountState) -> Self {
        Self {
            base: BaseAccount::new(event),
            locked_by_instrument: HashMap::new(),
        }
    }

    /// Reserves `amount` of `currency` against `instrument_id` (a new working order) and
    /// recalculates the account-wide balance for that currency.
    pub fn lock_funds(&mut self, instrument_id: InstrumentId, amount: Money) {
        self.locked_by_instrument
            .entry(instrument_id)
            .and_modify(|locked| *locked += amount)
            .or_insert(amount);
        self.recalculate_balance(amount.currency);
    }

    /// Releases a prior lock for `instrument_id` (the order it funded was filled or canceled).
    pub fn unlock_funds(&mut self, instrument_id: InstrumentId, amount: Money) {
        if let Some(locked) = self.locked_by_instrument.get_mut(&instrument_id) {
            *locked -= amount;
            if locked.is_zero() {
                self.locked_by_instrument.remove(&instrument_id);
            }
        }
        self.recalculate_balance(amount.currency);
    }

    /// Recomputes `locked`/`free` for `currency` by summing every per-instrument lock
    /// denominated in it, leaving `total` untouched.
    ///
    /// This is the one place this account type diverges from a currency-keyed balance map that
    /// can only ever record a single locked figure per currency: locks are tracked per
    /// instrument so two open orders on different instruments never clobber each other's hold.
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

    /// The amount that must be locked for a new BUY/SELL order: notional value plus an
    /// estimated two-sided taker fee buffer (covering both entry and exit), in quote currency
    /// for a BUY and base currency for a SELL (spot never locks more than it holds).
    #[must_use]
    pub fn calculate_balance_locked(
        &self,
        instrument: &InstrumentSpec,
        side: OrderSide,
        quantity: Quantity,
        price: Price,
        use_quote_for_inverse: bool,
    ) -> Money {
        let notional =
            instrument.calculate_notional_value(quantity, price, Some(use_quote_for_inverse));
        match side {
            OrderSide::Buy => {
                let fee_buffer = notional.as_f64() * instrument.taker_fee * 2.0;
                Money::new(notional.as_f64() + fee_buffer, notional.currency)
            }
            OrderSide::Sell | OrderSide::NoOrderSide => {
                let base = instrument.base_currency.unwrap_or(notional.currency);
                Money::new(quantity.as_f64(), base)
            }
        }
    }
}

impl Account for CashAccount {
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
        true
    }

    fn is_margin_account(&self) -> bool {
        false
    }

    fn is_betting_account(&self) -> bool {
        false
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

    fn stub_account() -> CashAccount {
        let event = AccountState::new(
            account_id(),
            AccountType::Cash,
            vec![AccountBalance::new(
                Money::new(100_000.0, Currency::USDT()),
                Money::new(0.0, Currency::USDT()),
                Money::new(100_000.0, Currency::USDT()),
            )],
            vec![],
            true,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
            None,
        );
        CashAccount::new(event)
    }

    #[rstest]
    fn test_lock_funds_across_two_instruments_sums_into_one_currency_lock() {
        let mut account = stub_account();
        let eth_usdt = InstrumentId::from("ETHUSDT.BINANCE");

        account.lock_funds(instrument_id_btcusdt(), Money::new(40_000.0, Currency::USDT()));
        account.lock_funds(eth_usdt, Money::new(80.0, Currency::USDT()));

        let balance = account.balance(Some(Currency::USDT())).unwrap();
        assert_eq!(balance.locked.as_f64(), 40_080.0);
        assert_eq!(balance.free.as_f64(), 100_000.0 - 40_080.0);
        assert_eq!(balance.total.as_f64(), 100_000.0);
    }

    #[test]
    fn test_calculate_balance_locked_buy_adds_two_sided_taker_fee_buffer() {
        let mut instrument = InstrumentSpec::new(instrument_id_btcusdt(), Currency::USD());
        instrument.taker_fee = 0.001;
        let locked = CashAccount::calculate_balance_locked(
            &stub_account(),
            &instrument,
            OrderSide::Buy,
            Quantity::new(2.0, 3),
            Price::new(20_000.0, 2),
            false,
        );
        // 2*20000 + 2*20000*0.001*2 = 40080
        assert_eq!(locked.as_f64(), 40_080.0);
        assert_eq!(locked.currency, Currency::USD());
    }

    #[test]
    fn test_unlock_funds_removes_the_instrument_entry_when_fully_released() {
        let mut account = stub_account();
        let btc_usdt = instrument_id_btcusdt();
        account.lock_funds(btc_usdt, Money::new(1_000.0, Currency::USDT()));
        account.unlock_funds(btc_usdt, Money::new(1_000.0, Currency::USDT()));

        assert!(!account.locked_by_instrument.contains_key(&btc_usdt));
        let balance = account.balance(Some(Currency::USDT())).unwrap();
        assert_eq!(balance.locked.as_f64(), 0.0);
        assert_eq!(balance.free.as_f64(), 100_000.0);
    }
}
