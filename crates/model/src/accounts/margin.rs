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

//! Margin accounts post initial/maintenance margin per instrument and leverage notional exposure
//! against a single cash balance.
//!
//! Unlike a plain balance shortfall, a margin balance exceeding the account's total is a routine,
//! recoverable condition (the caller typically rejects the order, reduces leverage, or issues a
//! margin call) rather than a programming error: [`MarginAccount::recalculate_balance`] clamps
//! `free` to zero and reports [`MarginExceeded`] instead of panicking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    accounts::{Account, MarginExceeded, base::BaseAccount},
    enums::AccountType,
    events::AccountState,
    identifiers::{AccountId, InstrumentId},
    types::{AccountBalance, Currency, InstrumentSpec, MarginBalance, Money, Price, Quantity},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginAccount {
    pub base: BaseAccount,
    pub leverages: HashMap<InstrumentId, f64>,
    pub margins: HashMap<InstrumentId, MarginBalance>,
    pub default_leverage: f64,
}

impl MarginAccount {
    #[must_use]
    pub fn new(event: AccountState, default_leverage: f64) -> Self {
        Self {
            base: BaseAccount::new(event),
            leverages: HashMap::new(),
            margins: HashMap::new(),
            default_leverage,
        }
    }

    pub fn set_default_leverage(&mut self, leverage: f64) {
        self.default_leverage = leverage;
    }

    pub fn set_leverage(&mut self, instrument_id: InstrumentId, leverage: f64) {
        self.leverages.insert(instrument_id, leverage);
    }

    #[must_use]
    pub fn get_leverage(&self, instrument_id: &InstrumentId) -> f64 {
        *self
            .leverages
            .get(instrument_id)
            .unwrap_or(&self.default_leverage)
    }

    #[must_use]
    pub fn is_unleveraged(&self, instrument_id: InstrumentId) -> bool {
        self.get_leverage(&instrument_id) == 1.0
    }

    #[must_use]
    pub fn initial_margins(&self) -> HashMap<InstrumentId, Money> {
        self.margins
            .values()
            .map(|m| (m.instrument_id, m.initial))
            .collect()
    }

    #[must_use]
    pub fn maintenance_margins(&self) -> HashMap<InstrumentId, Money> {
        self.margins
            .values()
            .map(|m| (m.instrument_id, m.maintenance))
            .collect()
    }

    /// Sets the initial margin posted for `instrument_id` and recalculates the account's free
    /// balance in that margin's currency, returning a [`MarginExceeded`] if it would go negative.
    pub fn update_initial_margin(
        &mut self,
        instrument_id: InstrumentId,
        margin_init: Money,
    ) -> Result<(), MarginExceeded> {
        self.upsert_margin(instrument_id, margin_init, None);
        self.recalculate_balance(margin_init.currency)
    }

    pub fn update_maintenance_margin(
        &mut self,
        instrument_id: InstrumentId,
        margin_maint: Money,
    ) -> Result<(), MarginExceeded> {
        self.upsert_margin(instrument_id, margin_maint, Some(()));
        self.recalculate_balance(margin_maint.currency)
    }

    fn upsert_margin(
        &mut self,
        instrument_id: InstrumentId,
        amount: Money,
        maintenance: Option<()>,
    ) {
        let entry = self.margins.entry(instrument_id).or_insert_with(|| {
            MarginBalance::new(
                Money::zero(amount.currency),
                Money::zero(amount.currency),
                instrument_id,
            )
        });
        if maintenance.is_some() {
            entry.maintenance = amount;
        } else {
            entry.initial = amount;
        }
    }

    fn leverage_for(&mut self, instrument_id: InstrumentId) -> f64 {
        let leverage = self.get_leverage(&instrument_id);
        if leverage == 0.0 {
            self.leverages.insert(instrument_id, self.default_leverage);
            self.default_leverage
        } else {
            leverage
        }
    }

    #[must_use]
    pub fn calculate_initial_margin(
        &mut self,
        instrument: &InstrumentSpec,
        quantity: Quantity,
        price: Price,
        use_quote_for_inverse: Option<bool>,
    ) -> Money {
        let notional =
            instrument.calculate_notional_value(quantity, price, use_quote_for_inverse);
        let leverage = self.leverage_for(instrument.instrument_id);
        let adjusted_notional = notional.as_f64() / leverage;
        let margin = adjusted_notional * instrument.margin_init
            + adjusted_notional * instrument.taker_fee * 2.0;
        Money::new(margin, notional.currency)
    }

    #[must_use]
    pub fn calculate_maintenance_margin(
        &mut self,
        instrument: &InstrumentSpec,
        quantity: Quantity,
        price: Price,
        use_quote_for_inverse: Option<bool>,
    ) -> Money {
        let notional =
            instrument.calculate_notional_value(quantity, price, use_quote_for_inverse);
        let leverage = self.leverage_for(instrument.instrument_id);
        let adjusted_notional = notional.as_f64() / leverage;
        let margin = adjusted_notional * instrument.margin_maint
            + adjusted_notional * instrument.taker_fee;
        Money::new(margin, notional.currency)
    }

    /// Recomputes `locked`/`free` for `currency` from the sum of every posted initial and
    /// maintenance margin denominated in it.
    ///
    /// `free` is clamped to zero rather than allowed to go negative: the balance is always
    /// updated (the account's reported margin usage is kept accurate even when it's oversized),
    /// but a negative result is reported back as a [`MarginExceeded`] instead of panicking, so the
    /// caller can reject the triggering order, demand more collateral, or liquidate.
    pub fn recalculate_balance(&mut self, currency: Currency) -> Result<(), MarginExceeded> {
        let Some(current) = self.base.balances.get(&currency).copied() else {
            return Ok(());
        };

        let total_margin: f64 = self
            .margins
            .values()
            .filter(|m| m.currency == currency)
            .map(|m| m.initial.as_f64() + m.maintenance.as_f64())
            .sum();

        let raw_free = current.total.as_f64() - total_margin;
        let free = raw_free.max(0.0);

        let new_balance = AccountBalance::new(
            current.total,
            Money::new(total_margin, currency),
            Money::new(free, currency),
        );
        self.base.balances.insert(currency, new_balance);

        if raw_free < 0.0 {
            return Err(MarginExceeded {
                currency,
                shortfall: Money::new(-raw_free, currency),
            });
        }
        Ok(())
    }
}

impl Account for MarginAccount {
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
        true
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

    fn stub_account(total: f64) -> MarginAccount {
        let event = AccountState::new(
            account_id(),
            AccountType::Margin,
            vec![AccountBalance::new(
                Money::new(total, Currency::USDT()),
                Money::new(0.0, Currency::USDT()),
                Money::new(total, Currency::USDT()),
            )],
            vec![],
            true,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
            None,
        );
        MarginAccount::new(event, 1.0)
    }

    #[rstest]
    fn test_recalculate_balance_within_total_succeeds() {
        let mut account = stub_account(1_000.0);
        let result = account.update_initial_margin(
            instrument_id_btcusdt(),
            Money::new(400.0, Currency::USDT()),
        );
        assert!(result.is_ok());
        let balance = account.balance(Some(Currency::USDT())).unwrap();
        assert_eq!(balance.locked.as_f64(), 400.0);
        assert_eq!(balance.free.as_f64(), 600.0);
    }

    #[rstest]
    fn test_margin_exceeding_total_clamps_free_and_reports_error() {
        let mut account = stub_account(1_000.0);
        account
            .update_initial_margin(instrument_id_btcusdt(), Money::new(700.0, Currency::USDT()))
            .unwrap();

        let other_instrument = InstrumentId::from("ETHUSDT.BINANCE");
        let result =
            account.update_initial_margin(other_instrument, Money::new(500.0, Currency::USDT()));

        let err = result.unwrap_err();
        assert_eq!(err.currency, Currency::USDT());
        assert_eq!(err.shortfall.as_f64(), 200.0);

        let balance = account.balance(Some(Currency::USDT())).unwrap();
        assert_eq!(balance.locked.as_f64(), 1_200.0);
        assert_eq!(balance.free.as_f64(), 0.0);
        assert_eq!(balance.total.as_f64(), 1_000.0);
    }
}
