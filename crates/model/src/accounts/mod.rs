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

//! Account ledger: cash, margin and betting account variants sharing a [`BaseAccount`] and a
//! common [`Account`] trait, plus the balance recalculation rules each account type applies after
//! every fill or lock/unlock.

pub mod any;
pub mod base;
pub mod betting;
pub mod cash;
pub mod margin;

pub use any::AccountAny;
pub use base::BaseAccount;
pub use betting::BettingAccount;
pub use cash::CashAccount;
pub use margin::MarginAccount;

use std::collections::HashMap;

use crate::{
    enums::AccountType,
    events::AccountState,
    identifiers::AccountId,
    types::{AccountBalance, Currency, Money},
};

/// Raised by a margin recalculation that would otherwise drive `free` negative.
///
/// Recoverable: the account's `free` balance for `currency` is clamped to zero and the balance
/// snapshot is still updated, so the ledger never observes a negative `free`. Callers (typically
/// the execution engine) decide whether to reject the order that triggered the recalculation,
/// liquidate, or otherwise react; the account itself does not block on this condition.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("margin exceeded for {currency}: shortfall of {shortfall}")]
pub struct MarginExceeded {
    pub currency: Currency,
    pub shortfall: Money,
}

/// Common read/write surface shared by [`CashAccount`], [`MarginAccount`] and [`BettingAccount`].
pub trait Account {
    fn id(&self) -> AccountId;
    fn account_type(&self) -> AccountType;
    fn base_currency(&self) -> Option<Currency>;
    fn is_cash_account(&self) -> bool;
    fn is_margin_account(&self) -> bool;
    fn is_betting_account(&self) -> bool;
    fn balance(&self, currency: Option<Currency>) -> Option<&AccountBalance>;
    fn balance_total(&self, currency: Option<Currency>) -> Option<Money>;
    fn balances_total(&self) -> HashMap<Currency, Money>;
    fn balance_free(&self, currency: Option<Currency>) -> Option<Money>;
    fn balances_free(&self) -> HashMap<Currency, Money>;
    fn balance_locked(&self, currency: Option<Currency>) -> Option<Money>;
    fn balances_locked(&self) -> HashMap<Currency, Money>;
    fn balances(&self) -> HashMap<Currency, AccountBalance>;
    fn starting_balances(&self) -> HashMap<Currency, Money>;
    fn last_event(&self) -> Option<AccountState>;
    fn events(&self) -> &[AccountState];
    fn apply(&mut self, event: AccountState);
    fn update_commissions(&mut self, commission: Money);
    fn purge_account_events(&mut self, ts_now: quantflow_core::UnixNanos, lookback_secs: u64);
}
