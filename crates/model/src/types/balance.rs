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

//! Per-currency balance snapshots held by an [`Account`](crate::accounts::Account).

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use super::money::Money;
use crate::identifiers::InstrumentId;

/// A total/locked/free balance in a single currency.
///
/// `free = total - locked` is an invariant maintained by the account, not recomputed lazily, so
/// that `locked` always reflects the sum of the instrument-level holds in effect.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub total: Money,
    pub locked: Money,
    pub free: Money,
}

impl AccountBalance {
    /// Creates a new [`AccountBalance`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `total`, `locked` and `free` are not all denominated in the same currency, or if
    /// `total != locked + free`.
    #[must_use]
    pub fn new(total: Money, locked: Money, free: Money) -> Self {
        assert_eq!(total.currency, locked.currency);
        assert_eq!(total.currency, free.currency);
        assert_eq!(
            total.raw(),
            locked.raw() + free.raw(),
            "total must equal locked + free"
        );
        Self {
            total,
            locked,
            free,
        }
    }
}

impl Display for AccountBalance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AccountBalance(total={}, locked={}, free={})",
            self.total, self.locked, self.free
        )
    }
}

/// A margin hold against a single instrument, split between initial and maintenance margin.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarginBalance {
    pub initial: Money,
    pub maintenance: Money,
    pub instrument_id: InstrumentId,
}

impl MarginBalance {
    /// Creates a new [`MarginBalance`] instance.
    ///
    /// # Panics
    ///
    /// Panics if `initial` and `maintenance` are not denominated in the same currency.
    #[must_use]
    pub fn new(initial: Money, maintenance: Money, instrument_id: InstrumentId) -> Self {
        assert_eq!(initial.currency, maintenance.currency);
        Self {
            initial,
            maintenance,
            instrument_id,
        }
    }
}

impl Display for MarginBalance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MarginBalance(initial={}, maintenance={}, instrument_id={})",
            self.initial, self.maintenance, self.instrument_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::currency::Currency;

    #[test]
    fn test_account_balance_invariant_holds() {
        let total = Money::new(1000.0, Currency::USD());
        let locked = Money::new(200.0, Currency::USD());
        let free = Money::new(800.0, Currency::USD());
        let balance = AccountBalance::new(total, locked, free);
        assert_eq!(balance.free.as_f64(), 800.0);
    }

    #[test]
    #[should_panic(expected = "total must equal locked + free")]
    fn test_account_balance_rejects_inconsistent_split() {
        let total = Money::new(1000.0, Currency::USD());
        let locked = Money::new(200.0, Currency::USD());
        let free = Money::new(900.0, Currency::USD());
        let _ = AccountBalance::new(total, locked, free);
    }
}
