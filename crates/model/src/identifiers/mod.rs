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

//! Strongly typed identifiers used throughout the execution core.
//!
//! Every identifier is a thin wrapper around an interned [`Ustr`](ustr::Ustr) (copy, hashable,
//! cheap to pass by value) so that the cache's indexes (`HashMap<Id, ...>`) never pay an
//! allocation for a lookup key.

#[macro_use]
mod macros;

mod account_id;
mod client_id;
mod client_order_id;
mod exec_algorithm_id;
mod instrument_id;
mod order_list_id;
mod position_id;
mod strategy_id;
mod symbol;
mod trade_id;
mod trader_id;
mod venue;
mod venue_order_id;

pub use account_id::AccountId;
pub use client_id::ClientId;
pub use client_order_id::ClientOrderId;
pub use exec_algorithm_id::ExecAlgorithmId;
pub use instrument_id::InstrumentId;
pub use order_list_id::OrderListId;
pub use position_id::PositionId;
pub use strategy_id::StrategyId;
pub use symbol::Symbol;
pub use trade_id::TradeId;
pub use trader_id::TraderId;
pub use venue::Venue;
pub use venue_order_id::VenueOrderId;

#[cfg(any(test, feature = "stubs"))]
pub mod stubs {
    use quantflow_core::UUID4;

    use super::*;

    #[must_use]
    pub fn trader_id() -> TraderId {
        TraderId::new("TRADER-001")
    }

    #[must_use]
    pub fn strategy_id() -> StrategyId {
        StrategyId::new("S-001")
    }

    #[must_use]
    pub fn account_id() -> AccountId {
        AccountId::new("SIM-001")
    }

    #[must_use]
    pub fn instrument_id_btcusdt() -> InstrumentId {
        InstrumentId::from("BTCUSDT.BINANCE")
    }

    #[must_use]
    pub fn uuid4() -> UUID4 {
        UUID4::new()
    }
}
