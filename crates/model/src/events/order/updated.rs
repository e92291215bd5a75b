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

use quantflow_core::{UUID4, UnixNanos};
use serde::{Deserialize, Serialize};

use crate::{
    identifiers::{
        AccountId, ClientOrderId, InstrumentId, StrategyId, TraderId, VenueOrderId,
    },
    types::{Price, Quantity},
};

/// The venue accepted a modify request: quantity and/or price have changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderUpdated {
    pub trader_id: TraderId,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub account_id: Option<AccountId>,
    pub quantity: Quantity,
    pub price: Option<Price>,
    pub trigger_price: Option<Price>,
    pub event_id: UUID4,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
    pub reconciliation: bool,
}

impl OrderUpdated {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        trader_id: TraderId,
        strategy_id: StrategyId,
        instrument_id: InstrumentId,
        client_order_id: ClientOrderId,
        venue_order_id: Option<VenueOrderId>,
        account_id: Option<AccountId>,
        quantity: Quantity,
        price: Option<Price>,
        trigger_price: Option<Price>,
        event_id: UUID4,
        ts_event: UnixNanos,
        ts_init: UnixNanos,
        reconciliation: bool,
    ) -> Self {
        Self {
            trader_id,
            strategy_id,
            instrument_id,
            client_order_id,
            venue_order_id,
            account_id,
            quantity,
            price,
            trigger_price,
            event_id,
            ts_event,
            ts_init,
            reconciliation,
        }
    }
}
