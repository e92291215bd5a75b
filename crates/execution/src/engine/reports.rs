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

//! Report objects an [`crate::engine::client::ExecutionClient`] hands back to the engine during
//! reconciliation: venue truth the engine aligns its local view against.

use std::collections::HashMap;

use quantflow_core::UnixNanos;
use quantflow_model::{
    enums::{LiquiditySide, OrderSide, OrderStatus, OrderType, PositionSide},
    identifiers::{AccountId, ClientId, ClientOrderId, InstrumentId, VenueOrderId},
    types::{Money, Price, Quantity},
};

/// The venue's current view of a single order.
///
/// `client_order_id` is `None` when the venue knows an order the engine never submitted itself
/// (placed directly on the venue, or from a prior process instance); reconciliation synthesizes
/// a local order for these from the remaining fields.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderStatusReport {
    pub instrument_id: InstrumentId,
    pub client_order_id: Option<ClientOrderId>,
    pub venue_order_id: VenueOrderId,
    pub order_side: OrderSide,
    pub order_type: OrderType,
    pub quantity: Quantity,
    pub status: OrderStatus,
    pub filled_qty: Quantity,
    pub ts_init: UnixNanos,
}

/// A single execution the venue reports, independent of whether the engine already knows it.
#[derive(Clone, Debug, PartialEq)]
pub struct FillReport {
    pub instrument_id: InstrumentId,
    pub client_order_id: Option<ClientOrderId>,
    pub venue_order_id: VenueOrderId,
    pub execution_id: quantflow_model::identifiers::TradeId,
    pub order_side: OrderSide,
    pub last_qty: Quantity,
    pub last_px: Price,
    pub commission: Option<Money>,
    pub liquidity_side: LiquiditySide,
    pub ts_event: UnixNanos,
    pub ts_init: UnixNanos,
}

/// The venue's current view of a single position.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionStatusReport {
    pub instrument_id: InstrumentId,
    pub side: PositionSide,
    pub quantity: Quantity,
    pub ts_init: UnixNanos,
}

/// A full snapshot of venue-side state for one client, used to reconcile the cache in bulk on
/// startup or after a connectivity gap.
#[derive(Clone, Debug, PartialEq)]
pub struct ExecutionMassStatus {
    pub client_id: ClientId,
    pub account_id: AccountId,
    pub ts_init: UnixNanos,
    pub order_reports: HashMap<VenueOrderId, OrderStatusReport>,
    pub fill_reports: HashMap<VenueOrderId, Vec<FillReport>>,
    pub position_reports: HashMap<InstrumentId, PositionStatusReport>,
}

impl ExecutionMassStatus {
    #[must_use]
    pub fn new(client_id: ClientId, account_id: AccountId, ts_init: UnixNanos) -> Self {
        Self {
            client_id,
            account_id,
            ts_init,
            order_reports: HashMap::new(),
            fill_reports: HashMap::new(),
            position_reports: HashMap::new(),
        }
    }
}
