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

//! Strategy-originated intents the engine dispatches to an [`crate::engine::client::ExecutionClient`].

use quantflow_core::{UUID4, UnixNanos};
use quantflow_model::{
    enums::OrderSide,
    identifiers::{ClientId, ClientOrderId, InstrumentId, StrategyId, TraderId, VenueOrderId},
    orders::{Order, OrderList},
    types::{Price, Quantity},
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug)]
pub struct SubmitOrder {
    pub trader_id: TraderId,
    pub client_id: Option<ClientId>,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub order: Order,
    pub position_id: Option<quantflow_model::identifiers::PositionId>,
    pub command_id: UUID4,
    pub ts_init: UnixNanos,
}

#[derive(Clone, Debug)]
pub struct SubmitOrderList {
    pub trader_id: TraderId,
    pub client_id: Option<ClientId>,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub order_list: OrderList,
    pub position_id: Option<quantflow_model::identifiers::PositionId>,
    pub command_id: UUID4,
    pub ts_init: UnixNanos,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModifyOrder {
    pub trader_id: TraderId,
    pub client_id: Option<ClientId>,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub quantity: Option<Quantity>,
    pub price: Option<Price>,
    pub trigger_price: Option<Price>,
    pub command_id: UUID4,
    pub ts_init: UnixNanos,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CancelOrder {
    pub trader_id: TraderId,
    pub client_id: Option<ClientId>,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub command_id: UUID4,
    pub ts_init: UnixNanos,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CancelAllOrders {
    pub trader_id: TraderId,
    pub client_id: Option<ClientId>,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub order_side: OrderSide,
    pub command_id: UUID4,
    pub ts_init: UnixNanos,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchCancelOrders {
    pub trader_id: TraderId,
    pub client_id: Option<ClientId>,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub cancels: Vec<CancelOrder>,
    pub command_id: UUID4,
    pub ts_init: UnixNanos,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryOrder {
    pub trader_id: TraderId,
    pub client_id: Option<ClientId>,
    pub strategy_id: StrategyId,
    pub instrument_id: InstrumentId,
    pub client_order_id: ClientOrderId,
    pub venue_order_id: Option<VenueOrderId>,
    pub command_id: UUID4,
    pub ts_init: UnixNanos,
}

/// Union of every command the engine dispatches, used where a single inbound channel carries
/// more than one command kind.
#[derive(Clone, Debug)]
pub enum TradingCommand {
    SubmitOrder(SubmitOrder),
    SubmitOrderList(SubmitOrderList),
    ModifyOrder(ModifyOrder),
    CancelOrder(CancelOrder),
    CancelAllOrders(CancelAllOrders),
    BatchCancelOrders(BatchCancelOrders),
    QueryOrder(QueryOrder),
}

impl TradingCommand {
    #[must_use]
    pub fn strategy_id(&self) -> StrategyId {
        match self {
            Self::SubmitOrder(c) => c.strategy_id,
            Self::SubmitOrderList(c) => c.strategy_id,
            Self::ModifyOrder(c) => c.strategy_id,
            Self::CancelOrder(c) => c.strategy_id,
            Self::CancelAllOrders(c) => c.strategy_id,
            Self::BatchCancelOrders(c) => c.strategy_id,
            Self::QueryOrder(c) => c.strategy_id,
        }
    }

    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        match self {
            Self::SubmitOrder(c) => c.instrument_id,
            Self::SubmitOrderList(c) => c.instrument_id,
            Self::ModifyOrder(c) => c.instrument_id,
            Self::CancelOrder(c) => c.instrument_id,
            Self::CancelAllOrders(c) => c.instrument_id,
            Self::BatchCancelOrders(c) => c.instrument_id,
            Self::QueryOrder(c) => c.instrument_id,
        }
    }
}
