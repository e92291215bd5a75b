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

//! Order lifecycle events, published on the message bus and replayed into an [`Order`]'s event
//! log by [`Order::apply`](crate::orders::Order::apply).

mod accepted;
mod canceled;
mod expired;
mod filled;
mod initialized;
mod modify_rejected;
mod pending_cancel;
mod pending_update;
mod rejected;
mod submitted;
mod triggered;
mod updated;

pub use accepted::OrderAccepted;
pub use canceled::OrderCanceled;
pub use expired::OrderExpired;
pub use filled::OrderFilled;
pub use initialized::OrderInitialized;
pub use modify_rejected::OrderModifyRejected;
pub use pending_cancel::OrderPendingCancel;
pub use pending_update::OrderPendingUpdate;
pub use rejected::OrderRejected;
pub use submitted::OrderSubmitted;
pub use triggered::OrderTriggered;
pub use updated::OrderUpdated;

use quantflow_core::{UUID4, UnixNanos};

use crate::identifiers::{ClientOrderId, InstrumentId, StrategyId, TraderId};

/// Union of every concrete order event, dispatched by [`Order::apply`](crate::orders::Order::apply)
/// to drive the order's status state machine.
#[derive(Clone, Debug, PartialEq)]
pub enum OrderEventAny {
    Initialized(OrderInitialized),
    Submitted(OrderSubmitted),
    Accepted(OrderAccepted),
    Rejected(OrderRejected),
    Canceled(OrderCanceled),
    Expired(OrderExpired),
    Triggered(OrderTriggered),
    PendingUpdate(OrderPendingUpdate),
    PendingCancel(OrderPendingCancel),
    ModifyRejected(OrderModifyRejected),
    Updated(OrderUpdated),
    Filled(OrderFilled),
}

impl OrderEventAny {
    #[must_use]
    pub fn client_order_id(&self) -> ClientOrderId {
        match self {
            Self::Initialized(e) => e.client_order_id,
            Self::Submitted(e) => e.client_order_id,
            Self::Accepted(e) => e.client_order_id,
            Self::Rejected(e) => e.client_order_id,
            Self::Canceled(e) => e.client_order_id,
            Self::Expired(e) => e.client_order_id,
            Self::Triggered(e) => e.client_order_id,
            Self::PendingUpdate(e) => e.client_order_id,
            Self::PendingCancel(e) => e.client_order_id,
            Self::ModifyRejected(e) => e.client_order_id,
            Self::Updated(e) => e.client_order_id,
            Self::Filled(e) => e.client_order_id,
        }
    }

    #[must_use]
    pub fn strategy_id(&self) -> StrategyId {
        match self {
            Self::Initialized(e) => e.strategy_id,
            Self::Submitted(e) => e.strategy_id,
            Self::Accepted(e) => e.strategy_id,
            Self::Rejected(e) => e.strategy_id,
            Self::Canceled(e) => e.strategy_id,
            Self::Expired(e) => e.strategy_id,
            Self::Triggered(e) => e.strategy_id,
            Self::PendingUpdate(e) => e.strategy_id,
            Self::PendingCancel(e) => e.strategy_id,
            Self::ModifyRejected(e) => e.strategy_id,
            Self::Updated(e) => e.strategy_id,
            Self::Filled(e) => e.strategy_id,
        }
    }

    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        match self {
            Self::Initialized(e) => e.instrument_id,
            Self::Submitted(e) => e.instrument_id,
            Self::Accepted(e) => e.instrument_id,
            Self::Rejected(e) => e.instrument_id,
            Self::Canceled(e) => e.instrument_id,
            Self::Expired(e) => e.instrument_id,
            Self::Triggered(e) => e.instrument_id,
            Self::PendingUpdate(e) => e.instrument_id,
            Self::PendingCancel(e) => e.instrument_id,
            Self::ModifyRejected(e) => e.instrument_id,
            Self::Updated(e) => e.instrument_id,
            Self::Filled(e) => e.instrument_id,
        }
    }

    #[must_use]
    pub fn ts_event(&self) -> UnixNanos {
        match self {
            Self::Initialized(e) => e.ts_event,
            Self::Submitted(e) => e.ts_event,
            Self::Accepted(e) => e.ts_event,
            Self::Rejected(e) => e.ts_event,
            Self::Canceled(e) => e.ts_event,
            Self::Expired(e) => e.ts_event,
            Self::Triggered(e) => e.ts_event,
            Self::PendingUpdate(e) => e.ts_event,
            Self::PendingCancel(e) => e.ts_event,
            Self::ModifyRejected(e) => e.ts_event,
            Self::Updated(e) => e.ts_event,
            Self::Filled(e) => e.ts_event,
        }
    }
}
