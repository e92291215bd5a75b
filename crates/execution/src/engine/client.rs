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

//! The boundary between the engine and a venue. Implementations talk to a real venue over a
//! socket/HTTP adapter (out of scope here) or, in tests, a stub that records calls and returns
//! canned results.
//!
//! Every method returns success/failure synchronously (the command was or was not accepted for
//! processing); the outcomes that follow from venue processing — fills, rejections, status
//! changes — always arrive later as events the engine applies through its normal event handling.

use quantflow_model::identifiers::{ClientOrderId, InstrumentId, VenueOrderId};

use crate::engine::{
    commands::{
        BatchCancelOrders, CancelAllOrders, CancelOrder, ModifyOrder, QueryOrder, SubmitOrder,
        SubmitOrderList,
    },
    reports::{ExecutionMassStatus, FillReport, OrderStatusReport, PositionStatusReport},
};

/// A venue-facing execution adapter.
pub trait ExecutionClient {
    fn submit_order(&mut self, command: &SubmitOrder) -> anyhow::Result<()>;
    fn submit_order_list(&mut self, command: &SubmitOrderList) -> anyhow::Result<()>;
    fn modify_order(&mut self, command: &ModifyOrder) -> anyhow::Result<()>;
    fn cancel_order(&mut self, command: &CancelOrder) -> anyhow::Result<()>;
    fn cancel_all_orders(&mut self, command: &CancelAllOrders) -> anyhow::Result<()>;
    fn batch_cancel_orders(&mut self, command: &BatchCancelOrders) -> anyhow::Result<()>;
    fn query_order(&mut self, command: &QueryOrder) -> anyhow::Result<()>;

    /// Requests the venue's current view of `client_order_id` (or every open order on
    /// `instrument_id` when `client_order_id` is `None`).
    fn generate_order_status_report(
        &self,
        instrument_id: InstrumentId,
        client_order_id: Option<ClientOrderId>,
        venue_order_id: Option<VenueOrderId>,
    ) -> anyhow::Result<Option<OrderStatusReport>>;

    fn generate_order_status_reports(
        &self,
        instrument_id: Option<InstrumentId>,
    ) -> anyhow::Result<Vec<OrderStatusReport>>;

    fn generate_fill_reports(
        &self,
        instrument_id: Option<InstrumentId>,
    ) -> anyhow::Result<Vec<FillReport>>;

    fn generate_position_status_reports(
        &self,
        instrument_id: Option<InstrumentId>,
    ) -> anyhow::Result<Vec<PositionStatusReport>>;

    /// A full venue-side snapshot, used for bulk reconciliation on startup or after a gap.
    fn generate_mass_status(&self) -> anyhow::Result<ExecutionMassStatus>;
}
