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

//! A stub [`ExecutionClient`] for driving an [`ExecutionEngine`](quantflow_execution::engine::ExecutionEngine)
//! in tests without a real venue adapter.

use std::cell::RefCell;

use quantflow_execution::engine::{
    client::ExecutionClient,
    commands::{
        BatchCancelOrders, CancelAllOrders, CancelOrder, ModifyOrder, QueryOrder, SubmitOrder,
        SubmitOrderList,
    },
    reports::{ExecutionMassStatus, FillReport, OrderStatusReport, PositionStatusReport},
};
use quantflow_model::identifiers::{AccountId, ClientId, ClientOrderId, InstrumentId, VenueOrderId};

/// Every command the stub has seen, in arrival order, for assertion in tests.
#[derive(Clone, Debug)]
pub enum RecordedCommand {
    SubmitOrder(SubmitOrder),
    SubmitOrderList(SubmitOrderList),
    ModifyOrder(ModifyOrder),
    CancelOrder(CancelOrder),
    CancelAllOrders(CancelAllOrders),
    BatchCancelOrders(BatchCancelOrders),
    QueryOrder(QueryOrder),
}

/// Records every command it receives and always reports success, never touching a venue.
///
/// Canned report responses can be preloaded through `set_mass_status` and friends before handing
/// the client to an engine; by default they are all empty.
pub struct StubExecutionClient {
    client_id: ClientId,
    account_id: AccountId,
    commands: RefCell<Vec<RecordedCommand>>,
    mass_status: Option<ExecutionMassStatus>,
    order_status_reports: Vec<OrderStatusReport>,
    fill_reports: Vec<FillReport>,
    position_status_reports: Vec<PositionStatusReport>,
}

impl StubExecutionClient {
    #[must_use]
    pub fn new(client_id: ClientId, account_id: AccountId) -> Self {
        Self {
            client_id,
            account_id,
            commands: RefCell::new(Vec::new()),
            mass_status: None,
            order_status_reports: Vec::new(),
            fill_reports: Vec::new(),
            position_status_reports: Vec::new(),
        }
    }

    #[must_use]
    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    #[must_use]
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    #[must_use]
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.commands.borrow().clone()
    }

    pub fn set_mass_status(&mut self, status: ExecutionMassStatus) {
        self.mass_status = Some(status);
    }

    pub fn push_order_status_report(&mut self, report: OrderStatusReport) {
        self.order_status_reports.push(report);
    }

    pub fn push_fill_report(&mut self, report: FillReport) {
        self.fill_reports.push(report);
    }

    pub fn push_position_status_report(&mut self, report: PositionStatusReport) {
        self.position_status_reports.push(report);
    }
}

impl ExecutionClient for StubExecutionClient {
    fn submit_order(&mut self, command: &SubmitOrder) -> anyhow::Result<()> {
        self.commands
            .borrow_mut()
            .push(RecordedCommand::SubmitOrder(command.clone()));
        Ok(())
    }

    fn submit_order_list(&mut self, command: &SubmitOrderList) -> anyhow::Result<()> {
        self.commands
            .borrow_mut()
            .push(RecordedCommand::SubmitOrderList(command.clone()));
        Ok(())
    }

    fn modify_order(&mut self, command: &ModifyOrder) -> anyhow::Result<()> {
        self.commands
            .borrow_mut()
            .push(RecordedCommand::ModifyOrder(command.clone()));
        Ok(())
    }

    fn cancel_order(&mut self, command: &CancelOrder) -> anyhow::Result<()> {
        self.commands
            .borrow_mut()
            .push(RecordedCommand::CancelOrder(command.clone()));
        Ok(())
    }

    fn cancel_all_orders(&mut self, command: &CancelAllOrders) -> anyhow::Result<()> {
        self.commands
            .borrow_mut()
            .push(RecordedCommand::CancelAllOrders(command.clone()));
        Ok(())
    }

    fn batch_cancel_orders(&mut self, command: &BatchCancelOrders) -> anyhow::Result<()> {
        self.commands
            .borrow_mut()
            .push(RecordedCommand::BatchCancelOrders(command.clone()));
        Ok(())
    }

    fn query_order(&mut self, command: &QueryOrder) -> anyhow::Result<()> {
        self.commands
            .borrow_mut()
            .push(RecordedCommand::QueryOrder(command.clone()));
        Ok(())
    }

    fn generate_order_status_report(
        &self,
        _instrument_id: InstrumentId,
        client_order_id: Option<ClientOrderId>,
        venue_order_id: Option<VenueOrderId>,
    ) -> anyhow::Result<Option<OrderStatusReport>> {
        Ok(self
            .order_status_reports
            .iter()
            .find(|r| {
                client_order_id.is_none_or(|id| r.client_order_id == Some(id))
                    && venue_order_id.is_none_or(|id| r.venue_order_id == id)
            })
            .cloned())
    }

    fn generate_order_status_reports(
        &self,
        _instrument_id: Option<InstrumentId>,
    ) -> anyhow::Result<Vec<OrderStatusReport>> {
        Ok(self.order_status_reports.clone())
    }

    fn generate_fill_reports(
        &self,
        _instrument_id: Option<InstrumentId>,
    ) -> anyhow::Result<Vec<FillReport>> {
        Ok(self.fill_reports.clone())
    }

    fn generate_position_status_reports(
        &self,
        _instrument_id: Option<InstrumentId>,
    ) -> anyhow::Result<Vec<PositionStatusReport>> {
        Ok(self.position_status_reports.clone())
    }

    fn generate_mass_status(&self) -> anyhow::Result<ExecutionMassStatus> {
        self.mass_status
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no mass status preloaded on stub client"))
    }
}

#[cfg(test)]
mod tests {
    use quantflow_core::{UUID4, UnixNanos};

    use super::*;

    fn submit(command_id: UUID4) -> SubmitOrder {
        use quantflow_model::{
            enums::{OmsType, OrderSide, OrderType, TimeInForce},
            events::order::OrderInitialized,
            identifiers::stubs::{instrument_id_btcusdt, strategy_id, trader_id},
            orders::Order,
            types::Quantity,
        };

        SubmitOrder {
            trader_id: trader_id(),
            client_id: None,
            strategy_id: strategy_id(),
            instrument_id: instrument_id_btcusdt(),
            order: Order::new(OrderInitialized::new(
                trader_id(),
                strategy_id(),
                instrument_id_btcusdt(),
                ClientOrderId::new("O-1"),
                OrderSide::Buy,
                OrderType::Market,
                Quantity::new(1.0, 3),
                None,
                None,
                TimeInForce::Gtc,
                OmsType::Netting,
                false,
                UUID4::new(),
                UnixNanos::default(),
                UnixNanos::default(),
            )),
            position_id: None,
            command_id,
            ts_init: UnixNanos::default(),
        }
    }

    #[test]
    fn test_submit_order_is_recorded_and_succeeds() {
        let mut client = StubExecutionClient::new(ClientId::new("SIM"), AccountId::new("SIM-001"));
        let command = submit(UUID4::new());

        client.submit_order(&command).unwrap();

        assert_eq!(client.commands().len(), 1);
        assert!(matches!(
            client.commands()[0],
            RecordedCommand::SubmitOrder(_)
        ));
    }

    #[test]
    fn test_mass_status_errors_until_preloaded() {
        let mut client = StubExecutionClient::new(ClientId::new("SIM"), AccountId::new("SIM-001"));
        assert!(client.generate_mass_status().is_err());

        client.set_mass_status(ExecutionMassStatus::new(
            client.client_id(),
            client.account_id(),
            UnixNanos::default(),
        ));

        assert!(client.generate_mass_status().is_ok());
    }
}
