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

//! The execution engine: dispatches strategy commands to venue clients, applies venue events to
//! cached orders and positions, and keeps the account ledger in step with every fill.

pub mod client;
pub mod commands;
pub mod config;
pub mod reports;

use std::collections::HashMap;

use quantflow_common::cache::{Cache, CacheError};
use quantflow_core::{Clock, UUID4, UnixNanos};
use quantflow_model::{
    accounts::{Account, AccountAny, BettingAccount},
    enums::{BetSide, ComponentState, ContingencyType, LiquiditySide, OmsType, OrderSide, TimeInForce},
    events::{
        AccountState, OrderCanceled, OrderEventAny, OrderFilled, OrderInitialized, OrderRejected,
        OrderSubmitted, PositionChanged, PositionClosed, PositionEventAny, PositionOpened,
        order::OrderAccepted,
    },
    identifiers::{ClientId, ClientOrderId, InstrumentId, PositionId, StrategyId, Venue, VenueOrderId},
    orders::Order,
    position::{Position, PositionDelta},
    types::{AccountBalance, InstrumentSpec, Money},
};
use quantflow_common::msgbus::MessageBus;
use thiserror::Error;

use crate::{
    accounting::{calculate_commission, calculate_pnls},
    engine::{
        client::ExecutionClient,
        commands::{
            BatchCancelOrders, CancelAllOrders, CancelOrder, ModifyOrder, QueryOrder, SubmitOrder,
            SubmitOrderList, TradingCommand,
        },
        config::ExecutionEngineConfig,
        reports::{ExecutionMassStatus, FillReport, OrderStatusReport},
    },
};

/// Errors the engine itself raises, distinct from whatever the venue or cache reports back.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine is not running (state is {0:?})")]
    NotRunning(ComponentState),
    #[error("order {0} not found in the cache")]
    OrderNotFound(ClientOrderId),
    #[error("no execution client registered for {0:?}")]
    NoClient(Option<ClientId>),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Apply(#[from] anyhow::Error),
}

/// Dispatches strategy commands to venue clients and applies venue events to the cache,
/// publishing order and position lifecycle events as it goes.
///
/// Single-threaded: every public method runs to completion before the next call is accepted,
/// matching the cooperative event loop this engine is driven from.
pub struct ExecutionEngine {
    pub config: ExecutionEngineConfig,
    state: ComponentState,
    clock: Box<dyn Clock>,
    cache: Cache,
    bus: MessageBus,
    clients: HashMap<ClientId, Box<dyn ExecutionClient>>,
    routing: HashMap<Venue, ClientId>,
    instruments: HashMap<InstrumentId, InstrumentSpec>,
    oms_overrides: HashMap<StrategyId, OmsType>,
    venue_oms: HashMap<Venue, OmsType>,
    order_lists: HashMap<quantflow_model::identifiers::OrderListId, Vec<ClientOrderId>>,
    /// The currently-open netted position id per (instrument, strategy), so a fill arriving
    /// after a position fully closes opens a fresh position rather than reapplying to the
    /// closed one.
    netting_positions: HashMap<(InstrumentId, StrategyId), PositionId>,
    /// Counts orders synthesized during reconciliation, to mint `RECON-N` client order IDs.
    recon_counter: u64,
}

impl ExecutionEngine {
    #[must_use]
    pub fn new(
        config: ExecutionEngineConfig,
        clock: Box<dyn Clock>,
        cache: Cache,
        bus: MessageBus,
    ) -> Self {
        Self {
            config,
            state: ComponentState::PreInitialized,
            clock,
            cache,
            bus,
            clients: HashMap::new(),
            routing: HashMap::new(),
            instruments: HashMap::new(),
            oms_overrides: HashMap::new(),
            venue_oms: HashMap::new(),
            order_lists: HashMap::new(),
            netting_positions: HashMap::new(),
            recon_counter: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> ComponentState {
        self.state
    }

    #[must_use]
    pub const fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn register_client(&mut self, client_id: ClientId, client: Box<dyn ExecutionClient>) {
        self.clients.insert(client_id, client);
    }

    pub fn register_venue_routing(&mut self, venue: Venue, client_id: ClientId) {
        self.routing.insert(venue, client_id);
    }

    pub fn add_instrument(&mut self, instrument: InstrumentSpec) {
        self.instruments.insert(instrument.instrument_id, instrument);
    }

    pub fn set_oms_override(&mut self, strategy_id: StrategyId, oms_type: OmsType) {
        self.oms_overrides.insert(strategy_id, oms_type);
    }

    pub fn set_venue_oms(&mut self, venue: Venue, oms_type: OmsType) {
        self.venue_oms.insert(venue, oms_type);
    }

    // -- LIFECYCLE -----------------------------------------------------------------------------

    pub fn start(&mut self) {
        tracing::debug!(?self.state, "starting execution engine");
        self.state = ComponentState::Running;
    }

    pub fn stop(&mut self) {
        tracing::debug!(?self.state, "stopping execution engine");
        self.state = ComponentState::Stopped;
    }

    pub fn dispose(&mut self) {
        self.state = ComponentState::Disposed;
    }

    fn require_running(&self) -> Result<(), EngineError> {
        if self.state == ComponentState::Running {
            Ok(())
        } else {
            Err(EngineError::NotRunning(self.state))
        }
    }

    fn client_for(&mut self, client_id: Option<ClientId>, venue: Venue) -> Result<&mut Box<dyn ExecutionClient>, EngineError> {
        let resolved = client_id.or_else(|| self.routing.get(&venue).copied());
        let resolved = resolved.ok_or(EngineError::NoClient(client_id))?;
        self.clients
            .get_mut(&resolved)
            .ok_or(EngineError::NoClient(Some(resolved)))
    }

    // -- COMMAND DISPATCH ------------------------------------------------------------------------

    /// Routes a single command to its handler, rejecting it outright if the engine isn't running.
    pub fn execute(&mut self, command: TradingCommand) -> Result<(), EngineError> {
        self.require_running()?;
        match command {
            TradingCommand::SubmitOrder(c) => self.handle_submit_order(&c),
            TradingCommand::SubmitOrderList(c) => self.handle_submit_order_list(&c),
            TradingCommand::ModifyOrder(c) => self.handle_modify_order(&c),
            TradingCommand::CancelOrder(c) => self.handle_cancel_order(&c),
            TradingCommand::CancelAllOrders(c) => self.handle_cancel_all_orders(&c),
            TradingCommand::BatchCancelOrders(c) => self.handle_batch_cancel_orders(&c),
            TradingCommand::QueryOrder(c) => self.handle_query_order(&c),
        }
    }

    fn handle_submit_order(&mut self, command: &SubmitOrder) -> Result<(), EngineError> {
        self.submit_new_order(&command.order, command.client_id, command.position_id)
    }

    /// Adds `order` to the cache fresh (it must not already be known), applies the local
    /// `OrderSubmitted` event, then forwards it to the venue. A synchronous rejection from the
    /// client is folded into an `OrderRejected` event rather than bubbled up as an [`EngineError`]:
    /// strategies observe order outcomes as events, not as command failures.
    fn submit_new_order(
        &mut self,
        order: &Order,
        client_id: Option<ClientId>,
        position_id: Option<PositionId>,
    ) -> Result<(), EngineError> {
        self.cache.add_order(order.clone(), position_id)?;
        self.lock_order_risk(order)?;
        self.apply_and_publish(order.client_order_id, self.submitted_event(order))?;
        self.dispatch_submit(order, client_id)
    }

    /// Reserves settlement risk for a newly-submitted order against its account's ledger: cash
    /// accounts lock notional (plus a taker fee buffer), margin accounts post initial margin,
    /// betting accounts lock liability. A no-op for market orders (no price to size a lock
    /// against, so the risk is only recognised once a fill arrives) and for orders whose account
    /// or instrument the engine doesn't yet know about.
    fn lock_order_risk(&mut self, order: &Order) -> Result<(), EngineError> {
        let Some(price) = order.price else {
            return Ok(());
        };
        let Some(account_id) = order
            .account_id
            .or_else(|| self.cache.account_for_venue(&order.instrument_id.venue).map(Account::id))
        else {
            return Ok(());
        };
        let Some(mut account) = self.cache.account(&account_id).cloned() else {
            return Ok(());
        };
        let Some(instrument) = self.instruments.get(&order.instrument_id).copied() else {
            return Ok(());
        };

        match &mut account {
            AccountAny::Cash(cash) => {
                let locked = cash.calculate_balance_locked(
                    &instrument,
                    order.order_side,
                    order.quantity,
                    price,
                    false,
                );
                cash.lock_funds(order.instrument_id, locked);
            }
            AccountAny::Margin(margin) => {
                let margin_init = margin.calculate_initial_margin(&instrument, order.quantity, price, None);
                if margin.update_initial_margin(order.instrument_id, margin_init).is_err() {
                    tracing::warn!(account_id = %account_id, "margin call: initial margin exceeds balance");
                }
            }
            AccountAny::Betting(betting) => {
                let side = betting_side(order.order_side);
                let stake = Money::new(order.quantity.as_f64(), instrument.quote_currency);
                let liability = BettingAccount::liability(side, stake, price.as_f64());
                betting.lock_liability(order.instrument_id, liability);
            }
        }

        self.cache.update_account(account)?;
        Ok(())
    }

    /// Releases whatever [`Self::lock_order_risk`] reserved for `order`, once it reaches a
    /// terminal status (filled, canceled, rejected or expired). Mirrors the lock calculation
    /// exactly, since both use the order's original quantity and price.
    fn release_order_risk(&mut self, order: &Order) -> Result<(), EngineError> {
        if !order.is_closed() {
            return Ok(());
        }
        let Some(price) = order.price else {
            return Ok(());
        };
        let Some(account_id) = order
            .account_id
            .or_else(|| self.cache.account_for_venue(&order.instrument_id.venue).map(Account::id))
        else {
            return Ok(());
        };
        let Some(mut account) = self.cache.account(&account_id).cloned() else {
            return Ok(());
        };
        let Some(instrument) = self.instruments.get(&order.instrument_id).copied() else {
            return Ok(());
        };

        match &mut account {
            AccountAny::Cash(cash) => {
                let locked = cash.calculate_balance_locked(
                    &instrument,
                    order.order_side,
                    order.quantity,
                    price,
                    false,
                );
                cash.unlock_funds(order.instrument_id, locked);
            }
            AccountAny::Margin(margin) => {
                let currency = instrument.settlement_currency(false);
                if margin
                    .update_initial_margin(order.instrument_id, Money::zero(currency))
                    .is_err()
                {
                    tracing::warn!(account_id = %account_id, "margin call: releasing initial margin still exceeds balance");
                }
            }
            AccountAny::Betting(betting) => {
                let side = betting_side(order.order_side);
                let stake = Money::new(order.quantity.as_f64(), instrument.quote_currency);
                let liability = BettingAccount::liability(side, stake, price.as_f64());
                betting.unlock_liability(order.instrument_id, liability);
            }
        }

        self.cache.update_account(account)?;
        Ok(())
    }

    fn submitted_event(&self, order: &Order) -> OrderEventAny {
        let account_id = order
            .account_id
            .or_else(|| self.cache.account_for_venue(&order.instrument_id.venue).map(Account::id))
            .unwrap_or_else(|| quantflow_model::identifiers::AccountId::new("UNKNOWN-000"));
        let now = self.clock.timestamp_ns();
        OrderEventAny::Submitted(OrderSubmitted::new(
            order.trader_id,
            order.strategy_id,
            order.instrument_id,
            order.client_order_id,
            account_id,
            UUID4::new(),
            now,
            now,
        ))
    }

    fn dispatch_submit(&mut self, order: &Order, client_id: Option<ClientId>) -> Result<(), EngineError> {
        let venue = order.instrument_id.venue;
        let resolved = client_id.or_else(|| self.routing.get(&venue).copied());
        let Some(resolved) = resolved else {
            self.reject_order(order, "no execution client registered")?;
            return Err(EngineError::NoClient(client_id));
        };
        let submit = SubmitOrder {
            trader_id: order.trader_id,
            client_id: Some(resolved),
            strategy_id: order.strategy_id,
            instrument_id: order.instrument_id,
            order: order.clone(),
            position_id: self.cache.position_id(&order.client_order_id).copied(),
            command_id: UUID4::new(),
            ts_init: self.clock.timestamp_ns(),
        };
        let Some(client) = self.clients.get_mut(&resolved) else {
            self.reject_order(order, "no execution client registered")?;
            return Err(EngineError::NoClient(Some(resolved)));
        };
        if let Err(err) = client.submit_order(&submit) {
            self.reject_order(order, &err.to_string())?;
        }
        Ok(())
    }

    fn reject_order(&mut self, order: &Order, reason: &str) -> Result<(), EngineError> {
        let account_id = order
            .account_id
            .or_else(|| self.cache.account_for_venue(&order.instrument_id.venue).map(Account::id))
            .unwrap_or_else(|| quantflow_model::identifiers::AccountId::new("UNKNOWN-000"));
        let now = self.clock.timestamp_ns();
        let event = OrderEventAny::Rejected(OrderRejected::new(
            order.trader_id,
            order.strategy_id,
            order.instrument_id,
            order.client_order_id,
            account_id,
            ustr::Ustr::from(reason),
            UUID4::new(),
            now,
            now,
            false,
        ));
        self.apply_and_publish(order.client_order_id, event)
    }

    fn handle_submit_order_list(&mut self, command: &SubmitOrderList) -> Result<(), EngineError> {
        let member_ids: Vec<ClientOrderId> = command
            .order_list
            .orders
            .iter()
            .map(|o| o.client_order_id)
            .collect();
        self.order_lists.insert(command.order_list.order_list_id, member_ids);

        for order in &command.order_list.orders {
            let releases_immediately = order.contingency_type != ContingencyType::Oto
                || Some(order.client_order_id) == command.order_list.first().map(|o| o.client_order_id);
            if releases_immediately {
                self.submit_new_order(order, command.client_id, command.position_id)?;
            } else {
                // OTO children stay cached but unsubmitted until the parent fully fills.
                self.cache.add_order(order.clone(), command.position_id)?;
            }
        }
        Ok(())
    }

    fn handle_modify_order(&mut self, command: &ModifyOrder) -> Result<(), EngineError> {
        let order = self
            .cache
            .order(&command.client_order_id)
            .cloned()
            .ok_or(EngineError::OrderNotFound(command.client_order_id))?;
        let venue = order.instrument_id.venue;
        let client = self.client_for(command.client_id, venue)?;
        client.modify_order(command).map_err(anyhow::Error::from)?;
        Ok(())
    }

    fn handle_cancel_order(&mut self, command: &CancelOrder) -> Result<(), EngineError> {
        let order = self
            .cache
            .order(&command.client_order_id)
            .cloned()
            .ok_or(EngineError::OrderNotFound(command.client_order_id))?;
        let venue = order.instrument_id.venue;
        let client = self.client_for(command.client_id, venue)?;
        client.cancel_order(command).map_err(anyhow::Error::from)?;
        Ok(())
    }

    fn handle_cancel_all_orders(&mut self, command: &CancelAllOrders) -> Result<(), EngineError> {
        let client = self.client_for(command.client_id, command.instrument_id.venue)?;
        client.cancel_all_orders(command).map_err(anyhow::Error::from)?;
        Ok(())
    }

    fn handle_batch_cancel_orders(&mut self, command: &BatchCancelOrders) -> Result<(), EngineError> {
        let client = self.client_for(command.client_id, command.instrument_id.venue)?;
        client.batch_cancel_orders(command).map_err(anyhow::Error::from)?;
        Ok(())
    }

    fn handle_query_order(&mut self, command: &QueryOrder) -> Result<(), EngineError> {
        let client = self.client_for(command.client_id, command.instrument_id.venue)?;
        client.query_order(command).map_err(anyhow::Error::from)?;
        Ok(())
    }

    // -- EVENT HANDLING ----------------------------------------------------------------------

    /// Applies a venue-originated event to its order, settles any fill against the account and
    /// position, propagates OCO/OTO/OUO contingencies, then publishes the event.
    pub fn handle_event(&mut self, event: OrderEventAny) -> Result<(), EngineError> {
        let client_order_id = event.client_order_id();

        if let OrderEventAny::Filled(fill) = &event {
            let already_applied = self
                .cache
                .order(&client_order_id)
                .is_some_and(|o| o.trade_ids.contains(&fill.trade_id));
            if already_applied {
                tracing::debug!(%client_order_id, trade_id = %fill.trade_id, "duplicate fill, ignoring");
                return Ok(());
            }
        }

        self.apply_and_publish(client_order_id, event)
    }

    fn apply_and_publish(&mut self, client_order_id: ClientOrderId, event: OrderEventAny) -> Result<(), EngineError> {
        let mut order = self
            .cache
            .order(&client_order_id)
            .cloned()
            .ok_or(EngineError::OrderNotFound(client_order_id))?;

        let fill = if let OrderEventAny::Filled(fill) = &event {
            Some(fill.clone())
        } else {
            None
        };

        order.apply(event.clone())?;
        self.cache.update_order(&order)?;

        if let Some(fill) = &fill {
            self.settle_fill(fill, &order)?;
            self.handle_order_fill(fill)?;
        }
        self.release_order_risk(&order)?;

        self.apply_contingency(&order, &event)?;

        let topic = self.bus.switchboard_mut().get_order_events_topic(order.strategy_id);
        self.bus.publish(topic.as_str(), &event);
        Ok(())
    }

    /// Updates commissions and realized PnL, and for a margin account re-prices the maintenance
    /// margin posted against the position's remaining size. Initial margin, cash locks and
    /// betting liability are reserved at submission and released once the order closes (see
    /// [`Self::lock_order_risk`]/[`Self::release_order_risk`]); this only adjusts the ongoing
    /// maintenance charge, which tracks leftover exposure rather than the original order.
    fn settle_fill(&mut self, fill: &OrderFilled, order: &Order) -> Result<(), EngineError> {
        let Some(mut account) = self.cache.account(&fill.account_id).cloned() else {
            tracing::warn!(account_id = %fill.account_id, "fill settled against unknown account");
            return Ok(());
        };
        let Some(instrument) = self.instruments.get(&fill.instrument_id).copied() else {
            tracing::warn!(instrument_id = %fill.instrument_id, "fill settled against unknown instrument");
            return Ok(());
        };

        if let Some(commission) = fill.commission {
            account.update_commissions(commission);
        }

        let deltas = calculate_pnls(&account, &instrument, fill);

        if let AccountAny::Margin(margin) = &mut account {
            let notional_margin = margin.calculate_maintenance_margin(
                &instrument,
                order.leaves_qty,
                fill.last_px,
                None,
            );
            if margin
                .update_maintenance_margin(fill.instrument_id, notional_margin)
                .is_err()
            {
                tracing::warn!(account_id = %fill.account_id, "margin call: maintenance margin exceeds balance");
            }
        }

        if !deltas.is_empty() {
            apply_balance_deltas(&mut account, &deltas, fill.ts_event);
        }

        self.cache.update_account(account)?;
        Ok(())
    }

    /// The core fill-to-position pipeline: resolves the position id, opens/updates/closes/flips
    /// the cached [`Position`], and publishes the resulting lifecycle event(s).
    fn handle_order_fill(&mut self, fill: &OrderFilled) -> Result<(), EngineError> {
        let oms_type = self.determine_oms_type(fill.instrument_id, fill.strategy_id);
        let position_id = self.resolve_position_id(fill, oms_type);
        let multiplier = self
            .instruments
            .get(&fill.instrument_id)
            .map_or(1.0, |i| i.multiplier);

        match self.cache.position(&position_id).cloned() {
            None => {
                let mut position = Position::opened_from(fill, multiplier);
                position.position_id = position_id;
                self.cache.add_position(position.clone())?;
                self.publish_position_event(PositionEventAny::Opened(PositionOpened::new(
                    position.trader_id,
                    position.strategy_id,
                    position.instrument_id,
                    position.position_id,
                    position.account_id,
                    position.opening_order_id,
                    position.entry,
                    position.side,
                    position.signed_qty,
                    position.quantity,
                    fill.last_qty,
                    fill.last_px,
                    position.currency,
                    position.avg_px_open,
                    UUID4::new(),
                    fill.ts_event,
                    self.clock.timestamp_ns(),
                )));
            }
            Some(mut position) => {
                let prior_entry = position.entry;
                let prior_avg_px_open = position.avg_px_open;
                let prior_opening_order_id = position.opening_order_id;
                let delta = position.apply(fill);
                self.cache.update_position(&position)?;

                match delta {
                    PositionDelta::Changed => {
                        self.publish_position_event(PositionEventAny::Changed(PositionChanged::new(
                            position.trader_id,
                            position.strategy_id,
                            position.instrument_id,
                            position.position_id,
                            position.account_id,
                            position.opening_order_id,
                            position.entry,
                            position.side,
                            position.signed_qty,
                            position.quantity,
                            fill.last_qty,
                            fill.last_px,
                            position.currency,
                            position.avg_px_open,
                            position.realized_pnl,
                            UUID4::new(),
                            fill.ts_event,
                            self.clock.timestamp_ns(),
                        )));
                    }
                    PositionDelta::Closed => {
                        self.netting_positions
                            .remove(&(position.instrument_id, position.strategy_id));
                        self.publish_position_event(PositionEventAny::Closed(PositionClosed::new(
                            position.trader_id,
                            position.strategy_id,
                            position.instrument_id,
                            position.position_id,
                            position.account_id,
                            position.opening_order_id,
                            position.closing_order_id,
                            prior_entry,
                            position.quantity,
                            fill.last_qty,
                            fill.last_px,
                            position.currency,
                            position.avg_px_open,
                            position.avg_px_close.unwrap_or(fill.last_px.as_f64()),
                            position.realized_pnl,
                            (position.ts_closed.unwrap_or(fill.ts_event) - position.ts_opened).as_u64(),
                            UUID4::new(),
                            fill.ts_event,
                            self.clock.timestamp_ns(),
                        )));
                    }
                    PositionDelta::Flipped { closed_qty, .. } => {
                        let closing_qty = quantflow_model::types::Quantity::new(
                            closed_qty,
                            position.size_precision,
                        );
                        self.publish_position_event(PositionEventAny::Closed(PositionClosed::new(
                            position.trader_id,
                            position.strategy_id,
                            position.instrument_id,
                            position.position_id,
                            position.account_id,
                            prior_opening_order_id,
                            Some(fill.client_order_id),
                            prior_entry,
                            closing_qty,
                            closing_qty,
                            fill.last_px,
                            position.currency,
                            prior_avg_px_open,
                            fill.last_px.as_f64(),
                            position.realized_pnl,
                            (fill.ts_event - position.ts_opened).as_u64(),
                            UUID4::new(),
                            fill.ts_event,
                            self.clock.timestamp_ns(),
                        )));
                        self.publish_position_event(PositionEventAny::Opened(PositionOpened::new(
                            position.trader_id,
                            position.strategy_id,
                            position.instrument_id,
                            position.position_id,
                            position.account_id,
                            fill.client_order_id,
                            position.entry,
                            position.side,
                            position.signed_qty,
                            position.quantity,
                            position.quantity,
                            fill.last_px,
                            position.currency,
                            position.avg_px_open,
                            UUID4::new(),
                            fill.ts_event,
                            self.clock.timestamp_ns(),
                        )));
                    }
                    PositionDelta::Opened => unreachable!("apply() never returns Opened for an existing position"),
                }
            }
        }
        Ok(())
    }

    fn publish_position_event(&mut self, event: PositionEventAny) {
        let topic = self.bus.switchboard_mut().get_position_events_topic(event.strategy_id());
        self.bus.publish(topic.as_str(), &event);
    }

    fn determine_oms_type(&self, instrument_id: InstrumentId, strategy_id: StrategyId) -> OmsType {
        self.oms_overrides
            .get(&strategy_id)
            .or_else(|| self.venue_oms.get(&instrument_id.venue))
            .copied()
            .unwrap_or(self.config.default_oms_type)
    }

    /// Resolves the position a fill nets against.
    ///
    /// Under [`OmsType::Hedging`] every fill opens its own position, keyed by its trade id. Under
    /// [`OmsType::Netting`], fills on the same instrument/strategy net into one position for as
    /// long as it stays open; once it fully closes the mapping is cleared (see
    /// [`Self::handle_order_fill`]'s `Closed` arm), so the next fill opens a fresh position
    /// instead of reapplying to the one that just closed.
    fn resolve_position_id(&mut self, fill: &OrderFilled, oms_type: OmsType) -> PositionId {
        if let Some(position_id) = fill.position_id {
            return position_id;
        }
        match oms_type {
            OmsType::Netting | OmsType::Unspecified => {
                let key = (fill.instrument_id, fill.strategy_id);
                *self
                    .netting_positions
                    .entry(key)
                    .or_insert_with(|| PositionId::new(format!("{}-{}", fill.instrument_id, fill.trade_id)))
            }
            OmsType::Hedging => PositionId::new(fill.trade_id.to_string()),
        }
    }

    /// Propagates OCO/OTO/OUO side effects of `event` against `order`'s siblings in its order
    /// list, if any.
    fn apply_contingency(&mut self, order: &Order, event: &OrderEventAny) -> Result<(), EngineError> {
        let Some(order_list_id) = order.order_list_id else {
            return Ok(());
        };
        let Some(siblings) = self.order_lists.get(&order_list_id).cloned() else {
            return Ok(());
        };

        match order.contingency_type {
            ContingencyType::Oco if order.is_closed() => {
                for sibling_id in siblings.into_iter().filter(|id| *id != order.client_order_id) {
                    let Some(sibling) = self.cache.order(&sibling_id).cloned() else {
                        continue;
                    };
                    if sibling.is_closed() {
                        continue;
                    }
                    let now = self.clock.timestamp_ns();
                    let cancel = OrderEventAny::Canceled(OrderCanceled::new(
                        sibling.trader_id,
                        sibling.strategy_id,
                        sibling.instrument_id,
                        sibling.client_order_id,
                        sibling.venue_order_id,
                        sibling.account_id,
                        UUID4::new(),
                        now,
                        now,
                        true,
                    ));
                    self.apply_and_publish(sibling_id, cancel)?;
                }
            }
            ContingencyType::Oto => {
                let is_parent = matches!(event, OrderEventAny::Filled(_)) && order.is_closed();
                if is_parent {
                    for sibling_id in siblings.into_iter().filter(|id| *id != order.client_order_id) {
                        let Some(sibling) = self.cache.order(&sibling_id).cloned() else {
                            continue;
                        };
                        if sibling.status == quantflow_model::enums::OrderStatus::Initialized {
                            self.dispatch_submit(&sibling, None)?;
                        }
                    }
                }
            }
            ContingencyType::Ouo => {
                if let OrderEventAny::Filled(fill) = event {
                    let delta = fill.last_qty;
                    for sibling_id in siblings.into_iter().filter(|id| *id != order.client_order_id) {
                        let Some(sibling) = self.cache.order(&sibling_id).cloned() else {
                            continue;
                        };
                        if !sibling.is_open() {
                            continue;
                        }
                        let reduced = (sibling.leaves_qty.as_f64() - delta.as_f64()).max(0.0);
                        let now = self.clock.timestamp_ns();
                        let client = match self.client_for(None, sibling.instrument_id.venue) {
                            Ok(client) => client,
                            Err(_) => continue,
                        };
                        let modify = ModifyOrder {
                            trader_id: sibling.trader_id,
                            client_id: None,
                            strategy_id: sibling.strategy_id,
                            instrument_id: sibling.instrument_id,
                            client_order_id: sibling.client_order_id,
                            venue_order_id: sibling.venue_order_id,
                            quantity: Some(quantflow_model::types::Quantity::new(
                                reduced,
                                sibling.quantity.precision,
                            )),
                            price: None,
                            trigger_price: None,
                            command_id: UUID4::new(),
                            ts_init: now,
                        };
                        let _ = client.modify_order(&modify);
                    }
                }
            }
            ContingencyType::NoContingency | ContingencyType::Oco => {}
        }
        Ok(())
    }

    // -- RECONCILIATION --------------------------------------------------------------------------

    /// Aligns the cache against a full venue-side snapshot: every report for an order the cache
    /// already knows is replayed; reports for an order the cache has never seen (placed directly
    /// on the venue, or surviving from a prior process instance) are synthesized into a local
    /// order under a fresh `RECON-N` client order ID, brought to `Accepted`, then to `Filled` as
    /// the matching fill reports are processed.
    pub fn reconcile_mass_status(&mut self, mass: &ExecutionMassStatus) -> Result<(), EngineError> {
        for report in mass.order_reports.values() {
            self.reconcile_order_report(report)?;
        }
        for fills in mass.fill_reports.values() {
            for fill_report in fills {
                self.reconcile_fill_report(fill_report)?;
            }
        }
        Ok(())
    }

    /// Resolves a report's client order ID against the cache, falling back to the venue-order-id
    /// index so a report that only carries `venue_order_id` still finds an order synthesized by
    /// an earlier reconciliation step.
    fn resolve_reconciled_order_id(
        &self,
        client_order_id: Option<ClientOrderId>,
        venue_order_id: VenueOrderId,
    ) -> Option<ClientOrderId> {
        client_order_id
            .filter(|id| self.cache.order(id).is_some())
            .or_else(|| self.cache.client_order_id(&venue_order_id).copied())
    }

    fn reconcile_order_report(&mut self, report: &OrderStatusReport) -> Result<(), EngineError> {
        let client_order_id =
            match self.resolve_reconciled_order_id(report.client_order_id, report.venue_order_id) {
                Some(id) => id,
                None => self.synthesize_external_order(report)?,
            };

        let Some(order) = self.cache.order(&client_order_id) else {
            return Ok(());
        };
        if order.status == report.status {
            return Ok(());
        }
        tracing::debug!(
            client_order_id = %client_order_id,
            local = ?order.status,
            venue = ?report.status,
            "order status diverges from venue report"
        );
        Ok(())
    }

    /// Builds a local order from an unrecognized [`OrderStatusReport`], adds it to the cache
    /// fresh, and replays `Submitted`/`Accepted` so it reaches the same state a locally-submitted
    /// order would be in at this point.
    fn synthesize_external_order(
        &mut self,
        report: &OrderStatusReport,
    ) -> Result<ClientOrderId, EngineError> {
        self.recon_counter += 1;
        let client_order_id = ClientOrderId::new(format!("RECON-{}", self.recon_counter));
        let now = self.clock.timestamp_ns();

        let order = Order::new(OrderInitialized::new(
            self.bus.trader_id,
            StrategyId::external(),
            report.instrument_id,
            client_order_id,
            report.order_side,
            report.order_type,
            report.quantity,
            None,
            None,
            TimeInForce::Gtc,
            OmsType::Netting,
            false,
            UUID4::new(),
            now,
            now,
        ));
        self.cache.add_order(order, None)?;

        let account_id = self
            .cache
            .account_for_venue(&report.instrument_id.venue)
            .map(Account::id)
            .unwrap_or_else(|| quantflow_model::identifiers::AccountId::new("UNKNOWN-000"));
        let submitted = OrderEventAny::Submitted(OrderSubmitted::new(
            self.bus.trader_id,
            StrategyId::external(),
            report.instrument_id,
            client_order_id,
            account_id,
            UUID4::new(),
            now,
            now,
        ));
        self.apply_and_publish(client_order_id, submitted)?;

        let accepted = OrderEventAny::Accepted(OrderAccepted::new(
            self.bus.trader_id,
            StrategyId::external(),
            report.instrument_id,
            client_order_id,
            report.venue_order_id,
            account_id,
            UUID4::new(),
            now,
            now,
            true,
        ));
        self.apply_and_publish(client_order_id, accepted)?;

        tracing::info!(
            %client_order_id,
            venue_order_id = %report.venue_order_id,
            "synthesized external order during reconciliation"
        );
        Ok(client_order_id)
    }

    fn reconcile_fill_report(&mut self, report: &FillReport) -> Result<(), EngineError> {
        let Some(client_order_id) =
            self.resolve_reconciled_order_id(report.client_order_id, report.venue_order_id)
        else {
            tracing::warn!(
                venue_order_id = %report.venue_order_id,
                "fill report for unknown order, dropping"
            );
            return Ok(());
        };
        let Some(order) = self.cache.order(&client_order_id).cloned() else {
            return Ok(());
        };
        if order.trade_ids.contains(&report.execution_id) {
            return Ok(());
        }

        let account_id = order
            .account_id
            .or_else(|| self.cache.account_for_venue(&order.instrument_id.venue).map(Account::id))
            .unwrap_or_else(|| quantflow_model::identifiers::AccountId::new("UNKNOWN-000"));
        let commission = report.commission.or_else(|| {
            self.instruments.get(&order.instrument_id).map(|instrument| {
                calculate_commission(
                    instrument,
                    report.last_qty,
                    report.last_px,
                    report.liquidity_side,
                    false,
                )
            })
        });

        let fill = OrderFilled::new(
            order.trader_id,
            order.strategy_id,
            order.instrument_id,
            order.client_order_id,
            report.venue_order_id,
            account_id,
            report.execution_id,
            order.position_id,
            order.order_side,
            order.order_type,
            report.last_qty,
            report.last_px,
            self.instruments
                .get(&order.instrument_id)
                .map_or_else(quantflow_model::types::Currency::USD, |i| i.quote_currency),
            commission,
            report.liquidity_side,
            UUID4::new(),
            report.ts_event,
            report.ts_init,
            true,
        );
        self.handle_event(OrderEventAny::Filled(fill))
    }

    /// Trims each cached account's event history down to `purge_account_events_lookback_secs`,
    /// bounding memory for long-running traders.
    pub fn purge_account_events(&mut self) -> Result<(), EngineError> {
        let ts_now = self.clock.timestamp_ns();
        let lookback = self.config.purge_account_events_lookback_secs;
        let ids: Vec<_> = self.cache.accounts().iter().map(|a| a.id()).collect();
        for id in ids {
            if let Some(mut account) = self.cache.account(&id).cloned() {
                account.purge_account_events(ts_now, lookback);
                self.cache.update_account(account)?;
            }
        }
        Ok(())
    }
}

/// Maps a generic order side onto a betting side: `Buy` backs the outcome, everything else lays
/// it, the same two-sided convention as the quote/base legs a cash account locks for spot orders.
fn betting_side(side: OrderSide) -> BetSide {
    match side {
        OrderSide::Buy => BetSide::Back,
        OrderSide::Sell | OrderSide::NoOrderSide => BetSide::Lay,
    }
}

/// Folds settlement legs into `account`'s balances by applying a synthetic [`AccountState`],
/// consistent with every other balance mutation being event-sourced.
fn apply_balance_deltas(account: &mut AccountAny, deltas: &[Money], ts: UnixNanos) {
    let mut balances = account.balances();
    for delta in deltas {
        let updated = match balances.get(&delta.currency) {
            Some(existing) => {
                let total = Money::new(existing.total.as_f64() + delta.as_f64(), delta.currency);
                let free = Money::new(total.as_f64() - existing.locked.as_f64(), delta.currency);
                AccountBalance::new(total, existing.locked, free)
            }
            None => {
                let total = Money::new(delta.as_f64(), delta.currency);
                AccountBalance::new(total, Money::new(0.0, delta.currency), total)
            }
        };
        balances.insert(delta.currency, updated);
    }
    let event = AccountState::new(
        account.id(),
        account.account_type(),
        balances.into_values().collect(),
        Vec::new(),
        false,
        UUID4::new(),
        ts,
        ts,
        account.base_currency(),
    );
    account.apply(event);
}

#[cfg(test)]
mod tests {
    use quantflow_core::TestClock;
    use quantflow_model::{
        enums::{AccountType, OrderStatus, OrderType, TimeInForce},
        events::{order::OrderInitialized, AccountState},
        identifiers::stubs::{account_id, instrument_id_btcusdt, strategy_id, trader_id, uuid4},
        identifiers::{AccountId, TradeId, VenueOrderId},
        orders::Order,
        types::{AccountBalance, Currency, Price, Quantity},
    };

    use super::*;
    use crate::engine::{
        client::ExecutionClient,
        commands::SubmitOrder,
        reports::{ExecutionMassStatus, FillReport, OrderStatusReport, PositionStatusReport},
    };

    struct NullClient;

    impl ExecutionClient for NullClient {
        fn submit_order(&mut self, _command: &SubmitOrder) -> anyhow::Result<()> {
            Ok(())
        }
        fn submit_order_list(&mut self, _command: &SubmitOrderList) -> anyhow::Result<()> {
            Ok(())
        }
        fn modify_order(&mut self, _command: &ModifyOrder) -> anyhow::Result<()> {
            Ok(())
        }
        fn cancel_order(&mut self, _command: &CancelOrder) -> anyhow::Result<()> {
            Ok(())
        }
        fn cancel_all_orders(&mut self, _command: &CancelAllOrders) -> anyhow::Result<()> {
            Ok(())
        }
        fn batch_cancel_orders(&mut self, _command: &BatchCancelOrders) -> anyhow::Result<()> {
            Ok(())
        }
        fn query_order(&mut self, _command: &QueryOrder) -> anyhow::Result<()> {
            Ok(())
        }
        fn generate_order_status_report(
            &self,
            _instrument_id: InstrumentId,
            _client_order_id: Option<ClientOrderId>,
            _venue_order_id: Option<VenueOrderId>,
        ) -> anyhow::Result<Option<OrderStatusReport>> {
            Ok(None)
        }
        fn generate_order_status_reports(
            &self,
            _instrument_id: Option<InstrumentId>,
        ) -> anyhow::Result<Vec<OrderStatusReport>> {
            Ok(Vec::new())
        }
        fn generate_fill_reports(
            &self,
            _instrument_id: Option<InstrumentId>,
        ) -> anyhow::Result<Vec<FillReport>> {
            Ok(Vec::new())
        }
        fn generate_position_status_reports(
            &self,
            _instrument_id: Option<InstrumentId>,
        ) -> anyhow::Result<Vec<PositionStatusReport>> {
            Ok(Vec::new())
        }
        fn generate_mass_status(&self) -> anyhow::Result<ExecutionMassStatus> {
            Ok(ExecutionMassStatus::new(
                ClientId::new("SIM"),
                account_id(),
                UnixNanos::default(),
            ))
        }
    }

    fn make_engine() -> ExecutionEngine {
        let mut cache = Cache::new(quantflow_common::cache::CacheConfig::default());
        let event = AccountState::new(
            account_id(),
            AccountType::Cash,
            vec![AccountBalance::new(
                Money_usdt(1_000_000.0),
                Money_usdt(0.0),
                Money_usdt(1_000_000.0),
            )],
            vec![],
            true,
            uuid4(),
            UnixNanos::default(),
            UnixNanos::default(),
            None,
        );
        cache
            .add_account(AccountAny::from_state(event, 1.0))
            .unwrap();

        let mut engine = ExecutionEngine::new(
            ExecutionEngineConfig::default(),
            Box::new(TestClock::new()),
            cache,
            MessageBus::new(trader_id(), uuid4(), None),
        );
        engine.register_client(ClientId::new("SIM"), Box::new(NullClient));
        engine.register_venue_routing(instrument_id_btcusdt().venue, ClientId::new("SIM"));
        let mut instrument = InstrumentSpec::new(instrument_id_btcusdt(), Currency::USDT());
        instrument.base_currency = Some(Currency::BTC());
        engine.add_instrument(instrument);
        engine.start();
        engine
    }

    #[allow(non_snake_case)]
    fn Money_usdt(amount: f64) -> quantflow_model::types::Money {
        quantflow_model::types::Money::new(amount, Currency::USDT())
    }

    fn new_order(client_order_id: &str, side: OrderSide, qty: f64) -> Order {
        Order::new(OrderInitialized::new(
            trader_id(),
            strategy_id(),
            instrument_id_btcusdt(),
            ClientOrderId::new(client_order_id),
            side,
            OrderType::Market,
            Quantity::new(qty, 3),
            None,
            None,
            TimeInForce::Gtc,
            OmsType::Netting,
            false,
            uuid4(),
            UnixNanos::default(),
            UnixNanos::default(),
        ))
    }

    fn new_limit_order(client_order_id: &str, side: OrderSide, qty: f64, price: f64) -> Order {
        Order::new(OrderInitialized::new(
            trader_id(),
            strategy_id(),
            instrument_id_btcusdt(),
            ClientOrderId::new(client_order_id),
            side,
            OrderType::Limit,
            Quantity::new(qty, 3),
            Some(Price::new(price, 2)),
            None,
            TimeInForce::Gtc,
            OmsType::Netting,
            false,
            uuid4(),
            UnixNanos::default(),
            UnixNanos::default(),
        ))
    }

    fn fill_for(order: &Order, trade: &str, qty: f64, px: f64) -> OrderFilled {
        OrderFilled::new(
            order.trader_id,
            order.strategy_id,
            order.instrument_id,
            order.client_order_id,
            VenueOrderId::new("V-1"),
            account_id(),
            TradeId::new(trade),
            None,
            order.order_side,
            order.order_type,
            Quantity::new(qty, 3),
            Price::new(px, 2),
            Currency::USDT(),
            None,
            LiquiditySide::Taker,
            UUID4::new(),
            UnixNanos::default(),
            UnixNanos::default(),
            false,
        )
    }

    fn accept(engine: &mut ExecutionEngine, order: &Order) {
        let now = UnixNanos::default();
        let accepted = OrderEventAny::Accepted(quantflow_model::events::OrderAccepted::new(
            order.trader_id,
            order.strategy_id,
            order.instrument_id,
            order.client_order_id,
            VenueOrderId::new("V-1"),
            account_id(),
            UUID4::new(),
            now,
            now,
            false,
        ));
        engine.handle_event(accepted).unwrap();
    }

    #[test]
    fn test_netting_open_then_flip_publishes_closed_then_opened() {
        let mut engine = make_engine();
        let order = new_order("O-1", OrderSide::Buy, 10.0);
        engine
            .execute(TradingCommand::SubmitOrder(SubmitOrder {
                trader_id: trader_id(),
                client_id: None,
                strategy_id: strategy_id(),
                instrument_id: instrument_id_btcusdt(),
                order: order.clone(),
                position_id: None,
                command_id: UUID4::new(),
                ts_init: UnixNanos::default(),
            }))
            .unwrap();
        accept(&mut engine, &order);

        let open_fill = fill_for(&order, "T-1", 10.0, 100.0);
        engine.handle_event(OrderEventAny::Filled(open_fill)).unwrap();

        let position_id = PositionId::new(format!("{}-{}", instrument_id_btcusdt(), "T-1"));
        let position = engine.cache().position(&position_id).unwrap();
        assert!(position.is_long());
        assert_eq!(position.quantity.as_f64(), 10.0);

        let flip_order = new_order("O-2", OrderSide::Sell, 25.0);
        engine
            .execute(TradingCommand::SubmitOrder(SubmitOrder {
                trader_id: trader_id(),
                client_id: None,
                strategy_id: strategy_id(),
                instrument_id: instrument_id_btcusdt(),
                order: flip_order.clone(),
                position_id: None,
                command_id: UUID4::new(),
                ts_init: UnixNanos::default(),
            }))
            .unwrap();
        accept(&mut engine, &flip_order);

        let flip_fill = fill_for(&flip_order, "T-2", 25.0, 110.0);
        engine.handle_event(OrderEventAny::Filled(flip_fill)).unwrap();

        let position = engine.cache().position(&position_id).unwrap();
        assert!(position.is_short());
        assert_eq!(position.quantity.as_f64(), 15.0);
        assert_eq!(position.realized_pnl.as_f64(), 100.0);
    }

    #[test]
    fn test_duplicate_fill_trade_id_is_ignored() {
        let mut engine = make_engine();
        let order = new_order("O-1", OrderSide::Buy, 10.0);
        engine
            .execute(TradingCommand::SubmitOrder(SubmitOrder {
                trader_id: trader_id(),
                client_id: None,
                strategy_id: strategy_id(),
                instrument_id: instrument_id_btcusdt(),
                order: order.clone(),
                position_id: None,
                command_id: UUID4::new(),
                ts_init: UnixNanos::default(),
            }))
            .unwrap();
        accept(&mut engine, &order);

        let fill = fill_for(&order, "T-1", 10.0, 100.0);
        engine.handle_event(OrderEventAny::Filled(fill.clone())).unwrap();
        engine.handle_event(OrderEventAny::Filled(fill)).unwrap();

        let cached = engine.cache().order(&order.client_order_id).unwrap();
        assert_eq!(cached.filled_qty.as_f64(), 10.0);
    }

    #[test]
    fn test_command_rejected_when_not_running() {
        let mut engine = make_engine();
        engine.stop();
        let order = new_order("O-1", OrderSide::Buy, 10.0);
        let result = engine.execute(TradingCommand::SubmitOrder(SubmitOrder {
            trader_id: trader_id(),
            client_id: None,
            strategy_id: strategy_id(),
            instrument_id: instrument_id_btcusdt(),
            order,
            position_id: None,
            command_id: UUID4::new(),
            ts_init: UnixNanos::default(),
        }));
        assert!(matches!(result, Err(EngineError::NotRunning(_))));
    }

    #[test]
    fn test_reconcile_mass_status_synthesizes_unknown_order_then_fills_it() {
        let mut engine = make_engine();
        let venue_order_id = VenueOrderId::new("V1");
        let mut mass =
            ExecutionMassStatus::new(ClientId::new("SIM"), account_id(), UnixNanos::default());
        mass.order_reports.insert(
            venue_order_id,
            OrderStatusReport {
                instrument_id: instrument_id_btcusdt(),
                client_order_id: None,
                venue_order_id,
                order_side: OrderSide::Buy,
                order_type: OrderType::Market,
                quantity: Quantity::new(5.0, 3),
                status: OrderStatus::Filled,
                filled_qty: Quantity::new(5.0, 3),
                ts_init: UnixNanos::default(),
            },
        );
        mass.fill_reports.insert(
            venue_order_id,
            vec![FillReport {
                instrument_id: instrument_id_btcusdt(),
                client_order_id: None,
                venue_order_id,
                execution_id: TradeId::new("E1"),
                order_side: OrderSide::Buy,
                last_qty: Quantity::new(5.0, 3),
                last_px: Price::new(50.0, 2),
                commission: None,
                liquidity_side: LiquiditySide::Taker,
                ts_event: UnixNanos::default(),
                ts_init: UnixNanos::default(),
            }],
        );

        engine.reconcile_mass_status(&mass).unwrap();

        let client_order_id = ClientOrderId::new("RECON-1");
        let order = engine.cache().order(&client_order_id).unwrap();
        assert_eq!(order.status, OrderStatus::Filled);
        assert_eq!(order.filled_qty.as_f64(), 5.0);
        assert!(engine.cache().check_integrity());
    }

    #[test]
    fn test_limit_order_submit_locks_cash_and_fill_releases_it() {
        let mut engine = make_engine();
        let order = new_limit_order("O-1", OrderSide::Buy, 2.0, 50_000.0);
        engine
            .execute(TradingCommand::SubmitOrder(SubmitOrder {
                trader_id: trader_id(),
                client_id: None,
                strategy_id: strategy_id(),
                instrument_id: instrument_id_btcusdt(),
                order: order.clone(),
                position_id: None,
                command_id: UUID4::new(),
                ts_init: UnixNanos::default(),
            }))
            .unwrap();

        let locked_after_submit = engine
            .cache()
            .account(&account_id())
            .unwrap()
            .balance_locked(Some(Currency::USDT()))
            .unwrap();
        assert_eq!(locked_after_submit.as_f64(), 100_000.0);

        accept(&mut engine, &order);
        let fill = fill_for(&order, "T-1", 2.0, 50_000.0);
        engine.handle_event(OrderEventAny::Filled(fill)).unwrap();

        let locked_after_fill = engine
            .cache()
            .account(&account_id())
            .unwrap()
            .balance_locked(Some(Currency::USDT()))
            .unwrap();
        assert_eq!(locked_after_fill.as_f64(), 0.0);
    }

    #[test]
    fn test_limit_order_submit_locks_cash_and_cancel_releases_it() {
        let mut engine = make_engine();
        let order = new_limit_order("O-1", OrderSide::Buy, 2.0, 50_000.0);
        engine
            .execute(TradingCommand::SubmitOrder(SubmitOrder {
                trader_id: trader_id(),
                client_id: None,
                strategy_id: strategy_id(),
                instrument_id: instrument_id_btcusdt(),
                order: order.clone(),
                position_id: None,
                command_id: UUID4::new(),
                ts_init: UnixNanos::default(),
            }))
            .unwrap();
        accept(&mut engine, &order);

        let now = UnixNanos::default();
        let canceled = OrderEventAny::Canceled(OrderCanceled::new(
            order.trader_id,
            order.strategy_id,
            order.instrument_id,
            order.client_order_id,
            Some(VenueOrderId::new("V-1")),
            Some(account_id()),
            UUID4::new(),
            now,
            now,
            false,
        ));
        engine.handle_event(canceled).unwrap();

        let locked_after_cancel = engine
            .cache()
            .account(&account_id())
            .unwrap()
            .balance_locked(Some(Currency::USDT()))
            .unwrap();
        assert_eq!(locked_after_cancel.as_f64(), 0.0);
    }
}
