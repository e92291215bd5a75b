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

//! A generic, per-instrument [`MatchingCore`] shared by simulated venues: holds the resting
//! passive orders on both sides of the book and decides when they trigger or fill, without
//! itself knowing anything about accounts, commissions, or the message bus.

pub mod config;
pub mod handlers;

use thiserror::Error;

use quantflow_model::{
    enums::{LiquiditySide, OrderSideSpecified, OrderType},
    identifiers::{ClientOrderId, InstrumentId},
    orders::Order,
    types::Price,
};

use crate::matching_core::{
    config::MatchingCoreConfig,
    handlers::{FillLimitOrderHandler, FillMarketOrderHandler, TriggerStopOrderHandler},
};

/// Errors raised by [`MatchingCore`] itself, as opposed to the handlers it calls into.
#[derive(Debug, Error)]
pub enum MatchingCoreError {
    #[error("order {0} not found in the matching core")]
    NotFound(ClientOrderId),
    #[error("order {0} is a MARKET order and cannot rest in the book")]
    NotPassive(ClientOrderId),
    #[error("stop-family orders are rejected for this instrument")]
    StopOrdersRejected(ClientOrderId),
}

/// A single resting order plus the sequence number it was added under, used to break price ties
/// in strict FIFO order.
type BookEntry = (u64, Order);

/// A generic order matching core: one instance per instrument.
pub struct MatchingCore {
    pub instrument_id: InstrumentId,
    pub price_increment: Price,
    pub bid: Option<Price>,
    pub ask: Option<Price>,
    pub last: Option<Price>,
    pub is_bid_initialized: bool,
    pub is_ask_initialized: bool,
    pub is_last_initialized: bool,
    config: MatchingCoreConfig,
    orders_bid: Vec<BookEntry>,
    orders_ask: Vec<BookEntry>,
    bid_dirty: bool,
    ask_dirty: bool,
    next_sequence: u64,
    trigger_stop_order: Option<Box<dyn TriggerStopOrderHandler>>,
    fill_market_order: Option<Box<dyn FillMarketOrderHandler>>,
    fill_limit_order: Option<Box<dyn FillLimitOrderHandler>>,
}

impl MatchingCore {
    #[must_use]
    pub fn new(instrument_id: InstrumentId, price_increment: Price, config: MatchingCoreConfig) -> Self {
        Self {
            instrument_id,
            price_increment,
            bid: None,
            ask: None,
            last: None,
            is_bid_initialized: false,
            is_ask_initialized: false,
            is_last_initialized: false,
            config,
            orders_bid: Vec::new(),
            orders_ask: Vec::new(),
            bid_dirty: false,
            ask_dirty: false,
            next_sequence: 0,
            trigger_stop_order: None,
            fill_market_order: None,
            fill_limit_order: None,
        }
    }

    pub fn set_fill_limit_order_handler(&mut self, handler: Box<dyn FillLimitOrderHandler>) {
        self.fill_limit_order = Some(handler);
    }

    pub fn set_trigger_stop_order_handler(&mut self, handler: Box<dyn TriggerStopOrderHandler>) {
        self.trigger_stop_order = Some(handler);
    }

    pub fn set_fill_market_order_handler(&mut self, handler: Box<dyn FillMarketOrderHandler>) {
        self.fill_market_order = Some(handler);
    }

    // -- QUERIES -----------------------------------------------------------------------------

    #[must_use]
    pub const fn price_precision(&self) -> u8 {
        self.price_increment.precision
    }

    #[must_use]
    pub fn get_order(&self, client_order_id: ClientOrderId) -> Option<&Order> {
        self.orders_bid
            .iter()
            .chain(self.orders_ask.iter())
            .find(|(_, o)| o.client_order_id == client_order_id)
            .map(|(_, o)| o)
    }

    #[must_use]
    pub fn get_orders_bid(&self) -> Vec<&Order> {
        self.orders_bid.iter().map(|(_, o)| o).collect()
    }

    #[must_use]
    pub fn get_orders_ask(&self) -> Vec<&Order> {
        self.orders_ask.iter().map(|(_, o)| o).collect()
    }

    #[must_use]
    pub fn order_exists(&self, client_order_id: ClientOrderId) -> bool {
        self.get_order(client_order_id).is_some()
    }

    // -- COMMANDS ------------------------------------------------------------------------------

    pub fn set_last_raw(&mut self, last: Price) {
        self.last = Some(last);
        self.is_last_initialized = true;
    }

    pub fn set_bid_raw(&mut self, bid: Price) {
        self.bid = Some(bid);
        self.is_bid_initialized = true;
    }

    pub fn set_ask_raw(&mut self, ask: Price) {
        self.ask = Some(ask);
        self.is_ask_initialized = true;
    }

    pub fn reset(&mut self) {
        self.bid = None;
        self.ask = None;
        self.last = None;
        self.is_bid_initialized = false;
        self.is_ask_initialized = false;
        self.is_last_initialized = false;
        self.orders_bid.clear();
        self.orders_ask.clear();
    }

    /// Adds a passive order to the matching core, or, if it would cross the book on arrival,
    /// matches or triggers it immediately instead of letting it rest.
    ///
    /// # Errors
    ///
    /// Returns [`MatchingCoreError::NotPassive`] for `MARKET` orders, which never rest in a book,
    /// and [`MatchingCoreError::StopOrdersRejected`] when the instrument is configured to reject
    /// the stop family.
    pub fn add_order(&mut self, order: Order) -> Result<(), MatchingCoreError> {
        if order.order_type == OrderType::Market {
            return Err(MatchingCoreError::NotPassive(order.client_order_id));
        }
        if self.config.reject_stop_orders && is_stop_family(order.order_type) {
            return Err(MatchingCoreError::StopOrdersRejected(order.client_order_id));
        }

        if self.match_order(&order, true) {
            return Ok(());
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        match order.order_side.as_specified() {
            OrderSideSpecified::Buy => {
                self.orders_bid.push((sequence, order));
                self.bid_dirty = true;
            }
            OrderSideSpecified::Sell => {
                self.orders_ask.push((sequence, order));
                self.ask_dirty = true;
            }
        }
        Ok(())
    }

    /// Removes a resting order from the matching core.
    ///
    /// # Errors
    ///
    /// Returns [`MatchingCoreError::NotFound`] if the order isn't resting on either side.
    pub fn delete_order(&mut self, client_order_id: ClientOrderId) -> Result<(), MatchingCoreError> {
        if let Some(index) = self.orders_bid.iter().position(|(_, o)| o.client_order_id == client_order_id) {
            self.orders_bid.remove(index);
            return Ok(());
        }
        if let Some(index) = self.orders_ask.iter().position(|(_, o)| o.client_order_id == client_order_id) {
            self.orders_ask.remove(index);
            return Ok(());
        }
        Err(MatchingCoreError::NotFound(client_order_id))
    }

    pub fn iterate(&mut self) {
        self.iterate_bids();
        self.iterate_asks();
    }

    pub fn iterate_bids(&mut self) {
        self.sort_bids();
        let orders: Vec<Order> = self.orders_bid.iter().map(|(_, o)| o.clone()).collect();
        for order in &orders {
            self.match_order(order, false);
        }
    }

    pub fn iterate_asks(&mut self) {
        self.sort_asks();
        let orders: Vec<Order> = self.orders_ask.iter().map(|(_, o)| o.clone()).collect();
        for order in &orders {
            self.match_order(order, false);
        }
    }

    fn sort_bids(&mut self) {
        if !self.bid_dirty {
            return;
        }
        self.orders_bid
            .sort_by(|a, b| sort_key(&b.1).cmp(&sort_key(&a.1)).then(a.0.cmp(&b.0)));
        self.bid_dirty = false;
    }

    fn sort_asks(&mut self) {
        if !self.ask_dirty {
            return;
        }
        self.orders_ask
            .sort_by(|a, b| sort_key(&a.1).cmp(&sort_key(&b.1)).then(a.0.cmp(&b.0)));
        self.ask_dirty = false;
    }

    // -- MATCHING ------------------------------------------------------------------------------

    /// Applies `order`'s matching predicate and invokes the corresponding callback. `initial`
    /// distinguishes a just-arrived order crossing the book (taker) from a resting order the
    /// market has moved into (maker); see [`Self::determine_order_liquidity`].
    ///
    /// Returns whether the order matched or triggered, so [`Self::add_order`] knows not to let
    /// it rest.
    pub fn match_order(&mut self, order: &Order, initial: bool) -> bool {
        match order.order_type {
            OrderType::Limit => self.match_limit_order(order, initial),
            OrderType::StopMarket => self.match_stop_market_order(order),
            OrderType::StopLimit => self.match_stop_limit_order(order),
            OrderType::MarketIfTouched => self.match_market_if_touched_order(order),
            OrderType::LimitIfTouched => self.match_limit_if_touched_order(order),
            OrderType::Market => false,
        }
    }

    fn match_limit_order(&mut self, order: &Order, initial: bool) -> bool {
        let Some(price) = order.price else { return false };
        let side = order.order_side.as_specified();
        if !self.is_limit_matched(side, price) {
            return false;
        }
        let liquidity_side = self.determine_order_liquidity(initial);
        if let Some(handler) = &mut self.fill_limit_order {
            let mut filled = order.clone();
            handler.fill_limit_order(&mut filled, liquidity_side);
        }
        true
    }

    fn match_stop_market_order(&mut self, order: &Order) -> bool {
        let Some(trigger_price) = order.trigger_price else { return false };
        let side = order.order_side.as_specified();
        if !self.is_stop_matched(side, trigger_price) {
            return false;
        }
        if let Some(handler) = &mut self.fill_market_order {
            let mut filled = order.clone();
            handler.fill_market_order(&mut filled);
        }
        true
    }

    fn match_stop_limit_order(&mut self, order: &Order) -> bool {
        let Some(trigger_price) = order.trigger_price else { return false };
        let side = order.order_side.as_specified();
        if !self.is_stop_matched(side, trigger_price) {
            return false;
        }
        if let Some(handler) = &mut self.trigger_stop_order {
            let mut triggered = order.clone();
            handler.trigger_stop_order(&mut triggered);
        }
        true
    }

    fn match_market_if_touched_order(&mut self, order: &Order) -> bool {
        let Some(trigger_price) = order.trigger_price else { return false };
        let side = order.order_side.as_specified();
        if !self.is_touch_triggered(side, trigger_price) {
            return false;
        }
        if let Some(handler) = &mut self.fill_market_order {
            let mut filled = order.clone();
            handler.fill_market_order(&mut filled);
        }
        true
    }

    fn match_limit_if_touched_order(&mut self, order: &Order) -> bool {
        let Some(trigger_price) = order.trigger_price else { return false };
        let side = order.order_side.as_specified();
        if !self.is_touch_triggered(side, trigger_price) {
            return false;
        }
        if let Some(handler) = &mut self.trigger_stop_order {
            let mut triggered = order.clone();
            handler.trigger_stop_order(&mut triggered);
        }
        true
    }

    #[must_use]
    pub fn is_limit_matched(&self, side: OrderSideSpecified, price: Price) -> bool {
        match side {
            OrderSideSpecified::Buy => self.ask.is_some_and(|a| a <= price),
            OrderSideSpecified::Sell => self.bid.is_some_and(|b| b >= price),
        }
    }

    #[must_use]
    pub fn is_stop_matched(&self, side: OrderSideSpecified, trigger_price: Price) -> bool {
        match side {
            OrderSideSpecified::Buy => self.ask.is_some_and(|a| a >= trigger_price),
            OrderSideSpecified::Sell => self.bid.is_some_and(|b| b <= trigger_price),
        }
    }

    #[must_use]
    pub fn is_touch_triggered(&self, side: OrderSideSpecified, trigger_price: Price) -> bool {
        match side {
            OrderSideSpecified::Buy => self.ask.is_some_and(|a| a <= trigger_price),
            OrderSideSpecified::Sell => self.bid.is_some_and(|b| b >= trigger_price),
        }
    }

    /// A just-arrived order that crosses the book takes liquidity; a resting order the market
    /// later moves into provided it.
    #[must_use]
    pub const fn determine_order_liquidity(&self, initial: bool) -> LiquiditySide {
        if initial { LiquiditySide::Taker } else { LiquiditySide::Maker }
    }
}

const fn is_stop_family(order_type: OrderType) -> bool {
    matches!(
        order_type,
        OrderType::StopMarket | OrderType::StopLimit | OrderType::MarketIfTouched | OrderType::LimitIfTouched
    )
}

/// The price a resting order is sorted on: its trigger price while still armed, otherwise its
/// limit price.
fn sort_key(order: &Order) -> Price {
    order.trigger_price.or(order.price).unwrap_or(Price::new(0.0, 0))
}

#[cfg(test)]
mod tests {
    use quantflow_core::UnixNanos;
    use quantflow_model::{
        enums::{OmsType, OrderSide, TimeInForce},
        events::order::OrderInitialized,
        identifiers::stubs::{instrument_id_btcusdt, strategy_id, trader_id, uuid4},
        identifiers::ClientOrderId,
        types::Quantity,
    };

    use super::*;

    fn core() -> MatchingCore {
        MatchingCore::new(instrument_id_btcusdt(), Price::new(0.01, 2), MatchingCoreConfig::default())
    }

    fn limit_order(id: &str, side: OrderSide, price: f64) -> Order {
        Order::new(OrderInitialized::new(
            trader_id(),
            strategy_id(),
            instrument_id_btcusdt(),
            ClientOrderId::new(id),
            side,
            OrderType::Limit,
            Quantity::new(1.0, 3),
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

    struct RecordingFillLimit {
        fills: Vec<(ClientOrderId, LiquiditySide)>,
    }

    impl FillLimitOrderHandler for std::rc::Rc<std::cell::RefCell<RecordingFillLimit>> {
        fn fill_limit_order(&mut self, order: &mut Order, liquidity_side: LiquiditySide) {
            self.borrow_mut().fills.push((order.client_order_id, liquidity_side));
        }
    }

    #[test]
    fn test_add_order_bid_side() {
        let mut matching_core = core();
        let order = limit_order("O-1", OrderSide::Buy, 100.00);
        matching_core.add_order(order.clone()).unwrap();

        assert!(matching_core.order_exists(order.client_order_id));
        assert_eq!(matching_core.get_orders_bid().len(), 1);
        assert!(matching_core.get_orders_ask().is_empty());
    }

    #[test]
    fn test_add_order_ask_side() {
        let mut matching_core = core();
        let order = limit_order("O-1", OrderSide::Sell, 100.00);
        matching_core.add_order(order.clone()).unwrap();

        assert!(matching_core.get_orders_ask().len() == 1);
        assert!(matching_core.get_orders_bid().is_empty());
    }

    #[test]
    fn test_market_order_rejected() {
        let mut matching_core = core();
        let mut order = limit_order("O-1", OrderSide::Buy, 100.00);
        order.order_type = OrderType::Market;
        order.price = None;
        assert!(matching_core.add_order(order).is_err());
    }

    #[test]
    fn test_reset_clears_book_and_prices() {
        let mut matching_core = core();
        let order = limit_order("O-1", OrderSide::Sell, 100.00);
        matching_core.add_order(order.clone()).unwrap();
        matching_core.set_bid_raw(Price::new(100.0, 2));
        matching_core.set_ask_raw(Price::new(100.0, 2));

        matching_core.reset();

        assert!(matching_core.bid.is_none());
        assert!(matching_core.ask.is_none());
        assert!(!matching_core.order_exists(order.client_order_id));
    }

    #[test]
    fn test_delete_order_when_not_exists() {
        let mut matching_core = core();
        assert!(matching_core.delete_order(ClientOrderId::new("O-1")).is_err());
    }

    #[test]
    fn test_is_limit_matched_buy_crosses_at_ask() {
        let mut matching_core = core();
        matching_core.set_bid_raw(Price::new(100.00, 2));
        matching_core.set_ask_raw(Price::new(101.00, 2));

        assert!(!matching_core.is_limit_matched(OrderSideSpecified::Buy, Price::new(100.00, 2)));
        assert!(matching_core.is_limit_matched(OrderSideSpecified::Buy, Price::new(101.00, 2)));
        assert!(matching_core.is_limit_matched(OrderSideSpecified::Buy, Price::new(102.00, 2)));
    }

    #[test]
    fn test_is_stop_matched_sell_triggers_below_bid() {
        let mut matching_core = core();
        matching_core.set_bid_raw(Price::new(100.00, 2));
        matching_core.set_ask_raw(Price::new(101.00, 2));

        assert!(matching_core.is_stop_matched(OrderSideSpecified::Sell, Price::new(100.00, 2)));
        assert!(!matching_core.is_stop_matched(OrderSideSpecified::Sell, Price::new(101.00, 2)));
    }

    #[test]
    fn test_resting_fill_reports_maker_crossing_fill_reports_taker() {
        let mut matching_core = core();
        let fills = std::rc::Rc::new(std::cell::RefCell::new(RecordingFillLimit { fills: Vec::new() }));
        matching_core.set_fill_limit_order_handler(Box::new(fills.clone()));

        let resting = limit_order("O-1", OrderSide::Sell, 101.00);
        matching_core.add_order(resting.clone()).unwrap();
        matching_core.set_bid_raw(Price::new(100.00, 2));
        matching_core.set_ask_raw(Price::new(101.00, 2));

        // market moves up to the resting ask: it provided liquidity, so it's the maker.
        matching_core.set_bid_raw(Price::new(101.00, 2));
        matching_core.iterate();
        assert_eq!(fills.borrow().fills, vec![(resting.client_order_id, LiquiditySide::Maker)]);

        // a second order arrives already crossing the book: it took liquidity, so it's the taker.
        fills.borrow_mut().fills.clear();
        let crossing = limit_order("O-2", OrderSide::Buy, 101.00);
        matching_core.add_order(crossing.clone()).unwrap();
        assert_eq!(fills.borrow().fills, vec![(crossing.client_order_id, LiquiditySide::Taker)]);
    }
}
