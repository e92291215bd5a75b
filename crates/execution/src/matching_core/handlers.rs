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

//! The callbacks a [`super::MatchingCore`] reports match/trigger outcomes through.
//!
//! The core only decides ordering and timing; it never builds or publishes fill events itself.
//! There is a single consumer of each callback in this workspace (the simulated execution
//! client), so these are plain trait objects rather than the multi-variant dispatch enum a
//! matching core shared by several consumers would need.

use quantflow_model::{enums::LiquiditySide, orders::Order};

/// Notified when a resting `STOP_MARKET` or `MARKET_IF_TOUCHED` order triggers. Always fills at
/// the prevailing market price, so there is no liquidity side to report: triggering into an
/// immediate market execution is definitionally taking liquidity.
pub trait FillMarketOrderHandler {
    fn fill_market_order(&mut self, order: &mut Order);
}

/// Notified when a resting `LIMIT` order's price is matched by the book.
pub trait FillLimitOrderHandler {
    fn fill_limit_order(&mut self, order: &mut Order, liquidity_side: LiquiditySide);
}

/// Notified when a resting `STOP_LIMIT` or `LIMIT_IF_TOUCHED` order's trigger price is touched.
/// The order itself is not filled yet, only converted into a working limit order at its `price`.
pub trait TriggerStopOrderHandler {
    fn trigger_stop_order(&mut self, order: &mut Order);
}
