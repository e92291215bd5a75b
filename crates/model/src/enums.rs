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

//! Enumerations shared by orders, positions, accounts and the matching core.

use std::collections::HashSet;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, FromRepr};

/// The side of an order.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    /// No order side is specified.
    #[default]
    NoOrderSide = 0,
    /// The order is a BUY.
    Buy = 1,
    /// The order is a SELL.
    Sell = 2,
}

impl OrderSide {
    /// Returns the specified [`OrderSideSpecified`] (BUY or SELL) for this side.
    ///
    /// # Panics
    ///
    /// Panics if `self` is [`OrderSide::NoOrderSide`].
    #[must_use]
    pub fn as_specified(&self) -> OrderSideSpecified {
        match self {
            Self::Buy => OrderSideSpecified::Buy,
            Self::Sell => OrderSideSpecified::Sell,
            Self::NoOrderSide => panic!("invariant failed: side must be `Buy` or `Sell`"),
        }
    }

    /// Returns the sign of this side for PnL arithmetic: `+1` for BUY, `-1` for SELL.
    ///
    /// # Panics
    ///
    /// Panics if `self` is [`OrderSide::NoOrderSide`].
    #[must_use]
    pub fn as_sign(&self) -> i8 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
            Self::NoOrderSide => panic!("invariant failed: side must be `Buy` or `Sell`"),
        }
    }

    #[must_use]
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
            Self::NoOrderSide => Self::NoOrderSide,
        }
    }
}

/// The specified order side (BUY or SELL, never "no side").
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
#[allow(clippy::enum_variant_names)]
pub enum OrderSideSpecified {
    Buy = 1,
    Sell = 2,
}

impl OrderSideSpecified {
    #[must_use]
    pub fn opposite(&self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }

    #[must_use]
    pub fn as_order_side(&self) -> OrderSide {
        match self {
            Self::Buy => OrderSide::Buy,
            Self::Sell => OrderSide::Sell,
        }
    }
}

/// The status for a specific order.
///
/// An order is considered _open_ for: `ACCEPTED`, `TRIGGERED`, `PENDING_UPDATE`,
/// `PENDING_CANCEL`, `PARTIALLY_FILLED`.
///
/// An order is considered _closed_ for: `REJECTED`, `CANCELED`, `EXPIRED`, `FILLED`.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// The order is initialized within the local system, not yet sent anywhere.
    #[default]
    Initialized = 1,
    /// The order was submitted to the execution client (awaiting acknowledgement).
    Submitted = 2,
    /// The order was acknowledged by the venue as received and valid.
    Accepted = 3,
    /// The order was rejected by the venue.
    Rejected = 4,
    /// The order was canceled (closed/done).
    Canceled = 5,
    /// The order reached a time-in-force expiration (closed/done).
    Expired = 6,
    /// The order's STOP price was triggered on the venue.
    Triggered = 7,
    /// The order is currently pending a request to modify on the venue.
    PendingUpdate = 8,
    /// The order is currently pending a request to cancel on the venue.
    PendingCancel = 9,
    /// The order has been partially filled on the venue.
    PartiallyFilled = 10,
    /// The order has been completely filled on the venue (closed/done).
    Filled = 11,
}

impl OrderStatus {
    #[must_use]
    pub fn is_open(&self) -> bool {
        Self::open_statuses_set().contains(self)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        !self.is_open()
    }

    #[must_use]
    pub fn open_statuses_set() -> &'static HashSet<Self> {
        static OPEN_SET: OnceLock<HashSet<OrderStatus>> = OnceLock::new();
        OPEN_SET.get_or_init(|| {
            HashSet::from_iter([
                Self::Accepted,
                Self::Triggered,
                Self::PendingUpdate,
                Self::PendingCancel,
                Self::PartiallyFilled,
            ])
        })
    }
}

/// The type of order.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Fills immediately at the best available price.
    Market = 1,
    /// Fills at a specific price or better.
    Limit = 2,
    /// Becomes a market order once price crosses the trigger.
    StopMarket = 3,
    /// Becomes a limit order once price crosses the trigger.
    StopLimit = 4,
    /// Becomes a market order once price touches the trigger (opposite side of a stop).
    MarketIfTouched = 5,
    /// Becomes a limit order once price touches the trigger (opposite side of a stop).
    LimitIfTouched = 6,
}

/// The market side for a position, or a filter value meaning "no side".
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    /// Only valid as a filter value; never set on an actual position.
    #[default]
    NoPositionSide = 0,
    /// Net quantity is zero.
    Flat = 1,
    /// Net quantity is positive.
    Long = 2,
    /// Net quantity is negative.
    Short = 3,
}

impl PositionSide {
    #[must_use]
    pub fn from_net_qty(net_qty: f64) -> Self {
        if net_qty > 0.0 {
            Self::Long
        } else if net_qty < 0.0 {
            Self::Short
        } else {
            Self::Flat
        }
    }
}

/// Liquidity side of a fill: whether the order posted (maker) or crossed the book (taker).
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LiquiditySide {
    #[default]
    NoLiquiditySide = 0,
    Maker = 1,
    Taker = 2,
}

/// Time-in-force instruction for an order.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Good till canceled.
    #[default]
    Gtc = 1,
    /// Immediate or cancel.
    Ioc = 2,
    /// Fill or kill.
    Fok = 3,
    /// Good till date.
    Gtd = 4,
    /// Valid for the current trading day only.
    Day = 5,
    /// At the opening auction only.
    AtTheOpen = 6,
    /// At the closing auction only.
    AtTheClose = 7,
}

/// The trigger reference price type used by stop and if-touched orders.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    #[default]
    NoTrigger = 0,
    Default = 1,
    BidAsk = 2,
    LastPrice = 3,
    MarkPrice = 4,
    IndexPrice = 5,
}

/// The order management scheme for a venue/strategy pairing.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum OmsType {
    /// Not configured; the venue's own behavior determines netting.
    #[default]
    Unspecified = 0,
    /// One position per instrument per strategy; opposing fills net against it.
    Netting = 1,
    /// One position per originating trade; fills never net against each other.
    Hedging = 2,
}

/// Contingency relationship between orders in an order list.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ContingencyType {
    #[default]
    NoContingency = 0,
    Oco = 1,
    Oto = 2,
    Ouo = 3,
}

/// The classification of an account.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Cash = 1,
    Margin = 2,
    Betting = 3,
}

/// Currency classification, used to decide default precision/rounding conventions.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CurrencyType {
    Crypto = 1,
    Fiat = 2,
}

/// Which side of a bet a betting-account order represents.
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BetSide {
    /// Betting that the outcome occurs.
    Back = 1,
    /// Betting that the outcome does not occur.
    Lay = 2,
}

/// Lifecycle state of the execution engine (and other runtime components).
#[repr(C)]
#[derive(
    Copy, Clone, Debug, Default, Display, Hash, PartialEq, Eq, PartialOrd, Ord,
    AsRefStr, FromRepr, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive, serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentState {
    #[default]
    PreInitialized = 0,
    Ready = 1,
    Running = 2,
    Stopped = 3,
    Disposed = 4,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_is_open() {
        assert!(OrderStatus::Accepted.is_open());
        assert!(OrderStatus::PartiallyFilled.is_open());
        assert!(!OrderStatus::Filled.is_open());
        assert!(!OrderStatus::Canceled.is_open());
    }

    #[test]
    fn test_order_side_as_sign() {
        assert_eq!(OrderSide::Buy.as_sign(), 1);
        assert_eq!(OrderSide::Sell.as_sign(), -1);
    }

    #[test]
    fn test_position_side_from_net_qty() {
        assert_eq!(PositionSide::from_net_qty(10.0), PositionSide::Long);
        assert_eq!(PositionSide::from_net_qty(-10.0), PositionSide::Short);
        assert_eq!(PositionSide::from_net_qty(0.0), PositionSide::Flat);
    }

    #[test]
    fn test_enum_string_round_trip() {
        use std::str::FromStr;
        assert_eq!(OrderSide::from_str("BUY").unwrap(), OrderSide::Buy);
        assert_eq!(OrderSide::Buy.to_string(), "BUY");
    }
}
