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

//! Position lifecycle events, published by the execution engine as positions open, change and
//! close in response to fills.

mod changed;
mod closed;
mod opened;

pub use changed::PositionChanged;
pub use closed::PositionClosed;
pub use opened::PositionOpened;

use quantflow_core::UnixNanos;

use crate::identifiers::{InstrumentId, PositionId, StrategyId};

/// Union of every concrete position event.
#[derive(Clone, Debug, PartialEq)]
pub enum PositionEventAny {
    Opened(PositionOpened),
    Changed(PositionChanged),
    Closed(PositionClosed),
}

impl PositionEventAny {
    #[must_use]
    pub fn position_id(&self) -> PositionId {
        match self {
            Self::Opened(e) => e.position_id,
            Self::Changed(e) => e.position_id,
            Self::Closed(e) => e.position_id,
        }
    }

    #[must_use]
    pub fn strategy_id(&self) -> StrategyId {
        match self {
            Self::Opened(e) => e.strategy_id,
            Self::Changed(e) => e.strategy_id,
            Self::Closed(e) => e.strategy_id,
        }
    }

    #[must_use]
    pub fn instrument_id(&self) -> InstrumentId {
        match self {
            Self::Opened(e) => e.instrument_id,
            Self::Changed(e) => e.instrument_id,
            Self::Closed(e) => e.instrument_id,
        }
    }

    #[must_use]
    pub fn ts_event(&self) -> UnixNanos {
        match self {
            Self::Opened(e) => e.ts_event,
            Self::Changed(e) => e.ts_event,
            Self::Closed(e) => e.ts_event,
        }
    }
}
