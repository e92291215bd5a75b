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

//! Identifies a strategy instance within a trader.

use std::fmt::{Debug, Display, Formatter};

use quantflow_core::correctness::{FAILED, check_valid_string};
use serde::{Deserialize, Serialize};
use ustr::Ustr;

use super::macros::impl_string_identifier;

/// The strategy ID assigned to orders the engine sees but never submitted itself.
const EXTERNAL_STRATEGY_ID: &str = "EXTERNAL";

impl_string_identifier!(StrategyId, "Identifies a strategy instance within a trader.");

impl StrategyId {
    #[must_use]
    pub fn external() -> Self {
        Self::new(EXTERNAL_STRATEGY_ID)
    }

    #[must_use]
    pub fn is_external(&self) -> bool {
        self.as_str() == EXTERNAL_STRATEGY_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_round_trips_through_is_external() {
        assert!(StrategyId::external().is_external());
        assert!(!StrategyId::new("S-001").is_external());
    }
}
