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

use quantflow_model::enums::OmsType;
use serde::{Deserialize, Serialize};

/// Configuration for [`crate::engine::ExecutionEngine`] instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionEngineConfig {
    /// If the cache should be loaded from its backing [`crate::engine::client`] store on start.
    #[serde(default = "default_true")]
    pub load_cache: bool,
    /// The OMS type applied when neither a strategy nor a venue routing override supplies one.
    #[serde(default)]
    pub default_oms_type: OmsType,
    /// If venue-reported state is reconciled against the cache on start (and on mass status).
    #[serde(default = "default_true")]
    pub reconciliation: bool,
    /// Lookback window (seconds) used by [`crate::engine::ExecutionEngine::purge_account_events`].
    #[serde(default)]
    pub purge_account_events_lookback_secs: u64,
    /// If debug mode is active (extra per-command/event logging).
    #[serde(default)]
    pub debug: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for ExecutionEngineConfig {
    fn default() -> Self {
        Self {
            load_cache: true,
            default_oms_type: OmsType::Netting,
            reconciliation: true,
            purge_account_events_lookback_secs: 0,
            debug: false,
        }
    }
}
