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

use serde::{Deserialize, Serialize};

/// Configuration for a [`Cache`](super::Cache) instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Closed orders younger than this are kept by [`purge_closed_orders`](super::Cache::purge_closed_orders);
    /// `None` disables time-based purging.
    pub purge_closed_orders_buffer_secs: Option<u64>,
    /// Closed positions younger than this are kept by [`purge_closed_positions`](super::Cache::purge_closed_positions);
    /// `None` disables time-based purging.
    pub purge_closed_positions_buffer_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            purge_closed_orders_buffer_secs: None,
            purge_closed_positions_buffer_secs: None,
        }
    }
}
