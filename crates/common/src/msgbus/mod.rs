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

//! An in-memory message bus for loosely coupled pub/sub, request/response and point-to-point
//! message passing patterns.

pub mod core;
pub mod handler;
pub mod matching;
pub mod switchboard;

pub use core::{Endpoint, MStr, MessageBus, Pattern, Subscription, Topic};

pub use handler::{MessageHandler, ShareableMessageHandler, TypedMessageHandler};
pub use switchboard::MessagingSwitchboard;

/// Error kinds a caller of the message bus is expected to react to.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MessageBusError {
    #[error("endpoint '{endpoint}' is already registered")]
    DuplicateEndpoint { endpoint: String },
    #[error("correlation id {correlation_id} already has a registered handler")]
    DuplicateCorrelationId { correlation_id: quantflow_core::UUID4 },
}
