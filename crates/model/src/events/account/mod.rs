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

//! The single event an [`Account`](crate::accounts::Account) emits: a full snapshot of its
//! balances and margins, published after every state-changing operation.

mod state;

pub use state::AccountState;
