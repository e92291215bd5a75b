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

//! Value types: fixed-point [`Price`], [`Quantity`] and [`Money`], [`Currency`], and account
//! balance snapshots.

pub mod balance;
pub mod currency;
pub mod fixed;
pub mod instrument_spec;
pub mod money;
pub mod price;
pub mod quantity;

pub use balance::{AccountBalance, MarginBalance};
pub use currency::Currency;
pub use instrument_spec::InstrumentSpec;
pub use money::Money;
pub use price::Price;
pub use quantity::Quantity;
