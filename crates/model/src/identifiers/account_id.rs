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

//! Identifies a trading account, scoped to a single venue.

use std::fmt::{Debug, Display, Formatter};

use quantflow_core::correctness::{FAILED, check_valid_string};
use serde::{Deserialize, Serialize};
use ustr::Ustr;

use super::{macros::impl_string_identifier, venue::Venue};

impl_string_identifier!(AccountId, "Identifies a trading account, scoped to a single venue.");

impl AccountId {
    /// Returns the venue issuing this account, parsed from the `ISSUER-NUMBER` convention.
    ///
    /// # Panics
    ///
    /// Panics if the identifier does not contain a `-` separator.
    #[must_use]
    pub fn get_issuer(&self) -> Venue {
        let (issuer, _) = self
            .as_str()
            .split_once('-')
            .expect("AccountId must be formatted as ISSUER-NUMBER");
        Venue::new(issuer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_issuer() {
        let account_id = AccountId::new("SIM-001");
        assert_eq!(account_id.get_issuer(), Venue::new("SIM"));
    }
}
