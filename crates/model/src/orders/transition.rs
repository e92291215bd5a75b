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

use crate::enums::OrderStatus;

/// Returns `true` if transitioning an order from `current` to `new` is a valid move in the
/// order status state machine.
///
/// `PartiallyFilled` is reflexive: a second partial fill re-enters the same status.
#[must_use]
pub fn check_order_status_transition(current: OrderStatus, new: OrderStatus) -> bool {
    use OrderStatus::{
        Accepted, Canceled, Expired, Filled, Initialized, PartiallyFilled, PendingCancel,
        PendingUpdate, Rejected, Submitted, Triggered,
    };

    matches!(
        (current, new),
        (Initialized, Submitted)
            | (Initialized, Rejected)
            | (Initialized, Canceled)
            | (Submitted, Accepted)
            | (Submitted, Rejected)
            | (Submitted, Canceled)
            | (Accepted, Triggered)
            | (Accepted, Canceled)
            | (Accepted, Expired)
            | (Accepted, PendingUpdate)
            | (Accepted, PendingCancel)
            | (Accepted, PartiallyFilled)
            | (Accepted, Filled)
            | (Triggered, Canceled)
            | (Triggered, Expired)
            | (Triggered, PendingUpdate)
            | (Triggered, PendingCancel)
            | (Triggered, PartiallyFilled)
            | (Triggered, Filled)
            | (PendingUpdate, Accepted)
            | (PendingUpdate, Triggered)
            | (PendingUpdate, Canceled)
            | (PendingUpdate, Expired)
            | (PendingUpdate, PartiallyFilled)
            | (PendingUpdate, Filled)
            | (PendingCancel, Accepted)
            | (PendingCancel, Triggered)
            | (PendingCancel, Canceled)
            | (PendingCancel, Expired)
            | (PendingCancel, PartiallyFilled)
            | (PendingCancel, Filled)
            | (PartiallyFilled, PartiallyFilled)
            | (PartiallyFilled, Filled)
            | (PartiallyFilled, Canceled)
            | (PartiallyFilled, Expired)
            | (PartiallyFilled, PendingUpdate)
            | (PartiallyFilled, PendingCancel)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_is_valid() {
        assert!(check_order_status_transition(
            OrderStatus::Initialized,
            OrderStatus::Submitted
        ));
        assert!(check_order_status_transition(
            OrderStatus::Submitted,
            OrderStatus::Accepted
        ));
        assert!(check_order_status_transition(
            OrderStatus::Accepted,
            OrderStatus::Filled
        ));
    }

    #[test]
    fn test_terminal_statuses_reject_all_transitions() {
        for terminal in [OrderStatus::Filled, OrderStatus::Canceled, OrderStatus::Rejected] {
            for new in [OrderStatus::Accepted, OrderStatus::PartiallyFilled] {
                assert!(!check_order_status_transition(terminal, new));
            }
        }
    }

    #[test]
    fn test_partially_filled_is_reflexive() {
        assert!(check_order_status_transition(
            OrderStatus::PartiallyFilled,
            OrderStatus::PartiallyFilled
        ));
    }
}
