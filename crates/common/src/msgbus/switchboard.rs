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

//! Lazily-built, cached topic strings for the built-in execution topics.

use std::collections::HashMap;

use quantflow_model::identifiers::{AccountId, ClientId, StrategyId};

use super::core::{MStr, Topic};

/// Builds and caches the canonical topic for each strategy/account/client once, so that callers
/// don't repeatedly format and re-validate the same topic string.
#[derive(Debug, Default)]
pub struct MessagingSwitchboard {
    order_events: HashMap<StrategyId, MStr<Topic>>,
    position_events: HashMap<StrategyId, MStr<Topic>>,
    account_events: HashMap<AccountId, MStr<Topic>>,
    command_topics: HashMap<ClientId, MStr<Topic>>,
}

impl MessagingSwitchboard {
    #[must_use]
    pub fn get_order_events_topic(&mut self, strategy_id: StrategyId) -> MStr<Topic> {
        *self
            .order_events
            .entry(strategy_id)
            .or_insert_with(|| MStr::<Topic>::from(format!("events.order.{strategy_id}")))
    }

    #[must_use]
    pub fn get_position_events_topic(&mut self, strategy_id: StrategyId) -> MStr<Topic> {
        *self
            .position_events
            .entry(strategy_id)
            .or_insert_with(|| MStr::<Topic>::from(format!("events.position.{strategy_id}")))
    }

    #[must_use]
    pub fn get_account_events_topic(&mut self, account_id: AccountId) -> MStr<Topic> {
        *self
            .account_events
            .entry(account_id)
            .or_insert_with(|| MStr::<Topic>::from(format!("events.account.{account_id}")))
    }

    #[must_use]
    pub fn get_commands_topic(&mut self, client_id: ClientId) -> MStr<Topic> {
        *self
            .command_topics
            .entry(client_id)
            .or_insert_with(|| MStr::<Topic>::from(format!("commands.{client_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_events_topic_is_stable_across_calls() {
        let mut switchboard = MessagingSwitchboard::default();
        let strategy_id = StrategyId::new("STRAT-001");

        let first = switchboard.get_order_events_topic(strategy_id);
        let second = switchboard.get_order_events_topic(strategy_id);

        assert_eq!(first, second);
        assert_eq!(first.to_string(), "events.order.STRAT-001");
    }

    #[test]
    fn test_distinct_entities_get_distinct_topics() {
        let mut switchboard = MessagingSwitchboard::default();
        let a = switchboard.get_position_events_topic(StrategyId::new("STRAT-001"));
        let b = switchboard.get_position_events_topic(StrategyId::new("STRAT-002"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_commands_topic_format() {
        let mut switchboard = MessagingSwitchboard::default();
        let topic = switchboard.get_commands_topic(ClientId::new("BINANCE"));
        assert_eq!(topic.to_string(), "commands.BINANCE");
    }
}
