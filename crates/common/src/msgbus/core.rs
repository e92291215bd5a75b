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

//! The in-process message bus: pub/sub, request/response and point-to-point dispatch.

use std::{
    any::Any,
    fmt::{self, Display},
    hash::{Hash, Hasher},
    ops::Deref,
};

use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;
use quantflow_core::{
    UUID4,
    correctness::{FAILED, check_predicate_true, check_valid_string_ascii},
};
use quantflow_model::identifiers::TraderId;
use ustr::Ustr;

use super::{
    MessageBusError,
    handler::ShareableMessageHandler,
    matching::is_matching,
    switchboard::MessagingSwitchboard,
};

#[inline(always)]
fn check_fully_qualified_string(value: &Ustr, key: &str) -> anyhow::Result<()> {
    check_predicate_true(
        !value.chars().any(|c| c == '*' || c == '?'),
        &format!("{key} `value` contained invalid characters, was {value}"),
    )
}

/// Marker for a wildcard subscription pattern.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pattern;

/// Marker for a fully qualified publish topic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Topic;

/// Marker for a fully qualified point-to-point endpoint address.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint;

/// An interned, phantom-typed string: a [`Pattern`], [`Topic`] or [`Endpoint`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MStr<T> {
    value: Ustr,
    _marker: std::marker::PhantomData<T>,
}

impl<T> Display for MStr<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Deref for MStr<T> {
    type Target = Ustr;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl MStr<Pattern> {
    /// Creates a new pattern from a string. Patterns may contain `*`/`?` wildcards.
    pub fn pattern<T: AsRef<str>>(value: T) -> Self {
        Self {
            value: Ustr::from(value.as_ref()),
            _marker: std::marker::PhantomData,
        }
    }
}

impl<T: AsRef<str>> From<T> for MStr<Pattern> {
    fn from(value: T) -> Self {
        Self::pattern(value)
    }
}

impl From<MStr<Topic>> for MStr<Pattern> {
    fn from(value: MStr<Topic>) -> Self {
        Self {
            value: value.value,
            _marker: std::marker::PhantomData,
        }
    }
}

impl MStr<Topic> {
    /// Creates a new topic from a fully qualified string.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not valid ASCII or contains `*`/`?`.
    pub fn topic<T: AsRef<str>>(value: T) -> anyhow::Result<Self> {
        let topic = Ustr::from(value.as_ref());
        check_valid_string_ascii(value, stringify!(value))?;
        check_fully_qualified_string(&topic, stringify!(Topic))?;

        Ok(Self {
            value: topic,
            _marker: std::marker::PhantomData,
        })
    }
}

impl<T: AsRef<str>> From<T> for MStr<Topic> {
    fn from(value: T) -> Self {
        Self::topic(value).expect(FAILED)
    }
}

impl MStr<Endpoint> {
    /// Creates a new endpoint from a fully qualified string.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not valid ASCII or contains `*`/`?`.
    pub fn endpoint<T: AsRef<str>>(value: T) -> anyhow::Result<Self> {
        let endpoint = Ustr::from(value.as_ref());
        check_valid_string_ascii(value, stringify!(value))?;
        check_fully_qualified_string(&endpoint, stringify!(Endpoint))?;

        Ok(Self {
            value: endpoint,
            _marker: std::marker::PhantomData,
        })
    }
}

impl<T: AsRef<str>> From<T> for MStr<Endpoint> {
    fn from(value: T) -> Self {
        Self::endpoint(value).expect(FAILED)
    }
}

/// A subscription to a pattern, with an associated priority.
///
/// Identity is `(pattern, handler_id)`; `priority` is ignored by `Eq`/`Hash` but sorts
/// subscriptions descending so higher-priority handlers receive a publish first.
#[derive(Clone, Debug)]
pub struct Subscription {
    pub handler: ShareableMessageHandler,
    pub handler_id: Ustr,
    pub pattern: MStr<Pattern>,
    pub priority: u8,
}

impl Subscription {
    #[must_use]
    pub fn new(
        pattern: MStr<Pattern>,
        handler: ShareableMessageHandler,
        priority: Option<u8>,
    ) -> Self {
        Self {
            handler_id: handler.id(),
            pattern,
            handler,
            priority: priority.unwrap_or(0),
        }
    }
}

impl PartialEq<Self> for Subscription {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.handler_id == other.handler_id
    }
}

impl Eq for Subscription {}

impl PartialOrd for Subscription {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Subscription {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.pattern.cmp(&other.pattern))
            .then_with(|| self.handler_id.cmp(&other.handler_id))
    }
}

impl Hash for Subscription {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
        self.handler_id.hash(state);
    }
}

/// A single-threaded message bus combining pub/sub, request/response, and point-to-point
/// dispatch.
///
/// Resolved subscribers for a concrete topic are memoized in `topics`; subscribing or
/// unsubscribing invalidates every cached entry whose pattern could match the changed
/// subscription so that a later `publish` for that topic recomputes it once.
#[derive(Debug)]
pub struct MessageBus {
    pub trader_id: TraderId,
    pub instance_id: UUID4,
    pub name: String,
    switchboard: MessagingSwitchboard,
    subscriptions: AHashSet<Subscription>,
    topics: IndexMap<MStr<Topic>, Vec<Subscription>>,
    endpoints: IndexMap<MStr<Endpoint>, ShareableMessageHandler>,
    correlation_index: AHashMap<UUID4, ShareableMessageHandler>,
}

impl MessageBus {
    #[must_use]
    pub fn new(trader_id: TraderId, instance_id: UUID4, name: Option<String>) -> Self {
        Self {
            trader_id,
            instance_id,
            name: name.unwrap_or_else(|| stringify!(MessageBus).to_owned()),
            switchboard: MessagingSwitchboard::default(),
            subscriptions: AHashSet::new(),
            topics: IndexMap::new(),
            endpoints: IndexMap::new(),
            correlation_index: AHashMap::new(),
        }
    }

    #[must_use]
    pub fn switchboard(&self) -> &MessagingSwitchboard {
        &self.switchboard
    }

    #[must_use]
    pub fn switchboard_mut(&mut self) -> &mut MessagingSwitchboard {
        &mut self.switchboard
    }

    #[must_use]
    pub fn endpoints(&self) -> Vec<&str> {
        self.endpoints.keys().map(|e| e.as_str()).collect()
    }

    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        self.subscriptions.iter().map(|s| s.pattern.as_str()).collect()
    }

    pub fn has_subscribers<T: AsRef<str>>(&self, topic: T) -> bool {
        self.subscriptions_count(topic) > 0
    }

    /// Returns the count of subscribers matching `topic`.
    ///
    /// # Panics
    ///
    /// Panics if `topic` is not a valid topic string.
    #[must_use]
    pub fn subscriptions_count<T: AsRef<str>>(&self, topic: T) -> usize {
        let topic = MStr::<Topic>::topic(topic).expect(FAILED);
        self.topics
            .get(&topic)
            .map_or_else(|| self.find_topic_matches(topic).len(), Vec::len)
    }

    #[must_use]
    pub fn subscriptions(&self) -> Vec<&Subscription> {
        self.subscriptions.iter().collect()
    }

    #[must_use]
    pub fn is_registered<T: AsRef<str>>(&self, endpoint: T) -> bool {
        let endpoint: MStr<Endpoint> = endpoint.into();
        self.endpoints.contains_key(&endpoint)
    }

    #[must_use]
    pub fn is_subscribed<T: AsRef<str>>(&self, pattern: T, handler: ShareableMessageHandler) -> bool {
        let pattern = MStr::<Pattern>::pattern(pattern);
        let sub = Subscription::new(pattern, handler, None);
        self.subscriptions.contains(&sub)
    }

    #[must_use]
    pub fn get_endpoint(&self, endpoint: MStr<Endpoint>) -> Option<&ShareableMessageHandler> {
        self.endpoints.get(&endpoint)
    }

    #[must_use]
    pub fn get_response_handler(&self, correlation_id: &UUID4) -> Option<&ShareableMessageHandler> {
        self.correlation_index.get(correlation_id)
    }

    /// Registers `handler` for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`MessageBusError::DuplicateEndpoint`] if an endpoint is already registered.
    pub fn register<T: AsRef<str>>(
        &mut self,
        endpoint: T,
        handler: ShareableMessageHandler,
    ) -> Result<(), MessageBusError> {
        let endpoint = MStr::<Endpoint>::from(endpoint);
        if self.endpoints.contains_key(&endpoint) {
            return Err(MessageBusError::DuplicateEndpoint { endpoint: endpoint.to_string() });
        }
        tracing::debug!(%endpoint, handler_id = %handler.id(), "registering endpoint");
        self.endpoints.insert(endpoint, handler);
        Ok(())
    }

    /// Deregisters the handler at `endpoint`, if any.
    pub fn deregister<T: AsRef<str>>(&mut self, endpoint: T) {
        let endpoint = MStr::<Endpoint>::from(endpoint);
        tracing::debug!(%endpoint, "deregistering endpoint");
        self.endpoints.shift_remove(&endpoint);
    }

    /// Sends `message` to the handler registered at `endpoint`.
    ///
    /// No-op (with an error log) if no handler is registered.
    pub fn send<T: AsRef<str>>(&self, endpoint: T, message: &dyn Any) {
        let endpoint = MStr::<Endpoint>::from(endpoint);
        match self.endpoints.get(&endpoint) {
            Some(handler) => handler.0.handle(message),
            None => tracing::error!(%endpoint, "dropped send: no endpoint registered"),
        }
    }

    /// Records `callback` under `correlation_id` then forwards `request` to `endpoint`.
    ///
    /// Error-logs (and skips the send) if the correlation id is already in use.
    pub fn request<T: AsRef<str>>(
        &mut self,
        endpoint: T,
        correlation_id: UUID4,
        callback: ShareableMessageHandler,
        request: &dyn Any,
    ) {
        if let Err(err) = self.register_response_handler(&correlation_id, callback) {
            tracing::error!(%correlation_id, %err, "dropped request");
            return;
        }
        self.send(endpoint, request);
    }

    /// Pops the handler registered for `response`'s correlation id and invokes it.
    ///
    /// Error-logs if no handler was registered for the id.
    pub fn response(&mut self, correlation_id: &UUID4, response: &dyn Any) {
        match self.correlation_index.remove(correlation_id) {
            Some(handler) => handler.0.handle(response),
            None => tracing::error!(%correlation_id, "dropped response: no registered handler"),
        }
    }

    /// Registers a response handler for `correlation_id`.
    ///
    /// # Errors
    ///
    /// Returns [`MessageBusError::DuplicateCorrelationId`] if already registered.
    pub fn register_response_handler(
        &mut self,
        correlation_id: &UUID4,
        handler: ShareableMessageHandler,
    ) -> Result<(), MessageBusError> {
        if self.correlation_index.contains_key(correlation_id) {
            return Err(MessageBusError::DuplicateCorrelationId { correlation_id: *correlation_id });
        }
        self.correlation_index.insert(*correlation_id, handler);
        Ok(())
    }

    /// Subscribes `handler` to `pattern` with the given `priority` (default 0).
    ///
    /// A duplicate `(pattern, handler)` subscription is a no-op. Invalidates any memoized
    /// topic whose subscriber set would change.
    pub fn subscribe<T: AsRef<str>>(
        &mut self,
        pattern: T,
        handler: ShareableMessageHandler,
        priority: Option<u8>,
    ) {
        let pattern = MStr::<Pattern>::pattern(pattern);
        let sub = Subscription::new(pattern, handler, priority);
        if self.subscriptions.contains(&sub) {
            tracing::error!(%pattern, handler_id = %sub.handler_id, "subscription already exists");
            return;
        }

        tracing::debug!(%pattern, handler_id = %sub.handler_id, "subscribing");
        self.invalidate_matching_topics(pattern);
        self.subscriptions.insert(sub);
    }

    /// Unsubscribes `handler` from `pattern`. A missing subscription is a no-op.
    pub fn unsubscribe<T: AsRef<str>>(&mut self, pattern: T, handler: ShareableMessageHandler) {
        let pattern = MStr::<Pattern>::pattern(pattern);
        let sub = Subscription::new(pattern, handler, None);
        if self.subscriptions.remove(&sub) {
            tracing::debug!(%pattern, handler_id = %sub.handler_id, "unsubscribing");
            self.invalidate_matching_topics(pattern);
        }
    }

    /// Delivers `message` to every subscription whose pattern matches `topic`, in descending
    /// priority order.
    pub fn publish<T: AsRef<str>>(&mut self, topic: T, message: &dyn Any) {
        let topic = MStr::<Topic>::from(topic);
        let subs = self.matching_subscriptions(topic);
        tracing::trace!(%topic, count = subs.len(), "publishing");
        for sub in subs {
            sub.handler.0.handle(message);
        }
    }

    /// Finds subscriptions with a pattern matching `topic`, without consulting the cache.
    pub(crate) fn find_topic_matches(&self, topic: MStr<Topic>) -> Vec<Subscription> {
        self.subscriptions
            .iter()
            .filter(|sub| is_matching(topic, sub.pattern))
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn matching_subscriptions<T: Into<MStr<Topic>>>(&mut self, topic: T) -> Vec<Subscription> {
        self.inner_matching_subscriptions(topic.into())
    }

    pub(crate) fn inner_matching_subscriptions(&mut self, topic: MStr<Topic>) -> Vec<Subscription> {
        self.topics.get(&topic).cloned().unwrap_or_else(|| {
            let mut matches = self.find_topic_matches(topic);
            matches.sort();
            self.topics.insert(topic, matches.clone());
            matches
        })
    }

    /// Drops every memoized topic whose pattern is a superset of, or overlaps with, `pattern`.
    ///
    /// Conservative: since `topics` only remembers the resolved concrete topic string, not the
    /// patterns that contributed to it, any cached topic that `pattern` matches is dropped.
    fn invalidate_matching_topics(&mut self, pattern: MStr<Pattern>) {
        self.topics.retain(|topic, _| !is_matching(*topic, pattern));
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new(TraderId::from("TRADER-001"), UUID4::new(), None)
    }
}

#[cfg(test)]
mod tests {
    use quantflow_model::identifiers::stubs::trader_id;

    use super::*;
    use crate::msgbus::handler::TypedMessageHandler;

    fn handler() -> ShareableMessageHandler {
        std::rc::Rc::new(TypedMessageHandler::<i32, _>::from(|_: &i32| {})).into()
    }

    #[test]
    fn test_register_rejects_duplicate_endpoint() {
        let mut bus = MessageBus::new(trader_id(), UUID4::new(), None);
        bus.register("strategy.exec", handler()).unwrap();
        let err = bus.register("strategy.exec", handler()).unwrap_err();
        assert!(matches!(err, MessageBusError::DuplicateEndpoint { .. }));
    }

    #[test]
    fn test_send_dispatches_to_registered_endpoint() {
        let mut bus = MessageBus::new(trader_id(), UUID4::new(), None);
        let received = std::rc::Rc::new(std::cell::RefCell::new(None));
        let received_clone = received.clone();
        let h: ShareableMessageHandler = std::rc::Rc::new(TypedMessageHandler::<i32, _>::from(
            move |msg: &i32| *received_clone.borrow_mut() = Some(*msg),
        ))
        .into();
        bus.register("strategy.exec", h).unwrap();

        bus.send("strategy.exec", &7_i32);

        assert_eq!(*received.borrow(), Some(7));
    }

    #[test]
    fn test_subscribe_is_idempotent_for_duplicate_pattern_and_handler() {
        let mut bus = MessageBus::new(trader_id(), UUID4::new(), None);
        let h = handler();
        bus.subscribe("events.order.*", h.clone(), None);
        bus.subscribe("events.order.*", h, None);
        assert_eq!(bus.subscriptions().len(), 1);
    }

    #[test]
    fn test_publish_respects_descending_priority_order() {
        let mut bus = MessageBus::new(trader_id(), UUID4::new(), None);
        let order: std::rc::Rc<std::cell::RefCell<Vec<&'static str>>> =
            std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));

        let low_order = order.clone();
        let low: ShareableMessageHandler = std::rc::Rc::new(TypedMessageHandler::<i32, _>::from(
            move |_: &i32| low_order.borrow_mut().push("low"),
        ))
        .into();
        let high_order = order.clone();
        let high: ShareableMessageHandler = std::rc::Rc::new(TypedMessageHandler::<i32, _>::from(
            move |_: &i32| high_order.borrow_mut().push("high"),
        ))
        .into();

        bus.subscribe("events.*", low, Some(0));
        bus.subscribe("events.*", high, Some(10));

        bus.publish("events.order.STRAT-001", &1_i32);

        assert_eq!(*order.borrow(), vec!["high", "low"]);
    }

    #[test]
    fn test_request_response_round_trip() {
        let mut bus = MessageBus::new(trader_id(), UUID4::new(), None);
        let reply: std::rc::Rc<std::cell::RefCell<Option<i32>>> =
            std::rc::Rc::new(std::cell::RefCell::new(None));
        let reply_clone = reply.clone();
        let callback: ShareableMessageHandler = std::rc::Rc::new(
            TypedMessageHandler::<i32, _>::from(move |msg: &i32| *reply_clone.borrow_mut() = Some(*msg)),
        )
        .into();

        let echo: ShareableMessageHandler = std::rc::Rc::new(TypedMessageHandler::<i32, _>::from(
            |_msg: &i32| {},
        ))
        .into();
        bus.register("venue.query", echo).unwrap();

        let correlation_id = UUID4::new();
        bus.request("venue.query", correlation_id, callback, &1_i32);
        bus.response(&correlation_id, &99_i32);

        assert_eq!(*reply.borrow(), Some(99));
    }

    #[test]
    fn test_response_without_request_is_logged_and_dropped() {
        let mut bus = MessageBus::new(trader_id(), UUID4::new(), None);
        // No panic, no handler invoked: nothing to assert beyond it not panicking.
        bus.response(&UUID4::new(), &1_i32);
    }
}
