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

//! A minimal `Clock` abstraction.
//!
//! The engine, cache and account ledger never read wall-clock time directly: every timestamp
//! that ends up on an event or report is obtained from an injected [`Clock`]. This keeps the
//! core deterministic under test, where a [`TestClock`] is advanced explicitly rather than
//! sampling the OS clock.

use std::fmt::Debug;

use chrono::Utc;

use crate::nanos::UnixNanos;

/// A source of the current time, expressed as nanoseconds since the UNIX epoch.
pub trait Clock: Debug {
    /// Returns the current UNIX timestamp in nanoseconds.
    fn timestamp_ns(&self) -> UnixNanos;
}

/// A [`Clock`] backed by the operating system's wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveClock;

impl LiveClock {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Clock for LiveClock {
    fn timestamp_ns(&self) -> UnixNanos {
        let now = Utc::now();
        UnixNanos::from(now.timestamp_nanos_opt().unwrap_or(0))
    }
}

/// A [`Clock`] whose time only moves when explicitly advanced.
///
/// Used throughout the test suites for this workspace so that scenarios involving ordering,
/// purge windows and reconciliation timing are fully reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct TestClock {
    time_ns: UnixNanos,
}

impl TestClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            time_ns: UnixNanos::default(),
        }
    }

    /// Sets the clock to an absolute time.
    ///
    /// # Panics
    ///
    /// Panics if `to_time_ns` is before the current time (clocks are non-decreasing).
    pub fn set_time(&mut self, to_time_ns: UnixNanos) {
        assert!(
            to_time_ns >= self.time_ns,
            "cannot move TestClock backwards: {to_time_ns} < {}",
            self.time_ns
        );
        self.time_ns = to_time_ns;
    }

    /// Advances the clock by `delta_ns` nanoseconds and returns the new time.
    pub fn advance(&mut self, delta_ns: u64) -> UnixNanos {
        self.time_ns = self.time_ns + UnixNanos::from(delta_ns);
        self.time_ns
    }
}

impl Clock for TestClock {
    fn timestamp_ns(&self) -> UnixNanos {
        self.time_ns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_time_forward() {
        let mut clock = TestClock::new();
        assert_eq!(clock.timestamp_ns(), UnixNanos::from(0u64));
        clock.advance(100);
        assert_eq!(clock.timestamp_ns(), UnixNanos::from(100u64));
    }

    #[test]
    #[should_panic(expected = "non-decreasing")]
    fn test_set_time_backwards_panics() {
        let mut clock = TestClock::new();
        clock.set_time(UnixNanos::from(100u64));
        clock.set_time(UnixNanos::from(50u64));
    }
}
