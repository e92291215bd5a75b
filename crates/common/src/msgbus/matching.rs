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

//! Wildcard topic matching.
//!
//! `*` matches zero or more characters, `?` matches exactly one. Matching is bottom-up dynamic
//! programming, O(n·m) in the length of the topic and pattern, with no recursion or backtracking
//! stack.

use super::core::{MStr, Pattern, Topic};

#[must_use]
pub fn is_matching(topic: MStr<Topic>, pattern: MStr<Pattern>) -> bool {
    is_matching_bytes(topic.as_bytes(), pattern.as_bytes())
}

#[must_use]
pub fn is_matching_bytes(topic: &[u8], pattern: &[u8]) -> bool {
    let n = topic.len();
    let m = pattern.len();

    // dp[i][j]: topic[..i] matches pattern[..j]
    let mut dp = vec![vec![false; m + 1]; n + 1];
    dp[0][0] = true;

    for (j, &p) in pattern.iter().enumerate() {
        if p == b'*' {
            dp[0][j + 1] = dp[0][j];
        }
    }

    for i in 1..=n {
        for j in 1..=m {
            dp[i][j] = match pattern[j - 1] {
                b'*' => dp[i - 1][j] || dp[i][j - 1],
                b'?' => dp[i - 1][j - 1],
                c => dp[i - 1][j - 1] && topic[i - 1] == c,
            };
        }
    }

    dp[n][m]
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("events.order.STRAT-001", "events.order.STRAT-001", true)]
    #[case("events.order.STRAT-001", "events.order.*", true)]
    #[case("events.order.STRAT-001", "events.*", true)]
    #[case("events.order.STRAT-001", "events.position.*", false)]
    #[case("comp", "comp*", true)]
    #[case("complete", "comp*", true)]
    #[case("computer", "comp*", true)]
    #[case("camp", "c?mp", true)]
    #[case("comp", "c?mp", true)]
    #[case("coop", "c??p", true)]
    #[case("", "*", true)]
    #[case("a", "", false)]
    #[case("", "", true)]
    fn test_is_matching(#[case] topic: &str, #[case] pattern: &str, #[case] expected: bool) {
        assert_eq!(
            is_matching_bytes(topic.as_bytes(), pattern.as_bytes()),
            expected
        );
    }
}
