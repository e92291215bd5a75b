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

//! Lightweight "design by contract" correctness checks.
//!
//! These return `anyhow::Result` rather than panicking so that construction sites can decide
//! whether to propagate the failure or `.expect(FAILED)` it away in contexts (such as parsing a
//! string literal known at compile time) where the condition can never actually fail.

use std::{collections::HashMap, fmt::Debug};

/// Message used at `.expect(FAILED)` call sites where a correctness check is statically known to
/// hold (e.g. constructing an identifier from a string literal).
pub const FAILED: &str = "Condition failed";

/// Returns an error if `predicate` is `false`.
pub fn check_predicate_true(predicate: bool, fail_msg: &str) -> anyhow::Result<()> {
    if predicate {
        Ok(())
    } else {
        anyhow::bail!("{fail_msg}")
    }
}

/// Returns an error if `predicate` is `true`.
pub fn check_predicate_false(predicate: bool, fail_msg: &str) -> anyhow::Result<()> {
    if predicate {
        anyhow::bail!("{fail_msg}")
    } else {
        Ok(())
    }
}

/// Returns an error if `s` is empty.
pub fn check_nonempty_string<T: AsRef<str>>(s: T, param: &str) -> anyhow::Result<()> {
    if s.as_ref().is_empty() {
        anyhow::bail!("invalid string for '{param}', was empty")
    }
    Ok(())
}

/// Returns an error if `s` is empty or contains only whitespace.
pub fn check_valid_string<T: AsRef<str>>(s: T, param: &str) -> anyhow::Result<()> {
    let value = s.as_ref();
    check_nonempty_string(value, param)?;
    if value.trim().is_empty() {
        anyhow::bail!("invalid string for '{param}', was all whitespace")
    }
    Ok(())
}

/// Returns an error if `s` is not an ASCII string (no interior whitespace or control characters).
pub fn check_valid_string_ascii<T: AsRef<str>>(s: T, param: &str) -> anyhow::Result<()> {
    let value = s.as_ref();
    check_valid_string(value, param)?;
    if !value.is_ascii() {
        anyhow::bail!("invalid string for '{param}', was not ASCII, was '{value}'")
    }
    if value.chars().any(char::is_whitespace) {
        anyhow::bail!("invalid string for '{param}', contained whitespace, was '{value}'")
    }
    Ok(())
}

/// Returns an error if `lhs != rhs`.
pub fn check_equal<T: PartialEq + Debug>(
    lhs: &T,
    rhs: &T,
    lhs_param: &str,
    rhs_param: &str,
) -> anyhow::Result<()> {
    if lhs != rhs {
        anyhow::bail!(
            "'{lhs_param}' {lhs:?} was not equal to '{rhs_param}' {rhs:?}",
        )
    }
    Ok(())
}

/// Returns an error if `value` is not strictly positive.
pub fn check_positive_u64(value: u64, param: &str) -> anyhow::Result<()> {
    if value == 0 {
        anyhow::bail!("invalid u64 for '{param}', was not positive, was {value}")
    }
    Ok(())
}

/// Returns an error if `value` is negative.
pub fn check_non_negative_i128(value: i128, param: &str) -> anyhow::Result<()> {
    if value < 0 {
        anyhow::bail!("invalid i128 for '{param}', was negative, was {value}")
    }
    Ok(())
}

/// Returns an error if `key` already exists in `map`.
pub fn check_key_not_in_map<K, V>(
    key: &K,
    map: &HashMap<K, V>,
    key_name: &str,
    map_name: &str,
) -> anyhow::Result<()>
where
    K: std::hash::Hash + Eq + Debug,
{
    if map.contains_key(key) {
        anyhow::bail!("the '{key_name}' key {key:?} was already in the '{map_name}'")
    }
    Ok(())
}

/// Returns an error if `key` does not exist in `map`.
pub fn check_key_in_map<K, V>(
    key: &K,
    map: &HashMap<K, V>,
    key_name: &str,
    map_name: &str,
) -> anyhow::Result<()>
where
    K: std::hash::Hash + Eq + Debug,
{
    if !map.contains_key(key) {
        anyhow::bail!("the '{key_name}' key {key:?} was not in the '{map_name}'")
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_valid_string_ascii_rejects_whitespace() {
        assert!(check_valid_string_ascii("has space", "value").is_err());
        assert!(check_valid_string_ascii("no-space", "value").is_ok());
    }

    #[test]
    fn test_check_key_not_in_map() {
        let mut map = HashMap::new();
        map.insert("a", 1);
        assert!(check_key_not_in_map(&"a", &map, "key", "map").is_err());
        assert!(check_key_not_in_map(&"b", &map, "key", "map").is_ok());
    }
}
