// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Custom field decoders used by the event payloads.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Zone suffix the engine appends to every timestamp.
pub const TIMESTAMP_SUFFIX: &str = "+0000";

/// Strips a trailing [`TIMESTAMP_SUFFIX`], leaving anything else untouched.
pub fn trim_timestamp(raw: &str) -> &str {
    raw.strip_suffix(TIMESTAMP_SUFFIX).unwrap_or(raw)
}

/// Serde adapter for timestamp string fields.
pub fn timestamp<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(trim_timestamp(&raw).to_string())
}

/// Splits `key=value` items into a map. Items without `=` map to an empty
/// value; only the first `=` separates key from value.
pub fn parse_key_values<I, S>(items: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| match item.as_ref().split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (item.as_ref().to_string(), String::new()),
        })
        .collect()
}

/// Serde adapter for `["key=value", "key"]` argument lists.
///
/// `null` decodes to an empty map; anything that is not a list of strings is
/// an error.
pub fn key_value_list<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = Option::<Vec<String>>::deserialize(deserializer)?;
    Ok(parse_key_values(items.unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Deserialize)]
    struct Stamped {
        #[serde(deserialize_with = "timestamp")]
        at: String,
    }

    #[derive(Debug, Deserialize)]
    struct Args {
        #[serde(default, deserialize_with = "key_value_list")]
        args: HashMap<String, String>,
    }

    #[test]
    fn timestamp_suffix_is_stripped() {
        let s: Stamped = serde_json::from_str(r#"{"at":"2020-04-10T01:09:10.574+0000"}"#).unwrap();
        assert_eq!(s.at, "2020-04-10T01:09:10.574");
    }

    #[test]
    fn timestamp_without_suffix_passes_through() {
        let s: Stamped = serde_json::from_str(r#"{"at":"2020-02-10T13:08:18.888"}"#).unwrap();
        assert_eq!(s.at, "2020-02-10T13:08:18.888");
        assert_eq!(trim_timestamp("2020-02-10T13:08:18+0100"), "2020-02-10T13:08:18+0100");
    }

    #[test]
    fn key_value_list_decodes_pairs() {
        let a: Args = serde_json::from_str(r#"{"args":["context=test","domain=x.net"]}"#).unwrap();
        assert_eq!(a.args.len(), 2);
        assert_eq!(a.args["context"], "test");
        assert_eq!(a.args["domain"], "x.net");
    }

    #[test]
    fn bare_key_maps_to_empty_value() {
        let a: Args = serde_json::from_str(r#"{"args":["a"]}"#).unwrap();
        assert_eq!(a.args["a"], "");
    }

    #[test]
    fn value_keeps_later_separators() {
        let map = parse_key_values(["sip=a=b"]);
        assert_eq!(map["sip"], "a=b");
    }

    #[test]
    fn missing_or_null_args_are_empty() {
        let a: Args = serde_json::from_str("{}").unwrap();
        assert!(a.args.is_empty());
        let a: Args = serde_json::from_str(r#"{"args":null}"#).unwrap();
        assert!(a.args.is_empty());
    }

    #[test]
    fn malformed_lists_are_errors() {
        assert!(serde_json::from_str::<Args>(r#"{"args":["a=b""#).is_err());
        assert!(serde_json::from_str::<Args>(r#"{"args":"a=b"}"#).is_err());
        assert!(serde_json::from_str::<Args>(r#"{"args":{"a":"b"}}"#).is_err());
        assert!(serde_json::from_str::<Args>(r#"{"args":[1,2]}"#).is_err());
    }

    proptest! {
        #[test]
        fn suffix_is_removed_exactly_once(stamp in "[0-9T:.-]{0,24}") {
            let with = format!("{stamp}{TIMESTAMP_SUFFIX}");
            prop_assert_eq!(trim_timestamp(&with), stamp.as_str());
            prop_assert_eq!(trim_timestamp(&stamp), stamp.as_str());
        }

        #[test]
        fn every_pair_round_trips(
            pairs in proptest::collection::hash_map("[a-z_]{1,8}", "[a-zA-Z0-9.=]{0,12}", 0..8)
        ) {
            let items: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
            prop_assert_eq!(parse_key_values(&items), pairs);
        }
    }
}
