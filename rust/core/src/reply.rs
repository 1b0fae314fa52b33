// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recovery parsing of free-text model replies
//!
//! Generative models are asked for one raw JSON object but routinely wrap it
//! in a markdown fence or double-serialize the payload. Both failure modes
//! are recovered here; anything else fails with [`Error::ReplyParse`].

use crate::error::{Error, Result};
use serde_json::Value;

/// Extract the JSON object from a free-text model reply.
///
/// Decoding strategies, each attempted only if the prior fails:
/// 1. strip a leading code fence (optional language tag) and trailing
///    backticks, then parse directly;
/// 2. double-decode: parse as a JSON string literal, then parse its content.
pub fn parse_model_reply(raw: &str) -> Result<Value> {
    let text = strip_fences(raw.trim());
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(direct_err) => match serde_json::from_str::<String>(text) {
            Ok(inner) => {
                serde_json::from_str(&inner).map_err(|e| Error::ReplyParse(e.to_string()))
            }
            Err(_) => Err(Error::ReplyParse(direct_err.to_string())),
        },
    }
}

/// Remove a wrapping ``` fence if present: the opening marker with an
/// optional language tag, and any trailing backticks.
fn strip_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    rest.trim_end_matches('`').trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_plain_json() {
        let doc = parse_model_reply(r#"{"furniture": []}"#).unwrap();
        assert_eq!(doc, json!({"furniture": []}));
    }

    #[test]
    fn fenced_reply_parses_identically_to_unwrapped() {
        let plain = parse_model_reply(r#"{"a": 1, "b": [2, 3]}"#).unwrap();
        let fenced = parse_model_reply("```json\n{\"a\": 1, \"b\": [2, 3]}\n```").unwrap();
        assert_eq!(plain, fenced);
    }

    #[test]
    fn fence_without_language_tag() {
        let doc = parse_model_reply("```\n{\"ok\": true}\n```").unwrap();
        assert_eq!(doc, json!({"ok": true}));
    }

    #[test]
    fn double_encoded_reply_parses_to_inner_document() {
        let inner = json!({"furniture": [{"x1": 1}]});
        let double = serde_json::to_string(&inner.to_string()).unwrap();
        assert_eq!(parse_model_reply(&double).unwrap(), inner);
    }

    #[test]
    fn truncated_reply_fails_with_parse_error() {
        let err = parse_model_reply(r#"{"furniture": ["#).unwrap_err();
        assert!(matches!(err, Error::ReplyParse(_)));
    }

    #[test]
    fn prose_reply_fails() {
        assert!(parse_model_reply("I could not find any furniture.").is_err());
    }

    #[test]
    fn double_encoded_garbage_fails() {
        // a JSON string literal whose content is still not JSON
        assert!(parse_model_reply(r#""not json either""#).is_err());
    }
}
