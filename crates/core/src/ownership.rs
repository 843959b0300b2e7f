//! Ownership token handling for the submitter protocol.
//!
//! There is no account system for submitters: the right to look up or
//! revise a submission is proven by presenting the same free-text key
//! chosen at creation time. The key is a capability string, stored inside
//! the answer document under a reserved key, compared with strict equality
//! at the trusted boundary only, and stripped from every payload returned
//! to a client.

use serde_json::{Map, Value};

/// Reserved answer key holding the submitter's ownership token.
pub const OWNER_KEY: &str = "__system_user_id";

/// Embed the ownership token, overwriting any client-supplied value for
/// the reserved key.
pub fn embed_owner_key(answers: &mut Map<String, Value>, token: &str) {
    answers.insert(OWNER_KEY.to_string(), Value::String(token.to_string()));
}

/// Read the stored ownership token. Missing or non-string values read as
/// the empty string, which never matches a presented token.
pub fn stored_owner_key(answers: &Value) -> &str {
    answers.get(OWNER_KEY).and_then(Value::as_str).unwrap_or("")
}

/// Remove the reserved key before returning answers to any client.
pub fn strip_owner_key(answers: &mut Value) {
    if let Some(object) = answers.as_object_mut() {
        object.remove(OWNER_KEY);
    }
}

/// Strict-equality ownership check. An empty presented token never
/// matches, even when the stored token is also empty.
pub fn owner_key_matches(answers: &Value, presented: &str) -> bool {
    !presented.is_empty() && stored_owner_key(answers) == presented
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn embed_overwrites_client_supplied_reserved_key() {
        let mut answers = json!({"q1": "a", OWNER_KEY: "forged"})
            .as_object()
            .cloned()
            .unwrap();
        embed_owner_key(&mut answers, "real-key");
        assert_eq!(answers[OWNER_KEY], "real-key");
    }

    #[test]
    fn stored_key_reads_back() {
        let answers = json!({OWNER_KEY: "my-key"});
        assert_eq!(stored_owner_key(&answers), "my-key");
    }

    #[test]
    fn missing_or_non_string_key_reads_as_empty() {
        assert_eq!(stored_owner_key(&json!({})), "");
        assert_eq!(stored_owner_key(&json!({OWNER_KEY: 42})), "");
        assert_eq!(stored_owner_key(&json!("not an object")), "");
    }

    #[test]
    fn strip_removes_reserved_key_only() {
        let mut answers = json!({"q1": "a", OWNER_KEY: "secret"});
        strip_owner_key(&mut answers);
        assert_eq!(answers, json!({"q1": "a"}));
    }

    #[test]
    fn strip_tolerates_non_object_values() {
        let mut answers = json!([1, 2, 3]);
        strip_owner_key(&mut answers);
        assert_eq!(answers, json!([1, 2, 3]));
    }

    #[test]
    fn matching_requires_exact_equality() {
        let answers = json!({OWNER_KEY: "my-key"});
        assert!(owner_key_matches(&answers, "my-key"));
        assert!(!owner_key_matches(&answers, "my-key "));
        assert!(!owner_key_matches(&answers, "MY-KEY"));
    }

    #[test]
    fn empty_presented_token_never_matches() {
        // Including against an empty stored token.
        let answers = json!({OWNER_KEY: ""});
        assert!(!owner_key_matches(&answers, ""));
        assert!(!owner_key_matches(&json!({}), ""));
    }
}
