use serde_json::Value;
use std::collections::HashSet;

const SOURCE_ID_KEYS: [&str; 3] = ["userId", "groupId", "roomId"];

/// Collect the user, group and room ids found in a LINE webhook payload,
/// deduplicated, in first-seen order. Anything that isn't shaped like a
/// webhook simply yields no ids.
pub fn extract_recipient_ids(payload: &Value) -> Vec<String> {
    let Some(events) = payload.get("events").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut ids = Vec::new();

    for source in events.iter().filter_map(|event| event.get("source")) {
        for key in SOURCE_ID_KEYS {
            if let Some(id) = source.get(key).and_then(Value::as_str) {
                if !id.is_empty() && seen.insert(id.to_string()) {
                    ids.push(id.to_string());
                }
            }
        }
    }

    ids
}
