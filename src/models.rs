use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

/// A stored record: an open JSON object keyed by its `id` field
pub type Item = Map<String, JsonValue>;

/// The reserved field holding an item's key
pub const ID_FIELD: &str = "id";

/// Key of an item, if it carries a string `id`
pub fn item_id(item: &Item) -> Option<&str> {
    item.get(ID_FIELD).and_then(JsonValue::as_str)
}

/// Stamp a freshly generated UUID v4 onto the item, replacing any caller-supplied `id`
pub fn assign_new_id(mut item: Item) -> Item {
    item.insert(
        ID_FIELD.to_string(),
        JsonValue::String(Uuid::new_v4().to_string()),
    );
    item
}
