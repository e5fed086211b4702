use serde::{Deserialize, Serialize};

/// Response body of a collection list. Collections are returned whole;
/// `total` is the number of items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> ListResult<T> {
    pub fn new(items: Vec<T>) -> Self {
        let total = items.len();
        Self { items, total }
    }
}

/// Generate a new random ID (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string().replace('-', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id() {
        let id = new_id();
        assert_eq!(id.len(), 32);
        assert!(!id.contains('-'));
        assert_ne!(id, new_id());
    }

    #[test]
    fn list_result_counts_items() {
        let result = ListResult::new(vec!["a", "b", "c"]);
        assert_eq!(result.total, 3);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["total"], 3);
        assert_eq!(json["items"][1], "b");
    }
}
