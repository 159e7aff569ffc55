use serde::{Deserialize, Serialize};

/// DRF-style paginated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

fn default_page() -> u32 {
    1
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_page_fields_use_defaults() {
        let page: Paginated<u32> =
            serde_json::from_value(serde_json::json!({ "results": [1, 2], "count": 2 })).unwrap();
        assert_eq!(page.results, vec![1, 2]);
        assert_eq!(page.page, 1);
        assert!(!page.has_next());
    }
}
