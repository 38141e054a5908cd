use std::collections::HashMap;

/// Parsed request query string. Only `page` and `q` are meaningful here.
#[derive(PartialEq, Debug)]
pub struct QueryString {
    items: HashMap<String, String>,
}

impl QueryString {
    pub fn from(buf: &str) -> Self {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        QueryString {
            items: pairs.into_iter().collect(),
        }
    }

    /// Current list page, defaulting to 1 for anything absent or invalid.
    pub fn get_page(&self) -> u32 {
        let val = match self.items.get("page") {
            Some(val) => val,
            None => return 1,
        };
        match val.parse::<u32>() {
            Ok(page) if page > 0 => page,
            _ => 1,
        }
    }

    /// Search query, decoded. Empty string when absent.
    pub fn get_query(&self) -> &str {
        self.items.get("q").map(|q| q.as_str()).unwrap_or("")
    }
}
