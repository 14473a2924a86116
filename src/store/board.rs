//! List query parameters and the per-filter board cache.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::entity::EntityId;

/// Page used when a query does not name one.
pub const DEFAULT_PAGE: u32 = 1;

const PAGE_KEY: &str = "page";
const LIMIT_KEY: &str = "limit";

/// A single query-string value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Text(String),
}

impl ParamValue {
    fn to_value(&self) -> Value {
        match self {
            ParamValue::Int(i) => Value::from(*i),
            ParamValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

/// Parameters of a list query.
///
/// The page index is kept apart from the filters: it selects a page
/// inside a board, while the filters select the board itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryParams {
    page: Option<u32>,
    filters: BTreeMap<String, ParamValue>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_limit(self, limit: u32) -> Self {
        self.with(LIMIT_KEY, limit)
    }

    /// Add a filter. A numeric `page` entry is routed to the page index.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let key = key.into();
        let value = value.into();
        if key == PAGE_KEY {
            if let ParamValue::Int(page) = value {
                if let Ok(page) = u32::try_from(page) {
                    self.page = Some(page);
                    return self;
                }
            }
        }
        self.filters.insert(key, value);
        self
    }

    /// Page named by the query, if any.
    pub fn page(&self) -> Option<u32> {
        self.page
    }

    /// Page the results belong to (`DEFAULT_PAGE` when unset).
    pub fn page_or_default(&self) -> u32 {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn filters(&self) -> &BTreeMap<String, ParamValue> {
        &self.filters
    }

    /// Query-string pairs, page included, in a stable order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 1);
        if let Some(page) = self.page {
            pairs.push((PAGE_KEY.to_string(), page.to_string()));
        }
        pairs.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.to_string())));
        pairs
    }

    /// JSON object of every parameter, page included.
    pub fn to_json(&self) -> Value {
        let mut map = self.filters_json();
        if let Some(page) = self.page {
            map.insert(PAGE_KEY.to_string(), Value::from(page));
        }
        Value::Object(map)
    }

    fn filters_json(&self) -> Map<String, Value> {
        self.filters
            .iter()
            .map(|(k, v)| (k.clone(), v.to_value()))
            .collect()
    }
}

/// Key of the board a query belongs to.
///
/// Every parameter except the page, as a JSON object with sorted keys.
/// A query with no filters maps to the empty string. Queries that differ
/// only by page share a board.
pub fn board_key(params: &QueryParams) -> String {
    if params.filters.is_empty() {
        return String::new();
    }
    Value::Object(params.filters_json()).to_string()
}

/// Cached pages of one filter signature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    /// Page number → identities on that page, in server order.
    pub list_map: BTreeMap<u32, Vec<EntityId>>,
    /// Pagination metadata of the newest applied fetch.
    pub meta_data: Map<String, Value>,
    pub loading: bool,
    pub error: Option<String>,
    /// Page number → sequence number of the fetch that filled it.
    pub page_seq: BTreeMap<u32, u64>,
    /// Highest sequence number applied to any page of this board.
    pub applied_seq: u64,
}

impl Board {
    /// Identities cached for `page`; empty when the page was never fetched.
    pub fn page(&self, page: u32) -> &[EntityId] {
        self.list_map.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sequence number of the fetch that filled `page`, 0 if none did.
    pub fn page_applied_seq(&self, page: u32) -> u64 {
        self.page_seq.get(&page).copied().unwrap_or(0)
    }
}

/// Partial update of a board's request flags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardPatch {
    pub loading: Option<bool>,
    pub error: Option<String>,
}

impl BoardPatch {
    pub fn loading() -> Self {
        Self {
            loading: Some(true),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            loading: Some(false),
            error: Some(error.into()),
        }
    }

    pub(crate) fn apply(self, board: &mut Board) {
        if let Some(loading) = self.loading {
            board.loading = loading;
        }
        if let Some(error) = self.error {
            board.error = Some(error);
        }
    }
}
