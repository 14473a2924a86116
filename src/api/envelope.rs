//! The response wrapper every endpoint returns.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{ApiError, ApiResult};

/// `{ success, data, message, statusCode }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status_code: u16,
}

impl Envelope {
    /// Successful envelope around `data`.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data,
            message: String::new(),
            status_code: 200,
        }
    }

    /// Turn `success: false` into [`ApiError::Rejected`].
    pub fn ensure_success(self) -> ApiResult<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::Rejected {
                status: self.status_code,
                message: self.message,
            })
        }
    }

    /// Decode `data` as a single record.
    pub fn decode_data<T: DeserializeOwned>(&self) -> ApiResult<T> {
        Ok(T::deserialize(&self.data)?)
    }

    /// Split a list payload `{ data: [...], ...meta }` into items and metadata.
    pub fn into_list<T: DeserializeOwned>(self) -> ApiResult<ListPage<T>> {
        ListPage::from_value(self.data)
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    /// Everything next to `data` (page, limit, totalItems, ...).
    pub meta_data: Map<String, Value>,
}

impl<T: DeserializeOwned> ListPage<T> {
    pub fn from_value(value: Value) -> ApiResult<Self> {
        let mut meta_data = match value {
            Value::Object(map) => map,
            other => {
                return Err(ApiError::Decode(serde::de::Error::custom(format!(
                    "expected list object, got {}",
                    json_kind(&other)
                ))))
            }
        };
        let items = match meta_data.remove("data") {
            Some(items) => Vec::<T>::deserialize(items)?,
            None => Vec::new(),
        };
        Ok(Self { items, meta_data })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
