//! ANU QRNG API响应解析 <br>
//!
//! 响应体形如`{"data": [99, 100, 101], ...}`, 按顺序逐步校验, 遇到第一个错误立即返回.

use crate::error::{snippet, DecodeError};
use serde_json::{Map, Value};
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomResponse {
    data: Vec<u8>,
}

impl RandomResponse {
    pub fn decode(input: &[u8]) -> Result<Self, DecodeError> {
        let raw: Map<String, Value> =
            serde_json::from_slice(input).map_err(|e| DecodeError::MalformedJson(e.to_string()))?;

        let data = match raw.get("data") {
            Some(Value::Array(data)) => data,
            Some(x) => {
                return Err(DecodeError::WrongType {
                    kind: kind_of(x),
                    value: snippet(x.to_string().as_bytes()),
                })
            }
            None => {
                let raw = serde_json::to_string(&raw).unwrap_or_default();
                return Err(DecodeError::MissingField(snippet(raw.as_bytes())));
            }
        };

        if data.is_empty() {
            return Err(DecodeError::EmptyData);
        }

        let mut bytes = Vec::with_capacity(data.len());
        for (idx, x) in data.iter().enumerate() {
            let Some(val) = x.as_f64() else {
                return Err(DecodeError::ElementNotNumeric {
                    idx,
                    kind: kind_of(x),
                    value: snippet(x.to_string().as_bytes()),
                });
            };

            if val > 255.0 {
                return Err(DecodeError::ByteOutOfRange { idx, value: val });
            }

            // truncates toward zero, negative saturates to 0
            bytes.push(val as u8);
        }

        Ok(Self { data: bytes })
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_slice()
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl FromStr for RandomResponse {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s.as_bytes())
    }
}

fn kind_of(x: &Value) -> &'static str {
    match x {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
