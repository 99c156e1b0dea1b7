use std::fmt;

use serde_json::Value;

use crate::error::{FormatError, FormatResult};

/// Serialization format of a record file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordFormat {
    Yaml,
    Json,
}

impl RecordFormat {
    /// Parse a declared format name. Case-insensitive; `yml` is accepted.
    pub fn from_name(name: &str) -> FormatResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(FormatError::UnsupportedFormat(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }

    /// Encode a document.
    ///
    /// YAML is written as a block-style mapping; JSON is indented and ends
    /// with a newline.
    pub fn encode(&self, value: &Value) -> FormatResult<Vec<u8>> {
        match self {
            Self::Yaml => serde_yaml::to_string(value)
                .map(String::into_bytes)
                .map_err(|e| FormatError::Encode {
                    format: self.name(),
                    message: e.to_string(),
                }),
            Self::Json => {
                let mut out = serde_json::to_vec_pretty(value).map_err(|e| FormatError::Encode {
                    format: self.name(),
                    message: e.to_string(),
                })?;
                out.push(b'\n');
                Ok(out)
            }
        }
    }

    /// Decode a document. Blank input decodes to `null`.
    pub fn decode(&self, bytes: &[u8]) -> FormatResult<Value> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        match self {
            Self::Yaml => serde_yaml::from_slice(bytes).map_err(|e| FormatError::Malformed {
                format: self.name(),
                message: e.to_string(),
            }),
            Self::Json => serde_json::from_slice(bytes).map_err(|e| FormatError::Malformed {
                format: self.name(),
                message: e.to_string(),
            }),
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Human-readable name of a JSON value's kind, for error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
