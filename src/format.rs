// Exchange formats: JSON arrays, single-document TOML and YAML

use crate::error::{Result, RollError};
use crate::models::Category;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Serialization format used for import/export files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Toml,
    Yaml,
}

impl Format {
    /// Lowercase file extension, also the canonical display name
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Toml => "toml",
            Format::Yaml => "yaml",
        }
    }

    /// Detect the format from the last four characters of a file name.
    ///
    /// Only `json`, `toml` and `yaml` are recognized; `.yml` is not.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let name = path.as_ref().to_string_lossy();
        let chars: Vec<char> = name.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();

        tail.parse()
            .map_err(|_| RollError::UnsupportedFormat(name.into_owned()))
    }

    /// Whether one document can hold a whole category list
    pub fn supports_many(self) -> bool {
        matches!(self, Format::Json)
    }
}

impl FromStr for Format {
    type Err = RollError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "toml" => Ok(Format::Toml),
            "yaml" => Ok(Format::Yaml),
            _ => Err(RollError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Render categories as text.
///
/// JSON carries the whole list as one array. TOML and YAML hold a single
/// document, so only the first category is rendered; the rest are dropped.
pub fn encode(categories: &[Category], format: Format) -> Result<String> {
    let encode_err = |message: String| RollError::Encode { format, message };

    match (format, categories) {
        (Format::Json, _) => serde_json::to_string_pretty(categories).map_err(|e| encode_err(e.to_string())),
        (_, []) => Err(encode_err("no category to encode".to_string())),
        (Format::Toml | Format::Yaml, [first, rest @ ..]) => {
            if !rest.is_empty() {
                warn!(
                    %format,
                    dropped = rest.len(),
                    "Single-document format keeps only the first category"
                );
            }

            if format == Format::Toml {
                toml::to_string_pretty(first).map_err(|e| encode_err(e.to_string()))
            } else {
                serde_yaml::to_string(first).map_err(|e| encode_err(e.to_string()))
            }
        }
    }
}

/// Parse text into categories.
///
/// JSON must be an array; TOML and YAML yield a one-element list.
pub fn decode(text: &str, format: Format) -> Result<Vec<Category>> {
    let decode_err = |message: String| RollError::Decode { format, message };

    match format {
        Format::Json => serde_json::from_str(text).map_err(|e| decode_err(e.to_string())),
        Format::Toml => {
            let category: Category = toml::from_str(text).map_err(|e| decode_err(e.to_string()))?;
            Ok(vec![category])
        }
        Format::Yaml => {
            let category: Category = serde_yaml::from_str(text).map_err(|e| decode_err(e.to_string()))?;
            Ok(vec![category])
        }
    }
}
