use serde::{Deserialize, Serialize};
use serde_json::Value;

/// MIME type of every resource block and resource snapshot.
pub const JSON_MIME_TYPE: &str = "application/json";

/// One unit of a tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
    Resource { resource: ResourceContents },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// A resource block carrying `value` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized.
    pub fn json_resource<T: Serialize + ?Sized>(
        uri: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::Resource {
            resource: ResourceContents::json(uri, serde_json::to_string(value)?),
        })
    }
}

/// A URI-addressed text payload, used by resource blocks and `resources/read`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
}

impl ResourceContents {
    pub fn json(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: JSON_MIME_TYPE.to_string(),
            text: text.into(),
        }
    }
}

/// What a tool hands back to the dispatcher.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// A plain structured value, wrapped as a single JSON text block.
    Value(Value),
    /// Blocks emitted by the tool itself, passed through in order.
    Content(Vec<ContentBlock>),
}

impl ToolOutput {
    /// Structured output from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Value)
    }

    /// A narrative summary followed by a machine-readable resource.
    pub fn summary_with_resource(summary: impl Into<String>, resource: ContentBlock) -> Self {
        Self::Content(vec![ContentBlock::text(summary), resource])
    }

    /// Flatten into the block sequence returned by `tools/call`.
    ///
    /// # Errors
    ///
    /// Returns an error if a raw value cannot be serialized.
    pub fn into_content(self) -> Result<Vec<ContentBlock>, serde_json::Error> {
        match self {
            Self::Value(value) => Ok(vec![ContentBlock::text(serde_json::to_string(&value)?)]),
            Self::Content(blocks) => Ok(blocks),
        }
    }
}

/// Result body of `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolResult {
    pub content: Vec<ContentBlock>,
}

/// Reference URI for a resource block: `base` plus the present query pairs.
///
/// The URI is informational and is never resolved, so values are kept
/// readable rather than percent-encoded.
pub fn resource_uri(base: &str, query: &[(&str, Option<&str>)]) -> String {
    let pairs: Vec<String> = query
        .iter()
        .filter_map(|(key, value)| value.map(|v| format!("{key}={v}")))
        .collect();

    if pairs.is_empty() {
        base.to_string()
    } else {
        format!("{base}?{}", pairs.join("&"))
    }
}
