//! Type-safe schema generation for tool-forced structured output.
//!
//! The Messages API has no `response_format`; the reliable way to get
//! schema-conforming JSON is to declare a single tool whose
//! `input_schema` is the desired shape and force the model to call it.
//! This module derives that schema from a Rust type via `schemars`.
//!
//! # Example
//!
//! ```rust,ignore
//! use schemars::JsonSchema;
//! use serde::Deserialize;
//! use anthropic_client::StructuredOutput;
//!
//! #[derive(Deserialize, JsonSchema)]
//! struct Outline {
//!     title: String,
//!     sections: Vec<String>,
//! }
//!
//! let schema = Outline::tool_schema();
//! ```

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;

/// Trait for types usable as tool-forced structured output.
///
/// Automatically implemented for any `JsonSchema + DeserializeOwned` type.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate a tool `input_schema` for this type.
    ///
    /// The API rejects `$ref` references inside tool schemas, so the
    /// schemars output is post-processed: all refs are inlined and the
    /// `definitions`/`$schema` bookkeeping is stripped.
    fn tool_schema() -> serde_json::Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();
        sanitize_tool_schema(&mut value);
        value
    }

    /// A tool name derived from the type name.
    fn tool_name() -> String {
        <Self as JsonSchema>::schema_name().to_lowercase()
    }
}

// Blanket implementation for all types that satisfy the bounds
impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

/// Make a schemars-generated schema acceptable as a tool `input_schema`:
/// inline every `$ref` and strip the `definitions`/`$schema` bookkeeping.
///
/// Useful for callers that build schemas dynamically rather than through
/// [`StructuredOutput`].
pub fn sanitize_tool_schema(value: &mut serde_json::Value) {
    inline_refs(value);
    if let serde_json::Value::Object(map) = value {
        map.remove("definitions");
        map.remove("$schema");
    }
}

/// Inline all `$ref` references by substituting the referenced definition.
fn inline_refs(value: &mut serde_json::Value) {
    let definitions = if let serde_json::Value::Object(map) = value {
        map.get("definitions").cloned()
    } else {
        None
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut serde_json::Value, definitions: &serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            if let Some(serde_json::Value::String(ref_path)) = map.get("$ref").cloned() {
                if let Some(type_name) = ref_path.strip_prefix("#/definitions/") {
                    if let Some(def) = definitions.get(type_name) {
                        *value = def.clone();
                        inline_refs_recursive(value, definitions);
                        return;
                    }
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        serde_json::Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}
