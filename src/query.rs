//! GraphQL query construction and result normalization.
//!
//! A semantic-search request is modeled as a [`QueryRequest`] and
//! serialized to the Weaviate `Get` query shape:
//!
//! ```text
//! {
//!   Get {
//!     Document(nearText: { concepts: ["deploy"] }, limit: 10) {
//!       title content
//!       _additional {
//!         id
//!         distance
//!         certainty
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Free text is spliced into the query string, so `"`/newline/CR are
//! escaped; class, property, and filter identifiers are validated instead
//! of escaped — an invalid identifier fails the request before any
//! network traffic.
//!
//! Remote results normalize into a [`QueryOutcome`] envelope: GraphQL
//! errors, non-200 statuses, and transport failures all become
//! `success: false` with the built query attached for debugging.

use serde::Serialize;
use serde_json::Value;

use crate::client::WeaviateClient;
use crate::schema::DEFAULT_PROPERTY_NAMES;

/// Escape a string for splicing between double quotes in a GraphQL query.
///
/// Replaces `"` with `\"` and literal newline/carriage-return characters
/// with their two-character escapes.
pub fn escape_graphql_string(input: &str) -> String {
    input
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

/// Render a JSON value as query text. Strings pass through; anything else
/// is stringified first (integer `123` becomes `"123"`).
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// True when `s` is a valid GraphQL name: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_graphql_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A simple equality filter translated into a `where` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereFilter {
    pub path: String,
    pub operator: String,
    pub value_text: String,
}

impl WhereFilter {
    /// Build a filter from a JSON value.
    ///
    /// Returns `None` unless the value is an object carrying string
    /// `path`, `operator`, and `valueText` fields — a malformed filter
    /// degrades silently to "unfiltered".
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let path = map.get("path")?.as_str()?;
        let operator = map.get("operator")?.as_str()?;
        let value_text = map.get("valueText")?.as_str()?;
        Some(Self {
            path: path.to_string(),
            operator: operator.to_string(),
            value_text: value_text.to_string(),
        })
    }

    fn to_clause(&self) -> String {
        format!(
            "{{ path: [\"{}\"], operator: {}, valueText: \"{}\" }}",
            self.path,
            self.operator,
            escape_graphql_string(&self.value_text)
        )
    }
}

/// A semantic-search request against one class.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub class_name: String,
    pub query: String,
    pub limit: u64,
    pub where_filter: Option<WhereFilter>,
    pub properties: Vec<String>,
}

impl QueryRequest {
    pub fn new(class_name: &str, query: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            query: query.to_string(),
            limit: 10,
            where_filter: None,
            properties: DEFAULT_PROPERTY_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Build a request from `tools/call` arguments.
    ///
    /// `limit` defaults to 10 and `properties` to the default-schema
    /// property names when omitted.
    pub fn from_arguments(args: &Value) -> Self {
        let class_name = args
            .get("class_name")
            .map(coerce_string)
            .unwrap_or_default();
        let query = args.get("query").map(coerce_string).unwrap_or_default();

        let mut request = Self::new(&class_name, &query);

        if let Some(limit) = args.get("limit").and_then(|v| v.as_u64()) {
            request.limit = limit;
        }
        if let Some(filter) = args.get("where_filter") {
            request.where_filter = WhereFilter::from_value(filter);
        }
        if let Some(props) = args.get("properties").and_then(|v| v.as_array()) {
            let names: Vec<String> = props
                .iter()
                .filter_map(|p| p.as_str().map(|s| s.to_string()))
                .collect();
            if !names.is_empty() {
                request.properties = names;
            }
        }

        request
    }

    /// Reject identifiers that cannot be safely spliced into the query.
    pub fn validate(&self) -> Result<(), String> {
        if !is_graphql_identifier(&self.class_name) {
            return Err(format!("Invalid class name: '{}'", self.class_name));
        }
        for prop in &self.properties {
            if !is_graphql_identifier(prop) {
                return Err(format!("Invalid property name: '{}'", prop));
            }
        }
        if let Some(filter) = &self.where_filter {
            if !is_graphql_identifier(&filter.path) {
                return Err(format!("Invalid filter path: '{}'", filter.path));
            }
            if !is_graphql_identifier(&filter.operator) {
                return Err(format!("Invalid filter operator: '{}'", filter.operator));
            }
        }
        Ok(())
    }

    /// Serialize to the wire query. Output is syntactically closed for
    /// all validated inputs.
    pub fn to_graphql(&self) -> String {
        let mut args = vec![
            format!(
                "nearText: {{ concepts: [\"{}\"] }}",
                escape_graphql_string(&self.query)
            ),
            format!("limit: {}", self.limit),
        ];
        if let Some(filter) = &self.where_filter {
            args.push(format!("where: {}", filter.to_clause()));
        }

        format!(
            "{{\n  Get {{\n    {}({}) {{\n      {}\n      _additional {{\n        id\n        distance\n        certainty\n      }}\n    }}\n  }}\n}}\n",
            self.class_name,
            args.join(", "),
            self.properties.join(" ")
        )
    }
}

/// Normalized result of a semantic query: either `data` or `error`,
/// always echoing the query that was sent.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    pub query: String,
}

impl QueryOutcome {
    fn ok(data: Option<Value>, query: String) -> Self {
        Self {
            success: true,
            data,
            error: None,
            query,
        }
    }

    fn fail(error: Value, query: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            query,
        }
    }
}

/// Execute a semantic query and normalize the response.
///
/// - 200 with a body `errors` field: failure carrying the errors value.
/// - 200 without: success carrying the body's `data` value.
/// - Any other status: failure `"HTTP <code>: <reason>"`.
/// - Transport or body-parse failure: failure carrying the message.
pub async fn run_query(client: &WeaviateClient, request: &QueryRequest) -> QueryOutcome {
    if let Err(message) = request.validate() {
        return QueryOutcome::fail(Value::String(message), String::new());
    }

    let query = request.to_graphql();

    let response = match client.graphql(&query).await {
        Ok(response) => response,
        Err(e) => return QueryOutcome::fail(Value::String(e.to_string()), query),
    };

    let status = response.status();
    if status.as_u16() != 200 {
        let reason = status.canonical_reason().unwrap_or("Unknown");
        return QueryOutcome::fail(
            Value::String(format!("HTTP {}: {}", status.as_u16(), reason)),
            query,
        );
    }

    let body: Value = match response.json().await {
        Ok(body) => body,
        Err(e) => return QueryOutcome::fail(Value::String(e.to_string()), query),
    };

    match body.get("errors") {
        Some(errors) if !errors.is_null() => QueryOutcome::fail(errors.clone(), query),
        _ => QueryOutcome::ok(body.get("data").cloned(), query),
    }
}
