//! MCP protocol bridge over stdio.
//!
//! Reads JSON-RPC 2.0 requests line-by-line from stdin, dispatches by
//! method, and writes exactly one JSON response line to stdout per
//! request. The loop terminates only when stdin is exhausted — never on
//! error.
//!
//! # Methods
//!
//! | Method | Behavior |
//! |--------|----------|
//! | `initialize` | Fixed protocol version and server identity |
//! | `tools/list` | The single static `weaviate_query` descriptor |
//! | `tools/call` | Dispatch to the query builder + remote GraphQL fetch |
//!
//! # Error codes
//!
//! | Code | Condition |
//! |------|-----------|
//! | -32700 | Line failed to parse as JSON (null id) |
//! | -32601 | Unknown method |
//! | -32602 | Unknown tool name in `tools/call` |
//! | -32603 | Unexpected internal failure during dispatch |
//!
//! Every accepted line yields a response; unexpected failures map to
//! -32603 rather than silently dropping the reply, so response ordering
//! always matches request ordering.

use anyhow::Result;
use serde_json::{json, Value};
use std::io::Write;
use tokio::io::AsyncBufReadExt;

use crate::client::WeaviateClient;
use crate::query::{run_query, QueryRequest};

/// MCP protocol revision implemented by the bridge.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Server identity reported from `initialize`.
pub const SERVER_NAME: &str = "weaviate-mcp-server";

/// Name of the single exposed tool.
pub const QUERY_TOOL: &str = "weaviate_query";

fn jsonrpc_ok(id: &Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

fn jsonrpc_error(id: &Value, code: i64, message: &str) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code, "message": message },
    })
}

/// The static descriptor for `weaviate_query`.
pub fn tool_descriptor() -> Value {
    json!({
        "name": QUERY_TOOL,
        "description": "Query data from Weaviate vector database using GraphQL. \
                        Supports semantic search and filtering.",
        "inputSchema": {
            "type": "object",
            "properties": {
                "class_name": {
                    "type": "string",
                    "description": "The name of the Weaviate class to query"
                },
                "query": {
                    "type": "string",
                    "description": "The search query text for semantic search"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results to return (default: 10)",
                    "default": 10
                },
                "where_filter": {
                    "type": "object",
                    "description": "Optional where filter for precise filtering"
                },
                "properties": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Array of properties to return (default: all)"
                }
            },
            "required": ["class_name", "query"]
        }
    })
}

/// Dispatch one parsed request and produce its response.
///
/// Always returns a response object; internal failures are folded into a
/// -32603 error by the caller.
pub async fn handle_request(client: &WeaviateClient, request: &Value) -> Value {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request.get("method").and_then(|m| m.as_str()).unwrap_or("");

    match method {
        "initialize" => jsonrpc_ok(
            &id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION"),
                }
            }),
        ),
        "tools/list" => jsonrpc_ok(&id, json!({ "tools": [tool_descriptor()] })),
        "tools/call" => {
            let params = request.get("params").cloned().unwrap_or(json!({}));
            let tool_name = params.get("name").and_then(|n| n.as_str()).unwrap_or("");

            if tool_name != QUERY_TOOL {
                return jsonrpc_error(&id, -32602, &format!("Unknown tool: {}", tool_name));
            }

            let arguments = params.get("arguments").cloned().unwrap_or(json!({}));
            let query_request = QueryRequest::from_arguments(&arguments);
            let outcome = run_query(client, &query_request).await;

            match serde_json::to_string_pretty(&outcome) {
                Ok(text) => jsonrpc_ok(
                    &id,
                    json!({
                        "content": [
                            {
                                "type": "text",
                                "text": text
                            }
                        ]
                    }),
                ),
                Err(e) => {
                    eprintln!("Unexpected error: {}", e);
                    jsonrpc_error(&id, -32603, "Internal error")
                }
            }
        }
        _ => jsonrpc_error(&id, -32601, "Method not found"),
    }
}

/// Run the read loop until stdin is exhausted.
pub async fn run_bridge(client: &WeaviateClient) -> Result<()> {
    eprintln!(
        "Starting Weaviate MCP Server v{} ({})",
        env!("CARGO_PKG_VERSION"),
        client.base_url()
    );

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(line) {
            Ok(request) => handle_request(client, &request).await,
            Err(e) => {
                eprintln!("JSON parsing error: {}", e);
                jsonrpc_error(&Value::Null, -32700, "Parse error")
            }
        };

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", response)?;
        stdout.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeaviateConfig;
    use serde_json::json;

    fn test_client() -> WeaviateClient {
        // Dispatch tests below never touch the network.
        WeaviateClient::new(&WeaviateConfig {
            url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_identity() {
        let client = test_client();
        let response = handle_request(
            &client,
            &json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}),
        )
        .await;

        assert_eq!(response["jsonrpc"], "2.0");
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(response["result"]["serverInfo"]["name"], "weaviate-mcp-server");
        assert!(response["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list_single_tool() {
        let client = test_client();
        let response = handle_request(
            &client,
            &json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
        )
        .await;

        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "weaviate_query");
        let required = tools[0]["inputSchema"]["required"].as_array().unwrap();
        assert_eq!(required, &[json!("class_name"), json!("query")]);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let client = test_client();
        let response = handle_request(
            &client,
            &json!({"jsonrpc": "2.0", "id": 3, "method": "resources/list"}),
        )
        .await;

        assert_eq!(response["id"], 3);
        assert_eq!(response["error"]["code"], -32601);
        assert_eq!(response["error"]["message"], "Method not found");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let client = test_client();
        let response = handle_request(
            &client,
            &json!({
                "jsonrpc": "2.0",
                "id": 4,
                "method": "tools/call",
                "params": {"name": "other_tool", "arguments": {}}
            }),
        )
        .await;

        assert_eq!(response["error"]["code"], -32602);
        assert_eq!(response["error"]["message"], "Unknown tool: other_tool");
    }

    #[tokio::test]
    async fn test_call_with_invalid_class_fails_without_network() {
        let client = test_client();
        let response = handle_request(
            &client,
            &json!({
                "jsonrpc": "2.0",
                "id": 5,
                "method": "tools/call",
                "params": {
                    "name": "weaviate_query",
                    "arguments": {"class_name": "no good", "query": "x"}
                }
            }),
        )
        .await;

        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        let outcome: Value = serde_json::from_str(text).unwrap();
        assert_eq!(outcome["success"], false);
        assert!(outcome["error"].as_str().unwrap().contains("Invalid class name"));
    }
}
