//! Tandem MCP Server
//!
//! Line-delimited JSON-RPC over stdio, driving one converter form.
//!
//! Tools:
//! - list_converters: Available converters with their units
//! - select_converter: Switch converter (resets both fields)
//! - set_value: Type into the left or right field
//! - set_unit: Change the unit of the left or right field
//! - swap: Exchange the two fields
//! - state: Current form
//! - convert: One-shot conversion that leaves the form untouched

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tandem::{Form, Renderer, Side};
use tandem_core::{format_number, parse_input, TandemError, Unit};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "tandem";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

// MCP Protocol types
#[derive(Debug, Deserialize)]
struct McpRequest {
    #[allow(dead_code)]
    jsonrpc: String,
    id: Option<JsonValue>,
    method: String,
    #[serde(default)]
    params: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
struct McpResponse {
    jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<McpError>,
}

#[derive(Debug, Serialize)]
struct McpError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<JsonValue>,
}

impl McpError {
    fn parse_error(message: String) -> Self {
        Self { code: -32700, message, data: None }
    }

    fn method_not_found(method: &str) -> Self {
        Self { code: -32601, message: format!("Method not found: {}", method), data: None }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self { code: -32602, message: message.into(), data: None }
    }
}

/// Logs go to stderr; stdout carries the protocol
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let mut form = match tandem::standard_form() {
        Ok(form) => form,
        Err(e) => {
            error!(error = %e, "cannot start form");
            std::process::exit(1);
        }
    };

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "Tandem MCP Server started");
    info!(converter = form.active_converter_id(), converters = ?form.registry().ids(), "form ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    info!("Server ready, waiting for requests...");

    loop {
        match lines.next_line().await {
            Ok(None) => {
                info!("Client disconnected (EOF)");
                break;
            }
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                debug!(bytes = line.len(), "received request");

                let Some(response) = process_line(&mut form, line) else {
                    continue;
                };

                let response_json = match serde_json::to_string(&response) {
                    Ok(s) => s,
                    Err(e) => {
                        error!(error = %e, "cannot serialize response");
                        continue;
                    }
                };
                if let Err(e) = write_line(&mut stdout, &response_json).await {
                    error!(error = %e, "error writing response");
                    break;
                }
            }
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        }
    }

    info!("Server shutting down");
}

async fn write_line(stdout: &mut tokio::io::Stdout, line: &str) -> std::io::Result<()> {
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}

/// Handle one input line; `None` when no response is due
fn process_line(form: &mut Form, line: &str) -> Option<McpResponse> {
    let request: McpRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "error parsing request");
            return Some(McpResponse {
                jsonrpc: "2.0".to_string(),
                id: None,
                result: None,
                error: Some(McpError::parse_error(format!("Parse error: {}", e))),
            });
        }
    };

    debug!(method = %request.method, "processing");
    let response = handle_request(form, &request);

    // Notifications (no id) should NOT receive a response
    if request.id.is_none() {
        debug!(method = %request.method, "notification processed (no response)");
        return None;
    }
    Some(response)
}

fn handle_request(form: &mut Form, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(form, &request.params),

        _ => Err(McpError::method_not_found(&request.method)),
    };

    match result {
        Ok(r) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: Some(r),
            error: None,
        },
        Err(e) => McpResponse {
            jsonrpc: "2.0".to_string(),
            id: request.id.clone(),
            result: None,
            error: Some(e),
        },
    }
}

fn handle_initialize(params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let client_info = params.as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Use client's protocol version for compatibility
    let client_protocol = params.as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client = client_info, protocol = client_protocol, "client connected");

    Ok(json!({
        "protocolVersion": client_protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Two linked fields converting temperature and weight units"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Tandem keeps two fields showing the same quantity in two units. Pick a converter with select_converter, type into a side with set_value, change units with set_unit. Every call returns the whole form."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    let side_schema = json!({
        "type": "string",
        "description": "Which field",
        "enum": ["left", "right"]
    });

    Ok(json!({
        "tools": [
            {
                "name": "list_converters",
                "description": "List available converters with their units, in display order.",
                "inputSchema": { "type": "object", "properties": {} }
            },
            {
                "name": "select_converter",
                "description": "Switch the active converter. Clears both fields and resets their units.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string", "description": "Converter id, e.g. \"temperature\"" }
                    },
                    "required": ["id"]
                }
            },
            {
                "name": "set_value",
                "description": "Type text into a field. The other field is recomputed, or cleared if the text is not a number.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "side": side_schema,
                        "text": { "type": "string", "description": "Text as typed" }
                    },
                    "required": ["side", "text"]
                }
            },
            {
                "name": "set_unit",
                "description": "Change the unit of a field. The other field is recomputed when this field holds a number.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "side": side_schema,
                        "unit": { "type": "string", "description": "Unit key, e.g. \"CELSIUS\"" }
                    },
                    "required": ["side", "unit"]
                }
            },
            {
                "name": "swap",
                "description": "Exchange the text and unit of the two fields.",
                "inputSchema": { "type": "object", "properties": {} }
            },
            {
                "name": "state",
                "description": "Show the current form.",
                "inputSchema": { "type": "object", "properties": {} }
            },
            {
                "name": "convert",
                "description": "Convert a single value without touching the form.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "converter": { "type": "string", "description": "Converter id" },
                        "value": { "type": ["string", "number"], "description": "Value to convert" },
                        "from": { "type": "string", "description": "Source unit key" },
                        "to": { "type": "string", "description": "Target unit key" }
                    },
                    "required": ["converter", "value", "from", "to"]
                }
            }
        ]
    }))
}

fn handle_tool_call(form: &mut Form, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    match name {
        "list_converters" => tool_list_converters(form),
        "select_converter" => tool_select_converter(form, &args),
        "set_value" => tool_set_value(form, &args),
        "set_unit" => tool_set_unit(form, &args),
        "swap" => {
            form.swap();
            Ok(form_result(form))
        }
        "state" => Ok(form_result(form)),
        "convert" => tool_convert(form, &args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

fn tool_list_converters(form: &Form) -> Result<JsonValue, McpError> {
    let summaries = form.registry().summaries();
    let text = summaries.iter()
        .map(|c| {
            let units: Vec<&str> = c.units.iter().map(|u| u.label).collect();
            format!("- {} ({}): {}", c.name, c.id, units.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n");

    Ok(json!({
        "content": [{ "type": "text", "text": text }],
        "data": summaries
    }))
}

fn tool_select_converter(form: &mut Form, args: &JsonValue) -> Result<JsonValue, McpError> {
    let id = required_str(args, "id")?;
    Ok(apply(form, |f| f.select_converter(id)))
}

fn tool_set_value(form: &mut Form, args: &JsonValue) -> Result<JsonValue, McpError> {
    let side = required_side(args)?;
    let text = required_str(args, "text")?;
    Ok(apply(form, |f| f.set_value(side, text)))
}

fn tool_set_unit(form: &mut Form, args: &JsonValue) -> Result<JsonValue, McpError> {
    let side = required_side(args)?;
    let key = required_str(args, "unit")?;
    Ok(apply(form, |f| {
        let unit = f.resolve_unit(key)?;
        f.set_unit(side, unit)
    }))
}

fn tool_convert(form: &Form, args: &JsonValue) -> Result<JsonValue, McpError> {
    let converter_id = required_str(args, "converter")?;
    let from_key = required_str(args, "from")?;
    let to_key = required_str(args, "to")?;
    let value = match args.get("value") {
        Some(JsonValue::Number(n)) => n.as_f64(),
        Some(JsonValue::String(s)) => parse_input(s),
        _ => return Err(McpError::invalid_params("Missing value argument")),
    };

    let outcome = (|| -> Result<(f64, f64, Unit, Unit), TandemError> {
        let value = value.ok_or_else(|| TandemError::invalid_argument("value is not a number"))?;
        let converter = form.registry().lookup(converter_id)?;
        let resolve = |key: &str| {
            Unit::from_key(key)
                .filter(|u| converter.offers(*u))
                .ok_or_else(|| TandemError::unknown_unit(key, converter.meta().id))
        };
        let from = resolve(from_key)?;
        let to = resolve(to_key)?;
        Ok((value, converter.convert(value, from, to)?, from, to))
    })();

    match outcome {
        Ok((input, result, from, to)) => {
            let formatted = format_number(result);
            Ok(json!({
                "content": [{ "type": "text", "text": conversion_text(input, from, &formatted, to) }],
                "value": result,
                "formatted": formatted,
                "isError": false
            }))
        }
        Err(e) => Ok(error_result(&e)),
    }
}

fn conversion_text(input: f64, from: Unit, formatted: &str, to: Unit) -> String {
    format!("{} {} = {} {}", input, from, formatted, to)
}

/// Run a form operation and describe the outcome as a tool result
fn apply<F>(form: &mut Form, op: F) -> JsonValue
where
    F: FnOnce(&mut Form) -> Result<(), TandemError>,
{
    match op(form) {
        Ok(()) => form_result(form),
        Err(e) => {
            warn!(code = %e.code, message = %e.message, "form operation rejected");
            error_result(&e)
        }
    }
}

fn form_result(form: &Form) -> JsonValue {
    let view = form.view();
    json!({
        "content": [{ "type": "text", "text": Renderer::new().render(&view) }],
        "data": view,
        "isError": false
    })
}

fn error_result(err: &TandemError) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": format!("Error: {}", err) }],
        "error": err,
        "isError": true
    })
}

fn required_str<'a>(args: &'a JsonValue, key: &str) -> Result<&'a str, McpError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", key)))
}

fn required_side(args: &JsonValue) -> Result<Side, McpError> {
    let side = args.get("side").ok_or_else(|| McpError::invalid_params("Missing side argument"))?;
    serde_json::from_value(side.clone())
        .map_err(|_| McpError::invalid_params(format!("Invalid side: {}. Expected \"left\" or \"right\"", side)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn test_form() -> Form {
        Form::new(Arc::new(tandem_units::standard_registry())).unwrap()
    }

    fn request(method: &str, params: JsonValue) -> McpRequest {
        McpRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    fn call(form: &mut Form, name: &str, arguments: JsonValue) -> McpResponse {
        handle_request(form, &request("tools/call", json!({ "name": name, "arguments": arguments })))
    }

    #[test]
    fn test_initialize_echoes_protocol() {
        let mut form = test_form();
        let response = handle_request(&mut form, &request("initialize", json!({ "protocolVersion": "2024-11-05" })));
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "tandem");
    }

    #[test]
    fn test_unknown_method() {
        let mut form = test_form();
        let response = handle_request(&mut form, &request("resources/list", json!({})));
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn test_tools_list_names() {
        let result = handle_tools_list().unwrap();
        let names: Vec<&str> = result["tools"].as_array().unwrap()
            .iter()
            .filter_map(|t| t["name"].as_str())
            .collect();
        assert_eq!(names, vec![
            "list_converters", "select_converter", "set_value", "set_unit", "swap", "state", "convert",
        ]);
    }

    #[test]
    fn test_set_value_round_trip_through_tools() {
        let mut form = test_form();
        let result = call(&mut form, "set_value", json!({ "side": "left", "text": "0" })).result.unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["data"]["right"]["raw_text"], "32.00");
        assert!(result["content"][0]["text"].as_str().unwrap().contains("| right | 32.00 |"));
    }

    #[test]
    fn test_set_unit_keeps_text_and_rewrites_other_side() {
        let mut form = test_form();
        call(&mut form, "set_value", json!({ "side": "right", "text": "212" }));
        let result = call(&mut form, "set_unit", json!({ "side": "left", "unit": "FAHRENHEIT" })).result.unwrap();
        assert_eq!(result["data"]["left"]["raw_text"], "100.00");
        assert_eq!(result["data"]["right"]["raw_text"], "100.00");
    }

    #[test]
    fn test_swap_tool() {
        let mut form = test_form();
        call(&mut form, "set_value", json!({ "side": "left", "text": "0" }));
        let result = call(&mut form, "swap", json!({})).result.unwrap();
        assert_eq!(result["data"]["left"]["raw_text"], "32.00");
        assert_eq!(result["data"]["left"]["unit"], "FAHRENHEIT");
        assert_eq!(result["data"]["right"]["raw_text"], "0");
        assert_eq!(result["data"]["right"]["unit"], "CELSIUS");
    }

    #[test]
    fn test_select_unknown_converter_is_tool_error() {
        let mut form = test_form();
        let result = call(&mut form, "select_converter", json!({ "id": "length" })).result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "UNKNOWN_CONVERTER");
        assert_eq!(form.active_converter_id(), "temperature");
    }

    #[test]
    fn test_foreign_unit_is_tool_error() {
        let mut form = test_form();
        let result = call(&mut form, "set_unit", json!({ "side": "right", "unit": "POUNDS" })).result.unwrap();
        assert_eq!(result["error"]["code"], "UNKNOWN_UNIT");
    }

    #[test]
    fn test_bad_side_is_invalid_params() {
        let mut form = test_form();
        let response = call(&mut form, "set_value", json!({ "side": "middle", "text": "1" }));
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn test_convert_tool() {
        let mut form = test_form();
        let result = call(&mut form, "convert",
            json!({ "converter": "weight", "value": "1", "from": "KILOGRAMS", "to": "POUNDS" })).result.unwrap();
        assert_eq!(result["formatted"], "2.20");
        assert_eq!(result["content"][0]["text"], "1 KILOGRAMS = 2.20 POUNDS");

        let result = call(&mut form, "convert",
            json!({ "converter": "temperature", "value": 100, "from": "CELSIUS", "to": "FAHRENHEIT" })).result.unwrap();
        assert_eq!(result["formatted"], "212.00");

        // The form itself is untouched
        assert_eq!(form.left().raw_text, "");
    }

    #[test]
    fn test_convert_rejects_non_numeric_value() {
        let mut form = test_form();
        let result = call(&mut form, "convert",
            json!({ "converter": "weight", "value": "abc", "from": "KILOGRAMS", "to": "POUNDS" })).result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["error"]["code"], "INVALID_ARGUMENT");
    }

    #[test]
    fn test_process_line() {
        let mut form = test_form();
        let response = process_line(&mut form, "not json").unwrap();
        assert_eq!(response.error.unwrap().code, -32700);

        // Notifications get no response
        assert!(process_line(&mut form, r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).is_none());

        let response = process_line(&mut form, r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#).unwrap();
        assert_eq!(response.id, Some(json!(7)));
    }
}
