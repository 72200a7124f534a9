//! Mise MCP Server
//!
//! Line-delimited JSON-RPC 2.0 over stdin/stdout. Logs go to stderr.
//!
//! Tools:
//! - parse_recipe: Parse pasted recipe text into sections and steps
//! - parse_ingredient: Parse a single ingredient line
//! - parse_instructions: Split instruction text into steps
//! - convert: Convert a quantity between kitchen units
//! - scale_recipe: Multiply every quantity in a recipe
//! - call: Call any registered function by name
//! - help: Documentation for a function
//! - list_functions: List available functions

use mise::Mise;
use mise_core::Value;
use std::env;
use std::io::{self, BufRead, Write};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

const PROTOCOL_VERSION: &str = "2025-11-25";
const SERVER_NAME: &str = "mise";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const PARSE_ERROR: i32 = -32700;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;

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
    fn invalid_params(message: impl Into<String>) -> Self {
        McpError { code: INVALID_PARAMS, message: message.into(), data: None }
    }
}

/// "1", "true", "yes" and "on" (any case) enable a flag
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(raw) => parse_flag(&raw).unwrap_or_else(|| {
            warn!(variable = name, value = %raw, "unrecognised flag value, using default");
            default
        }),
        Err(_) => default,
    }
}

/// Create Mise with the standard library and environment preferences
fn create_mise() -> Mise {
    Mise::with_standard_library()
        .with_fractions(env_flag("MISE_USE_FRACTIONS", true))
        .with_prefer_imperial(env_flag("MISE_PREFER_IMPERIAL", true))
}

fn main() {
    // stdout carries the protocol, so logs must go to stderr
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mise = create_mise();

    info!(version = SERVER_VERSION, protocol = PROTOCOL_VERSION, "Mise MCP server started");
    info!(
        use_fractions = mise.use_fractions(),
        prefer_imperial = mise.prefer_imperial(),
        "display preferences"
    );

    let stdin = io::stdin();
    let reader = io::BufReader::new(stdin.lock());

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!(error = %e, "error reading input");
                break;
            }
        };

        let Some(response) = handle_line(&mise, &line) else {
            continue;
        };

        let mut stdout = io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{}", response).and_then(|_| stdout.flush()) {
            error!(error = %e, "error writing response");
            break;
        }
    }

    info!("client disconnected, shutting down");
}

/// One input line to at most one output line. Notifications and blank
/// lines produce nothing.
fn handle_line(mise: &Mise, line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    debug!(bytes = line.len(), "received");

    let response = match serde_json::from_str::<McpRequest>(line) {
        Ok(request) => {
            debug!(method = %request.method, "processing");
            let response = handle_request(mise, &request);
            if request.id.is_none() {
                debug!(method = %request.method, "notification processed (no response)");
                return None;
            }
            response
        }
        Err(e) => {
            warn!(error = %e, "error parsing request");
            McpResponse {
                jsonrpc: "2.0".to_string(),
                id: None,
                result: None,
                error: Some(McpError {
                    code: PARSE_ERROR,
                    message: format!("Parse error: {}", e),
                    data: None,
                }),
            }
        }
    };

    match serde_json::to_string(&response) {
        Ok(json) => Some(json),
        Err(e) => {
            error!(error = %e, "failed to serialize response");
            None
        }
    }
}

fn handle_request(mise: &Mise, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        // Lifecycle
        "initialize" => handle_initialize(&request.params),
        "initialized" | "notifications/initialized" => Ok(json!({})),
        "ping" => Ok(json!({})),

        // Tools
        "tools/list" => handle_tools_list(),
        "tools/call" => handle_tool_call(mise, &request.params),

        _ => Err(McpError {
            code: METHOD_NOT_FOUND,
            message: format!("Method not found: {}", request.method),
            data: None,
        }),
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
            "description": "Recipe text parsing and kitchen unit conversion"
        },
        "capabilities": {
            "tools": {
                "listChanged": false
            }
        },
        "instructions": "Mise turns pasted recipe text into a structured checklist. Use 'parse_recipe' first, then pass the returned recipe to 'scale_recipe' or to 'call' with to_metric / to_imperial. Use 'help' to explore functions."
    }))
}

fn handle_tools_list() -> Result<JsonValue, McpError> {
    Ok(json!({
        "tools": [
            {
                "name": "parse_recipe",
                "description": "Parse pasted recipe text into titled ingredient sections and ordered instruction steps.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "text": { "type": "string", "description": "Raw recipe text" }
                    },
                    "required": ["text"]
                }
            },
            {
                "name": "parse_ingredient",
                "description": "Parse one ingredient line into quantity, unit, name and notes.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "line": { "type": "string", "description": "Ingredient line, e.g. '1 1/2 tsp salt (7g)'" }
                    },
                    "required": ["line"]
                }
            },
            {
                "name": "parse_instructions",
                "description": "Split instruction text into ordered steps.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "text": { "type": "string", "description": "Instruction text" }
                    },
                    "required": ["text"]
                }
            },
            {
                "name": "convert",
                "description": "Convert a quantity between kitchen units. Volume and weight bridge at 1 ml = 1 g.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "value": { "type": "number", "description": "Quantity to convert" },
                        "from": { "type": "string", "description": "Source unit (any spelling)" },
                        "to": { "type": "string", "description": "Target unit (any spelling)" }
                    },
                    "required": ["value", "from", "to"]
                }
            },
            {
                "name": "scale_recipe",
                "description": "Multiply every quantity in a recipe. Accepts a parsed recipe object or raw recipe text.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "recipe": {
                            "description": "Recipe object from parse_recipe, or raw text",
                            "type": ["object", "string"]
                        },
                        "multiplier": { "type": "number", "description": "Scale factor, greater than zero" }
                    },
                    "required": ["recipe", "multiplier"]
                }
            },
            {
                "name": "call",
                "description": "Call any registered function by name with positional JSON arguments.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "Function name" },
                        "args": { "type": "array", "description": "Positional arguments", "items": {} }
                    },
                    "required": ["name"]
                }
            },
            {
                "name": "help",
                "description": "Get documentation for a function, or general help when no name is given.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string", "description": "Function name. Omit for general help." }
                    }
                }
            },
            {
                "name": "list_functions",
                "description": "List all available functions, optionally by category.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Filter by category",
                            "enum": ["units", "parse", "kitchen"]
                        }
                    }
                }
            }
        ]
    }))
}

fn handle_tool_call(mise: &Mise, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;

    let name = params.get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

    let args = params.get("arguments").cloned().unwrap_or(json!({}));

    match name {
        "parse_recipe" => tool_parse_recipe(mise, &args),
        "parse_ingredient" => tool_parse_ingredient(mise, &args),
        "parse_instructions" => tool_parse_instructions(mise, &args),
        "convert" => tool_convert(mise, &args),
        "scale_recipe" => tool_scale_recipe(mise, &args),
        "call" => tool_call(mise, &args),
        "help" => tool_help(mise, &args),
        "list_functions" => tool_list_functions(mise, &args),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

fn str_arg<'a>(args: &'a JsonValue, name: &str) -> Result<&'a str, McpError> {
    args.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", name)))
}

fn number_arg(args: &JsonValue, name: &str) -> Result<f64, McpError> {
    args.get(name)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| McpError::invalid_params(format!("Missing {} argument", name)))
}

/// Wrap a function result. Error values become a tool result with isError set.
fn tool_result(summary: String, value: &Value) -> JsonValue {
    match value {
        Value::Error(e) => {
            let mut text = format!("Error [{}]: {}", e.code, e.message);
            if let Some(s) = &e.suggestion {
                text.push_str(&format!("\n{}", s));
            }
            json!({
                "content": [{ "type": "text", "text": text }],
                "data": value.to_json(),
                "isError": true
            })
        }
        _ => json!({
            "content": [{ "type": "text", "text": summary }],
            "data": value.to_json(),
            "isError": false
        }),
    }
}

fn tool_parse_recipe(mise: &Mise, args: &JsonValue) -> Result<JsonValue, McpError> {
    let text = str_arg(args, "text")?;
    let recipe = mise.parse(text);
    let summary = format!(
        "Parsed {} ingredients in {} sections, {} steps",
        recipe.ingredient_count(),
        recipe.sections.len(),
        recipe.instructions.len()
    );
    Ok(tool_result(summary, &Value::from(recipe)))
}

fn tool_parse_ingredient(mise: &Mise, args: &JsonValue) -> Result<JsonValue, McpError> {
    let line = str_arg(args, "line")?;
    match mise.parse_ingredient(line) {
        Some(ingredient) => {
            let quantity = mise.display(&ingredient);
            let summary = if quantity.is_empty() {
                ingredient.ingredient.clone()
            } else {
                format!("{} {}", quantity, ingredient.ingredient)
            };
            Ok(tool_result(summary, &Value::from(ingredient)))
        }
        None => Ok(tool_result("Empty line".to_string(), &Value::Null)),
    }
}

fn tool_parse_instructions(mise: &Mise, args: &JsonValue) -> Result<JsonValue, McpError> {
    let text = str_arg(args, "text")?;
    let steps = mise.instructions(text);
    let summary = steps.iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {}", i + 1, s))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(tool_result(summary, &Value::List(steps.into_iter().map(Value::Text).collect())))
}

fn tool_convert(mise: &Mise, args: &JsonValue) -> Result<JsonValue, McpError> {
    let value = number_arg(args, "value")?;
    let from = str_arg(args, "from")?;
    let to = str_arg(args, "to")?;

    let result = mise.call("convert", &[Value::Number(value), Value::from(from), Value::from(to)]);
    let summary = match result.as_number() {
        Some(n) => format!("{} {} = {} {}", value, from, mise::format_number(n, false), to),
        None => String::new(),
    };
    Ok(tool_result(summary, &result))
}

fn tool_scale_recipe(mise: &Mise, args: &JsonValue) -> Result<JsonValue, McpError> {
    let multiplier = number_arg(args, "multiplier")?;
    let recipe = match args.get("recipe") {
        Some(JsonValue::String(text)) => Value::from(mise.parse(text)),
        Some(json) => Value::from_json(json),
        None => return Err(McpError::invalid_params("Missing recipe argument")),
    };

    let result = mise.call("scale_recipe", &[recipe, Value::Number(multiplier)]);
    let summary = match result.as_recipe() {
        Some(r) => format!("Scaled {} ingredients by {}", r.ingredient_count(), multiplier),
        None => String::new(),
    };
    Ok(tool_result(summary, &result))
}

fn tool_call(mise: &Mise, args: &JsonValue) -> Result<JsonValue, McpError> {
    let name = str_arg(args, "name")?;
    let call_args: Vec<Value> = match args.get("args") {
        Some(JsonValue::Array(items)) => items.iter().map(Value::from_json).collect(),
        Some(JsonValue::Null) | None => Vec::new(),
        Some(_) => return Err(McpError::invalid_params("args must be an array")),
    };

    let result = mise.call(name, &call_args);
    Ok(tool_result(result.to_string(), &result))
}

fn tool_help(mise: &Mise, args: &JsonValue) -> Result<JsonValue, McpError> {
    let name = args.get("name").and_then(|v| v.as_str());
    let help = mise.help(name);
    Ok(tool_result(format_help(&help), &help))
}

fn format_help(help: &Value) -> String {
    match help {
        Value::Object(map) => {
            let mut out = String::new();
            if let Some(Value::Text(n)) = map.get("name") { out.push_str(&format!("# {}\n\n", n)); }
            if let Some(Value::Text(d)) = map.get("description") { out.push_str(&format!("{}\n\n", d)); }
            if let Some(Value::Text(u)) = map.get("usage") { out.push_str(&format!("**Usage:** `{}`\n\n", u)); }
            if let Some(Value::List(examples)) = map.get("examples") {
                for e in examples {
                    out.push_str(&format!("- `{}`\n", e));
                }
            }
            if let Some(by_cat) = map.get("functions").and_then(Value::as_object) {
                let mut cats: Vec<&String> = by_cat.keys().collect();
                cats.sort();
                for cat in cats {
                    let names: Vec<&str> = by_cat[cat].as_list()
                        .map(|l| l.iter().filter_map(Value::as_text).collect())
                        .unwrap_or_default();
                    out.push_str(&format!("**{}:** {}\n", cat, names.join(", ")));
                }
            }
            out
        }
        Value::Error(e) => format!("Error: {}", e.message),
        _ => help.to_string(),
    }
}

fn tool_list_functions(mise: &Mise, args: &JsonValue) -> Result<JsonValue, McpError> {
    let category = args.get("category").and_then(|v| v.as_str());
    let functions = mise.list_functions(category);
    let summary = functions.as_list()
        .map(|items| {
            items.iter()
                .filter_map(|f| f.get("usage").as_text().map(str::to_string))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();
    Ok(tool_result(summary, &functions))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: &str, params: JsonValue) -> McpRequest {
        McpRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params: Some(params),
        }
    }

    fn call_tool(name: &str, arguments: JsonValue) -> JsonValue {
        let mise = Mise::with_standard_library();
        let response = handle_request(&mise, &request("tools/call", json!({"name": name, "arguments": arguments})));
        assert!(response.error.is_none(), "unexpected error: {:?}", response.error);
        response.result.unwrap()
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" Yes "), Some(true));
        assert_eq!(parse_flag("ON"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_initialize_echoes_protocol() {
        let mise = Mise::with_standard_library();
        let response = handle_request(&mise, &request("initialize", json!({
            "protocolVersion": "2025-06-18",
            "clientInfo": {"name": "test"}
        })));
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-06-18");
        assert_eq!(result["serverInfo"]["name"], "mise");
    }

    #[test]
    fn test_tools_list_names() {
        let result = handle_tools_list().unwrap();
        let names: Vec<&str> = result["tools"].as_array().unwrap()
            .iter()
            .filter_map(|t| t["name"].as_str())
            .collect();
        assert_eq!(names, vec![
            "parse_recipe", "parse_ingredient", "parse_instructions", "convert",
            "scale_recipe", "call", "help", "list_functions",
        ]);
    }

    #[test]
    fn test_unknown_method() {
        let mise = Mise::with_standard_library();
        let response = handle_request(&mise, &request("resources/list", json!({})));
        assert_eq!(response.error.unwrap().code, METHOD_NOT_FOUND);
    }

    #[test]
    fn test_parse_error_line() {
        let mise = Mise::with_standard_library();
        let out = handle_line(&mise, "{not json").unwrap();
        let json: JsonValue = serde_json::from_str(&out).unwrap();
        assert_eq!(json["error"]["code"], PARSE_ERROR);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_notification_gets_no_response() {
        let mise = Mise::with_standard_library();
        assert!(handle_line(&mise, r#"{"jsonrpc":"2.0","method":"initialized"}"#).is_none());
        assert!(handle_line(&mise, "   ").is_none());
        let out = handle_line(&mise, r#"{"jsonrpc":"2.0","id":7,"method":"ping"}"#).unwrap();
        assert!(out.contains("\"id\":7"));
    }

    #[test]
    fn test_missing_arguments_are_invalid_params() {
        let mise = Mise::with_standard_library();
        let response = handle_request(&mise, &request("tools/call", json!({"name": "convert", "arguments": {"value": 1}})));
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);

        let response = handle_request(&mise, &request("tools/call", json!({"name": "bake"})));
        assert_eq!(response.error.unwrap().code, INVALID_PARAMS);
    }

    #[test]
    fn test_parse_recipe_tool() {
        let result = call_tool("parse_recipe", json!({"text": "Ingredients:\n2 cups flour\nInstructions:\n1. Mix"}));
        assert_eq!(result["isError"], false);
        assert_eq!(result["data"]["sections"][0]["ingredients"][0]["unit"], "cup");
        assert_eq!(result["data"]["instructions"][0], "Mix");
    }

    #[test]
    fn test_parse_ingredient_tool() {
        let result = call_tool("parse_ingredient", json!({"line": "1 1/2 tsp salt (7g)"}));
        assert_eq!(result["data"]["quantity"], 1.5);
        assert_eq!(result["data"]["parentheticalUnit"], "g");
        assert_eq!(result["content"][0]["text"], "1½ tsp salt");
    }

    #[test]
    fn test_convert_tool() {
        let result = call_tool("convert", json!({"value": 1, "from": "kg", "to": "grams"}));
        assert_eq!(result["data"], 1000.0);

        let result = call_tool("convert", json!({"value": 1, "from": "cup", "to": "dozen"}));
        assert_eq!(result["isError"], true);
    }

    #[test]
    fn test_scale_recipe_accepts_text_or_object() {
        let from_text = call_tool("scale_recipe", json!({"recipe": "2 cups flour", "multiplier": 2}));
        assert_eq!(from_text["data"]["sections"][0]["ingredients"][0]["quantity"], 4.0);

        let parsed = call_tool("parse_recipe", json!({"text": "2 cups flour"}));
        let from_object = call_tool("scale_recipe", json!({"recipe": parsed["data"], "multiplier": 0.5}));
        assert_eq!(from_object["data"]["sections"][0]["ingredients"][0]["quantity"], 1.0);

        let invalid = call_tool("scale_recipe", json!({"recipe": "2 cups flour", "multiplier": 0}));
        assert_eq!(invalid["isError"], true);
    }

    #[test]
    fn test_call_tool_round_trips_recipe() {
        let parsed = call_tool("parse_recipe", json!({"text": "1 cup milk"}));
        let result = call_tool("call", json!({"name": "to_metric", "args": [parsed["data"]]}));
        assert_eq!(result["data"]["sections"][0]["ingredients"][0]["unit"], "ml");
    }

    #[test]
    fn test_help_and_list_functions_tools() {
        let help = call_tool("help", json!({"name": "convert"}));
        assert!(help["content"][0]["text"].as_str().unwrap().starts_with("# convert"));

        let general = call_tool("help", json!({}));
        let text = general["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("**kitchen:** convert_ingredient, display_quantity, scale_recipe, to_imperial, to_metric"));

        let listed = call_tool("list_functions", json!({"category": "parse"}));
        assert_eq!(listed["data"].as_array().unwrap().len(), 6);
    }
}
