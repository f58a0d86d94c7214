//! Heuristics for inferring tool names from repository files.
//!
//! These are pattern matches, not parsers. They work on common README and
//! SDK conventions and will miss tools described any other way.

use std::collections::HashSet;
use std::sync::LazyLock;

use mcpdir_core::{DiscoveredTool, HttpMethod};
use regex::Regex;
use serde_json::Value;

/// Manifest files checked in order, before the README.
pub const MANIFEST_FILES: &[&str] = &["mcp.json", "manifest.json", "package.json"];

/// Markdown heading that opens a tools section.
static TOOLS_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(#{1,6})\s+.*\b(tools|functions|capabilities)\b").expect("static regex")
});

static ANY_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+").expect("static regex"));

/// `- **name**: description`, `- `name` - description`, `* name: description`.
static TOOL_BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[-*+]\s+(?:\*\*|`)?([A-Za-z_][A-Za-z0-9_\-]*)(?:\*\*|`)?(?:\s*(?:[:\-–]|\(|\s)\s*(.*))?$")
        .expect("static regex")
});

/// TypeScript SDK registration: `server.tool("name"`.
static TS_TOOL_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\.tool\(\s*["']([A-Za-z0-9_\-]+)["']"#).expect("static regex")
});

/// Python SDK decorator: `@mcp.tool()` followed by `def name`.
static PY_TOOL_DECORATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)@[\w.]*tool(?:\([^)]*\))?\s*\n\s*(?:async\s+)?def\s+([A-Za-z_]\w*)")
        .expect("static regex")
});

fn push_unique(tools: &mut Vec<DiscoveredTool>, seen: &mut HashSet<String>, tool: DiscoveredTool) {
    if seen.insert(tool.name.clone()) {
        tools.push(tool);
    }
}

/// Tools from a `tools` array of strings or `{name, description, ...}` objects.
pub fn tools_from_array(items: &[Value]) -> Vec<DiscoveredTool> {
    let mut seen = HashSet::new();
    let mut tools = Vec::new();
    for item in items {
        let tool = match item {
            Value::String(name) if !name.trim().is_empty() => DiscoveredTool::named(name.trim()),
            Value::Object(map) => {
                let Some(name) = map
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                else {
                    continue;
                };
                let mut tool = DiscoveredTool::named(name);
                if let Some(description) = map.get("description").and_then(Value::as_str) {
                    tool.description = description.trim().to_string();
                }
                if let Some(endpoint) = map.get("endpoint").and_then(Value::as_str) {
                    tool.endpoint = endpoint.to_string();
                }
                tool.method = HttpMethod::from_loose(map.get("method").and_then(Value::as_str));
                tool.parameters = map
                    .get("parameters")
                    .or_else(|| map.get("inputSchema"))
                    .or_else(|| map.get("input_schema"))
                    .cloned();
                tool
            }
            _ => continue,
        };
        push_unique(&mut tools, &mut seen, tool);
    }
    tools
}

/// Tools declared in a manifest file.
///
/// Looks at `tools`, then `mcp.tools` (the `package.json` convention).
pub fn tools_from_manifest(text: &str) -> Vec<DiscoveredTool> {
    let Ok(json) = serde_json::from_str::<Value>(text) else {
        return Vec::new();
    };
    json.get("tools")
        .or_else(|| json.get("mcp").and_then(|m| m.get("tools")))
        .and_then(Value::as_array)
        .map(|items| tools_from_array(items))
        .unwrap_or_default()
}

/// Bullet items under a "Tools" heading, up to the next heading of the same
/// or a higher level.
fn tools_from_sections(readme: &str) -> Vec<DiscoveredTool> {
    let mut tools = Vec::new();
    let mut section_level: Option<usize> = None;
    let mut in_code_block = false;

    for line in readme.lines() {
        if line.trim_start().starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }
        if in_code_block {
            continue;
        }

        if let Some(caps) = ANY_HEADING.captures(line) {
            let level = caps[1].len();
            if TOOLS_HEADING.is_match(line) {
                section_level = Some(level);
                continue;
            }
            if section_level.is_some_and(|open| level <= open) {
                section_level = None;
            }
            continue;
        }

        if section_level.is_none() {
            continue;
        }
        if let Some(caps) = TOOL_BULLET.captures(line) {
            let description = caps
                .get(2)
                .map(|m| m.as_str().trim().trim_end_matches(')').trim().to_string())
                .unwrap_or_default();
            tools.push(DiscoveredTool::named(&caps[1]).with_description(description));
        }
    }
    tools
}

/// Infer tools from README text.
///
/// Combines the tools section, TypeScript `server.tool("x"` calls and
/// Python `@mcp.tool` decorated functions, keeping the first occurrence of
/// each name.
pub fn tools_from_readme(readme: &str) -> Vec<DiscoveredTool> {
    let mut seen = HashSet::new();
    let mut tools = Vec::new();

    for tool in tools_from_sections(readme) {
        push_unique(&mut tools, &mut seen, tool);
    }
    for caps in TS_TOOL_CALL.captures_iter(readme) {
        push_unique(&mut tools, &mut seen, DiscoveredTool::named(&caps[1]));
    }
    for caps in PY_TOOL_DECORATOR.captures_iter(readme) {
        push_unique(&mut tools, &mut seen, DiscoveredTool::named(&caps[1]));
    }
    tools
}
