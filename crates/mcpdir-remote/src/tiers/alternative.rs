//! Alternative documented API: `{endpoints: [{path, method, summary}]}`.

use async_trait::async_trait;
use mcpdir_core::{DetectionSource, DiscoveredTool, HttpMethod, Server, TierError, ToolTier};
use serde_json::Value;

use super::external_url;
use crate::error::{RemoteError, RemoteResult};
use crate::http::HttpBackend;
use crate::url::build_endpoint_url;

pub const API_TOOLS_PATH: &str = "api/tools";

fn text(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Last non-empty path segment, e.g. `/api/tools/search` ⇒ `search`.
fn name_from_path(path: &str) -> Option<String> {
    path.split('/')
        .rev()
        .map(str::trim)
        .find(|s| !s.is_empty() && !s.starts_with('{'))
        .map(str::to_string)
}

pub fn parse_endpoints(json: &Value) -> RemoteResult<Vec<DiscoveredTool>> {
    let endpoints = json
        .get("endpoints")
        .and_then(Value::as_array)
        .ok_or_else(|| RemoteError::invalid("expected an 'endpoints' array"))?;

    let mut tools: Vec<DiscoveredTool> = Vec::new();
    for endpoint in endpoints.iter().filter_map(Value::as_object) {
        let Some(path) = text(endpoint, "path") else {
            continue;
        };
        let Some(name) = text(endpoint, "name").or_else(|| name_from_path(&path)) else {
            continue;
        };
        if tools.iter().any(|t| t.name == name) {
            continue;
        }
        tools.push(DiscoveredTool {
            name,
            description: text(endpoint, "summary")
                .or_else(|| text(endpoint, "description"))
                .unwrap_or_default(),
            method: HttpMethod::from_loose(endpoint.get("method").and_then(Value::as_str)),
            endpoint: path,
            parameters: endpoint.get("parameters").cloned(),
        });
    }
    Ok(tools)
}

pub struct AlternativeApiTier<B: HttpBackend> {
    backend: B,
}

impl<B: HttpBackend> AlternativeApiTier<B> {
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: HttpBackend> ToolTier for AlternativeApiTier<B> {
    fn source(&self) -> DetectionSource {
        DetectionSource::AlternativeApi
    }

    async fn discover(&self, server: &Server) -> Result<Vec<DiscoveredTool>, TierError> {
        let url = build_endpoint_url(external_url(server)?, API_TOOLS_PATH)?;
        let json: Value = self.backend.get_json(&url).await?;
        Ok(parse_endpoints(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeBackend;
    use crate::tiers::tests::server_with;
    use serde_json::json;

    #[test]
    fn test_parse_endpoints() {
        let tools = parse_endpoints(&json!({
            "endpoints": [
                {"path": "/api/tools/search", "method": "GET", "summary": "Search"},
                {"path": "/api/tools/run", "name": "execute", "description": "Run a job"},
                {"path": "/api/items/{id}"},
                {"method": "POST"}
            ]
        }))
        .unwrap();

        assert_eq!(tools.len(), 3);
        assert_eq!(tools[0].name, "search");
        assert_eq!(tools[0].method, HttpMethod::Get);
        assert_eq!(tools[0].endpoint, "/api/tools/search");
        assert_eq!(tools[1].name, "execute");
        assert_eq!(tools[1].description, "Run a job");
        assert_eq!(tools[2].name, "items");

        assert!(parse_endpoints(&json!([1, 2])).is_err());
    }

    #[tokio::test]
    async fn test_http_failure_becomes_tier_error() {
        let tier = AlternativeApiTier::new(FakeBackend::new());
        let err = tier
            .discover(&server_with(Some("https://svc.example"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, TierError::Http(msg) if msg.contains("404")));
    }
}
