//! Standard MCP resource listing.

use async_trait::async_trait;
use mcpdir_core::{DetectionSource, DiscoveredTool, Server, TierError, ToolTier};
use serde_json::Value;

use super::external_url;
use super::heuristics::tools_from_array;
use crate::error::{RemoteError, RemoteResult};
use crate::http::HttpBackend;
use crate::url::build_endpoint_url;

pub const LIST_RESOURCES_PATH: &str = "list_resources";

/// Accepts a bare array or an object with a `tools` or `resources` array.
pub fn parse_listing(json: &Value) -> RemoteResult<Vec<DiscoveredTool>> {
    let items = match json {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get("tools")
            .or_else(|| map.get("resources"))
            .and_then(Value::as_array)
            .ok_or_else(|| RemoteError::invalid("expected a 'tools' or 'resources' array"))?,
        _ => return Err(RemoteError::invalid("expected a JSON array or object")),
    };
    Ok(tools_from_array(items))
}

pub struct StandardMcpTier<B: HttpBackend> {
    backend: B,
}

impl<B: HttpBackend> StandardMcpTier<B> {
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: HttpBackend> ToolTier for StandardMcpTier<B> {
    fn source(&self) -> DetectionSource {
        DetectionSource::StandardMcpApi
    }

    async fn discover(&self, server: &Server) -> Result<Vec<DiscoveredTool>, TierError> {
        let url = build_endpoint_url(external_url(server)?, LIST_RESOURCES_PATH)?;
        let json: Value = self.backend.get_json(&url).await?;
        Ok(parse_listing(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::FakeBackend;
    use crate::tiers::tests::server_with;
    use mcpdir_core::HttpMethod;
    use serde_json::json;

    #[test]
    fn test_parse_listing_shapes() {
        let bare = parse_listing(&json!([{"name": "a"}, {"name": "b", "method": "GET"}])).unwrap();
        assert_eq!(bare.len(), 2);
        assert_eq!(bare[1].method, HttpMethod::Get);

        let wrapped = parse_listing(&json!({"resources": [{"name": "r", "endpoint": "/r"}]})).unwrap();
        assert_eq!(wrapped[0].endpoint, "/r");

        assert!(parse_listing(&json!({"tools": []})).unwrap().is_empty());
        assert!(parse_listing(&json!({"unrelated": 1})).is_err());
        assert!(parse_listing(&json!("text")).is_err());
    }

    #[tokio::test]
    async fn test_discover_hits_list_resources() {
        let backend = FakeBackend::new().with_json(
            "/list_resources",
            json!({"tools": [{"name": "query", "description": "Run SQL"}]}),
        );
        let tier = StandardMcpTier::new(backend.clone());

        let tools = tier
            .discover(&server_with(Some("https://db.example/mcp"), None))
            .await
            .unwrap();
        assert_eq!(tools[0].name, "query");
        assert_eq!(backend.requests(), vec!["https://db.example/mcp/list_resources"]);
    }

    #[tokio::test]
    async fn test_discover_without_url_is_not_applicable() {
        let tier = StandardMcpTier::new(FakeBackend::new());
        let err = tier.discover(&server_with(None, None)).await.unwrap_err();
        assert!(matches!(err, TierError::NotApplicable(_)));
    }
}
