//! Tool records produced by the tools detector.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::server::{DetectionSource, ParseEnumError, ServerId};

/// HTTP method a tool is invoked with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    #[default]
    Post,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }

    /// Lenient parse used on upstream payloads; anything but GET is POST.
    pub fn from_loose(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("get") => Self::Get,
            _ => Self::Post,
        }
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            other => Err(ParseEnumError {
                kind: "http method",
                value: other.to_string(),
            }),
        }
    }
}

/// A tool as a detection tier reports it, before it is tied to a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredTool {
    pub name: String,
    pub description: String,
    pub method: HttpMethod,
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

impl DiscoveredTool {
    /// A named tool with the conventional `/tools/{name}` endpoint.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            endpoint: format!("/tools/{name}"),
            description: String::new(),
            method: HttpMethod::Post,
            parameters: None,
            name,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A persisted tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// UUID v5 of the tool name under the server id.
    pub id: Uuid,
    pub server_id: ServerId,
    pub name: String,
    pub description: String,
    pub method: HttpMethod,
    pub endpoint: String,
    pub detection_source: DetectionSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

impl Tool {
    /// Bind a discovered tool to its server.
    pub fn from_discovered(
        server_id: ServerId,
        source: DetectionSource,
        discovered: DiscoveredTool,
    ) -> Self {
        Self {
            id: Uuid::new_v5(server_id.as_uuid(), discovered.name.as_bytes()),
            server_id,
            name: discovered.name,
            description: discovered.description,
            method: discovered.method,
            endpoint: discovered.endpoint,
            detection_source: source,
            parameters: discovered.parameters,
        }
    }
}
