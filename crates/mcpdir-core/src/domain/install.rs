//! Install instructions, decoded once where they leave the store.
//!
//! Stored instructions come in several historical shapes: a JSON array of
//! steps, a single JSON step object, a JSON string, or plain text that was
//! never JSON at all. [`InstallInstructions::from_stored`] folds all of them
//! into one tagged union so read sites never sniff types again.

use serde::{Deserialize, Serialize};

/// One platform-specific install command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallStep {
    /// Display label, e.g. `Node.js` or `Python`.
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    /// Shell command. Upstream calls this `install_command`.
    #[serde(alias = "install_command")]
    pub command: String,
}

impl InstallStep {
    pub fn new(platform: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            icon_url: None,
            command: command.into(),
        }
    }
}

/// Install instructions as the rest of the system sees them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum InstallInstructions {
    /// Structured steps.
    Parsed(Vec<InstallStep>),
    /// Free text that could not be decoded into steps.
    Raw(String),
    /// Nothing stored.
    #[default]
    Missing,
}

impl InstallInstructions {
    /// Decode a stored column value.
    ///
    /// Never fails: anything that is not recognisable JSON is kept as
    /// [`InstallInstructions::Raw`].
    pub fn from_stored(stored: Option<&str>) -> Self {
        let Some(text) = stored.map(str::trim).filter(|t| !t.is_empty()) else {
            return Self::Missing;
        };

        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(serde_json::Value::Null) => Self::Missing,
            Ok(serde_json::Value::String(inner)) => {
                if inner.trim().is_empty() {
                    Self::Missing
                } else {
                    Self::Raw(inner)
                }
            }
            Ok(value @ serde_json::Value::Array(_)) => {
                match serde_json::from_value::<Vec<InstallStep>>(value) {
                    Ok(steps) if steps.is_empty() => Self::Missing,
                    Ok(steps) => Self::Parsed(steps),
                    Err(_) => Self::Raw(text.to_string()),
                }
            }
            Ok(value @ serde_json::Value::Object(_)) => {
                match serde_json::from_value::<InstallStep>(value) {
                    Ok(step) => Self::Parsed(vec![step]),
                    Err(_) => Self::Raw(text.to_string()),
                }
            }
            Ok(_) | Err(_) => Self::Raw(text.to_string()),
        }
    }

    /// Encode for storage. `Missing` stores NULL.
    ///
    /// Raw text is stored as a JSON string so it decodes back to `Raw`.
    pub fn to_stored(&self) -> Option<String> {
        match self {
            Self::Parsed(steps) => serde_json::to_string(steps).ok(),
            Self::Raw(text) => serde_json::to_string(text).ok(),
            Self::Missing => None,
        }
    }

    /// Structured steps, empty unless parsed.
    pub fn steps(&self) -> &[InstallStep] {
        match self {
            Self::Parsed(steps) => steps,
            _ => &[],
        }
    }

    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}
