//! Client extension inputs and outputs
//!
//! Both directions are insertion-ordered maps from extension identifier to payload.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Identifier of the supported-extensions enumeration extension
pub const SUPPORTED_EXTENSIONS: &str = "exts";

/// Payload of one requested client extension
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ClientExtensionInput {
    Flag(bool),
    Json(serde_json::Value),
}

impl ClientExtensionInput {
    #[must_use]
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ClientExtensionInput::Flag(flag) => Some(*flag),
            ClientExtensionInput::Json(value) => value.as_bool(),
        }
    }
}

/// Payload of one honored client extension
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ClientExtensionOutput {
    Flag(bool),
    Identifiers(Vec<String>),
    Json(serde_json::Value),
}

/// Requested client extensions, keyed by identifier
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct ClientExtensionInputs(IndexMap<String, ClientExtensionInput>);

impl ClientExtensionInputs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request (or explicitly decline) the supported-extensions enumeration
    #[must_use]
    pub fn with_supported_extensions(mut self, requested: bool) -> Self {
        self.insert(SUPPORTED_EXTENSIONS, ClientExtensionInput::Flag(requested));
        self
    }

    pub fn insert(&mut self, identifier: impl Into<String>, input: ClientExtensionInput) {
        self.0.insert(identifier.into(), input);
    }

    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&ClientExtensionInput> {
        self.0.get(identifier)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClientExtensionInput)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Client extension results, keyed by identifier
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct ClientExtensionOutputs(IndexMap<String, ClientExtensionOutput>);

impl ClientExtensionOutputs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, identifier: impl Into<String>, output: ClientExtensionOutput) {
        self.0.insert(identifier.into(), output);
    }

    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&ClientExtensionOutput> {
        self.0.get(identifier)
    }

    #[must_use]
    pub fn contains_key(&self, identifier: &str) -> bool {
        self.0.contains_key(identifier)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
