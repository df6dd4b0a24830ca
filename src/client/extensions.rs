//! Client extension negotiation
//!
//! Requested extensions are looked up by identifier in a handler table. Unknown
//! identifiers are dropped so that relying parties can request extensions this
//! client has never heard of. A handler may also decline, in which case its
//! identifier is absent from the outputs.

use indexmap::IndexMap;

use crate::utils::logging::CeremonyLogger;
use crate::webauthn::{
    ClientExtensionInput, ClientExtensionInputs, ClientExtensionOutput, ClientExtensionOutputs,
    SUPPORTED_EXTENSIONS,
};

/// Maps one requested extension input to its output, or `None` to decline
pub type ExtensionHandler = fn(&ClientExtensionInput) -> Option<ClientExtensionOutput>;

/// Handler table for one ceremony phase
#[derive(Clone, Debug)]
pub struct ExtensionProcessor {
    phase: &'static str,
    handlers: IndexMap<String, ExtensionHandler>,
}

impl ExtensionProcessor {
    /// Table with no handlers: every requested extension is dropped
    #[must_use]
    pub fn empty(phase: &'static str) -> Self {
        Self {
            phase,
            handlers: IndexMap::new(),
        }
    }

    /// Registration table: supported-extensions enumeration
    #[must_use]
    pub fn registration() -> Self {
        Self::empty("registration").with_handler(SUPPORTED_EXTENSIONS, supported_extensions)
    }

    /// Authentication table, empty until authentication extensions are modeled
    #[must_use]
    pub fn authentication() -> Self {
        Self::empty("authentication")
    }

    /// Add or replace the handler for `identifier`
    #[must_use]
    pub fn with_handler(
        mut self,
        identifier: impl Into<String>,
        handler: ExtensionHandler,
    ) -> Self {
        self.handlers.insert(identifier.into(), handler);
        self
    }

    #[must_use]
    pub fn handles(&self, identifier: &str) -> bool {
        self.handlers.contains_key(identifier)
    }

    /// Map requested extensions to outputs, preserving request order
    #[must_use]
    pub fn process(&self, inputs: Option<&ClientExtensionInputs>) -> ClientExtensionOutputs {
        let mut outputs = ClientExtensionOutputs::new();
        let Some(inputs) = inputs else {
            return outputs;
        };

        for (identifier, input) in inputs.iter() {
            let Some(handler) = self.handlers.get(identifier) else {
                continue;
            };
            if let Some(output) = handler(input) {
                outputs.insert(identifier, output);
            }
        }

        CeremonyLogger::log_extensions_negotiated(self.phase, inputs.len(), outputs.len());
        outputs
    }
}

/// `exts`: report the extensions this client supports
fn supported_extensions(input: &ClientExtensionInput) -> Option<ClientExtensionOutput> {
    input
        .as_flag()
        .filter(|requested| *requested)
        .map(|_| ClientExtensionOutput::Identifiers(vec![SUPPORTED_EXTENSIONS.to_string()]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions_requested() {
        let inputs = ClientExtensionInputs::new().with_supported_extensions(true);
        let outputs = ExtensionProcessor::registration().process(Some(&inputs));

        assert_eq!(outputs.len(), 1);
        assert_eq!(
            outputs.get(SUPPORTED_EXTENSIONS),
            Some(&ClientExtensionOutput::Identifiers(vec!["exts".to_string()]))
        );
    }

    #[test]
    fn test_supported_extensions_declined() {
        let inputs = ClientExtensionInputs::new().with_supported_extensions(false);
        assert!(ExtensionProcessor::registration().process(Some(&inputs)).is_empty());
    }

    #[test]
    fn test_empty_and_absent_inputs() {
        let processor = ExtensionProcessor::registration();
        assert!(processor.process(None).is_empty());
        assert!(processor.process(Some(&ClientExtensionInputs::new())).is_empty());
    }

    #[test]
    fn test_unknown_identifiers_are_dropped() {
        let mut inputs = ClientExtensionInputs::new();
        inputs.insert("credProps", ClientExtensionInput::Flag(true));
        inputs.insert(
            "largeBlob",
            ClientExtensionInput::Json(serde_json::json!({"support": "required"})),
        );
        let inputs = inputs.with_supported_extensions(true);

        let outputs = ExtensionProcessor::registration().process(Some(&inputs));
        assert_eq!(outputs.keys().collect::<Vec<_>>(), vec!["exts"]);
    }

    #[test]
    fn test_authentication_table_is_empty() {
        let inputs = ClientExtensionInputs::new().with_supported_extensions(true);
        let processor = ExtensionProcessor::authentication();

        assert!(!processor.handles(SUPPORTED_EXTENSIONS));
        assert!(processor.process(Some(&inputs)).is_empty());
    }

    #[test]
    fn test_handlers_are_added_as_table_entries() {
        fn uvm(input: &ClientExtensionInput) -> Option<ClientExtensionOutput> {
            input.as_flag().map(ClientExtensionOutput::Flag)
        }

        let mut inputs = ClientExtensionInputs::new();
        inputs.insert("uvm", ClientExtensionInput::Flag(true));
        let outputs = ExtensionProcessor::authentication()
            .with_handler("uvm", uvm)
            .process(Some(&inputs));

        assert_eq!(outputs.get("uvm"), Some(&ClientExtensionOutput::Flag(true)));
    }
}
