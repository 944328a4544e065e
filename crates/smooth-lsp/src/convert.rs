//! Conversion between smooth-lsp-core types and tower_lsp::lsp_types.

use serde_json::Value;
use tower_lsp::lsp_types::MessageType;

use smooth_lsp_core::NotificationKind;

/// Convert a notification kind to the `window/showMessage` type.
pub fn message_type(kind: NotificationKind) -> MessageType {
    match kind {
        NotificationKind::Info => MessageType::INFO,
        NotificationKind::Error => MessageType::ERROR,
    }
}

/// Extract the active document's URI from `workspace/executeCommand` arguments.
///
/// Clients pass the URI as the first argument, either as a bare string or
/// as an object with a `uri` field (a `TextDocumentIdentifier`).
pub fn document_uri(arguments: &[Value]) -> Option<&str> {
    match arguments.first()? {
        Value::String(uri) => Some(uri.as_str()),
        Value::Object(map) => map.get("uri").and_then(Value::as_str),
        _ => None,
    }
}

/// Pick the smooth-criminal section out of a settings payload.
///
/// Editors usually nest extension settings under the extension's name. A
/// payload without that key is only used when it carries an `oracle` object
/// itself; anything else belongs to another extension and yields `None`.
pub fn settings_section(settings: &Value) -> Option<&Value> {
    match settings.get("smoothCriminal") {
        Some(section) => Some(section),
        None => settings.get("oracle").map(|_| settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_type_conversion() {
        assert_eq!(message_type(NotificationKind::Info), MessageType::INFO);
        assert_eq!(message_type(NotificationKind::Error), MessageType::ERROR);
    }

    #[test]
    fn uri_from_string_argument() {
        let args = vec![json!("file:///a.py")];
        assert_eq!(document_uri(&args), Some("file:///a.py"));
    }

    #[test]
    fn uri_from_text_document_identifier() {
        let args = vec![json!({ "uri": "file:///b.py" }), json!(true)];
        assert_eq!(document_uri(&args), Some("file:///b.py"));
    }

    #[test]
    fn missing_or_unusable_argument_has_no_uri() {
        assert_eq!(document_uri(&[]), None);
        assert_eq!(document_uri(&[json!(null)]), None);
        assert_eq!(document_uri(&[json!({ "path": "/a.py" })]), None);
    }

    #[test]
    fn settings_section_prefers_nested_key() {
        let nested = json!({ "smoothCriminal": { "oracle": {} }, "other": 1 });
        assert_eq!(settings_section(&nested), Some(&json!({ "oracle": {} })));

        let flat = json!({ "oracle": {} });
        assert_eq!(settings_section(&flat), Some(&flat));
    }

    #[test]
    fn unrelated_settings_have_no_section() {
        assert_eq!(settings_section(&json!({ "editor": { "tabSize": 4 } })), None);
        assert_eq!(settings_section(&json!({})), None);
        assert_eq!(settings_section(&json!(null)), None);
    }
}
