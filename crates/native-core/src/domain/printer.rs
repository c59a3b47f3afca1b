//! Printer snapshot returned by the shell's printer enumeration.
//!
//! The shell answers `GET printer` with one JSON object per installed printer:
//!
//! ```json
//! {
//!   "name": "HP_LaserJet",
//!   "displayName": "HP LaserJet 400",
//!   "description": "Office printer",
//!   "status": 3,
//!   "isDefault": true,
//!   "options": { "copies": "1", "printer-location": "2nd floor" }
//! }
//! ```
//!
//! [`PrinterInfo`] mirrors that object field for field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One printer as reported by the shell.
///
/// The fields are private: a `PrinterInfo` is built once (by serde or by
/// [`PrinterInfo::new`]) and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterInfo {
    name: String,
    display_name: String,
    #[serde(default)]
    description: String,
    /// Platform-specific numeric status code (CUPS / spooler value).
    #[serde(default)]
    status: i64,
    #[serde(default)]
    is_default: bool,
    /// `BTreeMap` keeps option order stable so serialised output is
    /// deterministic.
    #[serde(default)]
    options: BTreeMap<String, String>,
}

impl PrinterInfo {
    /// Builds a snapshot from its parts.
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        status: i64,
        is_default: bool,
        options: BTreeMap<String, String>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: description.into(),
            status,
            is_default,
            options,
        }
    }

    /// System name of the printer (the name used to address print jobs).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable name shown in print dialogs.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> i64 {
        self.status
    }

    /// `true` for the operating system's default printer.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// Looks up a single driver option by name.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printer_deserializes_camel_case_fields() {
        // Arrange: the exact shape the shell sends
        let json = r#"{
            "name": "HP_LaserJet",
            "displayName": "HP LaserJet 400",
            "description": "Office printer",
            "status": 3,
            "isDefault": true,
            "options": { "copies": "1", "printer-location": "2nd floor" }
        }"#;

        // Act
        let printer: PrinterInfo = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(printer.name(), "HP_LaserJet");
        assert_eq!(printer.display_name(), "HP LaserJet 400");
        assert_eq!(printer.description(), "Office printer");
        assert_eq!(printer.status(), 3);
        assert!(printer.is_default());
        assert_eq!(printer.option("printer-location"), Some("2nd floor"));
        assert_eq!(printer.options().len(), 2);
    }

    #[test]
    fn test_printer_optional_fields_default_when_absent() {
        let json = r#"{"name":"pdf","displayName":"Save as PDF"}"#;

        let printer: PrinterInfo = serde_json::from_str(json).unwrap();

        assert_eq!(printer.description(), "");
        assert_eq!(printer.status(), 0);
        assert!(!printer.is_default());
        assert!(printer.options().is_empty());
    }

    #[test]
    fn test_printer_missing_name_is_rejected() {
        let json = r#"{"displayName":"nameless"}"#;

        let result: Result<PrinterInfo, _> = serde_json::from_str(json);

        assert!(result.is_err(), "name is required");
    }

    #[test]
    fn test_printer_serializes_back_to_shell_field_names() {
        let printer = PrinterInfo::new("lp0", "Basement", "", 0, false, BTreeMap::new());

        let value = serde_json::to_value(&printer).unwrap();

        assert_eq!(value["displayName"], "Basement");
        assert_eq!(value["isDefault"], false);
        assert!(value.get("display_name").is_none());
    }

    #[test]
    fn test_option_lookup_for_unknown_key_is_none() {
        let printer = PrinterInfo::new("lp0", "lp0", "", 0, false, BTreeMap::new());
        assert_eq!(printer.option("duplex"), None);
    }
}
