//! Moves the whole dataset between the store and the clipboard as JSON text.
//!
//! The clipboard calls themselves run on the worker (see `runner`); this
//! module builds the payload going out and applies the text coming back.

use crate::error::ScenarioPadResult;
use crate::notification::Notifier;
use crate::scenario::Scenarios;
use crate::state::ScenarioStore;
use crate::storage::KeyValueStorage;
use tracing::{debug, info, warn};

pub const COPY_SUCCESS: &str = "Data copied to clipboard!";
pub const COPY_FAILED: &str = "Failed to copy data.";
pub const PASTE_SUCCESS: &str = "Data pasted successfully!";
pub const PASTE_INVALID: &str = "Invalid data format.";
pub const READ_FAILED: &str = "Failed to read clipboard.";

/// Pretty JSON with 2-space indentation, in insertion order.
pub fn export_payload(scenarios: &Scenarios) -> ScenarioPadResult<String> {
    Ok(serde_json::to_string_pretty(scenarios)?)
}

pub fn parse_import(text: &str) -> ScenarioPadResult<Scenarios> {
    Ok(serde_json::from_str(text)?)
}

pub fn finish_copy(result: Result<(), String>, notifier: &mut Notifier) {
    match result {
        Ok(()) => {
            info!("Copied scenarios to clipboard");
            notifier.success(COPY_SUCCESS);
        }
        Err(e) => {
            warn!("Clipboard write failed: {}", e);
            notifier.error(COPY_FAILED);
        }
    }
}

/// Applies clipboard text to the store. The store is only replaced when the
/// text parses as a complete dataset.
pub fn finish_paste<S: KeyValueStorage>(
    result: Result<String, String>,
    store: &mut ScenarioStore<S>,
    notifier: &mut Notifier,
) {
    let text = match result {
        Ok(text) => text,
        Err(e) => {
            warn!("Clipboard read failed: {}", e);
            notifier.error(READ_FAILED);
            return;
        }
    };

    match parse_import(&text) {
        Ok(scenarios) => {
            info!("Pasted {} scenarios from clipboard", scenarios.len());
            store.replace_all(scenarios);
            notifier.success(PASTE_SUCCESS);
        }
        Err(e) => {
            debug!("Rejected clipboard text: {}", e);
            notifier.error(PASTE_INVALID);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationKind;
    use crate::scenario::{Scenario, default_scenarios};
    use crate::storage::MemoryStorage;

    fn store() -> ScenarioStore<MemoryStorage> {
        ScenarioStore::load(MemoryStorage::new(), "jsonPromptData")
    }

    fn shown(notifier: &Notifier) -> (NotificationKind, String) {
        let n = notifier.current().expect("notification shown");
        (n.kind, n.message.clone())
    }

    #[test]
    fn test_export_is_two_space_indented() {
        let mut scenarios = Scenarios::new();
        scenarios.insert("A".into(), Scenario::default());
        let text = export_payload(&scenarios).unwrap();
        assert_eq!(text, "{\n  \"A\": {\n    \"input\": \"\",\n    \"output\": {}\n  }\n}");
    }

    #[test]
    fn test_roundtrip_preserves_store() {
        let mut scenarios = default_scenarios();
        scenarios.insert(
            "unicode ✓ \"quoted\"".into(),
            Scenario {
                input: "line1\nline2\ttab".into(),
                ..Default::default()
            },
        );
        let text = export_payload(&scenarios).unwrap();
        assert_eq!(parse_import(&text).unwrap(), scenarios);
    }

    #[test]
    fn test_copy_outcomes() {
        let mut notifier = Notifier::default();
        finish_copy(Ok(()), &mut notifier);
        assert_eq!(shown(&notifier), (NotificationKind::Success, COPY_SUCCESS.into()));

        finish_copy(Err("denied".into()), &mut notifier);
        assert_eq!(shown(&notifier), (NotificationKind::Error, COPY_FAILED.into()));
    }

    #[test]
    fn test_paste_replaces_store() {
        let mut store = store();
        let mut notifier = Notifier::default();
        finish_paste(
            Ok(r#"{"Only":{"input":"i","output":{"k":"v"}}}"#.into()),
            &mut store,
            &mut notifier,
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Only").unwrap().output["k"], "v");
        assert_eq!(shown(&notifier), (NotificationKind::Success, PASTE_SUCCESS.into()));
        assert_eq!(store.storage().writes(), 1);
    }

    #[test]
    fn test_malformed_paste_leaves_store_unchanged() {
        let mut store = store();
        let before = store.scenarios().clone();
        let mut notifier = Notifier::default();

        finish_paste(Ok("{".into()), &mut store, &mut notifier);

        assert_eq!(store.scenarios(), &before);
        assert_eq!(store.storage().writes(), 0);
        assert_eq!(shown(&notifier), (NotificationKind::Error, PASTE_INVALID.into()));
    }

    #[test]
    fn test_wrong_shape_is_rejected() {
        let mut store = store();
        let before = store.scenarios().clone();
        let mut notifier = Notifier::default();

        for text in ["[1, 2, 3]", "\"just a string\"", r#"{"A": {"input": 5}}"#] {
            finish_paste(Ok(text.into()), &mut store, &mut notifier);
            assert_eq!(store.scenarios(), &before);
            assert_eq!(shown(&notifier).1, PASTE_INVALID);
        }
    }

    #[test]
    fn test_read_failure() {
        let mut store = store();
        let mut notifier = Notifier::default();
        finish_paste(Err("no access".into()), &mut store, &mut notifier);
        assert_eq!(shown(&notifier), (NotificationKind::Error, READ_FAILED.into()));
        assert_eq!(store.scenarios(), &default_scenarios());
    }
}
