use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One named example: the text a user would send, and the output fields
/// an assistant is expected to produce for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub input: String,
    pub output: IndexMap<String, String>,
}

/// Scenario name -> scenario, in insertion order.
pub type Scenarios = IndexMap<String, Scenario>;

pub const DEFAULT_STORAGE_KEY: &str = "jsonPromptData";

/// Starting dataset used when nothing valid has been persisted yet.
pub fn default_scenarios() -> Scenarios {
    let mut scenarios = Scenarios::new();

    let mut output = IndexMap::new();
    output.insert(
        "json_key_1".to_string(),
        "Example output for this key from LLM".to_string(),
    );
    output.insert(
        "another_key".to_string(),
        "Now delete these scenarios and start adding your own!".to_string(),
    );
    scenarios.insert(
        "Add one simple scenario".to_string(),
        Scenario {
            input: "Example input from user/document/response.\nStart with simple examples. Then add combination of nuances, edge cases, and errors.".into(),
            output,
        },
    );

    scenarios.insert(
        "Scenario/example 2".to_string(),
        Scenario {
            input: "Diversity of inputs/scenarios is more important than quantity.".into(),
            output: IndexMap::new(),
        },
    );

    scenarios
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenarios() {
        let scenarios = default_scenarios();
        let names: Vec<&str> = scenarios.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Add one simple scenario", "Scenario/example 2"]);

        let first = &scenarios["Add one simple scenario"];
        let keys: Vec<&str> = first.output.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["json_key_1", "another_key"]);
        assert!(first.input.contains('\n'));
        assert!(scenarios["Scenario/example 2"].output.is_empty());
    }

    #[test]
    fn test_scenario_json_shape() {
        let mut scenario = Scenario {
            input: "hello".into(),
            ..Default::default()
        };
        scenario.output.insert("x".into(), "y1".into());

        let value = serde_json::to_value(&scenario).unwrap();
        assert_eq!(value, serde_json::json!({"input": "hello", "output": {"x": "y1"}}));
    }

    #[test]
    fn test_output_order_survives_serialization() {
        let mut scenario = Scenario::default();
        scenario.output.insert("zeta".into(), String::new());
        scenario.output.insert("alpha".into(), String::new());

        let text = serde_json::to_string(&scenario).unwrap();
        assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());

        let back: Scenario = serde_json::from_str(&text).unwrap();
        assert_eq!(back.output.get_index(0).map(|(k, _)| k.as_str()), Some("zeta"));
    }
}
