use crate::scenario::{Scenario, Scenarios, default_scenarios};
use crate::storage::KeyValueStorage;
use tracing::{debug, warn};

/// The scenario dataset bound to the UI, mirrored into local storage.
///
/// Every method that changes the map calls [`ScenarioStore::persist`] before
/// returning `true`. Rejected edits return `false` and leave both the map and
/// the storage untouched.
pub struct ScenarioStore<S: KeyValueStorage> {
    scenarios: Scenarios,
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> ScenarioStore<S> {
    /// Read the persisted dataset, falling back to the default sample.
    pub fn load(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let scenarios = match storage.get_item(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Scenarios>(&raw) {
                Ok(scenarios) => {
                    debug!("Loaded {} scenarios from '{}'", scenarios.len(), key);
                    scenarios
                }
                Err(e) => {
                    warn!("Persisted data under '{}' is unreadable, using defaults: {}", key, e);
                    default_scenarios()
                }
            },
            Ok(None) => default_scenarios(),
            Err(e) => {
                warn!("Failed to read '{}' from storage, using defaults: {}", key, e);
                default_scenarios()
            }
        };

        Self {
            scenarios,
            storage,
            key,
        }
    }

    pub fn scenarios(&self) -> &Scenarios {
        &self.scenarios
    }

    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.get(name)
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn add_scenario(&mut self, name: &str) -> bool {
        if name.is_empty() || self.scenarios.contains_key(name) {
            return false;
        }
        self.scenarios.insert(name.to_string(), Scenario::default());
        self.persist();
        true
    }

    pub fn delete_scenario(&mut self, name: &str) -> bool {
        if self.scenarios.shift_remove(name).is_none() {
            return false;
        }
        self.persist();
        true
    }

    pub fn set_input(&mut self, name: &str, text: &str) -> bool {
        let Some(scenario) = self.scenarios.get_mut(name) else {
            return false;
        };
        scenario.input = text.to_string();
        self.persist();
        true
    }

    /// Upserts `key`; an unknown key is appended.
    pub fn set_output_value(&mut self, name: &str, key: &str, text: &str) -> bool {
        let Some(scenario) = self.scenarios.get_mut(name) else {
            return false;
        };
        scenario.output.insert(key.to_string(), text.to_string());
        self.persist();
        true
    }

    pub fn add_output_key(&mut self, name: &str, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        let Some(scenario) = self.scenarios.get_mut(name) else {
            return false;
        };
        if scenario.output.contains_key(key) {
            return false;
        }
        scenario.output.insert(key.to_string(), String::new());
        self.persist();
        true
    }

    pub fn replace_all(&mut self, scenarios: Scenarios) {
        self.scenarios = scenarios;
        self.persist();
    }

    /// Write the whole dataset under the storage key. Failures are logged only.
    pub fn persist(&mut self) {
        let raw = match serde_json::to_string(&self.scenarios) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize scenarios: {}", e);
                return;
            }
        };
        if let Err(e) = self.storage.set_item(&self.key, &raw) {
            warn!("Failed to persist scenarios under '{}': {}", self.key, e);
        }
    }
}
