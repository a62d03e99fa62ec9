use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// A single named schedule parameter.
/// Most parameters are plain numbers; `mode` for the cyclic schedule is text
/// and `staircase` for the exponential schedule is a flag.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ConfigValue {
    Flag(bool),
    Number(f32),
    Text(String),
}

/// ScheduleConfig is the parameter mapping handed to a learning rate schedule.
/// It is fixed at construction and immutable afterwards; the selected schedule
/// reads its own parameters out of it on every query.
///
/// Keys are not validated against any particular schedule here. A key the
/// selected schedule does not accept surfaces as an
/// `ScheduleError::UnexpectedParameter` when the rate is queried.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ScheduleConfig {
    params: BTreeMap<String, ConfigValue>,
}

impl ScheduleConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self {
            params: BTreeMap::new(),
        }
    }

    /// Sets a numeric parameter.
    pub fn with_number(mut self, name: &str, value: f32) -> Self {
        self.params.insert(name.to_string(), ConfigValue::Number(value));
        self
    }

    /// Sets a text parameter.
    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), ConfigValue::Text(value.to_string()));
        self
    }

    /// Sets a boolean parameter.
    pub fn with_flag(mut self, name: &str, value: bool) -> Self {
        self.params.insert(name.to_string(), ConfigValue::Flag(value));
        self
    }

    /// Returns the numeric value of `name`, if present and numeric.
    pub fn number(&self, name: &str) -> Option<f32> {
        match self.params.get(name) {
            Some(ConfigValue::Number(value)) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text value of `name`, if present and textual.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.params.get(name) {
            Some(ConfigValue::Text(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the boolean value of `name`, if present and boolean.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.params.get(name) {
            Some(ConfigValue::Flag(value)) => Some(*value),
            _ => None,
        }
    }

    pub(crate) fn required_number(&self, method: &'static str, name: &'static str) -> Result<f32, ScheduleError> {
        match self.params.get(name) {
            Some(ConfigValue::Number(value)) => Ok(*value),
            Some(_) => Err(ScheduleError::ConfigError(format!(
                "Parameter '{}' for the {} learning rate schedule must be a number",
                name, method
            ))),
            None => Err(ScheduleError::MissingParameter { method, name }),
        }
    }

    pub(crate) fn number_or(&self, name: &str, default: f32) -> f32 {
        self.number(name).unwrap_or(default)
    }

    pub(crate) fn text_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.text(name).unwrap_or(default)
    }

    pub(crate) fn flag_or(&self, name: &str, default: bool) -> bool {
        self.flag(name).unwrap_or(default)
    }

    /// Fails if the configuration carries a key outside `known`. Mirrors how a
    /// keyword-argument mismatch would surface from a direct call into the
    /// schedule formula.
    pub(crate) fn ensure_known(&self, method: &'static str, known: &[&str]) -> Result<(), ScheduleError> {
        for key in self.params.keys() {
            if !known.contains(&key.as_str()) {
                return Err(ScheduleError::UnexpectedParameter {
                    method,
                    name: key.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let config = ScheduleConfig::new()
            .with_number("learning_rate", 0.01)
            .with_text("mode", "triangular")
            .with_flag("staircase", true);

        assert_eq!(config.number("learning_rate"), Some(0.01));
        assert_eq!(config.text("mode"), Some("triangular"));
        assert_eq!(config.flag("staircase"), Some(true));
        assert_eq!(config.number("mode"), None);
        assert_eq!(config.number("absent"), None);
    }

    #[test]
    fn test_required_number_missing() {
        let config = ScheduleConfig::new();
        let err = config.required_number("exponential", "decay_rate").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing parameter 'decay_rate' for the exponential learning rate schedule"
        );
    }

    #[test]
    fn test_required_number_wrong_type() {
        let config = ScheduleConfig::new().with_text("decay_rate", "fast");
        let err = config.required_number("exponential", "decay_rate").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Parameter 'decay_rate' for the exponential learning rate schedule must be a number"
        );
    }

    #[test]
    fn test_ensure_known_rejects_stray_key() {
        let config = ScheduleConfig::new()
            .with_number("learning_rate", 0.01)
            .with_number("decay_steps", 100.0);

        assert!(config.ensure_known("cyclic", &["learning_rate", "max_lr"]).is_err());
        assert!(config
            .ensure_known("exponential", &["learning_rate", "decay_steps"])
            .is_ok());
    }

    #[test]
    fn test_serde_round_trip() {
        let config = ScheduleConfig::new()
            .with_number("max_lr", 0.1)
            .with_text("mode", "exp_range");
        let json = serde_json::to_string(&config).unwrap();
        let restored: ScheduleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }
}
