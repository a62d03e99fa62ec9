use log::info;
use serde::{Deserialize, Serialize};

use crate::config::ScheduleConfig;
use crate::error::ScheduleError;
use crate::schedule::{cyclic, exponential, linear_cosine, ScheduleFn};

/// The schedule family a manager dispatches to. `TestLr` is an alias kept for
/// experiment configurations that want a separately named schedule while
/// reusing the linear cosine decay.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Exponential,
    Cyclic,
    Linear,
    TestLr,
}

impl Method {
    /// Resolves a configuration name to a method. Names outside the
    /// registered set fail with `ScheduleError::UnknownMethod`.
    pub fn from_name(name: &str) -> Result<Self, ScheduleError> {
        match name {
            "exponential" => Ok(Method::Exponential),
            "cyclic" => Ok(Method::Cyclic),
            "linear" => Ok(Method::Linear),
            "test_lr" => Ok(Method::TestLr),
            other => Err(ScheduleError::UnknownMethod(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Method::Exponential => "exponential",
            Method::Cyclic => "cyclic",
            Method::Linear => "linear",
            Method::TestLr => "test_lr",
        }
    }

    fn function(&self) -> ScheduleFn {
        match self {
            Method::Exponential => exponential::learning_rate_from_config,
            Method::Cyclic => cyclic::learning_rate_from_config,
            Method::Linear | Method::TestLr => linear_cosine::learning_rate_from_config,
        }
    }
}

/// LearningRateManager binds a schedule method to a parameter mapping and
/// answers learning rate queries from the training loop.
///
/// The method name is resolved once at construction; the configuration is
/// held as-is and only interpreted when a rate is queried, so a parameter
/// that does not belong to the selected schedule surfaces as an error from
/// the query, not from the constructor.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LearningRateManager {
    method: Method,
    config: ScheduleConfig,
}

impl LearningRateManager {
    /// Creates a manager for the named method with the given configuration.
    pub fn new(method_name: &str, config: ScheduleConfig) -> Result<Self, ScheduleError> {
        let method = Method::from_name(method_name)?;
        info!("Learning rate manager using the {} schedule", method.name());
        Ok(Self { method, config })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Computes the learning rate for the current training step by applying
    /// the selected schedule to the stored configuration.
    pub fn learning_rate(&self, step: Option<f32>) -> Result<f32, ScheduleError> {
        (self.method.function())(step, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::cyclic::Cyclic;
    use crate::schedule::LearningRateSchedule;

    #[test]
    fn test_unknown_method_fails_at_construction() {
        let result = LearningRateManager::new("polynomial", ScheduleConfig::new());
        assert!(result.is_err());
        if let Err(err) = result {
            assert_eq!(err.to_string(), "Unknown learning rate method: polynomial");
        }
    }

    #[test]
    fn test_cyclic_dispatch() {
        let manager = LearningRateManager::new("cyclic", ScheduleConfig::new()).unwrap();
        assert_eq!(manager.method(), Method::Cyclic);
        // defaults: base 0.01, peak 0.1 at the default half cycle of 20
        assert!((manager.learning_rate(Some(0.0)).unwrap() - 0.01).abs() < 1e-7);
        assert!((manager.learning_rate(Some(20.0)).unwrap() - 0.1).abs() < 1e-7);
    }

    #[test]
    fn test_exponential_dispatch() {
        let config = ScheduleConfig::new()
            .with_number("learning_rate", 0.1)
            .with_number("decay_steps", 10.0)
            .with_number("decay_rate", 0.5);
        let manager = LearningRateManager::new("exponential", config).unwrap();
        assert!((manager.learning_rate(Some(10.0)).unwrap() - 0.05).abs() < 1e-7);
    }

    #[test]
    fn test_test_lr_aliases_linear() {
        let config = ScheduleConfig::new()
            .with_number("learning_rate", 0.1)
            .with_number("decay_steps", 100.0);
        let linear = LearningRateManager::new("linear", config.clone()).unwrap();
        let test_lr = LearningRateManager::new("test_lr", config).unwrap();
        for step in [0.0f32, 25.0, 50.0, 100.0] {
            assert_eq!(
                linear.learning_rate(Some(step)).unwrap(),
                test_lr.learning_rate(Some(step)).unwrap()
            );
        }
    }

    #[test]
    fn test_missing_step() {
        let manager = LearningRateManager::new("cyclic", ScheduleConfig::new()).unwrap();
        let err = manager.learning_rate(None).unwrap_err();
        assert!(matches!(err, ScheduleError::MissingStep(_)));
    }

    #[test]
    fn test_mismatched_config_fails_at_query_not_construction() {
        // a cyclic parameter handed to the exponential schedule
        let config = ScheduleConfig::new()
            .with_number("learning_rate", 0.1)
            .with_number("decay_steps", 10.0)
            .with_number("decay_rate", 0.5)
            .with_number("max_lr", 0.9);
        let manager = LearningRateManager::new("exponential", config).unwrap();
        let err = manager.learning_rate(Some(0.0)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected parameter 'max_lr' for the exponential learning rate schedule"
        );
    }

    #[test]
    fn test_manager_serde_round_trip() {
        let config = ScheduleConfig::new().with_number("max_lr", 0.2);
        let manager = LearningRateManager::new("cyclic", config).unwrap();
        let json = serde_json::to_string(&manager).unwrap();
        let restored: LearningRateManager = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.method(), Method::Cyclic);
        assert_eq!(
            restored.learning_rate(Some(20.0)).unwrap(),
            manager.learning_rate(Some(20.0)).unwrap()
        );
    }

    #[test]
    fn test_boxed_schedule_serde_round_trip() {
        let schedule: Box<dyn LearningRateSchedule> =
            Cyclic::default().learning_rate(0.001).max_lr(0.01).build().unwrap();
        let json = serde_json::to_string(&schedule).unwrap();
        let restored: Box<dyn LearningRateSchedule> = serde_json::from_str(&json).unwrap();
        for step in [0.0f32, 5.0, 20.0, 33.0] {
            assert_eq!(restored.learning_rate(step), schedule.learning_rate(step));
        }
    }
}
