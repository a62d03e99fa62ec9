use serde::{Deserialize, Serialize};

use crate::config::ScheduleConfig;
use crate::error::ScheduleError;

use super::LearningRateSchedule;

const METHOD: &str = "exponential";
const KNOWN_PARAMETERS: &[&str] = &["learning_rate", "decay_steps", "decay_rate", "staircase"];

// ExponentialDecaySchedule implements an exponential decay learning rate
// schedule which continuously shrinks the learning rate as training
// progresses: every `decay_steps` training steps the rate is multiplied by
// `decay_rate`. With `staircase` the exponent is floored, so the rate drops
// in discrete jumps instead of decaying smoothly between boundaries.
#[derive(Serialize, Deserialize, Clone)]
struct ExponentialDecaySchedule {
    learning_rate: f32, // Initial learning rate
    decay_steps: f32,   // Steps between two full applications of the decay
    decay_rate: f32,    // Base for the exponential decay
    staircase: bool,
}

impl ExponentialDecaySchedule {
    fn new(learning_rate: f32, decay_steps: f32, decay_rate: f32, staircase: bool) -> Self {
        Self {
            learning_rate,
            decay_steps,
            decay_rate,
            staircase,
        }
    }
}

#[typetag::serde]
impl LearningRateSchedule for ExponentialDecaySchedule {
    fn learning_rate(&self, step: f32) -> f32 {
        let mut exponent = step / self.decay_steps;
        if self.staircase {
            exponent = exponent.floor();
        }
        self.learning_rate * self.decay_rate.powf(exponent)
    }
}

pub(crate) fn learning_rate_from_config(step: Option<f32>, config: &ScheduleConfig) -> Result<f32, ScheduleError> {
    let step = step.ok_or(ScheduleError::MissingStep(METHOD))?;
    config.ensure_known(METHOD, KNOWN_PARAMETERS)?;
    let schedule = ExponentialDecaySchedule::new(
        config.required_number(METHOD, "learning_rate")?,
        config.required_number(METHOD, "decay_steps")?,
        config.required_number(METHOD, "decay_rate")?,
        config.flag_or("staircase", false),
    );
    Ok(schedule.learning_rate(step))
}

/// Exponential is a builder for the exponential decay learning rate schedule.
///
/// The schedule multiplies the initial learning rate by `decay_rate` once per
/// `decay_steps` training steps, interpolating smoothly in between unless
/// `staircase` is set. Continuously decreasing the step size of parameter
/// updates allows for more precise convergence late in training.
pub struct Exponential {
    learning_rate: f32,
    decay_steps: f32,
    decay_rate: f32,
    staircase: bool,
}

impl Exponential {
    // Creates a new builder.
    // Default values:
    // - `learning_rate`: 0.01
    // - `decay_steps`: 100.0
    // - `decay_rate`: 0.96
    // - `staircase`: false
    fn new() -> Self {
        Self {
            learning_rate: 0.01,
            decay_steps: 100.0,
            decay_rate: 0.96,
            staircase: false,
        }
    }

    /// Sets the initial learning rate.
    pub fn learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the number of steps over which one full decay is applied.
    pub fn decay_steps(mut self, decay_steps: f32) -> Self {
        self.decay_steps = decay_steps;
        self
    }

    /// Sets the multiplicative decay applied every `decay_steps` steps.
    pub fn decay_rate(mut self, decay_rate: f32) -> Self {
        self.decay_rate = decay_rate;
        self
    }

    /// Decays the rate at discrete step boundaries instead of continuously.
    pub fn staircase(mut self, staircase: bool) -> Self {
        self.staircase = staircase;
        self
    }

    fn validate(&self) -> Result<(), ScheduleError> {
        if self.learning_rate <= 0.0 {
            return Err(ScheduleError::ConfigError(format!(
                "Initial learning rate for Exponential must be greater than 0.0, but was {}",
                self.learning_rate
            )));
        }
        if self.decay_steps <= 0.0 {
            return Err(ScheduleError::ConfigError(format!(
                "Decay steps for Exponential must be greater than 0.0, but was {}",
                self.decay_steps
            )));
        }
        if self.decay_rate <= 0.0 || self.decay_rate >= 1.0 {
            return Err(ScheduleError::ConfigError(format!(
                "Decay rate for Exponential must be in the range (0, 1), but was {}",
                self.decay_rate
            )));
        }
        Ok(())
    }

    /// Builds the exponential decay schedule if the parameters are consistent.
    pub fn build(self) -> Result<Box<dyn LearningRateSchedule>, ScheduleError> {
        self.validate()?;
        Ok(Box::new(ExponentialDecaySchedule::new(
            self.learning_rate,
            self.decay_steps,
            self.decay_rate,
            self.staircase,
        )))
    }
}

impl Default for Exponential {
    fn default() -> Self {
        Self::new()
    }
}
