use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::config::ScheduleConfig;
use crate::error::ScheduleError;

use super::LearningRateSchedule;

const METHOD: &str = "linear_cosine";
const KNOWN_PARAMETERS: &[&str] = &["learning_rate", "decay_steps", "num_periods", "alpha", "beta"];

// LinearCosineSchedule implements the linear cosine decay of Bello et al.,
// "Neural Optimizer Search with Reinforcement Learning" (2017): a linear
// ramp down to zero multiplied by a cosine oscillating `num_periods` times
// over the decay window, offset so the rate settles at `beta` times the
// initial learning rate. Steps past `decay_steps` are clamped.
#[derive(Serialize, Deserialize, Clone)]
struct LinearCosineSchedule {
    learning_rate: f32,
    decay_steps: f32,
    num_periods: f32,
    alpha: f32,
    beta: f32,
}

impl LinearCosineSchedule {
    fn new(learning_rate: f32, decay_steps: f32, num_periods: f32, alpha: f32, beta: f32) -> Self {
        Self {
            learning_rate,
            decay_steps,
            num_periods,
            alpha,
            beta,
        }
    }
}

#[typetag::serde]
impl LearningRateSchedule for LinearCosineSchedule {
    fn learning_rate(&self, step: f32) -> f32 {
        let step = step.min(self.decay_steps);
        let linear = (self.decay_steps - step) / self.decay_steps;
        let cosine = 0.5 * (1.0 + (2.0 * PI * self.num_periods * step / self.decay_steps).cos());
        self.learning_rate * ((self.alpha + linear) * cosine + self.beta)
    }
}

pub(crate) fn learning_rate_from_config(step: Option<f32>, config: &ScheduleConfig) -> Result<f32, ScheduleError> {
    let step = step.ok_or(ScheduleError::MissingStep(METHOD))?;
    config.ensure_known(METHOD, KNOWN_PARAMETERS)?;
    let schedule = LinearCosineSchedule::new(
        config.required_number(METHOD, "learning_rate")?,
        config.required_number(METHOD, "decay_steps")?,
        config.number_or("num_periods", 0.5),
        config.number_or("alpha", 0.0),
        config.number_or("beta", 0.001),
    );
    Ok(schedule.learning_rate(step))
}

/// LinearCosine is a builder for the linear cosine decay schedule.
///
/// With the default half period the rate decays from the initial learning
/// rate to `beta` times it over `decay_steps` steps; larger `num_periods`
/// values add cosine oscillations on top of the linear ramp, and `alpha`
/// lifts the oscillating part away from zero.
pub struct LinearCosine {
    learning_rate: f32,
    decay_steps: f32,
    num_periods: f32,
    alpha: f32,
    beta: f32,
}

impl LinearCosine {
    // Creates a new builder.
    // Default values:
    // - `learning_rate`: 0.01
    // - `decay_steps`: 100.0
    // - `num_periods`: 0.5
    // - `alpha`: 0.0
    // - `beta`: 0.001
    fn new() -> Self {
        Self {
            learning_rate: 0.01,
            decay_steps: 100.0,
            num_periods: 0.5,
            alpha: 0.0,
            beta: 0.001,
        }
    }

    /// Sets the initial learning rate.
    pub fn learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the length of the decay window in training steps.
    pub fn decay_steps(mut self, decay_steps: f32) -> Self {
        self.decay_steps = decay_steps;
        self
    }

    /// Sets how many cosine periods fit in the decay window.
    pub fn num_periods(mut self, num_periods: f32) -> Self {
        self.num_periods = num_periods;
        self
    }

    /// Sets the constant added to the linear ramp inside the cosine envelope.
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the floor of the decayed rate, as a fraction of the initial rate.
    pub fn beta(mut self, beta: f32) -> Self {
        self.beta = beta;
        self
    }

    fn validate(&self) -> Result<(), ScheduleError> {
        if self.learning_rate <= 0.0 {
            return Err(ScheduleError::ConfigError(format!(
                "Initial learning rate for LinearCosine must be greater than 0.0, but was {}",
                self.learning_rate
            )));
        }
        if self.decay_steps <= 0.0 {
            return Err(ScheduleError::ConfigError(format!(
                "Decay steps for LinearCosine must be greater than 0.0, but was {}",
                self.decay_steps
            )));
        }
        if self.num_periods <= 0.0 {
            return Err(ScheduleError::ConfigError(format!(
                "Number of periods for LinearCosine must be greater than 0.0, but was {}",
                self.num_periods
            )));
        }
        Ok(())
    }

    /// Builds the linear cosine schedule if the parameters are consistent.
    pub fn build(self) -> Result<Box<dyn LearningRateSchedule>, ScheduleError> {
        self.validate()?;
        Ok(Box::new(LinearCosineSchedule::new(
            self.learning_rate,
            self.decay_steps,
            self.num_periods,
            self.alpha,
            self.beta,
        )))
    }
}

impl Default for LinearCosine {
    fn default() -> Self {
        Self::new()
    }
}
