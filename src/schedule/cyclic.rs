use serde::{Deserialize, Serialize};

use crate::config::ScheduleConfig;
use crate::error::ScheduleError;

use super::LearningRateSchedule;

const METHOD: &str = "cyclic";
const KNOWN_PARAMETERS: &[&str] = &["learning_rate", "max_lr", "step_size", "gamma", "mode"];

/// Shape of the cyclic oscillation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CyclicMode {
    /// Plain triangular wave between the base and maximum learning rate.
    Triangular,
    /// Triangular wave whose amplitude is halved after every completed cycle.
    Triangular2,
    /// Triangular wave whose amplitude decays by `gamma` raised to the step.
    ExpRange,
}

impl CyclicMode {
    fn from_text(text: &str) -> Result<Self, ScheduleError> {
        match text {
            "triangular" => Ok(CyclicMode::Triangular),
            "triangular2" => Ok(CyclicMode::Triangular2),
            "exp_range" => Ok(CyclicMode::ExpRange),
            other => Err(ScheduleError::ConfigError(format!(
                "Mode for Cyclic must be one of triangular, triangular2 or exp_range, but was {}",
                other
            ))),
        }
    }
}

// CyclicLRSchedule implements the cyclical learning rate policy of
// Smith, "Cyclical Learning Rates for Training Neural Networks" (2017).
// The learning rate oscillates as a triangular wave between `learning_rate`
// and `max_lr` with a half-cycle of `step_size` training steps. The
// triangular2 mode halves the wave's amplitude after every completed cycle,
// and the exp_range mode scales the amplitude by `gamma^step`, giving an
// exponentially shrinking envelope.
#[derive(Serialize, Deserialize, Clone)]
struct CyclicLRSchedule {
    learning_rate: f32, // Base (minimum) learning rate
    max_lr: f32,        // Upper bound of the oscillation
    step_size: f32,     // Half cycle length, in training steps
    gamma: f32,         // Amplitude decay base for exp_range mode
    mode: CyclicMode,
}

impl CyclicLRSchedule {
    fn new(learning_rate: f32, max_lr: f32, step_size: f32, gamma: f32, mode: CyclicMode) -> Self {
        Self {
            learning_rate,
            max_lr,
            step_size,
            gamma,
            mode,
        }
    }
}

#[typetag::serde]
impl LearningRateSchedule for CyclicLRSchedule {
    // cycle counts completed full cycles starting at 1; x traces the
    // triangular wave, hitting 0 at each peak and 1 at each trough.
    fn learning_rate(&self, step: f32) -> f32 {
        let cycle = (1.0 + step / (2.0 * self.step_size)).floor();
        let x = (step / self.step_size - 2.0 * cycle + 1.0).abs();
        let mut amplitude = (1.0 - x).max(0.0) * (self.max_lr - self.learning_rate);
        match self.mode {
            CyclicMode::Triangular => {}
            CyclicMode::Triangular2 => amplitude /= 2f32.powi(cycle as i32 - 1),
            CyclicMode::ExpRange => amplitude *= self.gamma.powf(step),
        }
        amplitude + self.learning_rate
    }
}

pub(crate) fn learning_rate_from_config(step: Option<f32>, config: &ScheduleConfig) -> Result<f32, ScheduleError> {
    let step = step.ok_or(ScheduleError::MissingStep(METHOD))?;
    config.ensure_known(METHOD, KNOWN_PARAMETERS)?;
    let schedule = CyclicLRSchedule::new(
        config.number_or("learning_rate", 0.01),
        config.number_or("max_lr", 0.1),
        config.number_or("step_size", 20.0),
        config.number_or("gamma", 0.99994),
        CyclicMode::from_text(config.text_or("mode", "triangular"))?,
    );
    Ok(schedule.learning_rate(step))
}

/// Cyclic is a builder for the cyclical learning rate schedule, which lets the
/// learning rate oscillate between a base and a maximum value instead of
/// decaying monotonically. Periodically revisiting large learning rates helps
/// training escape saddle points and sharp minima.
///
/// The wave rises from `learning_rate` to `max_lr` over `step_size` training
/// steps and falls back over the next `step_size` steps. `mode` selects how
/// the amplitude evolves across cycles and `gamma` controls the exp_range
/// envelope.
pub struct Cyclic {
    learning_rate: f32,
    max_lr: f32,
    step_size: f32,
    gamma: f32,
    mode: CyclicMode,
}

impl Cyclic {
    // Creates a new builder.
    // Default values:
    // - `learning_rate`: 0.01
    // - `max_lr`: 0.1
    // - `step_size`: 20.0
    // - `gamma`: 0.99994
    // - `mode`: triangular
    fn new() -> Self {
        Self {
            learning_rate: 0.01,
            max_lr: 0.1,
            step_size: 20.0,
            gamma: 0.99994,
            mode: CyclicMode::Triangular,
        }
    }

    /// Sets the base (minimum) learning rate.
    pub fn learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the maximum learning rate reached at the peak of each cycle.
    pub fn max_lr(mut self, max_lr: f32) -> Self {
        self.max_lr = max_lr;
        self
    }

    /// Sets the half cycle length in training steps.
    pub fn step_size(mut self, step_size: f32) -> Self {
        self.step_size = step_size;
        self
    }

    /// Sets the amplitude decay base used by the exp_range mode.
    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the oscillation mode.
    pub fn mode(mut self, mode: CyclicMode) -> Self {
        self.mode = mode;
        self
    }

    fn validate(&self) -> Result<(), ScheduleError> {
        if self.learning_rate <= 0.0 {
            return Err(ScheduleError::ConfigError(format!(
                "Base learning rate for Cyclic must be greater than 0.0, but was {}",
                self.learning_rate
            )));
        }
        if self.max_lr < self.learning_rate {
            return Err(ScheduleError::ConfigError(format!(
                "Maximum learning rate for Cyclic must not be below the base learning rate, but was {}",
                self.max_lr
            )));
        }
        if self.step_size <= 0.0 {
            return Err(ScheduleError::ConfigError(format!(
                "Step size for Cyclic must be greater than 0.0, but was {}",
                self.step_size
            )));
        }
        if self.gamma <= 0.0 || self.gamma > 1.0 {
            return Err(ScheduleError::ConfigError(format!(
                "Gamma for Cyclic must be in the range (0, 1], but was {}",
                self.gamma
            )));
        }
        Ok(())
    }

    /// Builds the cyclic schedule if the parameters are consistent.
    pub fn build(self) -> Result<Box<dyn LearningRateSchedule>, ScheduleError> {
        self.validate()?;
        Ok(Box::new(CyclicLRSchedule::new(
            self.learning_rate,
            self.max_lr,
            self.step_size,
            self.gamma,
            self.mode,
        )))
    }
}

impl Default for Cyclic {
    fn default() -> Self {
        Self::new()
    }
}
