pub mod cyclic;
pub mod exponential;
pub mod linear_cosine;

use crate::config::ScheduleConfig;
use crate::error::ScheduleError;

/// Signature shared by every schedule family's configuration entry point:
/// takes the current training step and the raw parameter mapping, returns the
/// scalar learning rate. The step is optional so a caller that never wired up
/// its step counter fails loudly instead of silently training at step zero.
pub(crate) type ScheduleFn = fn(Option<f32>, &ScheduleConfig) -> Result<f32, ScheduleError>;

#[typetag::serde]
pub trait LearningRateSchedule: LearningRateScheduleClone + Send + Sync {
    /// Computes the learning rate for the given training step.
    fn learning_rate(&self, step: f32) -> f32;
}

pub trait LearningRateScheduleClone {
    fn clone_box(&self) -> Box<dyn LearningRateSchedule>;
}

impl<T> LearningRateScheduleClone for T
where
    T: 'static + LearningRateSchedule + Clone,
{
    fn clone_box(&self) -> Box<dyn LearningRateSchedule> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn LearningRateSchedule> {
    fn clone(&self) -> Box<dyn LearningRateSchedule> {
        self.clone_box()
    }
}
