use std::env;

use env_logger::Builder;
use log::{error, info};
use lrsched::{LearningRateManager, ScheduleConfig};

// This demo sweeps each registered learning rate schedule over a range of
// training steps and logs the resulting rates, which is a quick way to eyeball
// a schedule before wiring it into a training loop.
fn main() {
    initialize_logger();

    let configs = [
        ("exponential", exponential_config()),
        ("cyclic", cyclic_config()),
        ("linear", linear_config()),
        ("test_lr", linear_config()),
    ];

    for (method, config) in configs {
        let manager = match LearningRateManager::new(method, config) {
            Ok(manager) => manager,
            Err(e) => {
                error!("Failed to configure {} schedule: {}", method, e);
                continue;
            }
        };
        for step in (0..=200).step_by(20) {
            match manager.learning_rate(Some(step as f32)) {
                Ok(rate) => info!("{:>12} step {:>3}: {:.6}", method, step, rate),
                Err(e) => error!("{:>12} step {:>3}: {}", method, step, e),
            }
        }
    }
}

fn exponential_config() -> ScheduleConfig {
    ScheduleConfig::new()
        .with_number("learning_rate", 0.1)
        .with_number("decay_steps", 100.0)
        .with_number("decay_rate", 0.96)
        .with_flag("staircase", true)
}

fn cyclic_config() -> ScheduleConfig {
    ScheduleConfig::new()
        .with_number("learning_rate", 0.01)
        .with_number("max_lr", 0.1)
        .with_number("step_size", 50.0)
        .with_text("mode", "triangular2")
}

fn linear_config() -> ScheduleConfig {
    ScheduleConfig::new()
        .with_number("learning_rate", 0.1)
        .with_number("decay_steps", 200.0)
}

/// The LOG environment variable defines the log level (e.g., info, debug).
/// If the LOG variable is not set, it defaults to info.
fn initialize_logger() {
    let log_level = env::var("LOG").unwrap_or_else(|_| "info".to_string());
    Builder::new().parse_filters(&log_level).init();
}
