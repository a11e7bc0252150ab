//! Business logic services

pub mod cycles;
pub mod training_log;

pub use cycles::CycleService;
pub use training_log::TrainingLogService;
