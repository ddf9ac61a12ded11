pub mod checker;
pub mod engine;
pub mod parser;
pub mod pipeline;
pub mod progress;
pub mod renderer;

pub use crate::domain::model::{Guide, Phase, PhaseId, Step, StepRef, SubStep, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
