pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command, ResolvedConfig};

pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use core::checker::{check_guide, CheckReport};
pub use core::parser::GuideParser;
pub use core::progress::{load_progress, save_progress, ProgressLog};
pub use core::{engine::GuideEngine, pipeline::GuidePipeline};
pub use domain::model::{Guide, StepRef};
pub use utils::error::{GuideError, Result};
