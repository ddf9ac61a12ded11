pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::TomlConfig;
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_non_empty_string, validate_output_formats, validate_path, validate_step_ref, Validate,
};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
pub const DEFAULT_GUIDE_PATH: &str = "data/guia_eda.txt";
#[cfg(feature = "cli")]
pub const DEFAULT_OUTPUT_PATH: &str = "./output";
#[cfg(feature = "cli")]
pub const DEFAULT_STATE_PATH: &str = "progreso.json";
#[cfg(feature = "cli")]
pub const DEFAULT_FORMATS: [&str; 3] = ["markdown", "json", "csv"];

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "guia-eda")]
#[command(about = "Checklist de la guía de análisis exploratorio de datos (EDA)")]
pub struct CliConfig {
    /// Documento de la guía a procesar (por defecto data/guia_eda.txt)
    #[arg(long, global = true)]
    pub guide_path: Option<String>,

    /// Carpeta donde dejar las salidas renderizadas (por defecto ./output)
    #[arg(long, global = true)]
    pub output_path: Option<String>,

    /// Fichero JSON con el progreso registrado (por defecto progreso.json)
    #[arg(long, global = true)]
    pub state_path: Option<String>,

    /// Formatos de salida: text, markdown, json, csv (por defecto
    /// markdown,json,csv)
    #[arg(long, global = true, value_delimiter = ',')]
    pub formats: Option<Vec<String>>,

    /// Fichero TOML de configuración del proyecto; los argumentos pasados
    /// explícitamente tienen prioridad sobre sus valores
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, global = true, help = "Enable system monitoring")]
    pub monitor: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Comprueba la estructura del documento y muestra el informe
    Check,
    /// Renderiza la guía a los formatos configurados
    Render,
    /// Muestra el progreso por fase y el siguiente paso pendiente
    Status,
    /// Marca un paso o sub-paso como hecho, por ejemplo `done 9` o `done 15.1`
    Done {
        reference: String,
        /// Nota libre que se guarda junto a la marca
        #[arg(long)]
        note: Option<String>,
    },
    /// Desmarca un paso previamente completado
    Undo { reference: String },
    /// Borra todo el progreso registrado
    Reset,
    /// Renderiza todos los formatos y los empaqueta en un zip
    Export,
}

/// Configuración efectiva de una ejecución: argumentos explícitos de la
/// línea de comandos, luego el TOML del proyecto, luego los valores por
/// defecto.
#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub guide_path: String,
    pub output_path: String,
    pub state_path: String,
    pub formats: Vec<String>,
    pub bundle: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn resolve(&self, project: Option<&TomlConfig>) -> ResolvedConfig {
        let guide_path = self
            .guide_path
            .clone()
            .or_else(|| project.map(|p| p.guide_path().to_string()))
            .unwrap_or_else(|| DEFAULT_GUIDE_PATH.to_string());
        let output_path = self
            .output_path
            .clone()
            .or_else(|| project.map(|p| p.output_path().to_string()))
            .unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string());
        let state_path = self
            .state_path
            .clone()
            .or_else(|| project.map(|p| p.state_path().to_string()))
            .unwrap_or_else(|| DEFAULT_STATE_PATH.to_string());
        let formats = self
            .formats
            .clone()
            .or_else(|| project.map(|p| p.output_formats().to_vec()))
            .unwrap_or_else(|| DEFAULT_FORMATS.iter().map(|s| s.to_string()).collect());

        // `export` siempre empaqueta; fuera de ahí manda el flag del TOML
        let bundle = matches!(self.command, Command::Export)
            || project.map(|p| p.bundle_output()).unwrap_or(false);

        ResolvedConfig {
            guide_path,
            output_path,
            state_path,
            formats,
            bundle,
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for ResolvedConfig {
    fn guide_path(&self) -> &str {
        &self.guide_path
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn state_path(&self) -> &str {
        &self.state_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn bundle_output(&self) -> bool {
        self.bundle
    }
}

#[cfg(feature = "cli")]
impl Validate for ResolvedConfig {
    fn validate(&self) -> Result<()> {
        validate_path("guide_path", &self.guide_path)?;
        validate_path("output_path", &self.output_path)?;
        validate_path("state_path", &self.state_path)?;
        validate_output_formats("formats", &self.formats)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(guide_path) = &self.guide_path {
            validate_path("guide_path", guide_path)?;
        }
        if let Some(output_path) = &self.output_path {
            validate_path("output_path", output_path)?;
        }
        if let Some(state_path) = &self.state_path {
            validate_path("state_path", state_path)?;
        }
        if let Some(formats) = &self.formats {
            validate_output_formats("formats", formats)?;
        }

        match &self.command {
            Command::Done { reference, .. } | Command::Undo { reference } => {
                validate_non_empty_string("reference", reference)?;
                validate_step_ref("reference", reference)?;
            }
            _ => {}
        }

        Ok(())
    }
}
