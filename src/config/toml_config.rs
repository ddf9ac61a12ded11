use crate::core::ConfigProvider;
use crate::utils::error::{GuideError, Result};
use crate::utils::validation::{validate_output_formats, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuración de proyecto en TOML, para quien versiona la guía junto a
/// su seguimiento en un repositorio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub project: ProjectConfig,
    pub guide: GuideFileConfig,
    pub render: RenderConfig,
    pub progress: Option<ProgressConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideFileConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub bundle: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    pub state_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

const DEFAULT_STATE_PATH: &str = "progreso.json";

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GuideError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| GuideError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Sustituye `${VAR}` por la variable de entorno correspondiente; si no
    /// existe, el marcador se queda tal cual.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("guide.path", &self.guide.path)?;
        validate_path("render.output_path", &self.render.output_path)?;
        validate_output_formats("render.output_formats", &self.render.output_formats)?;

        if let Some(progress) = &self.progress {
            if let Some(state_path) = &progress.state_path {
                validate_path("progress.state_path", state_path)?;
            }
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn guide_path(&self) -> &str {
        &self.guide.path
    }

    fn output_path(&self) -> &str {
        &self.render.output_path
    }

    fn state_path(&self) -> &str {
        self.progress
            .as_ref()
            .and_then(|p| p.state_path.as_deref())
            .unwrap_or(DEFAULT_STATE_PATH)
    }

    fn output_formats(&self) -> &[String] {
        &self.render.output_formats
    }

    fn bundle_output(&self) -> bool {
        self.render.bundle.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[project]
name = "eda-sprint"
description = "Seguimiento de la guía para el sprint de EDA"

[guide]
path = "data/guia_eda.txt"

[render]
output_path = "./salida"
output_formats = ["markdown", "json"]
bundle = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.project.name, "eda-sprint");
        assert_eq!(config.guide_path(), "data/guia_eda.txt");
        assert_eq!(config.output_formats(), ["markdown", "json"]);
        assert!(config.bundle_output());
        assert_eq!(config.state_path(), "progreso.json");
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_GUIDE_PATH", "docs/guia.txt");

        let toml_content = r#"
[project]
name = "test"

[guide]
path = "${TEST_GUIDE_PATH}"

[render]
output_path = "./output"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.guide.path, "docs/guia.txt");

        std::env::remove_var("TEST_GUIDE_PATH");
    }

    #[test]
    fn test_unset_env_var_is_left_as_is() {
        let toml_content = r#"
[project]
name = "test"

[guide]
path = "${GUIA_EDA_UNSET_VAR}"

[render]
output_path = "./output"
output_formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.guide.path, "${GUIA_EDA_UNSET_VAR}");
    }

    #[test]
    fn test_config_validation_rejects_bad_format() {
        let toml_content = r#"
[project]
name = "test"

[guide]
path = "data/guia_eda.txt"

[render]
output_path = "./output"
output_formats = ["pdf"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[project]
name = "file-test"

[guide]
path = "data/guia_eda.txt"

[render]
output_path = "./output"
output_formats = ["markdown"]

[progress]
state_path = "estado/progreso.json"

[monitoring]
enabled = true
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.project.name, "file-test");
        assert_eq!(config.state_path(), "estado/progreso.json");
        assert!(config.monitoring_enabled());
    }
}
