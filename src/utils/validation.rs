use crate::domain::model::StepRef;
use crate::utils::error::{GuideError, Result};
use std::collections::HashSet;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(GuideError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(GuideError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(GuideError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Comprueba que la referencia tiene forma de paso ("9") o sub-paso ("15.1").
/// Que exista en la guía se comprueba después contra el documento parseado.
pub fn validate_step_ref(field_name: &str, value: &str) -> Result<StepRef> {
    value
        .parse::<StepRef>()
        .map_err(|reason| GuideError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason,
        })
}

pub fn validate_output_formats(field_name: &str, formats: &[String]) -> Result<()> {
    let valid_formats: HashSet<&str> = ["text", "markdown", "json", "csv"].into_iter().collect();

    if formats.is_empty() {
        return Err(GuideError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one output format is required".to_string(),
        });
    }

    for format in formats {
        if !valid_formats.contains(format.as_str()) {
            return Err(GuideError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: format.clone(),
                reason: "Unsupported format. Valid formats: text, markdown, json, csv".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("guide_path", "data/guia_eda.txt").is_ok());
        assert!(validate_path("guide_path", "").is_err());
        assert!(validate_path("guide_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_step_ref() {
        assert_eq!(
            validate_step_ref("reference", "15.1").unwrap(),
            StepRef {
                number: 15,
                sub: Some(1)
            }
        );
        assert!(validate_step_ref("reference", "paso nueve").is_err());
        assert!(validate_step_ref("reference", "0").is_err());
    }

    #[test]
    fn test_validate_output_formats() {
        let formats = vec!["markdown".to_string(), "json".to_string()];
        assert!(validate_output_formats("formats", &formats).is_ok());

        let invalid = vec!["pdf".to_string()];
        assert!(validate_output_formats("formats", &invalid).is_err());

        assert!(validate_output_formats("formats", &[]).is_err());
    }
}
