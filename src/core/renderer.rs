use crate::core::progress::ProgressLog;
use crate::domain::model::Guide;
use crate::utils::error::{GuideError, Result};
use serde::{Deserialize, Serialize};

/// Una fila por paso o sub-paso, compartida por las salidas JSON y CSV:
/// las ternas (fase, referencia, texto) más el estado de progreso.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRow {
    pub phase: String,
    pub reference: String,
    pub text: String,
    pub done: bool,
}

pub fn step_rows(guide: &Guide, progress: &ProgressLog) -> Vec<StepRow> {
    guide
        .items()
        .into_iter()
        .map(|item| StepRow {
            phase: item.phase.to_string(),
            reference: item.reference.to_string(),
            text: item.text.to_string(),
            done: progress.is_done(&item.reference),
        })
        .collect()
}

/// Render canónico en texto plano. Sobre un documento en formato canónico el
/// parseo seguido de este render reproduce el texto original byte a byte.
pub fn render_canonical(guide: &Guide) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if let Some(title) = &guide.title {
        blocks.push(title.clone());
    }

    for phase in &guide.phases {
        if phase.heading.is_empty() {
            blocks.push(format!("PARTE {}.", phase.id.as_roman()));
        } else {
            blocks.push(format!("PARTE {}. {}", phase.id.as_roman(), phase.heading));
        }

        let mut lines: Vec<String> = Vec::new();
        for step in &phase.steps {
            lines.push(format!("{}. {}", step.number, step.text));
            for substep in &step.substeps {
                lines.push(format!("{}.{} {}", substep.parent, substep.sub, substep.text));
            }
        }
        if !lines.is_empty() {
            blocks.push(lines.join("\n"));
        }
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// Checklist en markdown, con las casillas según el progreso registrado.
pub fn render_markdown(guide: &Guide, progress: &ProgressLog) -> String {
    let mut blocks: Vec<String> = Vec::new();

    if let Some(title) = &guide.title {
        blocks.push(format!("# {}", title));
    }

    for phase in &guide.phases {
        if phase.heading.is_empty() {
            blocks.push(format!("## PARTE {}", phase.id.as_roman()));
        } else {
            blocks.push(format!("## PARTE {}. {}", phase.id.as_roman(), phase.heading));
        }

        let mut lines: Vec<String> = Vec::new();
        for step in &phase.steps {
            let mark = if progress.is_done(&step.reference()) {
                'x'
            } else {
                ' '
            };
            lines.push(format!("- [{}] {}. {}", mark, step.number, step.text));
            for substep in &step.substeps {
                let mark = if progress.is_done(&substep.reference()) {
                    'x'
                } else {
                    ' '
                };
                lines.push(format!(
                    "  - [{}] {}.{} {}",
                    mark, substep.parent, substep.sub, substep.text
                ));
            }
        }
        if !lines.is_empty() {
            blocks.push(lines.join("\n"));
        }
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

pub fn render_json(guide: &Guide, progress: &ProgressLog) -> Result<String> {
    let rows = step_rows(guide, progress);
    Ok(serde_json::to_string_pretty(&rows)?)
}

pub fn render_csv(guide: &Guide, progress: &ProgressLog) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in step_rows(guide, progress) {
        writer.serialize(row)?;
    }
    let data = writer.into_inner().map_err(|e| {
        GuideError::IoError(std::io::Error::other(e.to_string()))
    })?;
    Ok(String::from_utf8(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::GuideParser;
    use crate::domain::model::StepRef;

    const SAMPLE: &str = "\
GUÍA DE PRUEBA

PARTE I. UNO

1. Primer paso.
2. Segundo paso.

PARTE II. DOS

3. Tercer paso.
3.1 Sub-paso directo.
";

    fn parse(text: &str) -> Guide {
        GuideParser::new().parse(text).unwrap()
    }

    #[test]
    fn test_canonical_roundtrip_is_exact() {
        let guide = parse(SAMPLE);
        assert_eq!(render_canonical(&guide), SAMPLE);
    }

    #[test]
    fn test_canonical_reparse_preserves_structure() {
        let guide = parse(SAMPLE);
        let reparsed = parse(&render_canonical(&guide));

        assert_eq!(reparsed.title, guide.title);
        assert_eq!(reparsed.phases.len(), guide.phases.len());
        for (a, b) in reparsed.phases.iter().zip(&guide.phases) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.steps.len(), b.steps.len());
        }
    }

    #[test]
    fn test_markdown_checkboxes_follow_progress() {
        let guide = parse(SAMPLE);
        let mut progress = ProgressLog::default();
        progress
            .mark_done(&guide, &StepRef { number: 1, sub: None }, None)
            .unwrap();

        let markdown = render_markdown(&guide, &progress);
        assert!(markdown.contains("# GUÍA DE PRUEBA"));
        assert!(markdown.contains("## PARTE I. UNO"));
        assert!(markdown.contains("- [x] 1. Primer paso."));
        assert!(markdown.contains("- [ ] 2. Segundo paso."));
        assert!(markdown.contains("  - [ ] 3.1 Sub-paso directo."));
    }

    #[test]
    fn test_json_rows() {
        let guide = parse(SAMPLE);
        let json = render_json(&guide, &ProgressLog::default()).unwrap();
        let rows: Vec<StepRow> = serde_json::from_str(&json).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2].phase, "PARTE II");
        assert_eq!(rows[2].reference, "3");
        assert_eq!(rows[3].reference, "3.1");
        assert!(!rows[3].done);
    }

    #[test]
    fn test_csv_has_header_and_rows() {
        let guide = parse(SAMPLE);
        let csv_output = render_csv(&guide, &ProgressLog::default()).unwrap();
        let lines: Vec<&str> = csv_output.trim_end().split('\n').collect();

        assert_eq!(lines[0], "phase,reference,text,done");
        assert_eq!(lines.len(), 5);
        assert!(lines[1].starts_with("PARTE I,1,"));
    }
}
