use crate::domain::model::{Guide, Phase, PhaseId, Step, SubStep};
use crate::utils::error::{GuideError, Result};
use regex::Regex;

/// Parser de líneas para el documento de la guía.
///
/// El formato es el del texto original: una línea de título, cabeceras
/// "PARTE <romano>." y una lista plana numerada con sub-pasos opcionales
/// ("15.1 texto", sin punto tras el sub-ordinal). Las líneas de prosa sueltas
/// se pliegan en el paso anterior, igual que el texto envuelto del original.
pub struct GuideParser {
    header_re: Regex,
    substep_re: Regex,
    step_re: Regex,
}

impl GuideParser {
    pub fn new() -> Self {
        Self {
            header_re: Regex::new(r"^PARTE\s+([IVXLCDM]+)\.?\s*(.*)$").unwrap(),
            substep_re: Regex::new(r"^(\d+)\.(\d+)\s+(.+)$").unwrap(),
            step_re: Regex::new(r"^(\d+)\.\s+(.+)$").unwrap(),
        }
    }

    pub fn parse(&self, text: &str) -> Result<Guide> {
        let mut title: Option<String> = None;
        let mut phases: Vec<Phase> = Vec::new();

        for (index, raw_line) in text.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.trim();

            if line.is_empty() {
                continue;
            }

            if let Some(caps) = self.header_re.captures(line) {
                let roman = &caps[1];
                let id = PhaseId::from_roman(roman).ok_or_else(|| GuideError::ParseError {
                    line: line_number,
                    message: format!("unknown phase number 'PARTE {}'", roman),
                })?;
                phases.push(Phase {
                    id,
                    heading: caps[2].trim().to_string(),
                    steps: Vec::new(),
                });
                continue;
            }

            // El sub-paso va antes que el paso: "15.1 texto" también casaría
            // como paso si el patrón de paso admitiera un dígito tras el punto.
            if let Some(caps) = self.substep_re.captures(line) {
                let parent = parse_ordinal(&caps[1], line_number)?;
                let sub = parse_ordinal(&caps[2], line_number)?;
                let step = phases
                    .last_mut()
                    .and_then(|phase| phase.steps.last_mut())
                    .ok_or_else(|| GuideError::ParseError {
                        line: line_number,
                        message: format!("sub-step {}.{} without a preceding step", parent, sub),
                    })?;
                step.substeps.push(SubStep {
                    parent,
                    sub,
                    text: caps[3].trim().to_string(),
                });
                continue;
            }

            if let Some(caps) = self.step_re.captures(line) {
                let number = parse_ordinal(&caps[1], line_number)?;
                let phase = phases.last_mut().ok_or_else(|| GuideError::ParseError {
                    line: line_number,
                    message: format!("step {} appears before any PARTE header", number),
                })?;
                phase.steps.push(Step {
                    number,
                    text: caps[2].trim().to_string(),
                    substeps: Vec::new(),
                });
                continue;
            }

            // Prosa suelta: antes de la primera cabecera es el título,
            // después continúa el paso o sub-paso anterior.
            if phases.is_empty() {
                match title {
                    None => title = Some(line.to_string()),
                    Some(ref mut t) => {
                        t.push(' ');
                        t.push_str(line);
                    }
                }
                continue;
            }

            let phase = phases.last_mut().expect("phases checked non-empty");
            match phase.steps.last_mut() {
                Some(step) => match step.substeps.last_mut() {
                    Some(substep) => {
                        substep.text.push(' ');
                        substep.text.push_str(line);
                    }
                    None => {
                        step.text.push(' ');
                        step.text.push_str(line);
                    }
                },
                None => {
                    return Err(GuideError::ParseError {
                        line: line_number,
                        message: "text inside a phase before its first step".to_string(),
                    });
                }
            }
        }

        Ok(Guide { title, phases })
    }
}

impl Default for GuideParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_ordinal(raw: &str, line_number: usize) -> Result<u32> {
    raw.parse::<u32>().map_err(|_| GuideError::ParseError {
        line: line_number,
        message: format!("step number '{}' is out of range", raw),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
GUÍA DE PRUEBA

PARTE I. PRIMERA FASE

1. Primer paso.
2. Segundo paso.

PARTE II. SEGUNDA FASE

9. Analiza las anomalías o outliers de cada variable.
";

    #[test]
    fn test_parse_title_and_headers() {
        let guide = GuideParser::new().parse(SAMPLE).unwrap();

        assert_eq!(guide.title.as_deref(), Some("GUÍA DE PRUEBA"));
        assert_eq!(guide.phases.len(), 2);
        assert_eq!(guide.phases[0].id, PhaseId::I);
        assert_eq!(guide.phases[0].heading, "PRIMERA FASE");
        assert_eq!(guide.phases[1].id, PhaseId::II);
    }

    #[test]
    fn test_parse_step_in_phase() {
        let guide = GuideParser::new().parse(SAMPLE).unwrap();

        let step = &guide.phases[1].steps[0];
        assert_eq!(step.number, 9);
        assert!(step.text.contains("anomalías"));
    }

    #[test]
    fn test_parse_substep() {
        let text = "\
PARTE III. FASE

15. Selecciona las features.
15.1 Es directo así que: descarta el resto.
16. Resume.
";
        let guide = GuideParser::new().parse(text).unwrap();

        let step = &guide.phases[0].steps[0];
        assert_eq!(step.number, 15);
        assert_eq!(step.substeps.len(), 1);
        assert_eq!(step.substeps[0].parent, 15);
        assert_eq!(step.substeps[0].sub, 1);
        assert!(step.substeps[0].text.starts_with("Es directo"));

        // El paso 16 no hereda el sub-paso
        assert!(guide.phases[0].steps[1].substeps.is_empty());
    }

    #[test]
    fn test_parse_folds_wrapped_prose() {
        let text = "\
PARTE I. FASE

1. Un paso con texto
que continúa en la línea siguiente.
";
        let guide = GuideParser::new().parse(text).unwrap();
        assert_eq!(
            guide.phases[0].steps[0].text,
            "Un paso con texto que continúa en la línea siguiente."
        );
    }

    #[test]
    fn test_parse_step_before_header_is_error() {
        let err = GuideParser::new().parse("1. Paso sin fase.\n").unwrap_err();
        match err {
            GuideError::ParseError { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("before any PARTE header"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_substep_without_step_is_error() {
        let text = "PARTE I. FASE\n\n15.1 Sub-paso huérfano.\n";
        let err = GuideParser::new().parse(text).unwrap_err();
        match err {
            GuideError::ParseError { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_roman_is_error() {
        let err = GuideParser::new().parse("PARTE V. FASE EXTRA\n").unwrap_err();
        match err {
            GuideError::ParseError { message, .. } => assert!(message.contains("PARTE V")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_document() {
        let guide = GuideParser::new().parse("").unwrap();
        assert!(guide.title.is_none());
        assert!(guide.phases.is_empty());
    }
}
