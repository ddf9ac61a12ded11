use crate::domain::model::{Guide, PhaseId};

/// Informe de buena formación del documento. Los errores invalidan la guía,
/// los avisos no.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, message: String) {
        self.errors.push(message);
    }

    fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }
}

/// Comprueba los invariantes estructurales:
/// numeración positiva, única y estrictamente creciente; las cuatro cabeceras
/// PARTE en orden I-IV; cada sub-paso colgando del paso inmediatamente
/// anterior con sub-ordinales consecutivos desde 1.
pub fn check_guide(guide: &Guide) -> CheckReport {
    let mut report = CheckReport::default();

    if guide.title.is_none() {
        report.warn("the document has no title line".to_string());
    }

    let found: Vec<PhaseId> = guide.phases.iter().map(|p| p.id).collect();
    if found != PhaseId::ALL {
        report.error(format!(
            "phase headers must appear exactly once each, in order I, II, III, IV; found: [{}]",
            found
                .iter()
                .map(|p| p.as_roman())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    let mut last_number: Option<u32> = None;
    for phase in &guide.phases {
        if phase.steps.is_empty() {
            report.warn(format!("{} has no steps", phase.id));
        }

        for step in &phase.steps {
            if step.number == 0 {
                report.error(format!("{}: step number must be positive", phase.id));
            }

            match last_number {
                Some(previous) if step.number <= previous => {
                    // Cubre a la vez unicidad y monotonía: la numeración es
                    // plana a lo largo del documento.
                    report.error(format!(
                        "{}: step {} does not increase over step {}",
                        phase.id, step.number, previous
                    ));
                }
                _ => {}
            }
            last_number = Some(step.number);

            let mut expected_sub = 1;
            for substep in &step.substeps {
                if substep.parent != step.number {
                    report.error(format!(
                        "{}: sub-step {}.{} is attached to step {}",
                        phase.id, substep.parent, substep.sub, step.number
                    ));
                }
                if substep.sub != expected_sub {
                    report.error(format!(
                        "{}: sub-step {}.{} breaks the sub-numbering (expected {}.{})",
                        phase.id, substep.parent, substep.sub, step.number, expected_sub
                    ));
                }
                expected_sub += 1;
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::GuideParser;

    fn parse(text: &str) -> Guide {
        GuideParser::new().parse(text).unwrap()
    }

    const WELL_FORMED: &str = "\
TÍTULO

PARTE I. UNO

1. Paso.
2. Paso.

PARTE II. DOS

3. Paso.

PARTE III. TRES

4. Paso.
4.1 Sub-paso.

PARTE IV. CUATRO

5. Paso.
";

    #[test]
    fn test_well_formed_guide_passes() {
        let report = check_guide(&parse(WELL_FORMED));
        assert!(report.is_ok(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_missing_phase_is_error() {
        let text = "PARTE I. UNO\n\n1. Paso.\n\nPARTE III. TRES\n\n2. Paso.\n";
        let report = check_guide(&parse(text));
        assert!(!report.is_ok());
        assert!(report.errors[0].contains("I, II, III, IV"));
    }

    #[test]
    fn test_phases_out_of_order_is_error() {
        let text = "\
PARTE II. DOS

1. Paso.

PARTE I. UNO

2. Paso.

PARTE III. TRES

3. Paso.

PARTE IV. CUATRO

4. Paso.
";
        let report = check_guide(&parse(text));
        assert!(!report.is_ok());
    }

    #[test]
    fn test_duplicate_step_number_is_error() {
        let text = "\
PARTE I. UNO

1. Paso.
1. Repetido.

PARTE II. DOS

2. Paso.

PARTE III. TRES

3. Paso.

PARTE IV. CUATRO

4. Paso.
";
        let report = check_guide(&parse(text));
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("does not increase")));
    }

    #[test]
    fn test_decreasing_step_across_phases_is_error() {
        let text = "\
PARTE I. UNO

5. Paso.

PARTE II. DOS

3. Paso.

PARTE III. TRES

6. Paso.

PARTE IV. CUATRO

7. Paso.
";
        let report = check_guide(&parse(text));
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("step 3 does not increase over step 5")));
    }

    #[test]
    fn test_substep_with_wrong_parent_is_error() {
        let text = "\
PARTE I. UNO

1. Paso.
2. Paso.
3.1 Sub-paso con padre equivocado.

PARTE II. DOS

4. Paso.

PARTE III. TRES

5. Paso.

PARTE IV. CUATRO

6. Paso.
";
        let report = check_guide(&parse(text));
        assert!(report
            .errors
            .iter()
            .any(|e| e.contains("sub-step 3.1 is attached to step 2")));
    }

    #[test]
    fn test_empty_phase_and_missing_title_warn() {
        let text = "\
PARTE I. UNO

PARTE II. DOS

1. Paso.

PARTE III. TRES

2. Paso.

PARTE IV. CUATRO

3. Paso.
";
        let report = check_guide(&parse(text));
        assert!(report.is_ok());
        assert_eq!(report.warnings.len(), 2);
    }
}
