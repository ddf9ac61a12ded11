use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Las cuatro fases narrativas de la guía, en orden fijo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PhaseId {
    I,
    II,
    III,
    IV,
}

impl PhaseId {
    pub const ALL: [PhaseId; 4] = [PhaseId::I, PhaseId::II, PhaseId::III, PhaseId::IV];

    pub fn from_roman(roman: &str) -> Option<Self> {
        match roman {
            "I" => Some(PhaseId::I),
            "II" => Some(PhaseId::II),
            "III" => Some(PhaseId::III),
            "IV" => Some(PhaseId::IV),
            _ => None,
        }
    }

    pub fn as_roman(&self) -> &'static str {
        match self {
            PhaseId::I => "I",
            PhaseId::II => "II",
            PhaseId::III => "III",
            PhaseId::IV => "IV",
        }
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PARTE {}", self.as_roman())
    }
}

/// Sub-paso numerado como "15.1": conserva el número del paso padre tal y como
/// aparece en el documento, aunque cuelgue del paso anterior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubStep {
    pub parent: u32,
    pub sub: u32,
    pub text: String,
}

impl SubStep {
    pub fn reference(&self) -> StepRef {
        StepRef {
            number: self.parent,
            sub: Some(self.sub),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub number: u32,
    pub text: String,
    pub substeps: Vec<SubStep>,
}

impl Step {
    pub fn reference(&self) -> StepRef {
        StepRef {
            number: self.number,
            sub: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub heading: String,
    pub steps: Vec<Step>,
}

/// Documento completo: línea de título opcional más las fases en orden de
/// aparición. La numeración de pasos es plana (1-20) a lo largo de todo el
/// documento.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guide {
    pub title: Option<String>,
    pub phases: Vec<Phase>,
}

impl Guide {
    /// Número de pasos de primer nivel.
    pub fn step_count(&self) -> usize {
        self.phases.iter().map(|p| p.steps.len()).sum()
    }

    /// Pasos más sub-pasos, que es lo que cuenta el seguimiento de progreso.
    pub fn item_count(&self) -> usize {
        self.phases
            .iter()
            .flat_map(|p| &p.steps)
            .map(|s| 1 + s.substeps.len())
            .sum()
    }

    pub fn contains(&self, reference: &StepRef) -> bool {
        self.find_phase(reference).is_some()
    }

    /// Fase a la que pertenece una referencia, si existe en el documento.
    pub fn find_phase(&self, reference: &StepRef) -> Option<&Phase> {
        self.phases.iter().find(|phase| {
            phase.steps.iter().any(|step| match reference.sub {
                None => step.number == reference.number,
                Some(sub) => step
                    .substeps
                    .iter()
                    .any(|ss| ss.parent == reference.number && ss.sub == sub),
            })
        })
    }

    /// Todas las referencias en orden de documento, cada una con su fase y texto.
    pub fn items(&self) -> Vec<GuideItem<'_>> {
        let mut items = Vec::with_capacity(self.item_count());
        for phase in &self.phases {
            for step in &phase.steps {
                items.push(GuideItem {
                    phase: phase.id,
                    reference: step.reference(),
                    text: &step.text,
                });
                for substep in &step.substeps {
                    items.push(GuideItem {
                        phase: phase.id,
                        reference: substep.reference(),
                        text: &substep.text,
                    });
                }
            }
        }
        items
    }
}

/// Una entrada de la guía aplanada, en orden de lectura.
#[derive(Debug, Clone)]
pub struct GuideItem<'a> {
    pub phase: PhaseId,
    pub reference: StepRef,
    pub text: &'a str,
}

/// Referencia humana a un paso ("9") o a un sub-paso ("15.1").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StepRef {
    pub number: u32,
    pub sub: Option<u32>,
}

impl FromStr for StepRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (number, sub) = match s.split_once('.') {
            None => (s, None),
            Some((parent, sub)) => (parent, Some(sub)),
        };
        let number: u32 = number
            .parse()
            .map_err(|_| format!("invalid step reference: '{}'", s))?;
        let sub = match sub {
            None => None,
            Some(raw) => Some(
                raw.parse::<u32>()
                    .map_err(|_| format!("invalid step reference: '{}'", s))?,
            ),
        };
        if number == 0 || sub == Some(0) {
            return Err(format!("step reference must be positive: '{}'", s));
        }
        Ok(StepRef { number, sub })
    }
}

impl fmt::Display for StepRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub {
            None => write!(f, "{}", self.number),
            Some(sub) => write!(f, "{}.{}", self.number, sub),
        }
    }
}

/// Resultado de la etapa transform: la guía parseada y cada formato de salida
/// ya renderizado.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub guide: Guide,
    pub canonical_output: String,
    pub markdown_output: String,
    pub json_output: String,
    pub csv_output: String,
}
