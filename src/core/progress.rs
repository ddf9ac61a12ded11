use crate::domain::model::{Guide, PhaseId, StepRef};
use crate::domain::ports::Storage;
use crate::utils::error::{GuideError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registro de pasos completados por el humano que sigue la guía.
/// La clave es la referencia tal cual se escribe ("9", "15.1").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressLog {
    pub entries: BTreeMap<String, DoneEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoneEntry {
    pub completed_at: DateTime<Utc>,
    pub note: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PhaseProgress {
    pub phase: PhaseId,
    pub heading: String,
    pub done: usize,
    pub total: usize,
}

#[derive(Debug, Clone)]
pub struct ProgressSummary {
    pub phases: Vec<PhaseProgress>,
    pub done: usize,
    pub total: usize,
    pub next: Option<StepRef>,
}

impl ProgressSummary {
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            (self.done as f32 / self.total as f32) * 100.0
        }
    }
}

impl ProgressLog {
    pub fn is_done(&self, reference: &StepRef) -> bool {
        self.entries.contains_key(&reference.to_string())
    }

    /// Marca una referencia como hecha. Devuelve `false` si ya lo estaba,
    /// en cuyo caso la entrada se refresca con la fecha y la nota nuevas.
    pub fn mark_done(
        &mut self,
        guide: &Guide,
        reference: &StepRef,
        note: Option<String>,
    ) -> Result<bool> {
        if !guide.contains(reference) {
            return Err(GuideError::UnknownStepError {
                reference: reference.to_string(),
            });
        }
        let entry = DoneEntry {
            completed_at: Utc::now(),
            note,
        };
        Ok(self.entries.insert(reference.to_string(), entry).is_none())
    }

    /// Desmarca una referencia. Devuelve `false` si no estaba marcada.
    pub fn unmark(&mut self, guide: &Guide, reference: &StepRef) -> Result<bool> {
        if !guide.contains(reference) {
            return Err(GuideError::UnknownStepError {
                reference: reference.to_string(),
            });
        }
        Ok(self.entries.remove(&reference.to_string()).is_some())
    }

    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Resumen por fase más el siguiente paso pendiente en orden de lectura.
    /// Las fases se completan secuencialmente, así que "siguiente" es la
    /// primera referencia sin marcar del documento.
    pub fn summary(&self, guide: &Guide) -> ProgressSummary {
        let mut phases = Vec::with_capacity(guide.phases.len());
        let mut done = 0;
        let mut total = 0;
        let mut next = None;

        for phase in &guide.phases {
            let mut phase_done = 0;
            let mut phase_total = 0;

            for step in &phase.steps {
                let mut refs = vec![step.reference()];
                refs.extend(step.substeps.iter().map(|ss| ss.reference()));

                for reference in refs {
                    phase_total += 1;
                    if self.is_done(&reference) {
                        phase_done += 1;
                    } else if next.is_none() {
                        next = Some(reference);
                    }
                }
            }

            done += phase_done;
            total += phase_total;
            phases.push(PhaseProgress {
                phase: phase.id,
                heading: phase.heading.clone(),
                done: phase_done,
                total: phase_total,
            });
        }

        ProgressSummary {
            phases,
            done,
            total,
            next,
        }
    }

    pub fn from_json(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Carga el registro desde el fichero de estado; si no existe todavía, el
/// progreso está vacío.
pub async fn load_progress<S: Storage>(storage: &S, path: &str) -> Result<ProgressLog> {
    match storage.read_file(path).await {
        Ok(data) => ProgressLog::from_json(&data),
        Err(GuideError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No progress file at {}, starting empty", path);
            Ok(ProgressLog::default())
        }
        Err(e) => Err(e),
    }
}

pub async fn save_progress<S: Storage>(
    storage: &S,
    path: &str,
    progress: &ProgressLog,
) -> Result<()> {
    let json = progress.to_json()?;
    storage.write_file(path, json.as_bytes()).await
}
