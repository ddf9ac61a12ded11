use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Motor que encadena las tres etapas del pipeline sobre el documento:
/// extract (leer el texto), transform (parsear, comprobar y renderizar) y
/// load (escribir las salidas).
pub struct GuideEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> GuideEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitoring_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitoring_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting guide pipeline");

        tracing::info!("Reading guide document...");
        let raw = self.pipeline.extract().await?;
        tracing::info!("Read {} bytes of guide text", raw.len());
        self.monitor.log_stats("extract");

        tracing::info!("Parsing and rendering...");
        let result = self.pipeline.transform(raw).await?;
        tracing::info!(
            "Parsed {} steps across {} phases",
            result.guide.step_count(),
            result.guide.phases.len()
        );
        self.monitor.log_stats("transform");

        tracing::info!("Writing outputs...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
