use crate::core::checker::check_guide;
use crate::core::parser::GuideParser;
use crate::core::progress::ProgressLog;
use crate::core::renderer;
use crate::core::{ConfigProvider, Pipeline, Storage, TransformResult};
use crate::utils::error::{GuideError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// Nombre de fichero de salida por formato.
const OUTPUT_FILES: [(&str, &str); 4] = [
    ("text", "guia_eda.txt"),
    ("markdown", "guia_eda.md"),
    ("json", "guia_eda.json"),
    ("csv", "guia_eda.csv"),
];

const BUNDLE_FILE: &str = "guia_eda_bundle.zip";

pub struct GuidePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    parser: GuideParser,
    progress: ProgressLog,
}

impl<S: Storage, C: ConfigProvider> GuidePipeline<S, C> {
    pub fn new(storage: S, config: C, progress: ProgressLog) -> Self {
        Self {
            storage,
            config,
            parser: GuideParser::new(),
            progress,
        }
    }

    fn output_for<'a>(
        &self,
        format: &str,
        result: &'a TransformResult,
    ) -> Option<(&'static str, &'a str)> {
        let content = match format {
            "text" => &result.canonical_output,
            "markdown" => &result.markdown_output,
            "json" => &result.json_output,
            "csv" => &result.csv_output,
            _ => return None,
        };
        OUTPUT_FILES
            .iter()
            .find(|(f, _)| *f == format)
            .map(|(_, name)| (*name, content.as_str()))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for GuidePipeline<S, C> {
    async fn extract(&self) -> Result<String> {
        tracing::debug!("Reading guide document from: {}", self.config.guide_path());
        let data = self.storage.read_file(self.config.guide_path()).await?;
        let text = String::from_utf8(data)?;
        tracing::debug!("Guide document has {} lines", text.lines().count());
        Ok(text)
    }

    async fn transform(&self, raw: String) -> Result<TransformResult> {
        let guide = self.parser.parse(&raw)?;

        let report = check_guide(&guide);
        for warning in &report.warnings {
            tracing::warn!("⚠️ {}", warning);
        }
        if !report.is_ok() {
            return Err(GuideError::StructureError {
                message: report.errors.join("; "),
            });
        }

        let canonical_output = renderer::render_canonical(&guide);
        let markdown_output = renderer::render_markdown(&guide, &self.progress);
        let json_output = renderer::render_json(&guide, &self.progress)?;
        let csv_output = renderer::render_csv(&guide, &self.progress)?;

        Ok(TransformResult {
            guide,
            canonical_output,
            markdown_output,
            json_output,
            csv_output,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output_path();
        let mut bundle_entries: Vec<(&str, &str)> = Vec::new();

        for format in self.config.output_formats() {
            let Some((file_name, content)) = self.output_for(format, &result) else {
                tracing::warn!("Skipping unknown output format: {}", format);
                continue;
            };

            tracing::debug!("Writing {} output to {}/{}", format, output_path, file_name);
            self.storage
                .write_file(&format!("{}/{}", output_path, file_name), content.as_bytes())
                .await?;
            bundle_entries.push((file_name, content));
        }

        if self.config.bundle_output() {
            tracing::debug!("Bundling {} files into {}", bundle_entries.len(), BUNDLE_FILE);

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (file_name, content) in &bundle_entries {
                    zip.start_file::<_, ()>(*file_name, FileOptions::default())?;
                    zip.write_all(content.as_bytes())?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };

            let bundle_path = format!("{}/{}", output_path, BUNDLE_FILE);
            self.storage.write_file(&bundle_path, &zip_data).await?;
            return Ok(bundle_path);
        }

        Ok(output_path.to_string())
    }
}
