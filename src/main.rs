use clap::Parser;
use guia_eda::core::{ConfigProvider, Storage};
use guia_eda::utils::{logger, validation::validate_step_ref, validation::Validate};
use guia_eda::{
    check_guide, load_progress, save_progress, CliConfig, Command, Guide, GuideEngine, GuideError,
    GuideParser, GuidePipeline, LocalStorage, ResolvedConfig, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting guia-eda CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Sugerencia: {}", e.recovery_suggestion());

        let exit_code = e.severity().exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(config: CliConfig) -> guia_eda::Result<()> {
    let storage = LocalStorage::new(".".to_string());

    // El TOML del proyecto rellena lo que no venga como argumento explícito;
    // los argumentos de la línea de comandos tienen prioridad.
    let project = match &config.config {
        Some(path) => {
            let toml_config = TomlConfig::from_file(path)?;
            toml_config.validate()?;
            Some(toml_config)
        }
        None => None,
    };

    let monitor = config.monitor
        || project
            .as_ref()
            .map(|p| p.monitoring_enabled())
            .unwrap_or(false);

    let resolved = config.resolve(project.as_ref());
    resolved.validate()?;

    dispatch(&config.command, storage, resolved, monitor).await
}

async fn dispatch(
    command: &Command,
    storage: LocalStorage,
    provider: ResolvedConfig,
    monitor: bool,
) -> guia_eda::Result<()> {
    match command {
        Command::Check => check(storage, provider).await,
        Command::Render | Command::Export => render(storage, provider, monitor).await,
        Command::Status => status(storage, provider).await,
        Command::Done { reference, note } => {
            mark(storage, provider, reference, note.clone()).await
        }
        Command::Undo { reference } => unmark(storage, provider, reference).await,
        Command::Reset => reset(storage, provider).await,
    }
}

async fn load_guide<C: ConfigProvider>(
    storage: &LocalStorage,
    provider: &C,
) -> guia_eda::Result<Guide> {
    let data = storage.read_file(provider.guide_path()).await?;
    let text = String::from_utf8(data)?;
    GuideParser::new().parse(&text)
}

async fn check<C: ConfigProvider>(storage: LocalStorage, provider: C) -> guia_eda::Result<()> {
    let guide = load_guide(&storage, &provider).await?;
    let report = check_guide(&guide);

    for warning in &report.warnings {
        println!("⚠️ {}", warning);
    }

    if report.is_ok() {
        println!(
            "✅ El documento está bien formado: {} pasos en {} fases",
            guide.step_count(),
            guide.phases.len()
        );
        Ok(())
    } else {
        for error in &report.errors {
            eprintln!("❌ {}", error);
        }
        Err(GuideError::StructureError {
            message: format!("the document has {} structural errors", report.errors.len()),
        })
    }
}

async fn render<C: ConfigProvider>(
    storage: LocalStorage,
    provider: C,
    monitor: bool,
) -> guia_eda::Result<()> {
    let progress = load_progress(&storage, provider.state_path()).await?;
    let pipeline = GuidePipeline::new(storage, provider, progress);
    let engine = GuideEngine::new_with_monitoring(pipeline, monitor);

    let output_path = engine.run().await?;
    println!("✅ Guía renderizada");
    println!("📁 Salida en: {}", output_path);
    Ok(())
}

async fn status<C: ConfigProvider>(storage: LocalStorage, provider: C) -> guia_eda::Result<()> {
    let guide = load_guide(&storage, &provider).await?;
    let progress = load_progress(&storage, provider.state_path()).await?;
    let summary = progress.summary(&guide);

    if let Some(title) = &guide.title {
        println!("📋 {}", title);
    }
    for phase in &summary.phases {
        println!(
            "  {} — {}/{}  {}",
            phase.phase, phase.done, phase.total, phase.heading
        );
    }
    println!(
        "Total: {}/{} ({:.0}%)",
        summary.done,
        summary.total,
        summary.percent()
    );

    match summary.next {
        Some(reference) => println!("👉 Siguiente paso pendiente: {}", reference),
        None => println!("🎉 Guía completada"),
    }
    Ok(())
}

async fn mark<C: ConfigProvider>(
    storage: LocalStorage,
    provider: C,
    reference: &str,
    note: Option<String>,
) -> guia_eda::Result<()> {
    let guide = load_guide(&storage, &provider).await?;
    let mut progress = load_progress(&storage, provider.state_path()).await?;

    let reference = validate_step_ref("reference", reference)?;
    let newly_done = progress.mark_done(&guide, &reference, note)?;
    save_progress(&storage, provider.state_path(), &progress).await?;

    if newly_done {
        println!("✅ Paso {} marcado como hecho", reference);
    } else {
        println!("ℹ️ El paso {} ya estaba hecho; entrada actualizada", reference);
    }
    Ok(())
}

async fn unmark<C: ConfigProvider>(
    storage: LocalStorage,
    provider: C,
    reference: &str,
) -> guia_eda::Result<()> {
    let guide = load_guide(&storage, &provider).await?;
    let mut progress = load_progress(&storage, provider.state_path()).await?;

    let reference = validate_step_ref("reference", reference)?;
    let was_done = progress.unmark(&guide, &reference)?;
    save_progress(&storage, provider.state_path(), &progress).await?;

    if was_done {
        println!("✅ Paso {} desmarcado", reference);
    } else {
        println!("ℹ️ El paso {} no estaba marcado", reference);
    }
    Ok(())
}

async fn reset<C: ConfigProvider>(storage: LocalStorage, provider: C) -> guia_eda::Result<()> {
    let mut progress = load_progress(&storage, provider.state_path()).await?;
    let entries = progress.entries.len();
    progress.reset();
    save_progress(&storage, provider.state_path(), &progress).await?;

    println!("✅ Progreso borrado ({} entradas)", entries);
    Ok(())
}
