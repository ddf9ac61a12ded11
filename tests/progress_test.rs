//! Seguimiento de progreso de punta a punta, con el registro persistido en
//! disco igual que lo deja el CLI.

use guia_eda::core::Storage;
use guia_eda::utils::error::ErrorSeverity;
use guia_eda::{
    load_progress, save_progress, GuideError, GuideParser, LocalStorage, ProgressLog, StepRef,
};
use tempfile::TempDir;

const BUNDLED_GUIDE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/data/guia_eda.txt"
));

fn reference(raw: &str) -> StepRef {
    raw.parse().unwrap()
}

#[tokio::test]
async fn test_progress_persists_across_reloads() {
    let temp_dir = TempDir::new().unwrap();
    let state_path = format!("{}/progreso.json", temp_dir.path().to_str().unwrap());
    let storage = LocalStorage::new(".".to_string());
    let guide = GuideParser::new().parse(BUNDLED_GUIDE).unwrap();

    // Sin fichero de estado el progreso arranca vacío
    let mut progress = load_progress(&storage, &state_path).await.unwrap();
    assert_eq!(progress.entries.len(), 0);

    progress
        .mark_done(&guide, &reference("9"), Some("outliers revisados".to_string()))
        .unwrap();
    progress.mark_done(&guide, &reference("15.1"), None).unwrap();
    save_progress(&storage, &state_path, &progress).await.unwrap();

    let restored = load_progress(&storage, &state_path).await.unwrap();
    assert!(restored.is_done(&reference("9")));
    assert!(restored.is_done(&reference("15.1")));
    assert!(!restored.is_done(&reference("10")));
    assert_eq!(
        restored.entries.get("9").unwrap().note.as_deref(),
        Some("outliers revisados")
    );
}

#[tokio::test]
async fn test_summary_over_bundled_guide() {
    let temp_dir = TempDir::new().unwrap();
    let state_path = format!("{}/progreso.json", temp_dir.path().to_str().unwrap());
    let storage = LocalStorage::new(".".to_string());
    let guide = GuideParser::new().parse(BUNDLED_GUIDE).unwrap();

    let mut progress = load_progress(&storage, &state_path).await.unwrap();

    // Se completa la PARTE I entera
    for number in 1..=5 {
        progress
            .mark_done(&guide, &StepRef { number, sub: None }, None)
            .unwrap();
    }

    let summary = progress.summary(&guide);
    assert_eq!(summary.total, 21);
    assert_eq!(summary.done, 5);
    assert_eq!(summary.phases[0].done, 5);
    assert_eq!(summary.phases[0].total, 5);
    assert_eq!(summary.phases[1].done, 0);
    assert_eq!(summary.next, Some(reference("6")));
}

#[tokio::test]
async fn test_completing_everything_reports_no_next_step() {
    let storage = LocalStorage::new(".".to_string());
    let temp_dir = TempDir::new().unwrap();
    let state_path = format!("{}/progreso.json", temp_dir.path().to_str().unwrap());
    let guide = GuideParser::new().parse(BUNDLED_GUIDE).unwrap();

    let mut progress = ProgressLog::default();
    for item in guide.items() {
        progress.mark_done(&guide, &item.reference, None).unwrap();
    }
    save_progress(&storage, &state_path, &progress).await.unwrap();

    let restored = load_progress(&storage, &state_path).await.unwrap();
    let summary = restored.summary(&guide);
    assert_eq!(summary.done, 21);
    assert_eq!(summary.next, None);
    assert!((summary.percent() - 100.0).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_unknown_reference_is_rejected_without_saving() {
    let temp_dir = TempDir::new().unwrap();
    let state_path = format!("{}/progreso.json", temp_dir.path().to_str().unwrap());
    let storage = LocalStorage::new(".".to_string());
    let guide = GuideParser::new().parse(BUNDLED_GUIDE).unwrap();

    let mut progress = ProgressLog::default();
    let err = progress
        .mark_done(&guide, &reference("42"), None)
        .unwrap_err();

    // Un paso inexistente es un fallo detectable desde scripts, no un aviso
    assert!(matches!(err, GuideError::UnknownStepError { .. }));
    assert_eq!(err.severity(), ErrorSeverity::Medium);
    assert_eq!(err.severity().exit_code(), 2);
    assert!(progress.entries.is_empty());

    save_progress(&storage, &state_path, &progress).await.unwrap();
    let restored = load_progress(&storage, &state_path).await.unwrap();
    assert!(restored.entries.is_empty());
}

#[tokio::test]
async fn test_corrupt_state_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let state_path = format!("{}/progreso.json", temp_dir.path().to_str().unwrap());
    let storage = LocalStorage::new(".".to_string());

    storage
        .write_file(&state_path, b"esto no es json")
        .await
        .unwrap();

    let result = load_progress(&storage, &state_path).await;
    assert!(result.is_err());
}
