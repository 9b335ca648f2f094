//! Preflight Check System
//!
//! Verifies the pieces VibeCurator depends on before serving requests.
//! Informational only: every failure has a fallback (rule-based interpretation
//! or unvalidated suggestions), so startup continues regardless.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::brain::LinearVibeModel;
use crate::catalog::SpotifyCatalog;
use crate::config::AppConfig;
use crate::fs_manager::PortablePathManager;

/// Result of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// Complete preflight check report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightReport {
    pub all_passed: bool,
    pub checks: Vec<CheckResult>,
    /// Vibes will be interpreted by the predictive model
    pub model_ready: bool,
    /// Suggestions will be validated against the catalog
    pub catalog_ready: bool,
    pub summary: String,
}

/// Runs all checks and returns the report
pub async fn run_preflight_checks(config: &AppConfig, catalog: &SpotifyCatalog) -> PreflightReport {
    info!("Running preflight checks");

    let mut checks = vec![check_directories()];

    let model_check = check_model(&config.model_path);
    let model_ready = model_check.passed;
    checks.push(model_check);

    let credentials_check = check_credentials(catalog);
    let has_credentials = credentials_check.passed;
    checks.push(credentials_check);

    let catalog_ready = if has_credentials {
        let token_check = check_token(catalog).await;
        let passed = token_check.passed;
        checks.push(token_check);
        passed
    } else {
        checks.push(CheckResult::fail(
            "catalog_token",
            "Skipped - no credentials",
            None,
        ));
        false
    };

    let all_passed = checks.iter().all(|c| c.passed);
    let summary = match (model_ready, catalog_ready) {
        (true, true) => "All checks passed. System ready.",
        (false, true) => "Model unavailable. Using rule-based interpretation.",
        (true, false) => "Catalog unavailable. Suggestions will not be validated.",
        (false, false) => "Model and catalog unavailable. Running in offline fallback mode.",
    }
    .to_string();

    for check in &checks {
        if check.passed {
            info!("  [ok] {}: {}", check.name, check.message);
        } else {
            warn!("  [!!] {}: {}", check.name, check.message);
            if let Some(details) = &check.details {
                warn!("      Details: {}", details);
            }
        }
    }
    info!("Summary: {}", summary);

    PreflightReport {
        all_passed,
        checks,
        model_ready,
        catalog_ready,
        summary,
    }
}

fn check_directories() -> CheckResult {
    let missing: Vec<String> = [
        ("data", PortablePathManager::data_dir()),
        ("models", PortablePathManager::models_dir()),
    ]
    .into_iter()
    .filter(|(_, path)| !path.is_dir())
    .map(|(name, path)| format!("{} ({})", name, path.display()))
    .collect();

    if missing.is_empty() {
        CheckResult::pass("directories", "Data directories present")
    } else {
        CheckResult::fail(
            "directories",
            "Missing data directories",
            Some(missing.join(", ")),
        )
    }
}

fn check_model(path: &Path) -> CheckResult {
    match LinearVibeModel::load(path) {
        Ok(_) => CheckResult::pass("model", &format!("Model loads from {}", path.display())),
        Err(e) => CheckResult::fail("model", "Model cannot be loaded", Some(e.to_string())),
    }
}

fn check_credentials(catalog: &SpotifyCatalog) -> CheckResult {
    if catalog.has_credentials() {
        CheckResult::pass("catalog_credentials", "Catalog credentials configured")
    } else {
        CheckResult::fail(
            "catalog_credentials",
            "Catalog credentials not configured",
            Some("Set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET".to_string()),
        )
    }
}

async fn check_token(catalog: &SpotifyCatalog) -> CheckResult {
    match catalog.authenticate().await {
        Ok(()) => CheckResult::pass("catalog_token", "Catalog token obtained"),
        Err(e) => CheckResult::fail("catalog_token", "Catalog authentication failed", Some(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_manager::HOME_ENV;

    #[tokio::test]
    async fn test_offline_report() {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().to_path_buf();

        // Config and catalog are built inside the env override; the checks
        // only need the resolved paths afterwards
        let (config, catalog) = temp_env::with_vars(
            [
                (HOME_ENV, Some(home.as_os_str())),
                ("SPOTIFY_CLIENT_ID", None),
                ("SPOTIFY_CLIENT_SECRET", None),
                ("VIBECURATOR_MODEL_PATH", None),
            ],
            || {
                let config = AppConfig::from_env().unwrap();
                let catalog = SpotifyCatalog::from_config(&config).unwrap();
                (config, catalog)
            },
        );

        let report = run_preflight_checks(&config, &catalog).await;
        assert!(!report.all_passed);
        assert!(!report.model_ready);
        assert!(!report.catalog_ready);
        assert_eq!(report.checks.len(), 4);
        assert!(report.summary.contains("offline"));
    }
}
