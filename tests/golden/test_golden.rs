//! Byte-exact CLI reports for the fixtures under `tests/golden/fixtures`.
//!
//! Each fixture directory holds `schema.json` and `data.json`; the report the
//! CLI prints for them is pinned in `tests/golden/expected/<name>.json`.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use draft7_validate::cli::{self, PROGRAM};
use draft7_validate::config::CliConfig;
use draft7_validate::ValidatorConfig;

fn fixture_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/golden/fixtures")
        .join(name)
}

fn read_expected(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/golden/expected")
        .join(format!("{name}.json"));
    fs::read_to_string(path)
        .expect("expected file missing")
        .trim_end()
        .to_string()
}

fn config() -> CliConfig {
    CliConfig {
        validator: ValidatorConfig::default(),
        timeout: Duration::from_secs(30),
        registry_dir: None,
    }
}

async fn report_for(name: &str) -> (String, i32) {
    let dir = fixture_dir(name);
    let args = vec![
        PROGRAM.to_string(),
        dir.join("schema.json").display().to_string(),
        dir.join("data.json").display().to_string(),
    ];
    let report = cli::run(&args, &config()).await;
    (serde_json::to_string(&report).unwrap(), report.exit_code())
}

async fn assert_golden(name: &str) {
    let (actual, exit_code) = report_for(name).await;
    assert_eq!(exit_code, 0, "{name}: a completed validation exits 0");
    assert_eq!(actual, read_expected(name), "{name}: report drifted from golden output");
}

#[tokio::test]
async fn golden_order_form() {
    assert_golden("order_form").await;
}

#[tokio::test]
async fn golden_recursive_tree() {
    assert_golden("recursive_tree").await;
}

#[tokio::test]
async fn golden_conditional() {
    assert_golden("conditional").await;
}

#[tokio::test]
async fn golden_valid_document() {
    assert_golden("valid_document").await;
}

#[tokio::test]
async fn golden_reports_are_stable_across_runs() {
    for name in ["order_form", "recursive_tree", "conditional", "valid_document"] {
        let first = report_for(name).await;
        let second = report_for(name).await;
        assert_eq!(first, second, "{name}: two runs must print identical bytes");
    }
}
