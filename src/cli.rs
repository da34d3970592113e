//! The `validate-jsonschema <schema.json> <data.json>` command.
//!
//! Prints exactly one JSON document on stdout. Exit code 0 means validation
//! ran (valid or not); 1 means it could not run.

use std::path::{Path, PathBuf};

use serde_json::Value;
use url::Url;

use crate::config::CliConfig;
use crate::engine::Validator;
use crate::error::SchemaError;
use crate::format::FormatRegistry;
use crate::registry::SchemaRegistry;
use crate::report::Report;

pub const PROGRAM: &str = "validate-jsonschema";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("{}: {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
}

/// Runs one validation from command-line arguments (`args[0]` is the program).
pub async fn run(args: &[String], config: &CliConfig) -> Report {
    let [_, schema_path, data_path] = args else {
        return Report::usage(PROGRAM);
    };
    let schema_path = Path::new(schema_path);

    let (schema, data) = match load_inputs(schema_path, Path::new(data_path)).await {
        Ok(inputs) => inputs,
        Err(e) => {
            tracing::error!("cannot load inputs: {e}");
            return Report::unreadable(e);
        }
    };

    let registry = match &config.registry_dir {
        Some(dir) => match load_registry(dir).await {
            Ok(Ok(registry)) => registry,
            Ok(Err(schema_err)) => return schema_err.into(),
            Err(e) => {
                tracing::error!("cannot load registry: {e}");
                return Report::unreadable(e);
            }
        },
        None => SchemaRegistry::new(),
    };

    let base_uri = file_uri(schema_path);
    let validator_config = config.validator.clone();
    let timeout = config.timeout;

    // Validation is synchronous and CPU-bound; keep it off the runtime thread.
    let task = tokio::task::spawn_blocking(move || {
        let mut validator = Validator::with_options(&schema, validator_config, FormatRegistry::draft7())?;
        if let Some(uri) = base_uri {
            validator = validator.with_base_uri(uri);
        }
        validator.validate(&data, &registry)
    });

    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(Ok(result))) => result.into(),
        Ok(Ok(Err(schema_err))) => {
            tracing::error!("schema refused: {schema_err}");
            schema_err.into()
        }
        Ok(Err(join_err)) => {
            tracing::error!("validation task failed: {join_err}");
            Report::unexpected(&join_err, format!("{join_err:?}"))
        }
        Err(elapsed) => {
            tracing::error!("validation timed out after {} seconds", timeout.as_secs());
            Report::unexpected(
                format!("validation timed out after {} seconds", timeout.as_secs()),
                format!("{elapsed:?}"),
            )
        }
    }
}

async fn load_inputs(schema_path: &Path, data_path: &Path) -> Result<(Value, Value), CliError> {
    let schema = read_json(schema_path).await?;
    let data = read_json(data_path).await?;
    Ok((schema, data))
}

async fn read_json(path: &Path) -> Result<Value, CliError> {
    let text = tokio::fs::read_to_string(path).await.map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Registers every `*.json` file in `dir` under its `file://` URI.
///
/// A document's own `$id` becomes an additional address. Files are loaded in
/// name order so that duplicate `$id`s resolve the same way on every run.
async fn load_registry(dir: &Path) -> Result<Result<SchemaRegistry, SchemaError>, CliError> {
    let read_err = |source: std::io::Error| CliError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = tokio::fs::read_dir(dir).await.map_err(read_err)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();

    let mut registry = SchemaRegistry::new();
    for path in files {
        let document = read_json(&path).await?;
        let uri = file_uri(&path).unwrap_or_else(|| path.display().to_string());
        if let Err(schema_err) = registry.insert(&uri, document) {
            return Ok(Err(schema_err));
        }
    }
    tracing::debug!(documents = registry.len(), dir = %dir.display(), "loaded schema registry");
    Ok(Ok(registry))
}

fn file_uri(path: &Path) -> Option<String> {
    let absolute = std::fs::canonicalize(path).ok()?;
    Url::from_file_path(absolute).ok().map(String::from)
}
