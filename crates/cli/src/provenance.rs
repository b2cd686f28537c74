//! Sidecar records for measurement outputs.
//!
//! Every file the CLI writes gets `<stem>.provenance.json` next to it, so a
//! quote can be traced back to the engine build, config and inputs that
//! produced its quantities.

use anyhow::{Context, Result};
use maskcal::EngineCfg;
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Payload<'a> {
    pub command: &'static str,
    pub cfg: &'a EngineCfg,
    pub params: Value,
}

pub fn write_sidecar(artifact: &Path, payload: Payload<'_>) -> Result<PathBuf> {
    let path = sidecar_path(artifact);
    let doc = json!({
        "engine_version": maskcal::VERSION,
        "code_rev": code_rev(),
        "command": payload.command,
        "config": payload.cfg,
        "params": payload.params,
        "outputs": [artifact.to_string_lossy()],
    });
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), "provenance written");
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Build-time `GIT_COMMIT`, then the runtime variable, else "unknown".
pub fn code_rev() -> String {
    option_env!("GIT_COMMIT")
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .or_else(|| std::env::var("GIT_COMMIT").ok().filter(|s| !s.is_empty()))
        .unwrap_or_else(|| "unknown".to_owned())
}
