use anyhow::{Context, Result};
use ellipse::MethodKind;
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: the method, its resolved parameters, and the view.
pub struct Payload {
    pub method: MethodKind,
    pub params: Value,
    pub view: Value,
}

impl Payload {
    pub fn new(method: MethodKind, params: Value) -> Self {
        Self {
            method,
            params,
            view: Value::Null,
        }
    }

    pub fn with_view(mut self, step: usize, reveal_all: bool) -> Self {
        self.view = json!({ "step": step, "reveal_all": reveal_all });
        self
    }
}

/// Provenance block shared by sidecars and `report`.
pub fn block(method: Option<MethodKind>, params: Value, outputs: Vec<String>) -> Value {
    json!({
        "code_rev": current_git_rev(),
        "engine_version": ellipse::VERSION,
        "method": method.map(|m| m.as_str()),
        "params": params,
        "outputs": outputs,
    })
}

/// Write `<artifact>.provenance.json` next to the artifact.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let path = sidecar_path(artifact);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }
    let callsite = Location::caller();
    let mut doc = block(
        Some(payload.method),
        payload.params,
        vec![artifact.to_string_lossy().into_owned()],
    );
    doc["view"] = payload.view;
    doc["callsite"] = json!({ "file": callsite.file(), "line": callsite.line() });
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn sidecar_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("draw_plan"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Commit of the running code: build-time `GIT_COMMIT`, runtime `GIT_COMMIT`, then `git`.
pub fn current_git_rev() -> String {
    let from_build = option_env!("GIT_COMMIT").filter(|s| !s.is_empty());
    if let Some(rev) = from_build {
        return rev.to_string();
    }
    if let Some(rev) = std::env::var("GIT_COMMIT").ok().filter(|s| !s.is_empty()) {
        return rev;
    }
    Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .and_then(|out| String::from_utf8(out.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sidecar_path_replaces_extension() {
        let derived = sidecar_path(Path::new("/tmp/plans/fd.json"));
        assert_eq!(derived, Path::new("/tmp/plans/fd.provenance.json"));
    }

    #[test]
    fn write_sidecar_records_method_and_view() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("plan.json");
        fs::write(&artifact, "{}").unwrap();
        let payload = Payload::new(MethodKind::ArcCircleMirrored, json!({"divisions": 4}))
            .with_view(3, false);
        let path = write_sidecar(&artifact, payload).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["method"], "arc-circle-mirrored");
        assert_eq!(parsed["view"]["step"], 3);
        assert_eq!(parsed["params"]["divisions"], 4);
    }
}
