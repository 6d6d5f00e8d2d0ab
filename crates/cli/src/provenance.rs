use anyhow::{Context, Result};
use serde_json::{json, Value};
use std::ffi::OsString;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// What produced an artifact: command parameters and the files it read.
pub struct Payload {
    pub params: Value,
    pub inputs: Vec<PathBuf>,
}

impl Payload {
    pub fn new(params: Value) -> Self {
        Self {
            params,
            inputs: Vec::new(),
        }
    }

    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.inputs.push(path.into());
        self
    }
}

/// Write `<artifact stem>.provenance.json` next to the artifact, recording the
/// library version, git commit, callsite, params, inputs, and outputs.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let provenance_path = provenance_path(artifact);
    if let Some(parent) = provenance_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating provenance dir {}", parent.display()))?;
        }
    }

    let callsite = Location::caller();
    let inputs: Vec<_> = payload
        .inputs
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    let doc = json!({
        "meshcalc": meshcalc::VERSION,
        "code_rev": current_git_rev(),
        "callsite": {
            "file": callsite.file(),
            "line": callsite.line()
        },
        "params": payload.params,
        "inputs": inputs,
        "outputs": [artifact.to_string_lossy()]
    });
    fs::write(&provenance_path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", provenance_path.display()))?;
    Ok(provenance_path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("artifact"));
    name.push(".provenance.json");
    artifact.with_file_name(name)
}

/// Commit hash from the build env, the runtime env, or `git`; `"unknown"` otherwise.
pub fn current_git_rev() -> String {
    if let Some(rev) = option_env!("GIT_COMMIT").filter(|s| !s.is_empty()) {
        return rev.to_string();
    }
    if let Ok(rev) = std::env::var("GIT_COMMIT") {
        if !rev.is_empty() {
            return rev;
        }
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
    fn provenance_path_replaces_extension() {
        let derived = provenance_path(Path::new("/tmp/runs/derived.json"));
        assert_eq!(derived, Path::new("/tmp/runs/derived.provenance.json"));
    }

    #[test]
    fn sidecar_lists_inputs_and_outputs() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("derived.json");
        fs::write(&artifact, "{}").unwrap();
        let payload = Payload::new(json!({"op": "add", "a": "depth", "b": "ones"}))
            .with_input(dir.path().join("mesh.json"));
        let path = write_sidecar(&artifact, payload).unwrap();
        assert!(path.exists());
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["outputs"][0], artifact.to_string_lossy().as_ref());
        assert_eq!(parsed["params"]["op"], "add");
        assert!(parsed["inputs"][0]
            .as_str()
            .unwrap()
            .ends_with("mesh.json"));
        assert_eq!(parsed["meshcalc"], meshcalc::VERSION);
    }
}
