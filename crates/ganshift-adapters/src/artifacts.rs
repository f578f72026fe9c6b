//! Checkpoint downloading and caching adapter.
//!
//! Presence of the final file is the sole "already downloaded" signal; bodies
//! are streamed to a `.part` sibling and renamed into place on success, so a
//! file that exists is always complete.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Placeholder checksum indicating verification should be skipped.
const PLACEHOLDER_CHECKSUM: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// Response bodies are read and written in chunks of this size.
const CHUNK_SIZE: usize = 8192;

/// Registry name of the forward (A to B) generator.
pub const FORWARD_GENERATOR: &str = "generator_ab";
/// Registry name of the reverse (B to A) generator.
pub const REVERSE_GENERATOR: &str = "generator_ba";

/// Checkpoint metadata.
#[derive(Debug, Clone)]
pub struct RemoteArtifact {
    /// Artifact name/identifier.
    pub name: &'static str,
    /// Download URL (GitHub releases).
    pub url: &'static str,
    /// Expected SHA256 hash. All zeros skips verification.
    pub sha256: &'static str,
    /// Filename in the artifacts directory.
    pub filename: &'static str,
}

/// Known checkpoints, one per translation direction.
pub const ARTIFACTS: &[RemoteArtifact] = &[
    RemoteArtifact {
        name: FORWARD_GENERATOR,
        url: "https://github.com/ganshift/ganshift/releases/download/weights-v1/generator_ab.safetensors",
        sha256: "0000000000000000000000000000000000000000000000000000000000000000",
        filename: "generator_ab.safetensors",
    },
    RemoteArtifact {
        name: REVERSE_GENERATOR,
        url: "https://github.com/ganshift/ganshift/releases/download/weights-v1/generator_ba.safetensors",
        sha256: "0000000000000000000000000000000000000000000000000000000000000000",
        filename: "generator_ba.safetensors",
    },
];

static DIR_OVERRIDE: Lazy<RwLock<Option<PathBuf>>> = Lazy::new(|| RwLock::new(None));

/// Overrides the artifacts directory for this process (None restores the
/// default). Set before any fetch or load.
pub fn set_artifacts_dir(dir: Option<PathBuf>) {
    if let Ok(mut guard) = DIR_OVERRIDE.write() {
        *guard = dir;
    }
}

/// Returns the artifacts directory path.
///
/// Uses the process override when set, otherwise
/// `XDG_DATA_HOME/ganshift/models` (or the platform equivalent).
#[must_use]
pub fn artifacts_dir() -> PathBuf {
    if let Ok(guard) = DIR_OVERRIDE.read() {
        if let Some(dir) = guard.as_ref() {
            return dir.clone();
        }
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ganshift")
        .join("models")
}

/// Per-chunk download progress: `(artifact name, bytes so far, total if known)`.
pub type ProgressCallback = Box<dyn Fn(&str, u64, Option<u64>) + Send + Sync>;

/// Ensures all registry checkpoints are present, downloading absent ones.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, a download fails, or
/// a checksum doesn't match.
pub fn ensure_artifacts() -> Result<()> {
    ensure_artifacts_with_progress(None)
}

/// [`ensure_artifacts`] with optional per-chunk progress reporting.
///
/// # Errors
///
/// Same conditions as [`ensure_artifacts`].
pub fn ensure_artifacts_with_progress(progress: Option<&ProgressCallback>) -> Result<()> {
    let dir = artifacts_dir();
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create artifacts directory: {}", dir.display()))?;
    ensure_into(&dir, ARTIFACTS, progress)
}

/// Ensures the given artifacts exist under `dir`.
///
/// A present file is trusted as-is: no network request and no integrity
/// re-check. Exposed separately so callers (and tests) can run the fetch
/// logic against an explicit directory and registry.
///
/// # Errors
///
/// Returns an error if any absent artifact fails to download or verify.
pub fn ensure_into(
    dir: &Path,
    artifacts: &[RemoteArtifact],
    progress: Option<&ProgressCallback>,
) -> Result<()> {
    for artifact in artifacts {
        let path = dir.join(artifact.filename);
        if path.exists() {
            debug!("Artifact {} already present", artifact.name);
        } else {
            download_artifact(artifact, &path, progress)?;
        }
    }
    Ok(())
}

/// Downloads one artifact to `path` via a `.part` temporary and atomic rename.
fn download_artifact(
    artifact: &RemoteArtifact,
    path: &Path,
    progress: Option<&ProgressCallback>,
) -> Result<()> {
    info!("Downloading artifact: {}", artifact.name);

    let mut response = reqwest::blocking::get(artifact.url)
        .with_context(|| format!("Failed to request {}", artifact.url))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        bail!(
            "Download of {} failed with status {status}: {body}",
            artifact.name
        );
    }

    let total = response.content_length();
    let part_path = part_path_for(path);

    let streamed = stream_to_file(artifact.name, &mut response, &part_path, total, progress);
    let (bytes, digest) = match streamed {
        Ok(v) => v,
        Err(e) => {
            let _ = fs::remove_file(&part_path);
            return Err(e);
        }
    };

    if artifact.sha256 == PLACEHOLDER_CHECKSUM {
        debug!(
            "Skipping checksum verification for {} (placeholder checksum)",
            artifact.name
        );
    } else if digest != artifact.sha256 {
        let _ = fs::remove_file(&part_path);
        bail!(
            "Checksum mismatch for {}: expected {}, got {digest}",
            artifact.name,
            artifact.sha256
        );
    }

    fs::rename(&part_path, path)
        .with_context(|| format!("Failed to move {} into place", artifact.name))?;

    info!("Downloaded {} ({bytes} bytes)", artifact.name);
    Ok(())
}

fn part_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

/// Streams the response body in fixed-size chunks, hashing as it goes.
///
/// Returns the byte count and hex SHA-256 of everything written.
fn stream_to_file(
    name: &str,
    response: &mut impl Read,
    part_path: &Path,
    total: Option<u64>,
    progress: Option<&ProgressCallback>,
) -> Result<(u64, String)> {
    let mut file = fs::File::create(part_path)
        .with_context(|| format!("Failed to create {}", part_path.display()))?;

    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    let mut downloaded: u64 = 0;

    loop {
        let n = response
            .read(&mut buf)
            .with_context(|| format!("Network error while downloading {name}"))?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n])
            .with_context(|| format!("Failed to write {}", part_path.display()))?;
        hasher.update(&buf[..n]);
        downloaded += n as u64;
        if let Some(cb) = progress {
            cb(name, downloaded, total);
        }
    }

    file.flush()
        .with_context(|| format!("Failed to flush {}", part_path.display()))?;

    Ok((downloaded, format!("{:x}", hasher.finalize())))
}

/// Returns the local path for a registry artifact name.
#[must_use]
pub fn artifact_path(name: &str) -> Option<PathBuf> {
    ARTIFACTS
        .iter()
        .find(|a| a.name == name)
        .map(|a| artifacts_dir().join(a.filename))
}

/// Registry artifacts whose files are absent from the artifacts directory.
#[must_use]
pub fn missing_artifacts() -> Vec<&'static str> {
    let dir = artifacts_dir();
    ARTIFACTS
        .iter()
        .filter(|a| !dir.join(a.filename).exists())
        .map(|a| a.name)
        .collect()
}

/// Checks if every registry artifact is present.
#[must_use]
pub fn all_artifacts_present() -> bool {
    missing_artifacts().is_empty()
}

/// Lists registry artifacts with their installed status.
#[must_use]
pub fn list_artifacts() -> Vec<(String, bool)> {
    let dir = artifacts_dir();
    ARTIFACTS
        .iter()
        .map(|a| (a.name.to_string(), dir.join(a.filename).exists()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifacts_dir_default() {
        // Runs without the override; integration tests use ensure_into with
        // explicit directories instead of mutating the global.
        let dir = artifacts_dir();
        assert!(dir.ends_with("ganshift/models"));
    }

    #[test]
    fn test_artifact_path_known() {
        let path = artifact_path(FORWARD_GENERATOR).unwrap();
        assert!(path.ends_with("generator_ab.safetensors"));
    }

    #[test]
    fn test_artifact_path_unknown() {
        assert!(artifact_path("discriminator").is_none());
    }

    #[test]
    fn test_registry_has_one_artifact_per_direction() {
        assert_eq!(ARTIFACTS.len(), 2);
        assert!(ARTIFACTS.iter().any(|a| a.name == FORWARD_GENERATOR));
        assert!(ARTIFACTS.iter().any(|a| a.name == REVERSE_GENERATOR));
    }

    #[test]
    fn test_part_path_keeps_full_name() {
        let part = part_path_for(Path::new("/tmp/generator_ab.safetensors"));
        assert_eq!(part, Path::new("/tmp/generator_ab.safetensors.part"));
    }
}
