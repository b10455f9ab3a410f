//! Workspace mutation: materialize release artifacts and bump manifests
//!
//! Both operations act only on the clone's working tree; staging and
//! committing happen later in the pipeline. File materialization follows the
//! instruction order exactly. Timestamp synchronization is guarded so a stale
//! timestamp is never reused for content that actually differs, and directory
//! timestamps are fixed longest-path-first after all copies are done.

use crate::core::config::{CopyInstruction, MANIFEST_FILES, ModeSpec};
use crate::core::error::{ReleaseError, ReleaseResult, ResultExt};
use filetime::FileTime;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Counts of what materialization created
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyTally {
  pub dirs: usize,
  pub files: usize,
}

impl CopyTally {
  /// One-line summary like "Created 2 directories, copied 3 files"
  pub fn summary(&self) -> Option<String> {
    let mut parts = Vec::new();
    if self.dirs > 0 {
      parts.push(format!(
        "Created {} {}",
        self.dirs,
        if self.dirs == 1 { "directory" } else { "directories" }
      ));
    }
    if self.files > 0 {
      parts.push(format!(
        "{} {} {}",
        if self.dirs > 0 { "copied" } else { "Copied" },
        self.files,
        if self.files == 1 { "file" } else { "files" }
      ));
    }
    if parts.is_empty() { None } else { Some(parts.join(", ")) }
  }
}

/// Options controlling file materialization
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOptions {
  /// Sync copied timestamps to their sources
  pub preserve_timestamps: bool,
  /// Permission mode applied to copied files
  pub mode: Option<ModeSpec>,
  /// Log each copy/creation
  pub verbose: bool,
}

/// Materialize copy instructions into the clone's working tree, in order
pub fn materialize(instructions: &[CopyInstruction], work_tree: &Path, opts: CopyOptions) -> ReleaseResult<CopyTally> {
  let mut tally = CopyTally::default();
  // dest -> src pairs for the post-copy directory timestamp pass
  let mut dirs: Vec<(PathBuf, PathBuf)> = Vec::new();

  for instruction in instructions {
    let dest = work_tree.join(&instruction.dest);

    if instruction.dir {
      if opts.verbose {
        println!("   Creating {}", dest.display());
      }
      fs::create_dir_all(&dest).with_context(|| format!("Failed to create directory {}", dest.display()))?;

      if opts.preserve_timestamps {
        dirs.push((dest, instruction.src.clone()));
      }
      tally.dirs += 1;
    } else {
      if opts.verbose {
        println!("   Copying {} -> {}", instruction.src.display(), dest.display());
      }
      if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {}", parent.display()))?;
      }

      let bytes = fs::read(&instruction.src)
        .with_context(|| format!("Failed to read source file {}", instruction.src.display()))?;
      fs::write(&dest, bytes).with_context(|| format!("Failed to write {}", dest.display()))?;

      if opts.preserve_timestamps {
        sync_timestamp(&instruction.src, &dest)?;
      }

      if let Some(mode) = opts.mode {
        apply_mode(&instruction.src, &dest, mode)?;
      }
      tally.files += 1;
    }
  }

  // Deepest directories first, so fixing a parent's timestamp is the final
  // write under that subtree
  if opts.preserve_timestamps {
    longest_first(&mut dirs);
    for (dest, src) in &dirs {
      sync_timestamp(src, dest)?;
    }
  }

  Ok(tally)
}

/// Sort (dest, src) pairs so the longest destination paths come first
pub(crate) fn longest_first(dirs: &mut [(PathBuf, PathBuf)]) {
  dirs.sort_by(|(a, _), (b, _)| {
    b.as_os_str()
      .len()
      .cmp(&a.as_os_str().len())
      .then_with(|| a.cmp(b))
  });
}

/// Synchronize `dest`'s access/modification times to `src`'s
///
/// Skipped when the basenames differ, and (for files) when the content
/// hashes differ: a timestamp only carries over to an identical artifact.
pub fn sync_timestamp(src: &Path, dest: &Path) -> ReleaseResult<()> {
  let meta =
    fs::symlink_metadata(src).with_context(|| format!("Failed to stat {}", src.display()))?;

  if src.file_name() != dest.file_name() {
    return Ok(());
  }

  if meta.is_file() && file_digest(src)? != file_digest(dest)? {
    return Ok(());
  }

  let atime = FileTime::from_last_access_time(&meta);
  let mtime = FileTime::from_last_modification_time(&meta);
  filetime::set_file_times(dest, atime, mtime)
    .with_context(|| format!("Failed to set timestamps on {}", dest.display()))?;

  Ok(())
}

/// SHA-256 of a file's content
fn file_digest(path: &Path) -> ReleaseResult<[u8; 32]> {
  let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
  let mut hasher = Sha256::new();
  hasher.update(&bytes);
  Ok(hasher.finalize().into())
}

#[cfg(unix)]
fn apply_mode(src: &Path, dest: &Path, mode: ModeSpec) -> ReleaseResult<()> {
  use std::os::unix::fs::PermissionsExt;

  let bits = match mode {
    ModeSpec::FromSource => {
      fs::metadata(src)
        .with_context(|| format!("Failed to stat {}", src.display()))?
        .permissions()
        .mode()
    }
    ModeSpec::Bits(bits) => bits,
  };
  fs::set_permissions(dest, fs::Permissions::from_mode(bits))
    .with_context(|| format!("Failed to set mode on {}", dest.display()))?;
  Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_src: &Path, _dest: &Path, _mode: ModeSpec) -> ReleaseResult<()> {
  Ok(())
}

/// Rewrite the `version` field of each known manifest present in the clone
///
/// Absent manifests are skipped silently. Key order is preserved and output
/// is deterministic, so bumping to the same version twice is a no-op on the
/// second run.
pub fn bump_manifests(work_tree: &Path, version: &str, indent: usize, verbose: bool) -> ReleaseResult<Vec<String>> {
  let mut updated = Vec::new();

  for name in MANIFEST_FILES {
    let path = work_tree.join(name);
    if !path.exists() {
      if verbose {
        println!("   Manifest {} not found, skipping", name);
      }
      continue;
    }

    let content =
      fs::read_to_string(&path).with_context(|| format!("Failed to read manifest {}", path.display()))?;
    let mut manifest: serde_json::Value =
      serde_json::from_str(&content).with_context(|| format!("Failed to parse manifest {}", path.display()))?;

    let object = manifest
      .as_object_mut()
      .ok_or_else(|| ReleaseError::message(format!("Manifest {} is not a JSON object", path.display())))?;
    object.insert("version".to_string(), serde_json::Value::String(version.to_string()));

    let rendered = to_json_pretty(&manifest, indent)?;
    fs::write(&path, rendered).with_context(|| format!("Failed to write manifest {}", path.display()))?;

    if verbose {
      println!("   Updated {}", path.display());
    }
    updated.push(name.to_string());
  }

  Ok(updated)
}

/// Serialize JSON with a fixed indentation width and a trailing newline
fn to_json_pretty(value: &serde_json::Value, indent: usize) -> ReleaseResult<String> {
  let indent_str = " ".repeat(indent);
  let mut buf = Vec::new();
  let formatter = serde_json::ser::PrettyFormatter::with_indent(indent_str.as_bytes());
  let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
  value.serialize(&mut serializer)?;
  buf.push(b'\n');
  Ok(String::from_utf8(buf)?)
}
