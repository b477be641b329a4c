use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A batch of text files that land in one directory all together or not at all.
///
/// `commit` writes every file to a uniquely named hidden temp file next to its
/// target first; only once all of them are on disk are they renamed into place.
/// Unpersisted temp files are removed when dropped.
#[derive(Debug)]
pub struct OutputSet {
    dir: PathBuf,
    files: Vec<(String, String)>,
}

impl OutputSet {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), files: Vec::new() }
    }

    /// Queue `contents` under `name`. A repeated name replaces the earlier one.
    pub fn add(&mut self, name: impl Into<String>, contents: impl Into<String>) {
        let name = name.into();
        let contents = contents.into();
        match self.files.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = contents,
            None => self.files.push((name, contents)),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn commit(self) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating output directory {}", self.dir.display()))?;

        let mut staged: Vec<(NamedTempFile, PathBuf)> = Vec::with_capacity(self.files.len());
        for (name, contents) in &self.files {
            let target = self.dir.join(name);
            let temp = stage(&target, contents)
                .with_context(|| format!("staging {}", target.display()))?;
            debug!("staged {}", temp.path().display());
            staged.push((temp, target));
        }

        let mut written = Vec::with_capacity(staged.len());
        for (temp, target) in staged {
            temp.persist(&target)
                .map_err(|e| e.error)
                .with_context(|| format!("replacing {}", target.display()))?;
            written.push(target);
        }
        Ok(written)
    }
}

fn stage(target: &Path, contents: &str) -> std::io::Result<NamedTempFile> {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    let stem = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{stem}."))
        .suffix(".tmp")
        .tempfile_in(parent)?;
    temp.write_all(contents.as_bytes())?;
    temp.flush()?;
    Ok(temp)
}
