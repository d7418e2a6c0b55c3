use super::{SourceEmitter, SourceFile};
use crate::error::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Emitter rooted at an output directory. Existing `*.ts` files below the
/// root are loaded as raw text so transforms can see and delete them.
#[derive(Debug)]
pub struct FileSystemEmitter {
    root: PathBuf,
    files: BTreeMap<String, SourceFile>,
    removed: BTreeSet<String>,
}

impl FileSystemEmitter {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let mut files = BTreeMap::new();
        if root.is_dir() {
            let pattern = root.join("**").join("*.ts");
            for entry in glob::glob(&pattern.to_string_lossy())? {
                let path = entry.map_err(std::io::Error::from)?;
                let Some(relative) = relative_key(&root, &path) else {
                    continue;
                };
                let text = fs::read_to_string(&path)?;
                files.insert(relative.clone(), SourceFile::from_text(relative, text));
            }
        }
        tracing::debug!("[PNGC] Loaded {} existing files from {}", files.len(), root.display());
        Ok(Self {
            root,
            files,
            removed: BTreeSet::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

impl SourceEmitter for FileSystemEmitter {
    fn get_or_create(&mut self, path: &str) -> &mut SourceFile {
        self.removed.remove(path);
        self.files
            .entry(path.to_string())
            .or_insert_with(|| SourceFile::new(path))
    }

    fn get(&self, path: &str) -> Option<&SourceFile> {
        self.files.get(path)
    }

    fn get_mut(&mut self, path: &str) -> Option<&mut SourceFile> {
        self.files.get_mut(path)
    }

    fn remove(&mut self, path: &str) -> Option<SourceFile> {
        let file = self.files.remove(path)?;
        self.removed.insert(path.to_string());
        Some(file)
    }

    fn paths(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    fn save(&mut self) -> Result<()> {
        for path in std::mem::take(&mut self.removed) {
            let target = self.root.join(&path);
            if target.is_file() {
                fs::remove_file(&target)?;
            }
        }
        for file in self.files.values() {
            let target = self.root.join(&file.path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, file.text())?;
        }
        tracing::debug!("[PNGC] Saved {} files to {}", self.files.len(), self.root.display());
        Ok(())
    }

    fn remove_empty_directories(&mut self) -> Result<()> {
        if self.root.is_dir() {
            prune(&self.root)?;
        }
        Ok(())
    }
}

/// Depth-first removal of empty directories below `dir`. Returns whether
/// `dir` itself ended up empty.
fn prune(dir: &Path) -> Result<bool> {
    let mut empty = true;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() && prune(&path)? {
            fs::remove_dir(&path)?;
        } else {
            empty = false;
        }
    }
    Ok(empty)
}
