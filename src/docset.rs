use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

pub const INDEX_DIR: &str = "Contents/Resources";
pub const INDEX_FILE: &str = "docSet.dsidx";
pub const BACKUP_SUFFIX: &str = ".backup";

/// Locations derived from a docset root. Nothing here is configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsetPaths {
    pub root: PathBuf,
    pub index: PathBuf,
    pub backup: PathBuf,
}

impl DocsetPaths {
    pub fn resolve(docset: &Path) -> io::Result<Self> {
        if !docset.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("docset `{}` is not a directory", docset.display()),
            ));
        }
        Ok(Self::for_root(docset))
    }

    pub fn for_root(docset: &Path) -> Self {
        let index = docset.join(INDEX_DIR).join(INDEX_FILE);
        let backup = backup_path_for(&index);
        Self {
            root: docset.to_path_buf(),
            index,
            backup,
        }
    }
}

fn backup_path_for(index: &Path) -> PathBuf {
    let mut name = OsString::from(index.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}
