use std::io;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::docset::DocsetPaths;
use crate::index::{IndexRow, OpenMode, PathRewrite, SearchIndex};
use crate::logging::CHANGE_TARGET;
use crate::store::backup::{BackupOutcome, backup_once};
use crate::tag::strip_leading_tag;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOptions {
    pub docset: PathBuf,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairReport {
    pub paths: DocsetPaths,
    pub backup: BackupOutcome,
    pub scanned: usize,
    pub rewrites: Vec<PathRewrite>,
    pub dry_run: bool,
}

#[derive(Debug)]
pub enum RepairError {
    Docset(io::Error),
    MissingIndex(PathBuf),
    Backup(io::Error),
    Index(rusqlite::Error),
}

impl std::fmt::Display for RepairError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Docset(err) => write!(f, "{err}"),
            Self::MissingIndex(path) => {
                write!(f, "index file `{}` does not exist", path.display())
            }
            Self::Backup(err) => write!(f, "backup failed: {err}"),
            Self::Index(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RepairError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Docset(err) | Self::Backup(err) => Some(err),
            Self::Index(err) => Some(err),
            Self::MissingIndex(_) => None,
        }
    }
}

impl From<rusqlite::Error> for RepairError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Index(value)
    }
}

/// Backs up the index (unless dry-run), strips stray leading tags from every
/// `path`, and commits all rewrites in one transaction (unless dry-run).
pub fn run(options: &RepairOptions) -> Result<RepairReport, RepairError> {
    let paths = DocsetPaths::resolve(&options.docset).map_err(RepairError::Docset)?;
    if !paths.index.is_file() {
        return Err(RepairError::MissingIndex(paths.index));
    }

    let backup = if options.dry_run {
        BackupOutcome::Skipped
    } else {
        let outcome = backup_once(&paths.index, &paths.backup).map_err(RepairError::Backup)?;
        match &outcome {
            BackupOutcome::Created { bytes } => debug!(
                backup = %paths.backup.display(),
                bytes,
                "backing up index file to {}",
                paths.backup.display()
            ),
            BackupOutcome::AlreadyPresent | BackupOutcome::Skipped => debug!(
                backup = %paths.backup.display(),
                "backup already present, leaving it untouched"
            ),
        }
        outcome
    };

    let mode = if options.dry_run {
        OpenMode::ReadOnly
    } else {
        OpenMode::ReadWrite
    };
    let mut index = SearchIndex::open(&paths.index, mode)?;
    let rows = index.rows()?;
    let rewrites = plan_rewrites(&rows);

    if !options.dry_run && !rewrites.is_empty() {
        index.apply_rewrites(&rewrites)?;
    }
    info!(
        scanned = rows.len(),
        rewrites = rewrites.len(),
        "scan complete"
    );

    Ok(RepairReport {
        paths,
        backup,
        scanned: rows.len(),
        rewrites,
        dry_run: options.dry_run,
    })
}

/// Computes the rewrite for every tagged row, logging each one. Rows with a
/// `NULL` or untagged path produce nothing.
pub fn plan_rewrites(rows: &[IndexRow]) -> Vec<PathRewrite> {
    let mut rewrites = Vec::new();
    for row in rows {
        let Some(path) = row.path.as_deref() else {
            continue;
        };
        let Some(corrected) = strip_leading_tag(path) else {
            continue;
        };
        info!(target: CHANGE_TARGET, "Rewriting {path} to {corrected}");
        rewrites.push(PathRewrite {
            id: row.id,
            original: path.to_string(),
            corrected: corrected.to_string(),
        });
    }
    rewrites
}
