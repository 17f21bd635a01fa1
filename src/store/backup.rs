use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Created { bytes: u64 },
    AlreadyPresent,
    Skipped,
}

/// Copies `source` to `backup` unless `backup` already exists. The backup is
/// opened with `create_new`, so an existing file is never overwritten, even
/// one that appears between the check and the open.
pub fn backup_once(source: &Path, backup: &Path) -> io::Result<BackupOutcome> {
    if backup.exists() {
        return Ok(BackupOutcome::AlreadyPresent);
    }

    let mut input = File::open(source)?;
    let mut output = match OpenOptions::new().write(true).create_new(true).open(backup) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            return Ok(BackupOutcome::AlreadyPresent);
        }
        Err(err) => return Err(err),
    };

    let copied = io::copy(&mut input, &mut output).and_then(|bytes| {
        output.sync_all()?;
        Ok(bytes)
    });
    match copied {
        Ok(bytes) => Ok(BackupOutcome::Created { bytes }),
        Err(err) => {
            // A partial backup would be mistaken for a good one on the next run.
            drop(output);
            let _ = fs::remove_file(backup);
            Err(err)
        }
    }
}
