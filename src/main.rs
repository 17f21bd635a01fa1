use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;
use toc_fixer::logging::{LOG_FILE, LogSession};
use toc_fixer::repair::{self, RepairError, RepairOptions};

#[derive(Debug)]
struct CliError {
    code: &'static str,
    message: String,
}

impl CliError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn io(code: &'static str, err: io::Error) -> Self {
        Self::new(code, err.to_string())
    }
}

impl From<RepairError> for CliError {
    fn from(value: RepairError) -> Self {
        let code = match &value {
            RepairError::Docset(_) => "missing_docset",
            RepairError::MissingIndex(_) => "missing_index",
            RepairError::Backup(_) => "backup_error",
            RepairError::Index(_) => "sqlite_error",
        };
        Self::new(code, value.to_string())
    }
}

#[derive(Parser, Debug)]
#[command(name = "toc-fixer")]
#[command(about = "Strip stray leading tags from docset table-of-contents paths")]
struct Cli {
    /// path to root of docset to fix
    docset: PathBuf,
    /// log every rewrite but leave the index untouched
    #[arg(long)]
    dry_run: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let payload = json!({
                "error": {
                    "code": err.code,
                    "message": err.message,
                }
            });
            eprintln!("{payload}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let session =
        LogSession::to_file(Path::new(LOG_FILE)).map_err(|err| CliError::io("log_error", err))?;

    let options = RepairOptions {
        docset: cli.docset,
        dry_run: cli.dry_run,
    };
    let report = repair::run(&options).map_err(|err| {
        tracing::error!("{err}");
        CliError::from(err)
    })?;
    session
        .flush()
        .map_err(|err| CliError::io("log_error", err))?;

    println!(
        "All done!  If everything looks good, please delete the backup file at {}",
        report.paths.backup.display()
    );
    Ok(())
}
