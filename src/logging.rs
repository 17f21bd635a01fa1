//! Run-scoped logging.
//!
//! A [`LogSession`] installs a `tracing` subscriber as the thread default for
//! as long as it lives. Dropping it flushes the sink and restores whatever
//! subscriber was active before, so nothing outlives the run.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::{Directive, ParseError};
use tracing_subscriber::fmt::MakeWriter;

/// Log file written to the current working directory on every run.
pub const LOG_FILE: &str = "toc_fixer.log";

/// Default filter when `RUST_LOG` is not provided.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Target of the per-row change events. Always recorded at INFO, whatever
/// `RUST_LOG` says.
pub const CHANGE_TARGET: &str = "toc_fixer::changes";

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

#[derive(Clone)]
pub struct LogSink(SharedWriter);

pub struct LogSinkWriter(SharedWriter);

impl LogSink {
    fn new(writer: impl Write + Send + 'static) -> Self {
        Self(Arc::new(Mutex::new(Box::new(writer))))
    }

    fn flush(&self) -> io::Result<()> {
        LogSinkWriter(Arc::clone(&self.0)).flush()
    }
}

impl<'a> MakeWriter<'a> for LogSink {
    type Writer = LogSinkWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogSinkWriter(Arc::clone(&self.0))
    }
}

impl Write for LogSinkWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::other("log sink lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .0
            .lock()
            .map_err(|_| io::Error::other("log sink lock poisoned"))?;
        guard.flush()
    }
}

pub struct LogSession {
    sink: LogSink,
    _guard: DefaultGuard,
}

impl LogSession {
    /// Truncates (or creates) `path` and routes all events into it.
    pub fn to_file(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Self::to_writer(BufWriter::new(file))
    }

    pub fn to_writer(writer: impl Write + Send + 'static) -> io::Result<Self> {
        let filter = session_filter(std::env::var("RUST_LOG").ok().as_deref())?;
        let sink = LogSink::new(writer);
        let subscriber = tracing_subscriber::fmt()
            .with_writer(sink.clone())
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        Ok(Self {
            sink,
            _guard: guard,
        })
    }

    pub fn flush(&self) -> io::Result<()> {
        self.sink.flush()
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        let _ = self.sink.flush();
    }
}

/// `RUST_LOG` (or the default level) plus a directive that keeps change
/// events at INFO. The target-specific directive wins over a bare level.
fn session_filter(env: Option<&str>) -> io::Result<EnvFilter> {
    let base = env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let change_directive: Directive = format!("{CHANGE_TARGET}=info")
        .parse()
        .map_err(|err: ParseError| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    Ok(base.add_directive(change_directive))
}
