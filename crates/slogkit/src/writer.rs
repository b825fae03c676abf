//! Writer implementations

// Standard library
use std::io;
use std::sync::Arc;

// External dependencies
use parking_lot::Mutex;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

// Internal crates
use crate::config::WriterConfig;
use crate::core::LogResult;

#[cfg(feature = "file")]
/// Guards that keep background file writers alive
pub type WriterGuards = Vec<tracing_appender::non_blocking::WorkerGuard>;

#[cfg(not(feature = "file"))]
/// Guards that keep background file writers alive
pub type WriterGuards = Vec<()>;

/// Create a writer from configuration
pub(crate) fn make_writer(config: &WriterConfig) -> LogResult<(BoxMakeWriter, WriterGuards)> {
    #[cfg(feature = "file")]
    let mut guards = Vec::new();

    #[cfg(not(feature = "file"))]
    let guards = Vec::new();

    let writer = match config {
        WriterConfig::Stdout => BoxMakeWriter::new(io::stdout),
        WriterConfig::Stderr => BoxMakeWriter::new(io::stderr),

        #[cfg(feature = "file")]
        WriterConfig::File { path, non_blocking } => {
            let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
            let file_name = path.file_name().ok_or_else(|| {
                crate::core::LogError::Config(format!(
                    "Invalid file path (no filename): '{}'",
                    path.display()
                ))
            })?;
            let appender = tracing_appender::rolling::never(dir, file_name);

            if *non_blocking {
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                guards.push(guard);
                BoxMakeWriter::new(non_blocking)
            } else {
                BoxMakeWriter::new(appender)
            }
        }
    };

    Ok((writer, guards))
}

/// In-memory writer, cloneable, for capturing output in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Written output split into lines
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    /// Discard everything written so far
    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}

impl io::Write for MemoryWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MemoryWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
