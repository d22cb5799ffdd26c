// Output file that is only created once something is written to it

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writer that defers creating its file until the first non-empty write.
///
/// A `LazyFile` that never receives bytes leaves the file system untouched.
/// Writes are buffered; `close` flushes and may be called any number of
/// times, and dropping the writer flushes as well.
#[derive(Debug)]
pub struct LazyFile {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl LazyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the destination file has been created
    pub fn is_created(&self) -> bool {
        self.writer.is_some()
    }

    /// Flush buffered bytes and release the file handle
    pub fn close(&mut self) -> io::Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            tracing::debug!(path = %self.path.display(), "closed output file");
        }
        Ok(())
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        if self.writer.is_none() {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = File::create(&self.path)?;
            tracing::debug!(path = %self.path.display(), "created output file");
            self.writer = Some(BufWriter::new(file));
        }
        match self.writer.as_mut() {
            Some(writer) => Ok(writer),
            None => Err(io::Error::new(io::ErrorKind::Other, "output file not open")),
        }
    }
}

impl Write for LazyFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.writer()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for LazyFile {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to flush output file");
        }
    }
}
