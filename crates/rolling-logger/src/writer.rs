//! Size-capped log files.
//!
//! `<app>.log` is the live file. When a record would push it past the cap,
//! files shift up (`<app>.log` → `<app>.1.log` → `<app>.2.log` ...) and the
//! oldest beyond `max_files` is removed.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

use crate::buffer::LineBuffer;

/// Path of the `index`-th log file (0 = live file)
pub fn log_file_path(dir: &Path, app_name: &str, index: usize) -> PathBuf {
    if index == 0 {
        dir.join(format!("{}.log", app_name))
    } else {
        dir.join(format!("{}.{}.log", app_name, index))
    }
}

struct RollingState {
    dir: PathBuf,
    app_name: String,
    max_bytes: u64,
    max_files: usize,
    file: File,
    written: u64,
}

impl RollingState {
    fn write_record(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.written += buf.len() as u64;
        Ok(())
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.max_files > 1 {
            let oldest = log_file_path(&self.dir, &self.app_name, self.max_files - 1);
            if oldest.exists() {
                fs::remove_file(&oldest)?;
            }
            for index in (1..self.max_files).rev() {
                let from = log_file_path(&self.dir, &self.app_name, index - 1);
                if from.exists() {
                    fs::rename(&from, log_file_path(&self.dir, &self.app_name, index))?;
                }
            }
        }

        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path(&self.dir, &self.app_name, 0))?;
        self.written = 0;
        Ok(())
    }
}

/// Rolling file sink; also mirrors every line into a [`LineBuffer`]
#[derive(Clone)]
pub struct RollingFileWriter {
    state: Arc<Mutex<RollingState>>,
    recent: Arc<LineBuffer>,
}

impl RollingFileWriter {
    pub fn open(
        dir: &Path,
        app_name: &str,
        max_bytes: u64,
        max_files: usize,
        recent: Arc<LineBuffer>,
    ) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let path = log_file_path(dir, app_name, 0);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        Ok(Self {
            state: Arc::new(Mutex::new(RollingState {
                dir: dir.to_path_buf(),
                app_name: app_name.to_string(),
                max_bytes,
                max_files: max_files.max(1),
                file,
                written,
            })),
            recent,
        })
    }

    pub fn current_path(&self) -> PathBuf {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        log_file_path(&state.dir, &state.app_name, 0)
    }
}

impl Write for RollingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.write_record(buf)?;
        self.recent.push_chunk(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.file.flush()
    }
}

impl<'a> MakeWriter<'a> for RollingFileWriter {
    type Writer = RollingFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer(dir: &Path, max_bytes: u64, max_files: usize) -> (RollingFileWriter, Arc<LineBuffer>) {
        let recent = Arc::new(LineBuffer::new(16));
        let writer = RollingFileWriter::open(dir, "App", max_bytes, max_files, recent.clone()).unwrap();
        (writer, recent)
    }

    #[test]
    fn test_file_names() {
        let dir = Path::new("/logs");
        assert_eq!(log_file_path(dir, "App", 0), PathBuf::from("/logs/App.log"));
        assert_eq!(log_file_path(dir, "App", 2), PathBuf::from("/logs/App.2.log"));
    }

    #[test]
    fn test_writes_and_mirrors_lines() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut w, recent) = writer(tmp.path(), 1024, 3);
        w.write_all(b"hello\n").unwrap();
        w.flush().unwrap();

        assert_eq!(fs::read_to_string(w.current_path()).unwrap(), "hello\n");
        assert_eq!(recent.snapshot(), vec!["hello"]);
    }

    #[test]
    fn test_rotates_past_cap() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut w, _) = writer(tmp.path(), 10, 3);
        w.write_all(b"0123456789").unwrap();
        w.write_all(b"abc\n").unwrap();
        w.flush().unwrap();

        assert_eq!(fs::read_to_string(log_file_path(tmp.path(), "App", 0)).unwrap(), "abc\n");
        assert_eq!(fs::read_to_string(log_file_path(tmp.path(), "App", 1)).unwrap(), "0123456789");
    }

    #[test]
    fn test_keeps_at_most_max_files() {
        let tmp = tempfile::tempdir().unwrap();
        let (mut w, _) = writer(tmp.path(), 4, 2);
        for record in [b"aaaa", b"bbbb", b"cccc"] {
            w.write_all(record).unwrap();
        }
        w.flush().unwrap();

        assert_eq!(fs::read_to_string(log_file_path(tmp.path(), "App", 0)).unwrap(), "cccc");
        assert_eq!(fs::read_to_string(log_file_path(tmp.path(), "App", 1)).unwrap(), "bbbb");
        assert!(!log_file_path(tmp.path(), "App", 2).exists());
    }

    #[test]
    fn test_reopen_appends() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let (mut w, _) = writer(tmp.path(), 1024, 2);
            w.write_all(b"one\n").unwrap();
        }
        let (mut w, _) = writer(tmp.path(), 1024, 2);
        w.write_all(b"two\n").unwrap();
        w.flush().unwrap();
        assert_eq!(fs::read_to_string(w.current_path()).unwrap(), "one\ntwo\n");
    }
}
