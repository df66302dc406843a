use parking_lot::{Mutex, MutexGuard};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Size-capped log file with numbered generations.
///
/// `{stem}_0.log` is always the live file. When a write would push it past
/// `max_bytes`, every generation shifts up by one, the oldest is dropped,
/// and a fresh `{stem}_0.log` is started.
#[derive(Clone)]
pub struct RotatingFile {
    state: Arc<Mutex<RotationState>>,
}

struct RotationState {
    directory: PathBuf,
    stem: String,
    max_bytes: u64,
    generations: usize,
    file: File,
    written: u64,
}

impl RotatingFile {
    /// Open (appending to) generation 0 in `directory`.
    pub fn open(
        directory: &Path,
        stem: &str,
        max_bytes: u64,
        generations: usize,
    ) -> io::Result<Self> {
        std::fs::create_dir_all(directory)?;
        let path = generation_path(directory, stem, 0);
        let file = open_append(&path)?;
        let written = file.metadata()?.len();

        Ok(Self {
            state: Arc::new(Mutex::new(RotationState {
                directory: directory.to_path_buf(),
                stem: stem.to_string(),
                max_bytes,
                generations: generations.max(1),
                file,
                written,
            })),
        })
    }

    pub fn current_path(&self) -> PathBuf {
        let state = self.state.lock();
        generation_path(&state.directory, &state.stem, 0)
    }
}

pub fn generation_path(directory: &Path, stem: &str, generation: usize) -> PathBuf {
    directory.join(format!("{stem}_{generation}.log"))
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

impl RotationState {
    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        let oldest = generation_path(&self.directory, &self.stem, self.generations - 1);
        if oldest.exists() {
            std::fs::remove_file(&oldest)?;
        }
        for generation in (0..self.generations - 1).rev() {
            let from = generation_path(&self.directory, &self.stem, generation);
            if from.exists() {
                let to = generation_path(&self.directory, &self.stem, generation + 1);
                std::fs::rename(&from, &to)?;
            }
        }

        // A single generation means truncate in place.
        let current = generation_path(&self.directory, &self.stem, 0);
        self.file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&current)?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RotationState {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

pub struct RotatingFileGuard<'a>(MutexGuard<'a, RotationState>);

impl Write for RotatingFileGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for RotatingFile {
    type Writer = RotatingFileGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingFileGuard(self.state.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_line(file: &RotatingFile, line: &str) {
        let mut w = file.make_writer();
        w.write_all(line.as_bytes()).unwrap();
        w.flush().unwrap();
    }

    #[test]
    fn test_appends_to_existing_generation() {
        let dir = tempdir().unwrap();
        fs::write(generation_path(dir.path(), "fm", 0), "old\n").unwrap();

        let file = RotatingFile::open(dir.path(), "fm", 1024, 3).unwrap();
        write_line(&file, "new\n");

        let content = fs::read_to_string(file.current_path()).unwrap();
        assert_eq!(content, "old\nnew\n");
    }

    #[test]
    fn test_rotates_when_size_exceeded() {
        let dir = tempdir().unwrap();
        let file = RotatingFile::open(dir.path(), "fm", 10, 3).unwrap();

        write_line(&file, "aaaaaaaa\n");
        write_line(&file, "bbbbbbbb\n");

        assert_eq!(
            fs::read_to_string(generation_path(dir.path(), "fm", 0)).unwrap(),
            "bbbbbbbb\n"
        );
        assert_eq!(
            fs::read_to_string(generation_path(dir.path(), "fm", 1)).unwrap(),
            "aaaaaaaa\n"
        );
    }

    #[test]
    fn test_oldest_generation_is_dropped() {
        let dir = tempdir().unwrap();
        let file = RotatingFile::open(dir.path(), "fm", 4, 2).unwrap();

        write_line(&file, "one\n");
        write_line(&file, "two\n");
        write_line(&file, "three\n");

        assert_eq!(
            fs::read_to_string(generation_path(dir.path(), "fm", 0)).unwrap(),
            "three\n"
        );
        assert_eq!(
            fs::read_to_string(generation_path(dir.path(), "fm", 1)).unwrap(),
            "two\n"
        );
        assert!(!generation_path(dir.path(), "fm", 2).exists());
    }

    #[test]
    fn test_oversized_line_still_written() {
        let dir = tempdir().unwrap();
        let file = RotatingFile::open(dir.path(), "fm", 4, 2).unwrap();

        write_line(&file, "much longer than four bytes\n");

        assert_eq!(
            fs::read_to_string(file.current_path()).unwrap(),
            "much longer than four bytes\n"
        );
    }
}
