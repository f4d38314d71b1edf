use crate::config::OpenMode;
use crate::error::Result;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;
use zip::{ZipArchive, ZipWriter};

/// Archive file shared by the reading and writing shapes of a handle
///
/// When an existing archive is reopened for writing, the zip writer leaves its cursor
/// after the old central directory. `rewind` holds the directory start; the next
/// read, write or seek first moves back there so new entries overwrite the stale
/// directory instead of following it.
pub(crate) struct ArchiveFile {
    file: File,
    rewind: Arc<AtomicU64>,
}

const NO_REWIND: u64 = u64::MAX;

impl ArchiveFile {
    fn new(file: File) -> Self {
        Self {
            file,
            rewind: Arc::new(AtomicU64::new(NO_REWIND)),
        }
    }

    fn apply_rewind(&mut self) -> io::Result<()> {
        let offset = self.rewind.swap(NO_REWIND, Ordering::Relaxed);
        if offset != NO_REWIND {
            self.file.seek(SeekFrom::Start(offset))?;
        }
        Ok(())
    }

    fn into_file(self) -> File {
        self.file
    }
}

impl Read for ArchiveFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.apply_rewind()?;
        self.file.read(buf)
    }
}

impl Write for ArchiveFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.apply_rewind()?;
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for ArchiveFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.apply_rewind()?;
        self.file.seek(pos)
    }
}

/// Live archive handle
///
/// The zip library reads through `ZipArchive` and writes through `ZipWriter`, so an
/// open handle is in exactly one of the two shapes and converts on demand.
pub(crate) enum Handle {
    Reading(ZipArchive<ArchiveFile>),
    Writing(ZipWriter<ArchiveFile>),
}

impl Handle {
    /// Open the archive at `path` according to `mode`
    pub(crate) fn open(path: &Path, mode: OpenMode) -> Result<Self> {
        let handle = match mode {
            OpenMode::Read => {
                let file = ArchiveFile::new(File::open(path)?);
                Handle::Reading(ZipArchive::new(file)?)
            }
            OpenMode::Write => {
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)?;
                Handle::Writing(ZipWriter::new(ArchiveFile::new(file)))
            }
            OpenMode::Append => {
                let file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .open(path)?;

                // A freshly created (or empty) file has no central directory to read yet
                if file.metadata()?.len() == 0 {
                    Handle::Writing(ZipWriter::new(ArchiveFile::new(file)))
                } else {
                    Handle::Reading(ZipArchive::new(ArchiveFile::new(file))?)
                }
            }
        };

        debug!(path = %path.display(), %mode, "opened archive handle");
        Ok(handle)
    }

    /// Convert into the reading shape, finalizing the central directory if needed
    ///
    /// The directory written here is overwritten by the next conversion back to writing.
    pub(crate) fn into_reading(self) -> Result<ZipArchive<ArchiveFile>> {
        match self {
            Handle::Reading(archive) => Ok(archive),
            Handle::Writing(writer) => Ok(writer.finish_into_readable()?),
        }
    }

    /// Convert into the writing shape, keeping every entry already listed
    pub(crate) fn into_writing(self) -> Result<ZipWriter<ArchiveFile>> {
        match self {
            Handle::Reading(archive) => {
                let directory_start = archive.central_directory_start();
                let file = archive.into_inner();
                let rewind = Arc::clone(&file.rewind);

                let writer = ZipWriter::new_append(file)?;
                rewind.store(directory_start, Ordering::Relaxed);
                Ok(writer)
            }
            Handle::Writing(writer) => Ok(writer),
        }
    }

    /// Commit buffered writes and hand back the underlying file
    pub(crate) fn finish(self) -> Result<File> {
        let mut file = match self {
            Handle::Reading(archive) => archive.into_inner().into_file(),
            Handle::Writing(writer) => {
                let mut archive_file = writer.finish()?;
                // Drop anything left past the new end of central directory
                let end = archive_file.stream_position()?;
                let file = archive_file.into_file();
                file.set_len(end)?;
                file
            }
        };
        file.flush()?;
        Ok(file)
    }
}

/// Tagged lifecycle of the archive handle
///
/// `Unopened` and `Closed` are equivalent for lazy opening; both lead to a fresh open.
#[derive(Default)]
pub(crate) enum HandleState {
    #[default]
    Unopened,
    Open(Handle),
    Closed,
}

impl HandleState {
    pub(crate) fn is_open(&self) -> bool {
        matches!(self, HandleState::Open(_))
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            HandleState::Unopened => "unopened",
            HandleState::Open(Handle::Reading(_)) => "open (reading)",
            HandleState::Open(Handle::Writing(_)) => "open (writing)",
            HandleState::Closed => "closed",
        }
    }
}
