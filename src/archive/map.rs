use crate::archive::handle::{ArchiveFile, Handle, HandleState};
use crate::archive::iter::{Items, Keys, Values};
use crate::config::{MapOptions, OpenMode};
use crate::error::{Result, ZhipError};
use std::fmt;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::result::ZipError;
use zip::{ZipArchive, ZipWriter};

/// Mutable mapping interface to a zip file
///
/// Keys are entry names, values are the raw bytes of each entry. The archive is
/// opened lazily on the first operation and released by [`flush`](Self::flush);
/// the next operation after a flush opens it again.
///
/// Writing a key that already exists is refused by the zip library and the error
/// is returned as [`ZhipError::Zip`]. Entries cannot be removed.
///
/// Archives written elsewhere may physically hold several entries with the same
/// name. The zip library merges them when it reads the central directory, so
/// [`len`](Self::len) and [`keys`](Self::keys) report each name once and
/// [`get`](Self::get) returns the one the library kept (the last listed).
///
/// # Example
///
/// ```no_run
/// use zhip_rs::{ArchiveMap, OpenMode};
///
/// let mut map = ArchiveMap::new("myfile.zip", OpenMode::Append);
/// map.set("x", b"123")?;
/// assert_eq!(map.get("x")?, b"123");
/// map.flush()?; // write the central directory to disk
/// # Ok::<(), zhip_rs::ZhipError>(())
/// ```
pub struct ArchiveMap {
    path: PathBuf,
    options: MapOptions,
    state: HandleState,
}

impl ArchiveMap {
    /// Create a map over `path` opened in `mode`; no I/O happens until first use
    pub fn new<P: AsRef<Path>>(path: P, mode: OpenMode) -> Self {
        Self::with_options(path, MapOptions::new(mode))
    }

    /// Create a map in the default (append) mode
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::new(path, OpenMode::default())
    }

    /// Create a map with explicit options
    pub fn with_options<P: AsRef<Path>>(path: P, options: MapOptions) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options,
            state: HandleState::Unopened,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.options.mode
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    /// Whether a live handle is currently held
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Open the archive if there is no live handle
    fn ensure_open(&mut self) -> Result<&mut Handle> {
        if !self.state.is_open() {
            let handle = Handle::open(&self.path, self.options.mode)?;
            self.state = HandleState::Open(handle);
        }
        match &mut self.state {
            HandleState::Open(handle) => Ok(handle),
            _ => unreachable!("handle opened above"),
        }
    }

    /// Live handle in its reading shape
    fn reader(&mut self) -> Result<&mut ZipArchive<ArchiveFile>> {
        if !matches!(self.ensure_open()?, Handle::Reading(_)) {
            // A failed conversion leaves the state closed; the next call reopens
            let HandleState::Open(handle) = std::mem::replace(&mut self.state, HandleState::Closed)
            else {
                unreachable!("ensure_open leaves the handle open")
            };
            self.state = HandleState::Open(Handle::Reading(handle.into_reading()?));
        }
        match &mut self.state {
            HandleState::Open(Handle::Reading(archive)) => Ok(archive),
            _ => unreachable!("handle converted to reading above"),
        }
    }

    /// Live handle in its writing shape
    fn writer(&mut self) -> Result<&mut ZipWriter<ArchiveFile>> {
        if !self.options.mode.is_writable() {
            return Err(ZhipError::ReadOnly(self.path.clone()));
        }
        if !matches!(self.ensure_open()?, Handle::Writing(_)) {
            let HandleState::Open(handle) = std::mem::replace(&mut self.state, HandleState::Closed)
            else {
                unreachable!("ensure_open leaves the handle open")
            };
            self.state = HandleState::Open(Handle::Writing(handle.into_writing()?));
        }
        match &mut self.state {
            HandleState::Open(Handle::Writing(writer)) => Ok(writer),
            _ => unreachable!("handle converted to writing above"),
        }
    }

    /// Read the bytes stored under `key`
    pub fn get(&mut self, key: &str) -> Result<Vec<u8>> {
        let archive = self.reader()?;
        let mut entry = match archive.by_name(key) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Err(ZhipError::NotFound(key.to_string())),
            Err(e) => return Err(e.into()),
        };

        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Read the bytes stored under `key`, or `None` if there is no such entry
    pub fn try_get(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.get(key) {
            Ok(data) => Ok(Some(data)),
            Err(ZhipError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Write `value` as a new entry named `key`
    ///
    /// A write refused by the library, such as a duplicate name, can still leave an
    /// orphaned local header in the file; the entry is not listed but the bytes stay.
    pub fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let file_options = self.options.file_options();
        let writer = self.writer()?;
        writer.start_file(key, file_options)?;
        writer.write_all(value)?;
        Ok(())
    }

    /// Write a dynamically typed value
    ///
    /// Only a JSON array of integers in `0..=255` is accepted, which is how serde
    /// represents a byte string. Anything else fails with
    /// [`ZhipError::InvalidValue`] before the archive is touched.
    pub fn set_value(&mut self, key: &str, value: &serde_json::Value) -> Result<()> {
        let bytes = value_to_bytes(value)?;
        self.set(key, &bytes)
    }

    /// Write every pair in order, stopping at the first failure
    pub fn extend<I, K, V>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<[u8]>,
    {
        for (key, value) in pairs {
            self.set(key.as_ref(), value.as_ref())?;
        }
        Ok(())
    }

    /// Entries cannot be removed from a zip archive without rewriting it
    pub fn remove(&mut self, key: &str) -> Result<()> {
        Err(ZhipError::Unsupported(format!(
            "removing entry '{}' from a zip archive",
            key
        )))
    }

    /// Entry names in archive order
    ///
    /// The listing is taken from the live handle each time this is called.
    pub fn keys(&mut self) -> Result<Keys> {
        let names = self.names()?;
        Ok(Keys::new(names))
    }

    /// Same as [`keys`](Self::keys)
    pub fn iter(&mut self) -> Result<Keys> {
        self.keys()
    }

    /// Entry contents in archive order, each read when the iterator reaches it
    pub fn values(&mut self) -> Result<Values<'_>> {
        let names = self.names()?;
        Ok(Values::new(self, names))
    }

    /// `(name, contents)` pairs in archive order, read lazily
    pub fn items(&mut self) -> Result<Items<'_>> {
        let names = self.names()?;
        Ok(Items::new(self, names))
    }

    /// Number of entries listed by the archive
    pub fn len(&mut self) -> Result<usize> {
        Ok(self.reader()?.len())
    }

    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn contains_key(&mut self, key: &str) -> Result<bool> {
        Ok(self.reader()?.index_for_name(key).is_some())
    }

    fn names(&mut self) -> Result<Vec<String>> {
        Ok(self.reader()?.file_names().map(str::to_owned).collect())
    }

    /// Commit pending writes and release the handle
    ///
    /// Does nothing if no handle is open: a map that was never used does not create
    /// its file on flush, so a scope with no operations leaves no archive behind.
    /// The next operation after a flush reopens the archive.
    pub fn flush(&mut self) -> Result<()> {
        let handle = match std::mem::replace(&mut self.state, HandleState::Closed) {
            HandleState::Open(handle) => handle,
            other => {
                self.state = other;
                return Ok(());
            }
        };

        let file = handle.finish()?;
        if self.options.sync_on_flush && self.options.mode.is_writable() {
            file.sync_all()?;
        }

        debug!(path = %self.path.display(), "flushed and closed archive handle");
        Ok(())
    }
}

impl fmt::Debug for ArchiveMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveMap")
            .field("path", &self.path)
            .field("options", &self.options)
            .field("state", &self.state.name())
            .finish()
    }
}

fn value_to_bytes(value: &serde_json::Value) -> Result<Vec<u8>> {
    use serde_json::Value;

    let kind = match value {
        Value::Array(_) => {
            return serde_json::from_value(value.clone()).map_err(|_| {
                ZhipError::InvalidValue("an array that is not a byte sequence".to_string())
            })
        }
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Object(_) => "an object",
    };
    Err(ZhipError::InvalidValue(kind.to_string()))
}
