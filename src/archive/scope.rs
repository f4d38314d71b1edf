//! Scoped acquisition of an archive map
//!
//! Every exit from a scope flushes the map: normal completion, an early return
//! with an error, or unwinding from a panic.

use crate::archive::map::ArchiveMap;
use crate::error::Result;
use std::ops::{Deref, DerefMut};
use tracing::warn;

/// Guard that flushes the map when dropped
///
/// Use [`close`](Self::close) to observe the flush result; a flush failure during
/// drop can only be logged.
///
/// Flushing only commits a handle that is open. A scope in which no operation ran
/// never opens the archive, so it does not create an empty file.
pub struct ArchiveScope<'a> {
    map: &'a mut ArchiveMap,
    closed: bool,
}

impl<'a> ArchiveScope<'a> {
    pub(crate) fn new(map: &'a mut ArchiveMap) -> Self {
        Self { map, closed: false }
    }

    /// Leave the scope, flushing the map and reporting any failure
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.map.flush()
    }
}

impl Deref for ArchiveScope<'_> {
    type Target = ArchiveMap;

    fn deref(&self) -> &ArchiveMap {
        self.map
    }
}

impl DerefMut for ArchiveScope<'_> {
    fn deref_mut(&mut self) -> &mut ArchiveMap {
        self.map
    }
}

impl Drop for ArchiveScope<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.map.flush() {
            warn!(path = %self.map.path().display(), error = %e, "flush on scope exit failed");
        }
    }
}

impl ArchiveMap {
    /// Enter a scope that flushes this map when it ends
    ///
    /// ```no_run
    /// use zhip_rs::ArchiveMap;
    ///
    /// let mut map = ArchiveMap::open("scoped.zip");
    /// {
    ///     let mut scope = map.scope();
    ///     scope.set("x", b"1")?;
    /// } // flushed here
    /// # Ok::<(), zhip_rs::ZhipError>(())
    /// ```
    pub fn scope(&mut self) -> ArchiveScope<'_> {
        ArchiveScope::new(self)
    }

    /// Run `f` inside a scope
    ///
    /// The map is flushed after `f` returns, whether it succeeded or not. An error
    /// from `f` takes precedence over a flush error.
    pub fn with_scope<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut ArchiveMap) -> Result<T>,
    {
        let mut scope = self.scope();
        let outcome = f(&mut *scope);
        let flushed = scope.close();

        match (outcome, flushed) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(flush_err)) => Err(flush_err),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(flush_err)) => {
                warn!(error = %flush_err, "flush after failed scope also failed");
                Err(e)
            }
        }
    }
}
