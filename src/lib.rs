//! Zhip-rs: mutable mapping interface to a zip file
//!
//! Keys are entry names inside the archive and values are the raw bytes of each
//! entry. All zip parsing, compression and CRC handling is done by the `zip` crate;
//! this library only translates mapping operations into archive calls and manages
//! the lifetime of the archive handle:
//! - The archive is opened lazily on the first operation
//! - [`ArchiveMap::flush`] commits pending writes and releases the handle
//! - [`ArchiveMap::scope`] and [`ArchiveMap::with_scope`] flush on every exit path
//!
//! # Example
//!
//! ```no_run
//! use zhip_rs::{ArchiveMap, OpenMode};
//!
//! let mut map = ArchiveMap::new("myfile.zip", OpenMode::Append);
//! map.with_scope(|m| {
//!     m.set("x", b"123")?;
//!     assert_eq!(m.get("x")?, b"123");
//!     Ok(())
//! })?;
//!
//! let mut reader = ArchiveMap::new("myfile.zip", OpenMode::Read);
//! for key in reader.keys()? {
//!     println!("{}", key);
//! }
//! # Ok::<(), zhip_rs::error::ZhipError>(())
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod mapping;

pub use archive::{ArchiveMap, ArchiveScope, Items, Keys, Values};
pub use config::{Compression, MapOptions, OpenMode};
pub use error::{Result, ZhipError};
pub use mapping::ByteMapping;
