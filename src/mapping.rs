//! Mapping protocol for byte-valued stores
//!
//! [`ByteMapping`] is the interface [`ArchiveMap`] exposes; code that only needs
//! key-value access can be written against the trait.

use crate::archive::{ArchiveMap, Items, Keys, Values};
use crate::error::{Result, ZhipError};

/// String keys mapped to byte-sequence values
///
/// Accessors take `&mut self` because a store may open its backing resource lazily.
pub trait ByteMapping {
    type Keys<'a>: Iterator<Item = String>
    where
        Self: 'a;
    type Values<'a>: Iterator<Item = Result<Vec<u8>>>
    where
        Self: 'a;
    type Items<'a>: Iterator<Item = Result<(String, Vec<u8>)>>
    where
        Self: 'a;

    fn get(&mut self, key: &str) -> Result<Vec<u8>>;

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;

    fn keys(&mut self) -> Result<Self::Keys<'_>>;

    fn values(&mut self) -> Result<Self::Values<'_>>;

    fn items(&mut self) -> Result<Self::Items<'_>>;

    fn len(&mut self) -> Result<usize>;

    fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn contains_key(&mut self, key: &str) -> Result<bool> {
        match self.get(key) {
            Ok(_) => Ok(true),
            Err(ZhipError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl ByteMapping for ArchiveMap {
    type Keys<'a> = Keys;
    type Values<'a> = Values<'a>;
    type Items<'a> = Items<'a>;

    fn get(&mut self, key: &str) -> Result<Vec<u8>> {
        ArchiveMap::get(self, key)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<()> {
        ArchiveMap::set(self, key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        ArchiveMap::remove(self, key)
    }

    fn keys(&mut self) -> Result<Keys> {
        ArchiveMap::keys(self)
    }

    fn values(&mut self) -> Result<Values<'_>> {
        ArchiveMap::values(self)
    }

    fn items(&mut self) -> Result<Items<'_>> {
        ArchiveMap::items(self)
    }

    fn len(&mut self) -> Result<usize> {
        ArchiveMap::len(self)
    }

    fn contains_key(&mut self, key: &str) -> Result<bool> {
        ArchiveMap::contains_key(self, key)
    }
}
