//! Lazy iterators over archive entries
//!
//! Entry names are listed once when an iterator is created. Contents are read
//! from the archive only as [`Values`] or [`Items`] reach each entry.

use crate::archive::map::ArchiveMap;
use crate::error::Result;
use std::vec;

/// Entry names in archive order
#[derive(Debug, Clone)]
pub struct Keys {
    names: vec::IntoIter<String>,
}

impl Keys {
    pub(crate) fn new(names: Vec<String>) -> Self {
        Self {
            names: names.into_iter(),
        }
    }
}

impl Iterator for Keys {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.names.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.names.size_hint()
    }
}

impl ExactSizeIterator for Keys {}

/// Entry contents in archive order
pub struct Values<'a> {
    map: &'a mut ArchiveMap,
    names: vec::IntoIter<String>,
}

impl<'a> Values<'a> {
    pub(crate) fn new(map: &'a mut ArchiveMap, names: Vec<String>) -> Self {
        Self {
            map,
            names: names.into_iter(),
        }
    }
}

impl Iterator for Values<'_> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.names.next()?;
        Some(self.map.get(&name))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.names.size_hint()
    }
}

/// `(name, contents)` pairs in archive order
pub struct Items<'a> {
    map: &'a mut ArchiveMap,
    names: vec::IntoIter<String>,
}

impl<'a> Items<'a> {
    pub(crate) fn new(map: &'a mut ArchiveMap, names: Vec<String>) -> Self {
        Self {
            map,
            names: names.into_iter(),
        }
    }
}

impl Iterator for Items<'_> {
    type Item = Result<(String, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.names.next()?;
        Some(self.map.get(&name).map(|data| (name, data)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.names.size_hint()
    }
}
