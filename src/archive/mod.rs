mod handle;
mod iter;
mod map;
mod scope;

pub use iter::{Items, Keys, Values};
pub use map::ArchiveMap;
pub use scope::ArchiveScope;
