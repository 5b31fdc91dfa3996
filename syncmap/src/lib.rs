//! A thread-safe map built on a single reader-writer lock.
//!
//! ```
//! use syncmap::{ConcurrentMap, Error, Map};
//!
//! let map = ConcurrentMap::new();
//! map.set("x", 1);
//! map.set("y", 2);
//! assert_eq!(map.delete(&"x"), Ok(()));
//! assert_eq!(map.get(&"x"), Err(Error::UnknownKey));
//! assert_eq!(map.get(&"y"), Ok(2));
//! assert_eq!(*map.get_ref(&"y").unwrap(), 2);
//! assert_eq!(map.keys(), vec!["y"]);
//! ```

mod error;
pub mod map;

pub use error::{Error, Result};
pub use map::{ConcurrentMap, Map, ValueRef};
