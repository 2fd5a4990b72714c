#![allow(non_snake_case)]
#![deny(missing_docs)]

//! endfdb - reading ENDF-6 tapes and loading them into a relational
//! store
//!
//! A tape is a fixed-column record stream: 66 columns of content plus
//! the MAT/MF/MT identity and an optional sequence number on every
//! line. [`Tape::read_from`] drives a peek-based state machine over
//! the records; [`Persister`] walks the parsed tree into any [`Store`]
//! implementation, and [`Loader`] ties discovery, parsing and
//! persistence together for a whole library directory.

pub mod error;
pub mod util;
pub use error::*;
pub use util::*;

pub mod cancel;
pub mod reader;
pub mod record;
pub mod section;
pub mod tabular;
pub mod tape;

pub use cancel::*;
pub use reader::*;
pub use record::*;
pub use section::*;
pub use tabular::*;
pub use tape::*;

pub mod config;
pub mod idpool;
pub mod memory;
pub mod persist;
pub mod store;
pub mod walker;

pub use config::*;
pub use idpool::*;
pub use memory::*;
pub use persist::*;
pub use store::*;
pub use walker::*;
