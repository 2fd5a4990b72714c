//! Errors emitted by the reader and the loader.

use ::std::num::ParseIntError;

use thiserror::Error;

use crate::store::StoreError;

/// Errors emitted while lexing, parsing or persisting a tape
#[derive(Debug, Error)]
pub enum EndfError {
    /// I/O error while opening or reading a tape
    #[error("i/o error: {0}")]
    Io(#[from] ::std::io::Error),
    /// Structural failure: short record, bad MAT/MF/MT identity,
    /// missing or duplicated terminator, data after TEND
    #[error("bad framing: {0}")]
    BadFraming(String),
    /// Failed to parse an integer field
    #[error("bad integer field: {0}")]
    BadInt(#[from] ParseIntError),
    /// Float field not parseable under the ENDF real dialect
    #[error("bad float field: {0:?}")]
    BadFloat(String),
    /// Unexpected enumerant value in a section schema (LNU, LDG, LO)
    #[error("bad schema: {0}")]
    BadSchema(String),
    /// Section layout outside the supported set; callers skip the
    /// section rather than fail
    #[error("not implemented: MF={mf} MT={mt}")]
    NotImplemented {
        /// MF of the skipped section
        mf: i32,
        /// MT of the skipped section
        mt: i32,
    },
    /// NaN found in a cross-section X or Y array
    #[error("NaN in cross-section data: MT={0}")]
    NaNInData(i32),
    /// Persistence failure reported by the store
    #[error("store error: {0}")]
    Db(#[from] StoreError),
    /// Configuration file missing an option or malformed
    #[error("config: {0}")]
    Config(String),
    /// Cooperative cancellation was observed
    #[error("cancelled")]
    Cancelled,
}
