//! Error types for particle operations and record decoding.

use std::error::Error;
use std::fmt;
use std::io;

use mote_pool::PoolError;

/// Errors that can occur while manipulating, encoding or decoding particles.
#[derive(Debug)]
pub enum ParticleError {
    /// The property pool rejected an operation.
    Pool(PoolError),
    /// Property access on a particle that holds no property slot.
    NoProperties,
    /// A record could not be decoded (truncated or structurally inconsistent).
    MalformedRecord {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// A record's property count disagrees with the pool's stride.
    PropertyCountMismatch {
        /// Property count found in the record (or supplied by the caller).
        recorded: usize,
        /// Property count required by the target pool or particle.
        expected: usize,
    },
    /// A record carries properties but no pool was supplied to hold them.
    MissingPool {
        /// Property count found in the record.
        recorded: usize,
    },
    /// An I/O error occurred during stream save or load.
    Io(io::Error),
}

impl fmt::Display for ParticleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pool(e) => write!(f, "property pool error: {e}"),
            Self::NoProperties => write!(f, "particle has no property slot"),
            Self::MalformedRecord { detail } => write!(f, "malformed particle record: {detail}"),
            Self::PropertyCountMismatch { recorded, expected } => {
                write!(
                    f,
                    "property count mismatch: record has {recorded}, pool provides {expected}"
                )
            }
            Self::MissingPool { recorded } => {
                write!(
                    f,
                    "record carries {recorded} properties but no property pool was supplied"
                )
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl Error for ParticleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Pool(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PoolError> for ParticleError {
    fn from(e: PoolError) -> Self {
        Self::Pool(e)
    }
}

impl From<io::Error> for ParticleError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
