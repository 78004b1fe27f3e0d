use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures while getting a program image into memory.
/// Nothing in the engine is touched when one of these is returned.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("rom file {0:?} not found")]
    NotFound(PathBuf),

    #[error("unable to read rom: {0}")]
    ReadFailure(#[from] io::Error),

    #[error("rom is too large ({size} bytes), at most {max} bytes fit after the program offset")]
    OverSizedImage { size: usize, max: usize },
}

/// Faults raised by a malformed or adversarial program.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum RuntimeFault {
    #[error("call stack overflow")]
    StackOverflow,

    #[error("return with an empty call stack")]
    StackUnderflow,

    #[error("memory access out of range at {0:#06X}")]
    OutOfRangeMemoryAccess(u32),
}
