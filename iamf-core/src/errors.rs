// Symphonia
// Copyright (c) 2019-2024 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `errors` module defines the common error type for the IAMF bitstream codec.

use std::fmt;
use std::io;
use std::result;

/// `IamfError` enumerates every error the bitstream codec can report. Exactly three semantic
/// kinds are exposed by the design: `InvalidArgument`, `ResourceExhausted`, `Internal`. `Io`
/// wraps a failure from the underlying byte source that is not simply an exhausted buffer.
#[derive(Debug)]
pub enum IamfError {
    /// Malformed input: a ULEB128 overrun, a value out of its declared range, a violated
    /// cross-OBU invariant, a stray parameter id, or similar. Terminal for the OBU currently
    /// being parsed.
    InvalidArgument(&'static str),
    /// The reader has fewer bits or bytes available than the operation requires. Non-terminal:
    /// the cursor is left at the position it had on entry to the failing operation.
    ResourceExhausted(&'static str),
    /// A should-not-happen violation of an internal invariant. Always terminal for the whole
    /// sequence.
    Internal(&'static str),
    /// An I/O error occurred while pulling bytes from the underlying source.
    Io(io::Error),
}

impl fmt::Display for IamfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IamfError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            IamfError::ResourceExhausted(msg) => write!(f, "resource exhausted: {}", msg),
            IamfError::Internal(msg) => write!(f, "internal error: {}", msg),
            IamfError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for IamfError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IamfError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for IamfError {
    fn from(err: io::Error) -> IamfError {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => IamfError::ResourceExhausted("unexpected end of source"),
            _ => IamfError::Io(err),
        }
    }
}

pub type IamfResult<T> = result::Result<T, IamfError>;

/// Convenience function to create an invalid-argument error.
pub fn invalid_argument_error<T>(desc: &'static str) -> IamfResult<T> {
    Err(IamfError::InvalidArgument(desc))
}

/// Convenience function to create a resource-exhausted error.
pub fn resource_exhausted_error<T>(desc: &'static str) -> IamfResult<T> {
    Err(IamfError::ResourceExhausted(desc))
}

/// Convenience function to create an internal error.
pub fn internal_error<T>(desc: &'static str) -> IamfResult<T> {
    Err(IamfError::Internal(desc))
}

impl IamfError {
    /// True for errors that a caller may retry after supplying more bytes.
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self, IamfError::ResourceExhausted(_))
    }
}
