/*
 * Copyright (C) 2024 Nils Asmussen, Barkhausen Institut
 *
 * This file is part of M3 (Microkernel-based SysteM for Heterogeneous Manycores).
 *
 * M3 is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License version 2 as
 * published by the Free Software Foundation.
 *
 * M3 is distributed in the hope that it will be useful, but
 * WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU
 * General Public License version 2 for more details.
 */

//! Contains the error handling types

use core::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// The error codes
#[derive(Debug, PartialEq, Eq, Clone, Copy, IntoPrimitive, TryFromPrimitive)]
#[repr(u32)]
pub enum Code {
    // success
    Success = 0,
    // argument and state errors
    InvArgs,
    InvState,
    NotFound,
    Exists,
    NotSup,
    // session errors
    Busy,
    OutOfMem,
    Interrupted,
    // I/O errors
    ReadFailed,
    WriteFailed,
    EndOfFile,
    // platform errors
    MapFailed,
    IrqFailed,
    Unspecified,
}

impl Default for Code {
    fn default() -> Self {
        Self::Success
    }
}

impl Code {
    /// Converts the given raw value into a code; unknown values become [`Code::Unspecified`]
    pub fn from_raw(raw: u32) -> Self {
        Self::try_from(raw).unwrap_or(Code::Unspecified)
    }
}

/// The error struct that is passed around
#[derive(Clone, Copy)]
pub struct Error {
    code: Code,
}

impl Error {
    /// Creates a new object for given error code
    pub const fn new(code: Code) -> Self {
        Error { code }
    }

    /// Returns the error code
    pub fn code(&self) -> Code {
        self.code
    }

    /// Returns the error as a negative errno value, as expected by a character-device layer
    pub fn to_errno(&self) -> i32 {
        // values from asm-generic/errno-base.h and errno.h
        match self.code {
            Code::Success => 0,
            Code::InvArgs | Code::InvState => -22,
            Code::NotFound => -2,
            Code::Exists => -17,
            Code::NotSup => -95,
            Code::Busy => -16,
            Code::OutOfMem => -12,
            Code::Interrupted => -4,
            Code::ReadFailed | Code::WriteFailed => -14,
            Code::EndOfFile | Code::MapFailed | Code::IrqFailed | Code::Unspecified => -5,
        }
    }
}

impl From<Code> for Error {
    fn from(code: Code) -> Self {
        Self::new(code)
    }
}

impl From<Error> for Code {
    fn from(err: Error) -> Self {
        err.code()
    }
}

impl From<Code> for Result<(), Error> {
    fn from(code: Code) -> Self {
        match code {
            Code::Success => Ok(()),
            e => Err(Error::new(e)),
        }
    }
}

impl<T> From<Result<T, Error>> for Code {
    fn from(res: Result<T, Error>) -> Self {
        match res {
            Ok(_) => Code::Success,
            Err(e) => e.code(),
        }
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Error) -> bool {
        self.code() == other.code()
    }
}

impl Eq for Error {
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.code())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.code())
    }
}

impl std::error::Error for Error {
}
