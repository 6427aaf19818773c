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

//! Contains the read and write traits
//!
//! The read and write paths of the driver transfer bytes from and to the buffers of the caller.
//! These traits abstract over those buffers, so that the caller can report a buffer that cannot be
//! accessed as an error.

use core::cmp;
use core::mem;

use crate::errors::{Code, Error};

/// A trait for objects that support byte-oriented reading
pub trait Read {
    /// Read some bytes from this source into the given buffer and returns the number of read bytes
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error>;

    /// Reads exactly as many bytes as available in `buf`
    ///
    /// # Errors
    ///
    /// If any I/O error occurs, [`Err`] will be returned. If less bytes are available, [`Err`] will
    /// be returned with [`EndOfFile`](Code::EndOfFile) as the error code.
    fn read_exact(&mut self, mut buf: &mut [u8]) -> Result<(), Error> {
        while !buf.is_empty() {
            match self.read(buf) {
                Err(e) => return Err(e),
                Ok(0) => break,
                Ok(n) => {
                    let tmp = buf;
                    buf = &mut tmp[n..];
                },
            }
        }

        if !buf.is_empty() {
            Err(Error::new(Code::EndOfFile))
        }
        else {
            Ok(())
        }
    }
}

/// A trait for objects that support byte-oriented writing
pub trait Write {
    /// Writes some bytes of the given buffer to this sink and returns the number of written bytes
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error>;

    /// Writes all bytes of the given buffer to this sink
    ///
    /// # Errors
    ///
    /// If any I/O error occurs, [`Err`] will be returned. If less bytes can be written, [`Err`]
    /// will be returned with [`WriteFailed`](Code::WriteFailed) as the error code.
    fn write_all(&mut self, mut buf: &[u8]) -> Result<(), Error> {
        while !buf.is_empty() {
            match self.write(buf) {
                Err(e) => return Err(e),
                Ok(0) => return Err(Error::new(Code::WriteFailed)),
                Ok(n) => buf = &buf[n..],
            }
        }
        Ok(())
    }
}

impl Read for &[u8] {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let amount = cmp::min(buf.len(), self.len());
        let (a, b) = self.split_at(amount);
        buf[..amount].copy_from_slice(a);
        *self = b;
        Ok(amount)
    }
}

impl Write for &mut [u8] {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        let amount = cmp::min(buf.len(), self.len());
        let (a, b) = mem::take(self).split_at_mut(amount);
        a.copy_from_slice(&buf[..amount]);
        *self = b;
        Ok(amount)
    }
}

impl Write for Vec<u8> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }
}
