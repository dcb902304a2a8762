use std::io::{ErrorKind, Read, Seek, SeekFrom};

use crate::error::{Error, Result};

/// Forward-only reader over a seekable byte source.
///
/// The stream length is captured up front so that reads and skips past the
/// end fail before touching the source. Seeking past EOF is legal for most
/// `Seek` implementations, so it cannot be relied on to report truncation.
pub struct ByteReader<R> {
    inner: R,
    position: u64,
    length: u64,
}

impl<R: Read + Seek> ByteReader<R> {
    pub fn new(mut inner: R) -> Result<ByteReader<R>> {
        let position = inner.stream_position()?;
        let length = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(position))?;

        Ok(ByteReader {
            inner,
            position,
            length,
        })
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn remaining(&self) -> u64 {
        self.length.saturating_sub(self.position)
    }

    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        self.ensure(n as u64)?;
        let mut buf = vec![0u8; n];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N as u64)?;
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Advance by `n` bytes without buffering them.
    pub fn skip(&mut self, n: u64) -> Result<()> {
        if n == 0 {
            return Ok(());
        }

        let seek_error = Error::SeekError {
            offset: self.position,
            wanted: n,
            length: self.length,
        };
        if n > self.remaining() {
            return Err(seek_error);
        }
        let delta = i64::try_from(n).map_err(|_| Error::SeekError {
            offset: self.position,
            wanted: n,
            length: self.length,
        })?;

        if let Err(e) = self.inner.seek(SeekFrom::Current(delta)) {
            log::debug!("seek by {} at {} failed: {}", n, self.position, e);
            return Err(seek_error);
        }
        self.position += n;
        Ok(())
    }

    fn ensure(&self, wanted: u64) -> Result<()> {
        if wanted > self.remaining() {
            return Err(Error::TruncatedInput {
                wanted,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        match self.inner.read_exact(buf) {
            Ok(()) => {
                self.position += buf.len() as u64;
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(Error::TruncatedInput {
                wanted: buf.len() as u64,
                available: self.remaining(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}
