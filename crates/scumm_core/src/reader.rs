use std::io::{self, Read, Seek, SeekFrom};

use crate::block::BlockTag;

pub struct BlockReader<R> {
    inner: R,
}

impl<R: Read + Seek> BlockReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn read_u8(&mut self) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub fn read_u32(&mut self) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    pub fn read_tag(&mut self) -> io::Result<BlockTag> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(BlockTag::new(buf))
    }

    /// Reads exactly `n` bytes. The buffer grows with what the stream
    /// actually yields, so a lying size field cannot force a huge
    /// allocation up front.
    pub fn read_bytes(&mut self, n: u64) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        (&mut self.inner).take(n).read_to_end(&mut buf)?;
        if (buf.len() as u64) < n {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("wanted {n} bytes, stream ended after {}", buf.len()),
            ));
        }
        Ok(buf)
    }

    /// Reads up to and including a zero byte; the terminator is not part of
    /// the result. Bytes are returned as-is since names are not guaranteed
    /// to be in any particular single-byte encoding.
    pub fn read_null_terminated(&mut self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        loop {
            let b = self.read_u8()?;
            if b == 0 {
                return Ok(bytes);
            }
            bytes.push(b);
        }
    }

    pub fn skip(&mut self, n: u64) -> io::Result<()> {
        let delta = i64::try_from(n)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "skip too large"))?;
        self.inner.seek_relative(delta)
    }

    pub fn position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    /// Relative where possible, so short hops stay inside a read buffer.
    pub fn seek_to(&mut self, pos: u64) -> io::Result<()> {
        let here = self.position()?;
        match (i64::try_from(pos), i64::try_from(here)) {
            (Ok(to), Ok(from)) => self.inner.seek_relative(to - from),
            _ => self.inner.seek(SeekFrom::Start(pos)).map(drop),
        }
    }
}
