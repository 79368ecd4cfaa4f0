use std::io::{self, Read, Seek, SeekFrom};

/// First tag byte of every SCUMM v5 resource file, before encryption.
pub const MAGIC_FIRST_BYTE: u8 = b'L';

/// Derives the stream-wide XOR key from the raw first byte of the file.
pub fn key_from_first_byte(raw: u8) -> u8 {
    raw ^ MAGIC_FIRST_BYTE
}

pub fn xor_in_place(bytes: &mut [u8], key: u8) {
    if key == 0 {
        return;
    }
    for b in bytes {
        *b ^= key;
    }
}

/// Read/seek adapter that undoes the single-byte XOR applied to the whole
/// file. Positions are those of the underlying stream; XOR does not depend
/// on position, so seeking needs no translation.
#[derive(Debug)]
pub struct DecryptingStream<R> {
    inner: R,
    key: u8,
}

impl<R> DecryptingStream<R> {
    pub fn new(inner: R, key: u8) -> Self {
        Self { inner, key }
    }

    pub fn key(&self) -> u8 {
        self.key
    }
}

impl<R: Read> Read for DecryptingStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        xor_in_place(&mut buf[..n], self.key);
        Ok(n)
    }
}

impl<R: Seek> Seek for DecryptingStream<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }

    // Forwarded so a buffered inner reader keeps its buffer; the default
    // impls go through `seek`, which discards it.
    fn stream_position(&mut self) -> io::Result<u64> {
        self.inner.stream_position()
    }

    fn seek_relative(&mut self, offset: i64) -> io::Result<()> {
        self.inner.seek_relative(offset)
    }
}
