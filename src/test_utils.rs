use std::io::{self, ErrorKind, Read};

// - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - -
// ErrReader
// - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - -

/// Yields `prefix` one byte at a time, then fails.
pub struct ErrReader {
    prefix: Vec<u8>,
    pos: usize,
}

impl ErrReader {
    pub fn new(prefix: &[u8]) -> Self {
        Self {
            prefix: prefix.to_vec(),
            pos: 0,
        }
    }
}

impl Read for ErrReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(byte) = self.prefix.get(self.pos) {
            buf[0] = *byte;
            self.pos += 1;
            return Ok(1);
        }
        Err(io::Error::new(ErrorKind::Other, "error"))
    }
}

// - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - -
// InfReader
// - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - -

/// Yields `prefix`, then `repeat` forever.
pub struct InfReader {
    it: Box<dyn Iterator<Item = u8>>,
}

impl InfReader {
    pub fn new(prefix: &[u8], repeat: u8) -> Self {
        Self {
            it: Box::new(prefix.to_vec().into_iter().chain(std::iter::repeat(repeat))),
        }
    }
}

impl Read for InfReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let data: Vec<_> = self.it.by_ref().take(buf.len()).collect();
        buf[..data.len()].copy_from_slice(&data);
        Ok(data.len())
    }
}
