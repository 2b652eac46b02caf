use crate::error::AsmError;
use crate::memory::MEM_SIZE;

/// Fixed-capacity output image. Its logical length is the highest offset any
/// emission reached; bytes never written read as zero.
#[derive(Debug, Clone)]
pub struct Image {
    buf: Vec<u8>,
    len: usize,
}

impl Default for Image {
    fn default() -> Self {
        Self::new(MEM_SIZE)
    }
}

impl Image {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity],
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.buf.truncate(self.len);
        self.buf
    }

    /// Starts writing at `at`. The image length grows to cover whatever the
    /// cursor writes.
    pub fn cursor(&mut self, at: u32) -> Cursor<'_> {
        Cursor {
            pos: at as usize,
            image: self,
        }
    }

    /// Overwrites a word that a cursor has already emitted.
    pub(crate) fn patch_u32(&mut self, at: u32, val: u32) {
        let at = at as usize;
        debug_assert!(at + 4 <= self.len, "patch outside emitted bytes");
        if let Some(slot) = self.buf.get_mut(at..at + 4) {
            slot.copy_from_slice(&val.to_le_bytes());
        }
    }
}

/// Bounds-checked writer over an [`Image`].
pub struct Cursor<'a> {
    image: &'a mut Image,
    pos: usize,
}

impl Cursor<'_> {
    pub fn pos(&self) -> u32 {
        self.pos as u32
    }

    pub fn remaining(&self) -> usize {
        self.image.capacity().saturating_sub(self.pos)
    }

    fn put(&mut self, bytes: &[u8]) -> Result<(), AsmError> {
        if bytes.len() > self.remaining() {
            return Err(AsmError::Overflow {
                offset: self.pos as u32,
                len: bytes.len() as u32,
                capacity: self.image.capacity(),
            });
        }
        let end = self.pos + bytes.len();
        self.image.buf[self.pos..end].copy_from_slice(bytes);
        self.image.len = self.image.len.max(end);
        self.pos = end;
        Ok(())
    }

    pub fn put_u8(&mut self, val: u8) -> Result<(), AsmError> {
        self.put(&[val])
    }

    pub fn put_u32(&mut self, val: u32) -> Result<(), AsmError> {
        self.put(&val.to_le_bytes())
    }
}
