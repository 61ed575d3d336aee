/// An append-only byte buffer for assembling string literals.
///
/// `Vec<u8>`'s amortized-doubling growth is all a buffer that's filled
/// one byte at a time while scanning a string literal needs, so this is a
/// thin wrapper rather than a hand-rolled growth scheme.
#[derive(Debug, Default)]
pub struct GrowBuffer {
    bytes: Vec<u8>,
}

impl GrowBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Consume the buffer, returning its contents. Never re-scanned by the
    /// caller afterward.
    pub fn finalize(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_in_order() {
        let mut buf = GrowBuffer::new();
        for b in b"hello" {
            buf.append(*b);
        }
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.finalize(), b"hello".to_vec());
    }

    #[test]
    fn empty_buffer_finalizes_to_empty_vec() {
        let buf = GrowBuffer::new();
        assert!(buf.is_empty());
        assert_eq!(buf.finalize(), Vec::<u8>::new());
    }
}
