//! The encode context: a growable output buffer with small-append
//! primitives, including the trailing-comma trick that makes the object and
//! collection codecs one-pass.

use alloc::vec::Vec;
use core::fmt;

/// Growable byte buffer that an encode invocation appends to. Owned
/// exclusively by the call that created it; never shared across threads.
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    /// Start with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Start with a buffer pre-sized for `capacity` bytes, to avoid
    /// reallocation when the caller has a size estimate.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Append a single byte.
    pub fn append(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Append a byte slice.
    pub fn append_slice(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// If the last emitted byte equals `old`, overwrite it with `new`;
    /// otherwise append `new`. This is the trailing-comma trick: emit `k:v,`
    /// for each field or element, then call `append_or_replace(b',', b'}')`
    /// (or `b']'`) once at the end, turning the trailing separator into the
    /// closing bracket in a single pass with no "is this the first element?"
    /// branch.
    pub fn append_or_replace(&mut self, old: u8, new: u8) {
        if let Some(last) = self.buf.last_mut() {
            if *last == old {
                *last = new;
                return;
            }
        }
        self.buf.push(new);
    }

    /// Append the `Display` rendering of `value` (used by the numeric scalar
    /// codecs, which have no allocation-free `itoa`-style dependency here).
    pub fn append_display(&mut self, value: impl fmt::Display) {
        use fmt::Write as _;

        struct ByteWriter<'a>(&'a mut Vec<u8>);

        impl fmt::Write for ByteWriter<'_> {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.0.extend_from_slice(s.as_bytes());
                Ok(())
            }
        }

        // `Display` impls for primitive numeric types never fail; ignore a
        // theoretical error from a pathological custom `Display`.
        let _ = write!(ByteWriter(&mut self.buf), "{value}");
    }

    /// The encoded bytes so far.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes emitted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether no bytes have been emitted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consume the context, returning the encoded bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}
