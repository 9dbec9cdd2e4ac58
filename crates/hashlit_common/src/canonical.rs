//! Canonical byte encoding of literal keys and values.
//!
//! Every encoded value starts with a one-byte type tag followed by a
//! fixed-width or length-prefixed payload, so the encoding of a value is
//! self-delimiting. Concatenating encodings can therefore never make two
//! different sequences of values produce the same bytes.

/// Type tags written before every canonical payload.
mod tags {
    pub const UNIT: u8 = 0x01;
    pub const INT: u8 = 0x03;
    pub const LONG: u8 = 0x04;
    pub const STRING: u8 = 0x08;
}

/// A value with a canonical, injective byte encoding.
///
/// Two values must produce equal encodings exactly when they are equal. The
/// literal cache relies on this to compare requests by content.
pub trait Canonical {
    /// Appends the canonical encoding of `self` to `out`.
    fn write_canonical(&self, out: &mut Vec<u8>);

    /// Returns the canonical encoding of `self` as a fresh buffer.
    fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_canonical(&mut out);
        out
    }
}

impl<T: Canonical + ?Sized> Canonical for &T {
    fn write_canonical(&self, out: &mut Vec<u8>) {
        (**self).write_canonical(out);
    }
}

impl Canonical for () {
    fn write_canonical(&self, out: &mut Vec<u8>) {
        out.push(tags::UNIT);
    }
}

impl Canonical for i32 {
    fn write_canonical(&self, out: &mut Vec<u8>) {
        out.push(tags::INT);
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Canonical for i64 {
    fn write_canonical(&self, out: &mut Vec<u8>) {
        out.push(tags::LONG);
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl Canonical for str {
    fn write_canonical(&self, out: &mut Vec<u8>) {
        out.push(tags::STRING);
        out.extend_from_slice(&(self.len() as u64).to_le_bytes());
        out.extend_from_slice(self.as_bytes());
    }
}

impl Canonical for String {
    fn write_canonical(&self, out: &mut Vec<u8>) {
        self.as_str().write_canonical(out);
    }
}
