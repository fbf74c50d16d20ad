//! Scalar codecs: number, string, bool, array, map, optional, and box.
//!
//! The object codec only ever talks to these through the [`Codec`] trait —
//! a schema-driven codec library needs a baseline set of leaf codecs to
//! register fields against, and that's what lives here.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::codec::Codec;
use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::DecodeError;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Append `s` as a JSON string literal: surrounding quotes, the six
/// short escapes, `\u00XX` for other control characters, and every other
/// byte (including non-ASCII UTF-8 continuation bytes) literally.
pub(crate) fn encode_json_string(ctx: &mut Encoder, s: &str) {
    ctx.append(b'"');
    for &b in s.as_bytes() {
        match b {
            b'"' => ctx.append_slice(b"\\\""),
            b'\\' => ctx.append_slice(b"\\\\"),
            0x08 => ctx.append_slice(b"\\b"),
            0x0C => ctx.append_slice(b"\\f"),
            b'\n' => ctx.append_slice(b"\\n"),
            b'\r' => ctx.append_slice(b"\\r"),
            b'\t' => ctx.append_slice(b"\\t"),
            0x00..=0x1F => {
                ctx.append_slice(b"\\u00");
                ctx.append(HEX_DIGITS[(b >> 4) as usize]);
                ctx.append(HEX_DIGITS[(b & 0x0F) as usize]);
            }
            _ => ctx.append(b),
        }
    }
    ctx.append(b'"');
}

/// Codec for `String`, the target of the default resolution for any string
/// type and the codec the object codec itself uses internally to pre-escape
/// field keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringCodec;

impl Codec<String> for StringCodec {
    fn decode(&self, ctx: &mut Decoder) -> Result<String, DecodeError> {
        ctx.decode_string()
    }

    fn encode(&self, ctx: &mut Encoder, value: &String) {
        encode_json_string(ctx, value);
    }
}

/// Codec for `bool`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolCodec;

impl Codec<bool> for BoolCodec {
    fn decode(&self, ctx: &mut Decoder) -> Result<bool, DecodeError> {
        match ctx.peek() {
            b't' => {
                ctx.advance_past_four(b"true")?;
                Ok(true)
            }
            b'f' => {
                ctx.advance_past(b'f')?;
                ctx.advance_past_four(b"alse")?;
                Ok(false)
            }
            _ => Err(DecodeError::unexpected_input(ctx.offset(0))),
        }
    }

    fn encode(&self, ctx: &mut Encoder, value: &bool) {
        ctx.append_slice(if *value { b"true" } else { b"false" });
    }
}

macro_rules! impl_int_codec {
    ($ty:ty, $codec:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $codec;

        impl Codec<$ty> for $codec {
            fn decode(&self, ctx: &mut Decoder) -> Result<$ty, DecodeError> {
                let offset = ctx.offset(0);
                let span = ctx.scan_number_span()?;
                span.parse::<$ty>()
                    .map_err(|_| DecodeError::number_out_of_range(offset))
            }

            fn encode(&self, ctx: &mut Encoder, value: &$ty) {
                ctx.append_display(*value);
            }
        }
    };
}

impl_int_codec!(i8, I8Codec, "Codec for `i8`.");
impl_int_codec!(i16, I16Codec, "Codec for `i16`.");
impl_int_codec!(i32, I32Codec, "Codec for `i32`.");
impl_int_codec!(i64, I64Codec, "Codec for `i64`.");
impl_int_codec!(u8, U8Codec, "Codec for `u8`.");
impl_int_codec!(u16, U16Codec, "Codec for `u16`.");
impl_int_codec!(u32, U32Codec, "Codec for `u32`.");
impl_int_codec!(u64, U64Codec, "Codec for `u64`.");

macro_rules! impl_float_codec {
    ($ty:ty, $codec:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $codec;

        impl Codec<$ty> for $codec {
            fn decode(&self, ctx: &mut Decoder) -> Result<$ty, DecodeError> {
                let offset = ctx.offset(0);
                let span = ctx.scan_number_span()?;
                span.parse::<$ty>()
                    .map_err(|_| DecodeError::number_out_of_range(offset))
            }

            fn encode(&self, ctx: &mut Encoder, value: &$ty) {
                ctx.append_display(*value);
            }
        }
    };
}

impl_float_codec!(f32, F32Codec, "Codec for `f32`.");
impl_float_codec!(f64, F64Codec, "Codec for `f64`.");

/// Codec for `Option<V>`, wrapping a codec for `V`.
///
/// Decode: a `null` literal decodes to `None`; anything else is delegated to
/// the inner codec. Encode: `None` emits the `null` literal when encoded
/// directly (e.g. inside an array), but [`Codec::should_encode`] returns
/// `false` for `None`, so a field registered with an `Option`-typed codec on
/// the object codec has its key suppressed entirely rather than emitting
/// `"key":null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionCodec<C> {
    inner: C,
}

impl<C> OptionCodec<C> {
    /// Wrap `inner` as the codec for the contained value.
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<V, C: Codec<V>> Codec<Option<V>> for OptionCodec<C> {
    fn decode(&self, ctx: &mut Decoder) -> Result<Option<V>, DecodeError> {
        if ctx.peek() == b'n' {
            ctx.advance_past_four(b"null")?;
            return Ok(None);
        }
        Ok(Some(self.inner.decode(ctx)?))
    }

    fn encode(&self, ctx: &mut Encoder, value: &Option<V>) {
        match value {
            Some(v) => self.inner.encode(ctx, v),
            None => ctx.append_slice(b"null"),
        }
    }

    fn should_encode(&self, value: &Option<V>) -> bool {
        match value {
            Some(v) => self.inner.should_encode(v),
            None => false,
        }
    }
}

/// Codec for `Vec<V>` (JSON array), wrapping a codec for the element type.
#[derive(Debug, Clone, Copy, Default)]
pub struct VecCodec<C> {
    inner: C,
}

impl<C> VecCodec<C> {
    /// Wrap `inner` as the codec for each element.
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<V, C: Codec<V>> Codec<Vec<V>> for VecCodec<C> {
    fn decode(&self, ctx: &mut Decoder) -> Result<Vec<V>, DecodeError> {
        let mut out = Vec::new();
        ctx.advance_past_comma_separated(b'[', b']', |ctx| {
            let v = self.inner.decode(ctx)?;
            out.push(v);
            Ok(())
        })?;
        Ok(out)
    }

    fn encode(&self, ctx: &mut Encoder, value: &Vec<V>) {
        ctx.append(b'[');
        for v in value {
            if self.inner.should_encode(v) {
                self.inner.encode(ctx, v);
                ctx.append(b',');
            }
        }
        ctx.append_or_replace(b',', b']');
    }
}

/// Codec for `BTreeMap<String, V>` (JSON object as a string-keyed map),
/// wrapping a codec for the value type.
///
/// A `BTreeMap` rather than a hash map: the crate is `#![no_std]` plus
/// `alloc`, and pulling in a hasher crate for this one map type isn't
/// otherwise justified.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapCodec<C> {
    inner: C,
}

impl<C> MapCodec<C> {
    /// Wrap `inner` as the codec for each value.
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<V, C: Codec<V>> Codec<BTreeMap<String, V>> for MapCodec<C> {
    fn decode(&self, ctx: &mut Decoder) -> Result<BTreeMap<String, V>, DecodeError> {
        let mut out = BTreeMap::new();
        ctx.advance_past_comma_separated(b'{', b'}', |ctx| {
            let key = ctx.decode_string()?;
            ctx.skip_past_whitespace();
            ctx.advance_past(b':')?;
            ctx.skip_past_whitespace();
            let v = self.inner.decode(ctx)?;
            out.insert(key, v);
            Ok(())
        })?;
        Ok(out)
    }

    fn encode(&self, ctx: &mut Encoder, value: &BTreeMap<String, V>) {
        ctx.append(b'{');
        for (k, v) in value {
            if self.inner.should_encode(v) {
                encode_json_string(ctx, k);
                ctx.append(b':');
                self.inner.encode(ctx, v);
                ctx.append(b',');
            }
        }
        ctx.append_or_replace(b',', b'}');
    }
}

/// Codec for `Box<V>`, wrapping a codec for the pointee and delegating
/// every operation straight through — a smart pointer changes storage, not
/// wire shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxCodec<C> {
    inner: C,
}

impl<C> BoxCodec<C> {
    /// Wrap `inner` as the codec for the boxed value.
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<V, C: Codec<V>> Codec<Box<V>> for BoxCodec<C> {
    fn decode(&self, ctx: &mut Decoder) -> Result<Box<V>, DecodeError> {
        Ok(Box::new(self.inner.decode(ctx)?))
    }

    fn encode(&self, ctx: &mut Encoder, value: &Box<V>) {
        self.inner.encode(ctx, value);
    }

    fn should_encode(&self, value: &Box<V>) -> bool {
        self.inner.should_encode(value)
    }
}
