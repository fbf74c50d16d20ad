//! Thin top-level convenience entry points built on the default-codec
//! resolver — the minimal `encode`/`decode` wrappers a codec crate needs to
//! be usable without handwriting a schema for every call site.

use alloc::string::String;
use alloc::vec::Vec;

use crate::codec::Codec;
use crate::decode::Decoder;
use crate::default_codec::DefaultCodec;
use crate::encode::Encoder;
use crate::error::DecodeError;

/// Decode `input` as `T` using `T`'s [`DefaultCodec`].
///
/// Skips leading whitespace, decodes one JSON value, then requires only
/// trailing whitespace before the end of input — trailing garbage after the
/// root value is rejected.
pub fn decode_value<T: DefaultCodec>(input: &[u8]) -> Result<T, DecodeError> {
    let codec = T::default_codec();
    let mut ctx = Decoder::new(input);
    ctx.skip_past_whitespace();
    let value = codec.decode(&mut ctx)?;
    ctx.skip_past_whitespace();
    if !ctx.is_at_end() {
        return Err(DecodeError::new("Unexpected input", ctx.offset(0)));
    }
    Ok(value)
}

/// Encode `value` as compact JSON bytes using `T`'s [`DefaultCodec`].
pub fn encode_value<T: DefaultCodec>(value: &T) -> Vec<u8> {
    let codec = T::default_codec();
    let mut ctx = Encoder::new();
    codec.encode(&mut ctx, value);
    ctx.into_vec()
}

/// Encode `value` as a compact JSON `String` using `T`'s [`DefaultCodec`].
#[must_use]
pub fn encode_to_string<T: DefaultCodec>(value: &T) -> String {
    let bytes = encode_value(value);
    // The encoder only ever appends ASCII structural bytes, escaped
    // sequences, and bytes copied verbatim from already-valid `&str`/`String`
    // input; it cannot introduce invalid UTF-8.
    String::from_utf8(bytes).expect("encoder output is always valid UTF-8")
}
