//! The contract every codec satisfies, and how codecs compose.

use crate::decode::Decoder;
use crate::encode::Encoder;
use crate::error::DecodeError;

/// A codec for value type `V`: a decoder, an encoder, and an emission
/// predicate, bundled together and parametric on the value type.
///
/// Composition is static: a codec for `Option<T>` wraps a codec for `T`
/// (`OptionCodec<C>`), a codec for `Vec<T>` wraps a codec for `T`
/// (`VecCodec<C>`), and so on, with no indirection cost for leaf codecs. The
/// object codec is the one place that needs a trait object, since it stores
/// codecs for heterogeneously-typed fields behind a small internal
/// `FieldSlot` interface.
///
/// Implementors must be `Send + Sync`: a built codec is immutable after
/// construction and may be shared across threads for concurrent decode/encode
/// on distinct [`Decoder`]/[`Encoder`] instances without locking.
pub trait Codec<V>: Send + Sync {
    /// Advance `ctx` past one JSON value and return the decoded value. On
    /// malformed input, return `Err` with the byte offset of the failure; the
    /// context's cursor position at that point is otherwise unspecified.
    fn decode(&self, ctx: &mut Decoder) -> Result<V, DecodeError>;

    /// Append the JSON encoding of `value` to `ctx`.
    fn encode(&self, ctx: &mut Encoder, value: &V);

    /// Whether an optional-bearing container (most directly, the object
    /// codec) should emit this value at all. Defaults to `true`; an
    /// optional-like wrapper (e.g. `OptionCodec`) overrides this to suppress
    /// emission of an absent value, and the suppression is transitive
    /// through nested wrappers (a `Box<Option<T>>` asks the `Option` codec,
    /// which asks the inner `T` codec).
    fn should_encode(&self, _value: &V) -> bool {
        true
    }
}
