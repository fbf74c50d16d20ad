//! The object codec: schema builder and driver for decoding a JSON object
//! into a user-defined record and encoding it back.
//!
//! This is the centerpiece of the crate. Everything else — the scanner, the
//! codec protocol, the scalar codecs — exists to support what happens here:
//! field dispatch by JSON key, required/optional tracking via a bitset,
//! unknown-field skipping, pre-escaped key emission, and construction of the
//! target value.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::codec::Codec;
use crate::decode::Decoder;
use crate::default_codec::DefaultCodec;
use crate::encode::Encoder;
use crate::error::DecodeError;
use crate::scalar::StringCodec;

/// A schema may register at most this many required fields. The
/// required-field dedup bitset is a single stack-allocated `u64`; this is a
/// pragmatic design limit that matches realistic schemas rather than a
/// correctness boundary.
pub const MAX_REQUIRED_FIELDS: usize = 64;

/// How a field reads and writes its value on the target record `T`.
///
/// A field can be wired up as direct member access, a getter/setter pair, or
/// a reader/writer closure pair. In Rust, a method pointer and a closure of
/// the same shape are the same type (`Box<dyn Fn(..)>`), so "getter/setter"
/// and "reader/writer closures" collapse into one variant here (see
/// `DESIGN.md`). A no-storage dummy field has no `Access` variant at all: it
/// is modeled as its own `DummyField` type in this module, since it alone
/// needs a `V: Default` bound that the storage-bearing variants don't.
pub enum Access<T, V> {
    /// Borrow the field directly: `get` returns `&V`, `get_mut` returns
    /// `&mut V`. The natural shape for a plain struct field.
    Direct {
        /// Borrow the field immutably, for encode.
        get: Box<dyn Fn(&T) -> &V + Send + Sync>,
        /// Borrow the field mutably, for decode.
        get_mut: Box<dyn Fn(&mut T) -> &mut V + Send + Sync>,
    },
    /// Read and write the field by value, through a getter/setter (or
    /// reader/writer closure) pair. The natural shape for a computed or
    /// validated field that has no single storage location to borrow.
    ByValue {
        /// Produce the current value, for encode.
        get: Box<dyn Fn(&T) -> V + Send + Sync>,
        /// Consume a decoded value, for decode.
        set: Box<dyn Fn(&mut T, V) + Send + Sync>,
    },
}

impl<T, V> Access<T, V> {
    /// Build a [`Access::Direct`] accessor from a pair of borrowing closures.
    pub fn direct(
        get: impl Fn(&T) -> &V + Send + Sync + 'static,
        get_mut: impl Fn(&mut T) -> &mut V + Send + Sync + 'static,
    ) -> Self {
        Access::Direct {
            get: Box::new(get),
            get_mut: Box::new(get_mut),
        }
    }

    /// Build a [`Access::ByValue`] accessor from a getter/setter (or
    /// reader/writer closure) pair.
    pub fn by_value(
        get: impl Fn(&T) -> V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Self {
        Access::ByValue {
            get: Box::new(get),
            set: Box::new(set),
        }
    }
}

/// Type-erased interface the object codec drives per field, hiding each
/// field's distinct value type `V` and child codec type `C` behind a common
/// vtable. Every concrete field (storage-bearing or dummy) implements this
/// for a fixed record type `T`.
trait FieldSlot<T>: Send + Sync {
    /// The pre-escaped `"key":` bytes, cached at registration.
    fn key_with_colon(&self) -> &[u8];

    /// The dense bitset index assigned to this field if it is required, or
    /// `None` if it is optional.
    fn required_bit(&self) -> Option<usize>;

    /// Decode this field's JSON value (the cursor is positioned just past
    /// the `:`, with leading whitespace already skipped) and write it into
    /// `target` via this field's access strategy.
    fn decode_into(&self, ctx: &mut Decoder, target: &mut T) -> Result<(), DecodeError>;

    /// Read this field's current value out of `target` and, if
    /// `should_encode` allows it, append `"key":value,` to `ctx`.
    fn encode_from(&self, ctx: &mut Encoder, target: &T);
}

/// A field with real storage on `T`: either a direct field borrow or a
/// getter/setter pair, paired with a child codec for its value type.
struct Field<T, V, C> {
    key_with_colon: Vec<u8>,
    required_bit: Option<usize>,
    access: Access<T, V>,
    codec: C,
}

impl<T, V, C: Codec<V>> FieldSlot<T> for Field<T, V, C> {
    fn key_with_colon(&self) -> &[u8] {
        &self.key_with_colon
    }

    fn required_bit(&self) -> Option<usize> {
        self.required_bit
    }

    fn decode_into(&self, ctx: &mut Decoder, target: &mut T) -> Result<(), DecodeError> {
        let value = self.codec.decode(ctx)?;
        match &self.access {
            Access::Direct { get_mut, .. } => *get_mut(target) = value,
            Access::ByValue { set, .. } => set(target, value),
        }
        Ok(())
    }

    fn encode_from(&self, ctx: &mut Encoder, target: &T) {
        match &self.access {
            Access::Direct { get, .. } => {
                let value = get(target);
                if self.codec.should_encode(value) {
                    ctx.append_slice(&self.key_with_colon);
                    self.codec.encode(ctx, value);
                    ctx.append(b',');
                }
            }
            Access::ByValue { get, .. } => {
                let value = get(target);
                if self.codec.should_encode(&value) {
                    ctx.append_slice(&self.key_with_colon);
                    self.codec.encode(ctx, &value);
                    ctx.append(b',');
                }
            }
        }
    }
}

/// A field with no storage in the target record: decode parses the value
/// through the child codec and discards it, encode emits a fresh
/// `V::default()` (subject to `should_encode`, so a dummy wrapping an
/// optional-like codec can still suppress its own key).
struct DummyField<V, C> {
    key_with_colon: Vec<u8>,
    required_bit: Option<usize>,
    codec: C,
    _value: core::marker::PhantomData<fn() -> V>,
}

impl<T, V: Default, C: Codec<V>> FieldSlot<T> for DummyField<V, C> {
    fn key_with_colon(&self) -> &[u8] {
        &self.key_with_colon
    }

    fn required_bit(&self) -> Option<usize> {
        self.required_bit
    }

    fn decode_into(&self, ctx: &mut Decoder, _target: &mut T) -> Result<(), DecodeError> {
        self.codec.decode(ctx)?;
        Ok(())
    }

    fn encode_from(&self, ctx: &mut Encoder, _target: &T) {
        let value = V::default();
        if self.codec.should_encode(&value) {
            ctx.append_slice(&self.key_with_colon);
            self.codec.encode(ctx, &value);
            ctx.append(b',');
        }
    }
}

fn escaped_key_with_colon(key: &str) -> Vec<u8> {
    let mut enc = Encoder::with_capacity(key.len() + 3);
    StringCodec.encode(&mut enc, &alloc::string::String::from(key));
    enc.append(b':');
    enc.into_vec()
}

/// Builder for an [`ObjectCodec<T>`]. Fields are registered in the order
/// they should be encoded; decode dispatches by JSON key regardless of
/// registration order.
pub struct ObjectCodecBuilder<T> {
    constructor: Box<dyn Fn() -> T + Send + Sync>,
    fields: Vec<Box<dyn FieldSlot<T>>>,
    key_index: BTreeMap<Vec<u8>, usize>,
    num_required: usize,
}

impl<T: Default + 'static> ObjectCodecBuilder<T> {
    /// Start a builder for a default-constructible target type. Decode
    /// default-constructs `T` before populating fields.
    #[must_use]
    pub fn new() -> Self {
        Self::with_factory(T::default)
    }
}

impl<T: Default + 'static> Default for ObjectCodecBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ObjectCodecBuilder<T> {
    /// Start a builder for a target type that is constructed via `factory`
    /// rather than `Default::default`. Use this when `T` has no meaningful
    /// default value — the choice between this and [`ObjectCodecBuilder::new`]
    /// is made once, at schema-build time, by which constructor you call;
    /// there is no runtime "is this type constructible" check because the
    /// type system enforces it at compile time instead.
    pub fn with_factory(factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            constructor: Box::new(factory),
            fields: Vec::new(),
            key_index: BTreeMap::new(),
            num_required: 0,
        }
    }

    /// Insert an already-built field under `key`. The caller is responsible
    /// for having already checked `key` isn't a duplicate registration (via
    /// [`Self::required_bit`] and the `key_index` lookup) — this only
    /// records it.
    fn push_field(&mut self, key: &str, field: Box<dyn FieldSlot<T>>) {
        let idx = self.fields.len();
        self.key_index.insert(key.as_bytes().to_vec(), idx);
        self.fields.push(field);
    }

    /// Assign the next dense bit index for a required field, or `None` for
    /// an optional one. Panics if registering this field would exceed
    /// [`MAX_REQUIRED_FIELDS`].
    fn required_bit(&mut self, required: bool) -> Option<usize> {
        if !required {
            return None;
        }
        assert!(
            self.num_required < MAX_REQUIRED_FIELDS,
            "object codec schema registers more than {MAX_REQUIRED_FIELDS} required fields"
        );
        let bit = self.num_required;
        self.num_required += 1;
        Some(bit)
    }

    /// Register a required field with an explicit child codec.
    pub fn required<V: 'static, C: Codec<V> + 'static>(
        &mut self,
        key: &str,
        access: Access<T, V>,
        codec: C,
    ) -> &mut Self {
        self.register(key, true, access, codec)
    }

    /// Register an optional field with an explicit child codec.
    pub fn optional<V: 'static, C: Codec<V> + 'static>(
        &mut self,
        key: &str,
        access: Access<T, V>,
        codec: C,
    ) -> &mut Self {
        self.register(key, false, access, codec)
    }

    /// Register a required field, resolving its child codec from `V`'s
    /// [`DefaultCodec`] impl rather than taking one explicitly.
    pub fn required_default<V: DefaultCodec + 'static>(
        &mut self,
        key: &str,
        access: Access<T, V>,
    ) -> &mut Self {
        self.register(key, true, access, V::default_codec())
    }

    /// Register an optional field, resolving its child codec from `V`'s
    /// [`DefaultCodec`] impl rather than taking one explicitly.
    pub fn optional_default<V: DefaultCodec + 'static>(
        &mut self,
        key: &str,
        access: Access<T, V>,
    ) -> &mut Self {
        self.register(key, false, access, V::default_codec())
    }

    fn register<V: 'static, C: Codec<V> + 'static>(
        &mut self,
        key: &str,
        required: bool,
        access: Access<T, V>,
        codec: C,
    ) -> &mut Self {
        if self.key_index.contains_key(key.as_bytes()) {
            log::debug!("duplicate field registration for key {key:?}, first wins");
            return self;
        }
        let required_bit = self.required_bit(required);
        let field = Box::new(Field {
            key_with_colon: escaped_key_with_colon(key),
            required_bit,
            access,
            codec,
        });
        self.push_field(key, field);
        self
    }

    /// Register a required field with no storage on `T`: decode parses and
    /// discards the value (it still counts toward required-field coverage);
    /// encode emits `codec.encode(&V::default())`.
    pub fn required_dummy<V: Default + 'static, C: Codec<V> + 'static>(
        &mut self,
        key: &str,
        codec: C,
    ) -> &mut Self {
        self.register_dummy(key, true, codec)
    }

    /// Register an optional field with no storage on `T` (see
    /// [`Self::required_dummy`]).
    pub fn optional_dummy<V: Default + 'static, C: Codec<V> + 'static>(
        &mut self,
        key: &str,
        codec: C,
    ) -> &mut Self {
        self.register_dummy(key, false, codec)
    }

    fn register_dummy<V: Default + 'static, C: Codec<V> + 'static>(
        &mut self,
        key: &str,
        required: bool,
        codec: C,
    ) -> &mut Self {
        if self.key_index.contains_key(key.as_bytes()) {
            log::debug!("duplicate field registration for key {key:?}, first wins");
            return self;
        }
        let required_bit = self.required_bit(required);
        let field: Box<DummyField<V, C>> = Box::new(DummyField {
            key_with_colon: escaped_key_with_colon(key),
            required_bit,
            codec,
            _value: core::marker::PhantomData,
        });
        self.push_field(key, field);
        self
    }

    /// Finish the schema, producing an immutable [`ObjectCodec<T>`].
    #[must_use]
    pub fn build(self) -> ObjectCodec<T> {
        ObjectCodec {
            constructor: self.constructor,
            fields: self.fields,
            key_index: self.key_index,
            num_required: self.num_required,
        }
    }
}

/// The schema-describing codec: decodes a JSON object into `T` and encodes
/// it back. Immutable after [`ObjectCodecBuilder::build`]; safe to share
/// across threads for concurrent decode/encode on distinct contexts.
pub struct ObjectCodec<T> {
    constructor: Box<dyn Fn() -> T + Send + Sync>,
    fields: Vec<Box<dyn FieldSlot<T>>>,
    key_index: BTreeMap<Vec<u8>, usize>,
    num_required: usize,
}

impl<T: Send + Sync> Codec<T> for ObjectCodec<T> {
    fn decode(&self, ctx: &mut Decoder) -> Result<T, DecodeError> {
        let mut required_seen: u64 = 0;
        let mut unique_required_seen: usize = 0;
        let mut target = (self.constructor)();

        ctx.advance_past_comma_separated(b'{', b'}', |ctx| {
            let key = ctx.decode_string()?;
            ctx.skip_past_whitespace();
            ctx.advance_past(b':')?;
            ctx.skip_past_whitespace();

            match self.key_index.get(key.as_bytes()) {
                Some(&idx) => {
                    let field = &self.fields[idx];
                    field.decode_into(ctx, &mut target)?;
                    if let Some(bit) = field.required_bit() {
                        let mask = 1u64 << bit;
                        if required_seen & mask == 0 {
                            required_seen |= mask;
                            unique_required_seen += 1;
                        }
                    }
                    Ok(())
                }
                None => ctx.skip_value(),
            }
        })?;

        if unique_required_seen != self.num_required {
            let offset = ctx.offset(0);
            log::trace!(
                "decode failed: missing required field(s), saw {unique_required_seen} of \
                 {want} at byte {offset}",
                want = self.num_required
            );
            return Err(DecodeError::missing_required_fields(offset));
        }

        Ok(target)
    }

    fn encode(&self, ctx: &mut Encoder, value: &T) {
        ctx.append(b'{');
        for field in &self.fields {
            field.encode_from(ctx, value);
        }
        ctx.append_or_replace(b',', b'}');
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::{String, ToString};

    use super::*;
    use crate::scalar::{I32Codec, OptionCodec};

    #[derive(Debug, Default, PartialEq, Eq)]
    struct Point {
        x: i32,
        y: i32,
    }

    fn point_codec() -> ObjectCodec<Point> {
        let mut b = ObjectCodecBuilder::<Point>::new();
        b.required("x", Access::direct(|p: &Point| &p.x, |p: &mut Point| &mut p.x), I32Codec);
        b.required("y", Access::direct(|p: &Point| &p.y, |p: &mut Point| &mut p.y), I32Codec);
        b.build()
    }

    #[test]
    fn basic_record_round_trips() {
        let codec = point_codec();
        let mut dec = Decoder::new(br#"{"x":1,"y":2}"#);
        let p = codec.decode(&mut dec).unwrap();
        assert_eq!(p, Point { x: 1, y: 2 });

        let mut enc = Encoder::new();
        codec.encode(&mut enc, &p);
        assert_eq!(enc.as_slice(), br#"{"x":1,"y":2}"#);
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct Person {
        name: String,
        age: Option<i32>,
    }

    fn person_codec() -> ObjectCodec<Person> {
        let mut b = ObjectCodecBuilder::<Person>::new();
        b.required(
            "n",
            Access::by_value(|p: &Person| p.name.clone(), |p: &mut Person, v| p.name = v),
            StringCodec,
        );
        b.optional(
            "a",
            Access::direct(|p: &Person| &p.age, |p: &mut Person| &mut p.age),
            OptionCodec::new(I32Codec),
        );
        b.build()
    }

    #[test]
    fn optional_field_is_omitted_when_absent() {
        let codec = person_codec();
        let mut dec = Decoder::new(br#"{"n":"Ada"}"#);
        let p = codec.decode(&mut dec).unwrap();
        assert_eq!(
            p,
            Person {
                name: "Ada".to_string(),
                age: None
            }
        );

        let mut enc = Encoder::new();
        codec.encode(&mut enc, &p);
        assert_eq!(enc.as_slice(), br#"{"n":"Ada"}"#);
    }

    #[test]
    fn unknown_field_is_skipped() {
        let codec = person_codec();
        let mut dec = Decoder::new(br#"{"n":"Ada","extra":{"nested":[1,2,3]},"a":42}"#);
        let p = codec.decode(&mut dec).unwrap();
        assert_eq!(
            p,
            Person {
                name: "Ada".to_string(),
                age: Some(42)
            }
        );

        let mut enc = Encoder::new();
        codec.encode(&mut enc, &p);
        assert_eq!(enc.as_slice(), br#"{"n":"Ada","a":42}"#);
    }

    #[test]
    fn missing_required_field_fails() {
        let codec = person_codec();
        let mut dec = Decoder::new(br#"{"a":1}"#);
        let err = codec.decode(&mut dec).unwrap_err();
        assert_eq!(err.message(), "Missing required field(s)");
    }

    #[test]
    fn duplicate_required_key_last_wins_and_satisfies_requiredness() {
        let codec = person_codec();
        let mut dec = Decoder::new(br#"{"n":"A","n":"B"}"#);
        let p = codec.decode(&mut dec).unwrap();
        assert_eq!(p.name, "B");
    }

    #[test]
    fn bad_escape_reports_offset_at_escape_char() {
        let codec = person_codec();
        let mut dec = Decoder::new(br#"{"n":"a\qb"}"#);
        let err = codec.decode(&mut dec).unwrap_err();
        assert_eq!(err.message(), "Invalid escape character");
        assert_eq!(err.offset, br#"{"n":"a\q"#.len() - 1);
    }

    #[test]
    fn trailing_comma_is_rejected() {
        let codec = point_codec();
        let mut dec = Decoder::new(br#"{"x":1,}"#);
        let err = codec.decode(&mut dec).unwrap_err();
        assert_eq!(err.message(), "Unexpected input");
        assert_eq!(err.offset, br#"{"x":1,"#.len());
    }

    #[test]
    fn escaped_key_cache_is_byte_identical_across_calls() {
        let codec = point_codec();
        let p = Point { x: 1, y: 2 };
        let mut first = Encoder::new();
        codec.encode(&mut first, &p);
        let mut second = Encoder::new();
        codec.encode(&mut second, &p);
        assert_eq!(first.as_slice(), second.as_slice());
    }

    #[test]
    fn field_order_on_encode_matches_registration_order() {
        #[derive(Debug, Default)]
        struct Reordered {
            a: i32,
            b: i32,
        }
        let mut builder = ObjectCodecBuilder::<Reordered>::new();
        builder.required(
            "b",
            Access::direct(|r: &Reordered| &r.b, |r: &mut Reordered| &mut r.b),
            I32Codec,
        );
        builder.required(
            "a",
            Access::direct(|r: &Reordered| &r.a, |r: &mut Reordered| &mut r.a),
            I32Codec,
        );
        let codec = builder.build();
        let mut enc = Encoder::new();
        codec.encode(&mut enc, &Reordered { a: 1, b: 2 });
        assert_eq!(enc.as_slice(), br#"{"b":2,"a":1}"#);
    }

    #[test]
    fn empty_object_encodes_as_braces() {
        #[derive(Debug, Default)]
        struct Empty;
        let codec = ObjectCodecBuilder::<Empty>::new().build();
        let mut enc = Encoder::new();
        codec.encode(&mut enc, &Empty);
        assert_eq!(enc.as_slice(), b"{}");
    }

    #[test]
    fn dummy_field_parses_and_discards_on_decode_and_emits_default_on_encode() {
        #[derive(Debug, Default, PartialEq, Eq)]
        struct WithVersion {
            name: String,
        }
        let mut builder = ObjectCodecBuilder::<WithVersion>::new();
        builder.required(
            "name",
            Access::by_value(
                |w: &WithVersion| w.name.clone(),
                |w: &mut WithVersion, v| w.name = v,
            ),
            StringCodec,
        );
        builder.required_dummy::<i32, _>("version", I32Codec);
        let codec = builder.build();

        let mut dec = Decoder::new(br#"{"name":"x","version":7}"#);
        let w = codec.decode(&mut dec).unwrap();
        assert_eq!(w.name, "x");

        let mut enc = Encoder::new();
        codec.encode(&mut enc, &w);
        assert_eq!(enc.as_slice(), br#"{"name":"x","version":0}"#);
    }

    #[test]
    fn required_default_resolves_codec_from_value_type() {
        let mut builder = ObjectCodecBuilder::<Point>::new();
        builder.required_default("x", Access::direct(|p: &Point| &p.x, |p: &mut Point| &mut p.x));
        builder.required_default("y", Access::direct(|p: &Point| &p.y, |p: &mut Point| &mut p.y));
        let codec = builder.build();

        let mut dec = Decoder::new(br#"{"x":1,"y":2}"#);
        let p = codec.decode(&mut dec).unwrap();
        assert_eq!(p, Point { x: 1, y: 2 });

        let mut enc = Encoder::new();
        codec.encode(&mut enc, &p);
        assert_eq!(enc.as_slice(), br#"{"x":1,"y":2}"#);
    }

    #[test]
    fn optional_default_omits_absent_field() {
        let mut builder = ObjectCodecBuilder::<Person>::new();
        builder.required(
            "n",
            Access::by_value(|p: &Person| p.name.clone(), |p: &mut Person, v| p.name = v),
            StringCodec,
        );
        builder.optional_default("a", Access::direct(|p: &Person| &p.age, |p: &mut Person| &mut p.age));
        let codec = builder.build();

        let mut dec = Decoder::new(br#"{"n":"Ada"}"#);
        let p = codec.decode(&mut dec).unwrap();
        assert_eq!(p.age, None);

        let mut enc = Encoder::new();
        codec.encode(&mut enc, &p);
        assert_eq!(enc.as_slice(), br#"{"n":"Ada"}"#);
    }

    #[test]
    fn duplicate_key_registration_is_first_wins() {
        let mut builder = ObjectCodecBuilder::<Point>::new();
        builder.required(
            "x",
            Access::direct(|p: &Point| &p.x, |p: &mut Point| &mut p.x),
            I32Codec,
        );
        // Second registration under the same key is a no-op: this does not
        // register "x" a second time as an optional field, which would have
        // shifted `num_required`.
        builder.optional(
            "x",
            Access::direct(|p: &Point| &p.x, |p: &mut Point| &mut p.x),
            I32Codec,
        );
        builder.required(
            "y",
            Access::direct(|p: &Point| &p.y, |p: &mut Point| &mut p.y),
            I32Codec,
        );
        let codec = builder.build();
        assert_eq!(codec.num_required, 2);
        let mut dec = Decoder::new(br#"{"x":1,"y":2}"#);
        assert!(codec.decode(&mut dec).is_ok());
    }
}
