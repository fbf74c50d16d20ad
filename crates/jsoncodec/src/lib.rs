//! A schema-driven, composable JSON encoder/decoder.
//!
//! Describe the shape of a value — a record with named fields, an optional,
//! a map, a numeric scalar — and get back, in one step, a pair of operations
//! that parse JSON text into that value with strict validation, and
//! serialize the value back to text. The in-memory type is known
//! statically: decoding goes straight into that type, never through an
//! intermediate dynamic tree.
//!
//! The centerpiece is the [`object`] module's [`ObjectCodec`]: a schema
//! builder that handles field dispatch, required/optional tracking, unknown
//! field skipping, key escaping, and construction of the target value.
//! Everything else — the [`decode`] context's scanner primitives, the
//! [`codec::Codec`] protocol, the [`scalar`] codecs, the [`default_codec`]
//! resolver — exists in support of it.
//!
//! ```
//! use jsoncodec::{Access, Codec, ObjectCodecBuilder};
//! use jsoncodec::scalar::{I32Codec, OptionCodec, StringCodec};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: Option<i32>,
//! }
//!
//! fn person_codec() -> jsoncodec::ObjectCodec<Person> {
//!     let mut b = ObjectCodecBuilder::<Person>::new();
//!     b.required(
//!         "n",
//!         Access::by_value(|p: &Person| p.name.clone(), |p: &mut Person, v| p.name = v),
//!         StringCodec,
//!     );
//!     b.optional(
//!         "a",
//!         Access::direct(|p: &Person| &p.age, |p: &mut Person| &mut p.age),
//!         OptionCodec::new(I32Codec),
//!     );
//!     b.build()
//! }
//!
//! let codec = person_codec();
//! let mut ctx = jsoncodec::Decoder::new(br#"{"n":"Ada"}"#);
//! let person = codec.decode(&mut ctx).unwrap();
//! assert_eq!(person.age, None);
//!
//! let mut out = jsoncodec::Encoder::new();
//! codec.encode(&mut out, &person);
//! assert_eq!(out.as_slice(), br#"{"n":"Ada"}"#);
//! ```
#![no_std]
#![allow(clippy::module_name_repetitions)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod codec;
mod decode;
mod default_codec;
mod encode;
mod entry;
mod error;
mod object;
pub mod scalar;

pub use codec::Codec;
pub use decode::Decoder;
pub use default_codec::DefaultCodec;
pub use encode::Encoder;
pub use entry::{decode_value, encode_to_string, encode_value};
pub use error::DecodeError;
pub use object::{Access, ObjectCodec, ObjectCodecBuilder};
