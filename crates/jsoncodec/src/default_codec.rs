//! Default-codec resolver: given a static value type, yields its canonical
//! codec.
//!
//! This is a type-directed, compile-time lookup realized as a trait with an
//! associated type: a generic/templated trait lookup rather than a reflection
//! or runtime-registration scheme. A user's own record type joins the
//! resolver by writing one `impl DefaultCodec for T`, delegating to a built
//! [`crate::object::ObjectCodec`].

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::codec::Codec;
use crate::scalar::{
    BoolCodec, BoxCodec, F32Codec, F64Codec, I8Codec, I16Codec, I32Codec, I64Codec, MapCodec,
    OptionCodec, StringCodec, U8Codec, U16Codec, U32Codec, U64Codec, VecCodec,
};

/// Resolves the canonical [`Codec`] for a statically-known value type.
///
/// Implemented for the numeric primitives, `bool`, `String`, and the
/// composite wrappers `Option<T>`, `Vec<T>`, `BTreeMap<String, T>`, and
/// `Box<T>` over any `T: DefaultCodec`. A user record type implements this
/// once by delegating to its own [`crate::object::ObjectCodec`].
pub trait DefaultCodec: Sized {
    /// The concrete codec type this value type resolves to.
    type Codec: Codec<Self>;

    /// Build the canonical codec for this type.
    fn default_codec() -> Self::Codec;
}

macro_rules! impl_default_codec {
    ($ty:ty, $codec:ty, $make:expr) => {
        impl DefaultCodec for $ty {
            type Codec = $codec;

            fn default_codec() -> Self::Codec {
                $make
            }
        }
    };
}

impl_default_codec!(bool, BoolCodec, BoolCodec);
impl_default_codec!(i8, I8Codec, I8Codec);
impl_default_codec!(i16, I16Codec, I16Codec);
impl_default_codec!(i32, I32Codec, I32Codec);
impl_default_codec!(i64, I64Codec, I64Codec);
impl_default_codec!(u8, U8Codec, U8Codec);
impl_default_codec!(u16, U16Codec, U16Codec);
impl_default_codec!(u32, U32Codec, U32Codec);
impl_default_codec!(u64, U64Codec, U64Codec);
impl_default_codec!(f32, F32Codec, F32Codec);
impl_default_codec!(f64, F64Codec, F64Codec);
impl_default_codec!(String, StringCodec, StringCodec);

impl<T: DefaultCodec> DefaultCodec for Option<T> {
    type Codec = OptionCodec<T::Codec>;

    fn default_codec() -> Self::Codec {
        OptionCodec::new(T::default_codec())
    }
}

impl<T: DefaultCodec> DefaultCodec for Vec<T> {
    type Codec = VecCodec<T::Codec>;

    fn default_codec() -> Self::Codec {
        VecCodec::new(T::default_codec())
    }
}

impl<T: DefaultCodec> DefaultCodec for BTreeMap<String, T> {
    type Codec = MapCodec<T::Codec>;

    fn default_codec() -> Self::Codec {
        MapCodec::new(T::default_codec())
    }
}

impl<T: DefaultCodec> DefaultCodec for Box<T> {
    type Codec = BoxCodec<T::Codec>;

    fn default_codec() -> Self::Codec {
        BoxCodec::new(T::default_codec())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;

    use super::*;
    use crate::decode::Decoder;
    use crate::encode::Encoder;

    fn roundtrip_via_default<T: DefaultCodec + PartialEq + core::fmt::Debug>(value: T, bytes: &[u8]) {
        let codec = T::default_codec();
        let mut enc = Encoder::new();
        codec.encode(&mut enc, &value);
        assert_eq!(enc.as_slice(), bytes);

        let mut dec = Decoder::new(bytes);
        assert_eq!(codec.decode(&mut dec).unwrap(), value);
    }

    #[test]
    fn resolves_scalars() {
        roundtrip_via_default(true, b"true");
        roundtrip_via_default(7i32, b"7");
        roundtrip_via_default("hi".to_string(), b"\"hi\"");
    }

    #[test]
    fn resolves_nested_composites() {
        roundtrip_via_default(Some(vec![1i32, 2, 3]), b"[1,2,3]");
        roundtrip_via_default(None::<i32>, b"null");
        roundtrip_via_default(Box::new(5i32), b"5");
    }

    #[test]
    fn resolves_map() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1i32);
        roundtrip_via_default(map, br#"{"a":1}"#);
    }
}
