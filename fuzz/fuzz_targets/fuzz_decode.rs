#![no_main]

use arbitrary::Arbitrary;
use jsoncodec::scalar::{I32Codec, OptionCodec, StringCodec, VecCodec};
use jsoncodec::{Access, Codec, Decoder, Encoder, ObjectCodec, ObjectCodecBuilder};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Default, Arbitrary)]
struct Widget {
    name: String,
    count: Option<i32>,
    tags: Vec<i32>,
}

fn widget_codec() -> ObjectCodec<Widget> {
    let mut b = ObjectCodecBuilder::<Widget>::new();
    b.required(
        "name",
        Access::by_value(
            |w: &Widget| w.name.clone(),
            |w: &mut Widget, v| w.name = v,
        ),
        StringCodec,
    );
    b.optional(
        "count",
        Access::direct(|w: &Widget| &w.count, |w: &mut Widget| &mut w.count),
        OptionCodec::new(I32Codec),
    );
    b.required(
        "tags",
        Access::direct(|w: &Widget| &w.tags, |w: &mut Widget| &mut w.tags),
        VecCodec::new(I32Codec),
    );
    b.build()
}

#[derive(Arbitrary, Debug)]
enum Input<'a> {
    /// Feed raw, unstructured bytes straight to the decoder. The codec must
    /// reject malformed input with a `DecodeError`, never panic.
    Raw(&'a [u8]),
    /// Encode an arbitrary `Widget`, then decode the result back. The
    /// round trip must reproduce the original value exactly.
    RoundTrip(Widget),
}

fuzz_target!(|input: Input<'_>| {
    let codec = widget_codec();
    match input {
        Input::Raw(bytes) => {
            let mut ctx = Decoder::new(bytes);
            let _ = codec.decode(&mut ctx);
        }
        Input::RoundTrip(widget) => {
            let mut enc = Encoder::new();
            codec.encode(&mut enc, &widget);
            let bytes = enc.into_vec();

            let mut ctx = Decoder::new(&bytes);
            let decoded = codec.decode(&mut ctx).expect("encoder output always decodes");
            assert_eq!(decoded.name, widget.name);
            assert_eq!(decoded.count, widget.count);
            assert_eq!(decoded.tags, widget.tags);
        }
    }
});
