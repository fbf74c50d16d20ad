//! `insta` snapshots of representative encoded payloads, catching
//! accidental byte-level drift in the compact output.

use std::collections::BTreeMap;

use jsoncodec::scalar::{I32Codec, MapCodec, OptionCodec, StringCodec, VecCodec};
use jsoncodec::{Access, ObjectCodecBuilder};

#[derive(Debug, Default)]
struct Request {
    path: String,
    retries: Option<i32>,
    headers: BTreeMap<String, String>,
    hops: Vec<i32>,
}

fn request_codec() -> jsoncodec::ObjectCodec<Request> {
    let mut b = ObjectCodecBuilder::<Request>::new();
    b.required(
        "path",
        Access::by_value(
            |r: &Request| r.path.clone(),
            |r: &mut Request, v| r.path = v,
        ),
        StringCodec,
    );
    b.optional(
        "retries",
        Access::direct(|r: &Request| &r.retries, |r: &mut Request| &mut r.retries),
        OptionCodec::new(I32Codec),
    );
    b.required(
        "headers",
        Access::direct(|r: &Request| &r.headers, |r: &mut Request| &mut r.headers),
        MapCodec::new(StringCodec),
    );
    b.required(
        "hops",
        Access::direct(|r: &Request| &r.hops, |r: &mut Request| &mut r.hops),
        VecCodec::new(I32Codec),
    );
    b.build()
}

#[test]
fn snapshot_request_with_all_fields_present() {
    let codec = request_codec();
    let mut headers = BTreeMap::new();
    headers.insert("accept".to_string(), "json".to_string());
    let request = Request {
        path: "/v1/widgets".to_string(),
        retries: Some(3),
        headers,
        hops: vec![1, 2, 3],
    };
    let mut enc = jsoncodec::Encoder::new();
    codec.encode(&mut enc, &request);
    insta::assert_snapshot!(
        std::str::from_utf8(enc.as_slice()).unwrap(),
        @r#"{"path":"/v1/widgets","retries":3,"headers":{"accept":"json"},"hops":[1,2,3]}"#
    );
}

#[test]
fn snapshot_request_with_optional_omitted() {
    let codec = request_codec();
    let request = Request {
        path: "/health".to_string(),
        retries: None,
        headers: BTreeMap::new(),
        hops: Vec::new(),
    };
    let mut enc = jsoncodec::Encoder::new();
    codec.encode(&mut enc, &request);
    insta::assert_snapshot!(
        std::str::from_utf8(enc.as_slice()).unwrap(),
        @r#"{"path":"/health","headers":{},"hops":[]}"#
    );
}

#[test]
fn snapshot_string_escapes() {
    let mut enc = jsoncodec::Encoder::new();
    jsoncodec::Codec::encode(&StringCodec, &mut enc, &"line1\nline2\t\"quoted\"\\".to_string());
    insta::assert_snapshot!(
        std::str::from_utf8(enc.as_slice()).unwrap(),
        @r#""line1\nline2\t\"quoted\"\\""#
    );
}
