// Copyright 2026 BadCompany
// Licensed under the Apache License, Version 2.0

#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use scangate::capture::KeyCodec;
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    let mut codec = KeyCodec;
    let mut buf = BytesMut::from(data);
    // Decode must make progress on arbitrary byte soup and never panic.
    while let Ok(Some(_)) = codec.decode(&mut buf) {}
    let _ = codec.decode_eof(&mut buf);
});
