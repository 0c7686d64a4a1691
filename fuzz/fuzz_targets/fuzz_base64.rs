#![no_main]

use base64_external::{engine::general_purpose::STANDARD, Engine};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as binary input
    let encoded = pair_base64::encode(data);
    assert_eq!(encoded.len(), pair_base64::encoded_len(data.len()));
    assert_eq!(encoded, STANDARD.encode(data), "External crate encode mismatch");

    let decoded = pair_base64::decode(&encoded).expect("own output must decode");
    assert_eq!(data, &decoded[..], "Roundtrip failed");

    let mut buf = encoded.into_bytes();
    let in_place = pair_base64::decode_in_place(&mut buf).expect("own output must decode in place");
    assert_eq!(data, in_place, "In-place roundtrip failed");

    // Arbitrary bytes as base64 text: must never panic
    let ours = pair_base64::decode(data);
    let mut buf = data.to_vec();
    let ours_in_place = pair_base64::decode_in_place(&mut buf).map(<[u8]>::to_vec);
    assert_eq!(ours, ours_in_place, "In-place decode disagrees");

    if let Ok(expected) = STANDARD.decode(data) {
        assert_eq!(ours, Ok(expected), "Rejected input the external crate accepts");
    }
});
