#![no_main]

use libfuzzer_sys::fuzz_target;
use wav2c_core::{decode_to_vec, SessionConfig};

fuzz_target!(|data: &[u8]| {
    // First byte picks the session options; the rest is the file.
    let Some((&flags, file)) = data.split_first() else {
        return;
    };
    let config = SessionConfig {
        statistics: flags & 1 != 0,
        array_literal: flags & 2 != 0,
        ..SessionConfig::default()
    };
    let _ = decode_to_vec(file, &config, "FUZZ");
});
