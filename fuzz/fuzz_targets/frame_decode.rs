//! Fuzz target for `Frame::decode`.
//!
//! Feeds arbitrary byte sequences straight into the frame decoder, looking
//! for panics, integer overflows in the length arithmetic, or buffer
//! over-reads. All invalid input must return an error, never panic.

#![no_main]

use eventstream_wire::Frame;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = Frame::decode(data);
});
