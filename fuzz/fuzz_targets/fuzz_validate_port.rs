//! Fuzz target: port validation.
//!
//! The validator must never panic and must always return a usable port,
//! whatever bytes the form carried.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    let port = armory_core::validate_port(&raw);
    assert!(1 < port && port < 65535, "validated port must be in range");
});
