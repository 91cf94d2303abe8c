//! Fuzz target: address validation.
//!
//! Verifies that arbitrary input never panics the validator, and that any
//! accepted output really is a dotted quad with in-range octets.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);
    if let Some(address) = armory_core::validate_address(&raw) {
        let octets: Vec<&str> = address.split('.').collect();
        assert_eq!(octets.len(), 4, "accepted address must have 4 octets");
        for octet in octets {
            let value: u16 = octet.parse().expect("accepted octet must be numeric");
            assert!(value <= 255, "accepted octet must be in range");
        }
    }
});
