//! Form input validators for listener addresses and ports.

/// Port stored when the submitted value is missing, malformed, or out of
/// range. Falling back is policy, not an error path.
pub const DEFAULT_LPORT: u16 = 4444;

/// Validates a user-supplied IPv4 address.
///
/// Characters outside the digit/dot set are stripped before the survivor is
/// checked against a strict dotted-quad shape, so `"1.2.3.4extra"` validates
/// as `"1.2.3.4"`. Leading-zero octets (`"010.1.1.1"`) are accepted. Domain
/// names are not supported.
///
/// Returns the cleaned address on success, `None` otherwise.
#[must_use]
pub fn validate_address(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    is_dotted_quad(&cleaned).then_some(cleaned)
}

/// Validates a user-supplied port, falling back to [`DEFAULT_LPORT`] for
/// anything that is not an integer strictly between 1 and 65535.
#[must_use]
pub fn validate_port(raw: &str) -> u16 {
    match raw.trim().parse::<u16>() {
        Ok(port) if 1 < port && port < 65535 => port,
        _ => DEFAULT_LPORT,
    }
}

/// `true` if `s` is exactly four dot-separated octets, each 1-3 digits with
/// value 0-255.
fn is_dotted_quad(s: &str) -> bool {
    let mut octets = 0usize;
    for part in s.split('.') {
        octets += 1;
        if octets > 4 || part.is_empty() || part.len() > 3 {
            return false;
        }
        match part.parse::<u16>() {
            Ok(value) if value <= 255 => {}
            _ => return false,
        }
    }
    octets == 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_accepts_plain_dotted_quad() {
        assert_eq!(validate_address("10.0.0.5"), Some("10.0.0.5".to_owned()));
        assert_eq!(validate_address("0.0.0.0"), Some("0.0.0.0".to_owned()));
        assert_eq!(
            validate_address("255.255.255.255"),
            Some("255.255.255.255".to_owned())
        );
    }

    #[test]
    fn address_strips_foreign_characters_before_matching() {
        // Lenient on purpose; see DESIGN.md.
        assert_eq!(validate_address("1.2.3.4extra"), Some("1.2.3.4".to_owned()));
        assert_eq!(validate_address(" 10.0.0.5 "), Some("10.0.0.5".to_owned()));
    }

    #[test]
    fn address_accepts_leading_zero_octets() {
        assert_eq!(validate_address("010.1.1.1"), Some("010.1.1.1".to_owned()));
    }

    #[test]
    fn address_rejects_out_of_range_octets() {
        assert_eq!(validate_address("256.1.1.1"), None);
        assert_eq!(validate_address("1.2.3.999"), None);
    }

    #[test]
    fn address_rejects_wrong_octet_count() {
        assert_eq!(validate_address("1.2.3"), None);
        assert_eq!(validate_address("1.2.3.4.5"), None);
        assert_eq!(validate_address("1.2.3.4."), None);
        assert_eq!(validate_address("1..3.4"), None);
    }

    #[test]
    fn address_rejects_empty_and_non_numeric() {
        assert_eq!(validate_address(""), None);
        assert_eq!(validate_address("localhost"), None);
        assert_eq!(validate_address("example.com"), None);
    }

    #[test]
    fn port_in_range_is_kept() {
        assert_eq!(validate_port("8080"), 8080);
        assert_eq!(validate_port("2"), 2);
        assert_eq!(validate_port("65534"), 65534);
    }

    #[test]
    fn port_out_of_range_falls_back_to_default() {
        assert_eq!(validate_port("1"), DEFAULT_LPORT);
        assert_eq!(validate_port("65535"), DEFAULT_LPORT);
        assert_eq!(validate_port("99999"), DEFAULT_LPORT);
        assert_eq!(validate_port("0"), DEFAULT_LPORT);
        assert_eq!(validate_port("-5"), DEFAULT_LPORT);
    }

    #[test]
    fn port_non_numeric_falls_back_to_default() {
        assert_eq!(validate_port(""), DEFAULT_LPORT);
        assert_eq!(validate_port("http"), DEFAULT_LPORT);
        assert_eq!(validate_port("44 44"), DEFAULT_LPORT);
    }

    proptest::proptest! {
        #[test]
        fn proptest_valid_output_is_always_dotted_quad(raw in ".*") {
            if let Some(address) = validate_address(&raw) {
                let octets: Vec<&str> = address.split('.').collect();
                proptest::prop_assert_eq!(octets.len(), 4);
                for octet in octets {
                    proptest::prop_assert!(
                        octet.parse::<u16>().is_ok_and(|value| value <= 255),
                        "octet '{}' out of range in '{}'", octet, address
                    );
                }
            }
        }

        #[test]
        fn proptest_port_is_never_outside_valid_range(raw in ".*") {
            let port = validate_port(&raw);
            proptest::prop_assert!(1 < port && port < 65535);
        }

        #[test]
        fn proptest_in_range_ports_round_trip(port in 2u16..=65534) {
            proptest::prop_assert_eq!(validate_port(&port.to_string()), port);
        }
    }
}
