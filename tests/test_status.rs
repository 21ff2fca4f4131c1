use xhr_shim::http::status::reason_phrase;

#[test]
fn test_reason_phrase_common_codes() {
    assert_eq!(reason_phrase(200), Some("OK"));
    assert_eq!(reason_phrase(201), Some("Created"));
    assert_eq!(reason_phrase(204), Some("No Content"));
    assert_eq!(reason_phrase(301), Some("Moved Permanently"));
    assert_eq!(reason_phrase(400), Some("Bad Request"));
    assert_eq!(reason_phrase(404), Some("Not Found"));
    assert_eq!(reason_phrase(500), Some("Internal Server Error"));
    assert_eq!(reason_phrase(504), Some("Gateway Timeout"));
}

#[test]
fn test_reason_phrase_table_spelling() {
    // The table keeps the historical phrasings of the interface it mimics.
    assert_eq!(reason_phrase(101), Some("Switching protocols"));
    assert_eq!(reason_phrase(416), Some("Requested Range Not Suitable"));
    assert_eq!(reason_phrase(414), Some("Request-URI Too Long"));
}

#[test]
fn test_reason_phrase_unmapped_codes() {
    assert_eq!(reason_phrase(0), None);
    assert_eq!(reason_phrase(299), None);
    assert_eq!(reason_phrase(306), None);
    assert_eq!(reason_phrase(418), None);
    assert_eq!(reason_phrase(599), None);
    assert_eq!(reason_phrase(999), None);
}
