use xhr_shim::http::method::Method;

#[test]
fn test_method_parse_uppercase() {
    assert_eq!(Method::parse("OPTIONS"), Some(Method::Options));
    assert_eq!(Method::parse("GET"), Some(Method::Get));
    assert_eq!(Method::parse("HEAD"), Some(Method::Head));
    assert_eq!(Method::parse("POST"), Some(Method::Post));
    assert_eq!(Method::parse("PUT"), Some(Method::Put));
    assert_eq!(Method::parse("DELETE"), Some(Method::Delete));
    assert_eq!(Method::parse("TRACE"), Some(Method::Trace));
    assert_eq!(Method::parse("CONNECT"), Some(Method::Connect));
}

#[test]
fn test_method_parse_is_case_insensitive() {
    assert_eq!(Method::parse("get"), Some(Method::Get));
    assert_eq!(Method::parse("Post"), Some(Method::Post));
    assert_eq!(Method::parse("dElEtE"), Some(Method::Delete));
}

#[test]
fn test_method_parse_rejects_unknown_verbs() {
    assert_eq!(Method::parse("BREW"), None);
    assert_eq!(Method::parse("PATCH"), None); // not in the allow-list
    assert_eq!(Method::parse(""), None);
    assert_eq!(Method::parse("GET "), None);
}

#[test]
fn test_method_as_str_is_uppercase() {
    assert_eq!(Method::parse("options").unwrap().as_str(), "OPTIONS");
    assert_eq!(Method::Get.as_str(), "GET");
    assert_eq!(Method::Connect.as_str(), "CONNECT");
}

#[test]
fn test_method_default_is_get() {
    assert_eq!(Method::default(), Method::Get);
}
