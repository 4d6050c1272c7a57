//! Identifier value integration tests
//!
//! Enhanced with property-based testing

use impress_identifiers::validators::ean13_check_digit;
use impress_identifiers::{Doi, DoiKind, Isbn, Lccn, Value, ValueError, ValueKind};
use proptest::prelude::*;
use rstest::rstest;

// === DOI ===

#[test]
fn test_doi_url() {
    let doi = ValueKind::Doi.parse("10.1234/5678-90").unwrap();
    assert_eq!(doi.url().unwrap().to_string(), "https://doi.org/10.1234/5678-90");
}

#[rstest]
#[case("10.1234/5678-90")]
#[case("10.1234,5678-90")]
#[case("doi:10.1234/5678-90")]
#[case("doi/10.1234/5678-90")]
#[case("info:doi/10.1234/5678-90")]
#[case("info:hdl/10.1234/5678-90")]
#[case("https://doi.org/10.1234/5678-90")]
#[case("https://dx.doi.org/10.1234/5678-90")]
#[case("https://hdl.handle.net/10.1234/5678-90")]
fn test_doi_syntaxes_are_equal(#[case] input: &str) {
    assert_eq!(Doi::parse(input).unwrap(), Doi::parse("10.1234/5678-90").unwrap());
}

#[test]
fn test_handle_prefix() {
    let hdl = Doi::parse("hdl/20.500.12345/abc").unwrap();
    assert_eq!(hdl.kind(), DoiKind::Handle);
    assert_eq!(hdl.prefix(), &[20, 500, 12345]);
}

#[test]
fn test_doi_malformed_kind() {
    match Doi::parse("not a doi").unwrap_err() {
        ValueError::MalformedInput { kind, input } => {
            assert_eq!(kind, "doi");
            assert_eq!(input, "not a doi");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

// === LCCN ===

#[test]
fn test_lccn_normalization() {
    assert_eq!(Lccn::new("89-456").to_string(), "89000456");
    assert_eq!(
        ValueKind::Lccn.parse("89-456").unwrap().long(),
        "info:lccn/89000456"
    );
}

// === ISBN ===

#[test]
fn test_isbn10_round_trip() {
    let isbn = Isbn::parse("9780123456786").unwrap();
    let ten = isbn.isbn10().unwrap();
    assert_eq!(ten, "0123456789");
    assert_eq!(Isbn::parse(&ten).unwrap().isbn13(), "9780123456786");
}

#[rstest]
#[case("9780123456786", "978-0-12-345678-6")]
#[case("9781234567897", "978-1-234-56789-7")]
#[case("9791032305690", "979-10-323-0569-0")]
#[case("9783123456787", "978-3-12-345678-7")]
#[case("9782206123455", "978-2-206-12345-5")]
#[case("9787123456785", "978-7-123-45678-5")]
#[case("9788023456783", "978-80-234-5678-3")]
#[case("9786512345679", "978-65-1234567-9")]
#[case("9788804123453", "978-88-04-12345-3")]
#[case("9785170123452", "978-5-17-012345-2")]
#[case("9788420612348", "978-84-206-1234-8")]
fn test_isbn_split13(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(Isbn::parse(input).unwrap().split13(), expected);
}

#[rstest]
#[case("9789012345675")]
#[case("9788850123452")]
fn test_isbn_outside_ranges_is_whole(#[case] input: &str) {
    let isbn = Isbn::parse(input).unwrap();
    assert_eq!(isbn.split(), &[input]);
    assert_eq!(isbn.split13(), input);
    assert_eq!(isbn.split10(), None);
}

#[test]
fn test_isbn_value_forms() {
    let value = ValueKind::Isbn.parse("0-12-345678-9").unwrap();
    assert_eq!(value.to_string(), "9780123456786");
    assert_eq!(value.long(), "urn:isbn:9780123456786");
    assert!(matches!(value.url(), Err(ValueError::UnsupportedCast { .. })));
}

// === Text ===

#[test]
fn test_text_always_has_url() {
    let value = Value::text("what/a/thing");
    assert_eq!(value.url().unwrap().to_string(), "http://what/a/thing");
}

// === Property-Based Tests ===

fn with_check_digit(body: &str) -> String {
    let check = ean13_check_digit(body).unwrap();
    format!("{body}{check}")
}

proptest! {
    #[test]
    fn test_split_concatenates_to_input(body in "978[0-9]{9}") {
        let value = with_check_digit(&body);
        let isbn = Isbn::parse(&value).unwrap();
        prop_assert_eq!(isbn.split().concat(), value);
    }

    #[test]
    fn test_split_is_whole_or_grouped(body in "97[89][0-9]{9}") {
        let value = with_check_digit(&body);
        let parts = Isbn::parse(&value).unwrap().split().to_vec();
        match parts.len() {
            1 => prop_assert_eq!(&parts[0], &value),
            4 | 5 => {
                prop_assert_eq!(parts[0].as_str(), &value[..3]);
                prop_assert_eq!(parts.last().map(String::len), Some(1));
                prop_assert!(parts.iter().all(|p| !p.is_empty()));
            }
            n => prop_assert!(false, "{} parts in {:?}", n, parts),
        }
    }

    #[test]
    fn test_isbn10_reextends(body in "978[0-9]{9}") {
        let isbn = Isbn::parse(&with_check_digit(&body)).unwrap();
        let ten = isbn.isbn10().unwrap();
        prop_assert_eq!(Isbn::parse(&ten).unwrap(), isbn);
    }

    #[test]
    fn test_doi_short_form_reparses(prefix in "10\\.[0-9]{4}", suffix in "[a-z0-9.-]{1,12}") {
        let doi = Doi::parse(&format!("{prefix}/{suffix}")).unwrap();
        prop_assert_eq!(Doi::parse(&doi.to_string()).unwrap(), doi);
    }
}
