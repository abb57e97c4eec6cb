#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test_case("newAddress", "new_address" ; "camel")]
#[test_case("accountType", "account_type" ; "camel two words")]
#[test_case("ZIPCode", "zip_code" ; "leading acronym")]
#[test_case("AccountType", "account_type" ; "pascal")]
#[test_case("myHTTPServer", "my_http_server" ; "inner acronym")]
#[test_case("address", "address" ; "lowercase word")]
#[test_case("a_b_c_d", "a_bcd" ; "single letter segments")]
#[test_case("iD", "iD" ; "short mixed case")]
#[test_case("ID", "ID" ; "short uppercase")]
#[test_case("", "" ; "empty")]
fn camel_to_snake_case___converts(input: &str, expected: &str) {
    assert_eq!(camel_to_snake_case(input), expected);
}

#[test]
fn camel_to_snake_case___already_snake___unchanged() {
    assert_eq!(camel_to_snake_case("postal_code"), "postal_code");
}

#[test_case("state", "State" ; "lowercase")]
#[test_case("State", "State" ; "already capitalized")]
#[test_case("éclair", "Éclair" ; "non ascii")]
#[test_case("", "" ; "empty")]
fn capitalize___uppercases_first_letter(input: &str, expected: &str) {
    assert_eq!(capitalize(input), expected);
}

#[test_case("ZIPCode", "zIPCode" ; "acronym")]
#[test_case("city", "city" ; "already lower")]
#[test_case("", "" ; "empty")]
fn first_lower___lowercases_first_letter(input: &str, expected: &str) {
    assert_eq!(first_lower(input), expected);
}

#[test]
fn kebab_to_snake___replaces_dashes() {
    assert_eq!(kebab_to_snake("sub-directory/file-name"), "sub_directory/file_name");
}

#[test]
fn split_by_last___splits_on_last_separator() {
    assert_eq!(split_by_last("enums/enums.go", '.'), ("enums/enums", "go"));
    assert_eq!(split_by_last("a/b/c", '/'), ("a/b", "c"));
}

#[test]
fn split_by_last___missing_separator___returns_whole_string_last() {
    assert_eq!(split_by_last("enums", '/'), ("", "enums"));
}
