use super::{
  identifiers::{ensure_unique, pascal_segment, sanitize, split_pascal_case, to_snake_id, to_type_name},
  media::MediaTag,
  operations::{compute_stable_id, generate_operation_id, operation_type_base},
};

#[test]
fn test_to_type_name() {
  let cases = [
    ("pet_store", "PetStore"),
    ("XMLHttpRequest", "XMLHttpRequest"),
    ("NOT_FORCED", "NotForced"),
    ("postFoo", "PostFoo"),
    ("Bar", "Bar"),
    ("-1", "Negative1"),
    ("2fa", "T2fa"),
    ("String", "StringType"),
    ("", "Unnamed"),
    ("___", "Unnamed"),
  ];
  for (input, expected) in cases {
    assert_eq!(to_type_name(input), expected, "input: {input:?}");
  }
}

#[test]
fn test_to_type_name_transliterates() {
  assert_eq!(to_type_name("café"), "Cafe");
}

#[test]
fn test_split_pascal_case_keeps_acronyms() {
  assert_eq!(split_pascal_case("XMLParser"), vec!["XML", "Parser"]);
  assert_eq!(split_pascal_case("petId"), vec!["pet", "Id"]);
  assert_eq!(split_pascal_case("HTTP"), vec!["HTTP"]);
}

#[test]
fn test_pascal_segment() {
  assert_eq!(pascal_segment("created_at"), "CreatedAt");
  assert_eq!(pascal_segment("nullableString"), "NullableString");
  assert_eq!(pascal_segment("@@"), "");
}

#[test]
fn test_sanitize_joins_words() {
  assert_eq!(sanitize("foo-bar baz"), "foo_bar_baz");
  assert_eq!(sanitize("  "), "");
}

#[test]
fn test_to_snake_id() {
  assert_eq!(to_snake_id("getPetById"), "get_pet_by_id");
  assert_eq!(to_snake_id("123abc"), "_123abc");
  assert_eq!(to_snake_id(""), "_");
}

#[test]
fn test_ensure_unique() {
  let taken = ["Bar", "Bar2"];
  assert_eq!(ensure_unique("Bar", |name| taken.contains(&name)), "Bar3");
  assert_eq!(ensure_unique("Baz", |name| taken.contains(&name)), "Baz");
}

#[test]
fn test_generate_operation_id() {
  assert_eq!(generate_operation_id("GET", "/pets/{petId}/toys"), "get_pets_by_id_toys");
  assert_eq!(generate_operation_id("POST", "/"), "post");
}

#[test]
fn test_stable_id_prefers_operation_id() {
  assert_eq!(compute_stable_id("post", "/foo", Some("postFoo")), "post_foo");
  assert_eq!(compute_stable_id("get", "/pets", None), "get_pets");
  assert_eq!(operation_type_base("post_foo"), "PostFoo");
}

#[test]
fn test_media_tags() {
  let cases = [
    ("application/json", MediaTag::Json),
    ("application/problem+json", MediaTag::Json),
    ("application/json; charset=utf-8", MediaTag::Json),
    ("multipart/form-data", MediaTag::Multipart),
    ("application/x-www-form-urlencoded", MediaTag::Form),
    ("text/plain", MediaTag::Text),
    ("text/event-stream", MediaTag::EventStream),
    ("application/xml", MediaTag::Xml),
    ("application/octet-stream", MediaTag::Binary),
    ("image/png", MediaTag::Binary),
    ("not a media type", MediaTag::Json),
  ];
  for (content_type, expected) in cases {
    assert_eq!(MediaTag::from_content_type(content_type), expected, "{content_type}");
  }
  assert_eq!(MediaTag::Multipart.to_string(), "Multipart");
}
