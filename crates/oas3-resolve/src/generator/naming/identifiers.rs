use std::sync::LazyLock;

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

use super::constants::UNNAMED_TYPE;

/// Names that shadow common prelude types and traits in generated code.
const RESERVED_TYPE_NAMES: &[&str] = &[
  "Box", "Clone", "Copy", "Display", "Option", "Result", "Self", "Send", "String", "Sync", "Type", "Vec",
];

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9]+").expect("word pattern compiles"));

/// Transliterates to ASCII and joins alphanumeric runs with single underscores.
pub(crate) fn sanitize(input: &str) -> String {
  let ascii = any_ascii(input);
  WORD_RE
    .find_iter(&ascii)
    .map(|word| word.as_str())
    .collect::<Vec<_>>()
    .join("_")
}

/// Splits a PascalCase or camelCase chunk into words, keeping acronyms together
/// (`"XMLParser"` gives `["XML", "Parser"]`).
pub(crate) fn split_pascal_case(name: &str) -> Vec<String> {
  let chars = name.chars().collect::<Vec<_>>();
  let mut words = vec![];
  let mut current = String::new();

  for (index, ch) in chars.iter().copied().enumerate() {
    let prev_lower = index > 0 && (chars[index - 1].is_lowercase() || chars[index - 1].is_ascii_digit());
    let next_lower = chars.get(index + 1).is_some_and(|next| next.is_lowercase());
    if ch.is_uppercase() && !current.is_empty() && (prev_lower || next_lower) {
      words.push(std::mem::take(&mut current));
    }
    current.push(ch);
  }

  if !current.is_empty() {
    words.push(current);
  }
  words
}

fn capitalize(word: &str) -> String {
  let mut chars = word.chars();
  chars.next().map_or_else(String::new, |first| {
    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
  })
}

/// PascalCase segment without any of the type-name rules applied.
///
/// A single mixed-case chunk keeps its capitalization (`"XMLHttpRequest"`);
/// separated or single-case input is normalized word by word (`"NOT_FORCED"` gives `"NotForced"`).
pub(crate) fn pascal_segment(name: &str) -> String {
  let ascii = any_ascii(name);
  let chunks = WORD_RE.find_iter(&ascii).map(|m| m.as_str()).collect::<Vec<_>>();

  if let [chunk] = chunks.as_slice()
    && chunk.chars().any(|c| c.is_ascii_uppercase())
    && chunk.chars().any(|c| c.is_ascii_lowercase())
  {
    let mut chars = chunk.chars();
    return chars
      .next()
      .map_or_else(String::new, |first| first.to_ascii_uppercase().to_string() + chars.as_str());
  }

  chunks
    .iter()
    .flat_map(|chunk| split_pascal_case(chunk))
    .map(|word| capitalize(&word))
    .collect()
}

/// Converts any schema, component or operation name into a type name.
///
/// A leading `-` becomes `Negative`, a leading digit gets a `T` prefix, names
/// that shadow prelude types get a `Type` suffix, and empty input becomes `Unnamed`.
pub fn to_type_name(name: &str) -> String {
  let (negative, rest) = match name.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, name),
  };

  let mut ident = pascal_segment(rest);
  if ident.is_empty() {
    return UNNAMED_TYPE.to_string();
  }
  if negative {
    ident.insert_str(0, "Negative");
  }
  if RESERVED_TYPE_NAMES.contains(&ident.as_str()) {
    ident.push_str("Type");
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, 'T');
  }
  ident
}

/// Converts a name into a `snake_case` identifier, prefixing a leading digit with `_`.
pub fn to_snake_id(name: &str) -> String {
  let mut ident = sanitize(name).to_snake_case();
  if ident.is_empty() {
    return "_".to_string();
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }
  ident
}

/// Returns `base` when free, otherwise `base2`, `base3`, … in order.
pub fn ensure_unique<F>(base: &str, is_taken: F) -> String
where
  F: Fn(&str) -> bool,
{
  if !is_taken(base) {
    return base.to_string();
  }
  (2..)
    .map(|index| format!("{base}{index}"))
    .find(|candidate| !is_taken(candidate))
    .unwrap_or_else(|| base.to_string())
}
