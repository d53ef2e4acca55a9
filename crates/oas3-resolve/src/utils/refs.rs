pub const SCHEMA_POINTER_PREFIX: &str = "/components/schemas/";

/// Splits a reference into its document part and its JSON pointer.
///
/// `pets.yaml#/Pet` gives `("pets.yaml", "/Pet")`, `#/components/schemas/Cat`
/// gives `("", "/components/schemas/Cat")` and a fragment-less `common.json`
/// gives `("common.json", "")`, which addresses the whole document.
pub fn split_reference(reference: &str) -> (&str, &str) {
  match reference.split_once('#') {
    Some((document, fragment)) => (document, fragment),
    None => (reference, ""),
  }
}

pub fn escape_token(token: &str) -> String {
  token.replace('~', "~0").replace('/', "~1")
}

pub fn unescape_token(token: &str) -> String {
  token.replace("~1", "/").replace("~0", "~")
}

/// Appends escaped tokens to a JSON pointer.
pub fn join_pointer<'a>(base: &str, tokens: impl IntoIterator<Item = &'a str>) -> String {
  tokens.into_iter().fold(base.to_string(), |mut pointer, token| {
    pointer.push('/');
    pointer.push_str(&escape_token(token));
    pointer
  })
}

/// Unescaped tokens of a JSON pointer.
pub fn pointer_tokens(pointer: &str) -> Vec<String> {
  pointer
    .split('/')
    .skip(1)
    .map(unescape_token)
    .collect()
}

/// Returns the component name when the pointer addresses `#/components/{section}/{name}` exactly.
pub fn component_name(pointer: &str, section: &str) -> Option<String> {
  match pointer_tokens(pointer).as_slice() {
    [components, found, name] if components == "components" && found == section => Some(name.clone()),
    _ => None,
  }
}

/// Directory part of a document path, without the trailing slash.
pub fn parent_dir(path: &str) -> &str {
  path.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Joins a relative document reference onto a base directory and removes `.`
/// and `..` segments. Leading `..` segments that climb above the base are kept.
pub fn normalize_document_path(base_dir: &str, relative: &str) -> String {
  let mut segments: Vec<&str> = Vec::new();
  let joined = base_dir.split('/').chain(relative.split('/'));
  for segment in joined {
    match segment {
      "" | "." => {}
      ".." => {
        if matches!(segments.last(), Some(last) if *last != "..") {
          segments.pop();
        } else {
          segments.push("..");
        }
      }
      other => segments.push(other),
    }
  }
  segments.join("/")
}

/// Whether a discriminator mapping value is a bare schema name rather than a reference.
pub fn is_bare_schema_name(value: &str) -> bool {
  !value.contains(['#', '/', '.'])
}
