use mediatype::MediaType;

/// Coarse category of a content type, used to tell apart the types of one
/// request body or response served in several media types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
pub enum MediaTag {
  #[default]
  Json,
  Form,
  Multipart,
  Text,
  Xml,
  Binary,
  EventStream,
}

impl MediaTag {
  #[must_use]
  pub fn from_content_type(content_type: &str) -> Self {
    let Ok(media) = MediaType::parse(content_type) else {
      return Self::Json;
    };

    let suffix = media.suffix.as_ref().map(mediatype::Name::as_str);

    match (media.ty.as_str(), media.subty.as_str(), suffix) {
      ("multipart", _, _) => Self::Multipart,
      ("text", "event-stream", _) => Self::EventStream,
      ("text" | "application", "xml", _) | (_, _, Some("xml")) => Self::Xml,
      ("application", "x-www-form-urlencoded", _) => Self::Form,
      ("application", "json", _) | (_, _, Some("json")) => Self::Json,
      ("image" | "audio" | "video", _, _) | ("application", "pdf" | "octet-stream", _) => Self::Binary,
      ("application" | "text", _, _) => Self::Text,
      _ => Self::Json,
    }
  }
}
