pub(crate) const PARAMS_SUFFIX: &str = "Params";
pub(crate) const REQUEST_BODY_SUFFIX: &str = "RequestBody";
pub(crate) const RESPONSE_SUFFIX: &str = "Response";

pub(crate) const ITEM_SUFFIX: &str = "Item";
pub(crate) const VALUE_SUFFIX: &str = "Value";
pub(crate) const VARIANT_PREFIX: &str = "Variant";

pub(crate) const UNNAMED_TYPE: &str = "Unnamed";
pub(crate) const INNER_SUFFIX: &str = "Inner";
