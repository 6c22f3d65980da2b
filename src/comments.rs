//! Localized comment injection for persisted config files.
//!
//! Keys beginning with `"//"` are inert as far as the schema is concerned;
//! their string values are message-catalog identifiers. Resolving them swaps
//! the identifier for the localized text, which is what the user actually
//! sees when opening the file.

use crate::lang::MessageCatalog;
use crate::models::{ConfigDocument, ConfigValue};

/// Prefix marking a document key as a comment field.
pub const COMMENT_KEY_MARKER: &str = "//";

/// Resolve every comment key's string value through the catalog.
///
/// Non-marker keys and non-string values pass through untouched. `changed`
/// is a whole-document comparison: false when every lookup returned the text
/// already present (already resolved, or no catalog entry), so callers can
/// skip an unnecessary save.
pub fn resolve_comments(
    doc: &ConfigDocument,
    catalog: &dyn MessageCatalog,
) -> (ConfigDocument, bool) {
    let mut resolved = doc.clone();

    for (key, value) in resolved.iter_mut() {
        if !key.starts_with(COMMENT_KEY_MARKER) {
            continue;
        }
        if let ConfigValue::Str(text) = value {
            *text = catalog.resolve(text, &[]);
        }
    }

    let changed = resolved != *doc;
    (resolved, changed)
}
