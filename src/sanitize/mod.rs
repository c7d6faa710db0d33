// HTML sanitization for user-submitted content. Applied exactly once, at
// write time, before persistence.

use ammonia::Builder;
use once_cell::sync::Lazy;

/// Shared sanitizer instance. Allows common structural and formatting markup;
/// script-executing elements and attributes are removed along with their
/// content. Event-handler attributes and javascript: URLs never survive.
static SANITIZER: Lazy<Builder<'static>> = Lazy::new(|| {
    let mut builder = Builder::default();
    builder
        .add_generic_attributes(&["class"])
        .link_rel(Some("noopener noreferrer"));
    builder
});

/// Sanitize untrusted HTML. Pure function; idempotent, so sanitizing
/// already-clean content returns it unchanged.
pub fn clean(html: &str) -> String {
    SANITIZER.clean(html).to_string()
}
