//! Case conversion for destination file names.
//!
//! Destination names are derived from legacy class names, so the only
//! conversion that matters here is dasherization: a dash is inserted at each
//! lowercase-to-uppercase boundary and the result is lowercased. Runs of
//! uppercase letters stay fused (`ABCModel` becomes `abcmodel`), which is the
//! behavior the legacy corpora were migrated with.

/// Convert a class name to its kebab-case file name form.
///
/// # Examples
/// ```
/// use unglobal_core::naming::kebab_case;
/// assert_eq!(kebab_case("KiwiPhoneComponent"), "kiwi-phone-component");
/// assert_eq!(kebab_case("Router"), "router");
/// assert_eq!(kebab_case("ABCModel"), "abcmodel");
/// ```
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c == '_' || c == ' ' {
            out.push('-');
            prev_lower = false;
            continue;
        }
        if prev_lower && c.is_ascii_uppercase() {
            out.push('-');
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        out.push(c.to_ascii_lowercase());
    }
    out
}

/// Normalize a source-relative path by dasherizing every segment.
///
/// Used for unclassified units, which keep their origin directory structure.
///
/// # Examples
/// ```
/// use unglobal_core::naming::kebab_path;
/// assert_eq!(kebab_path("controllers/preserve_comments.js"), "controllers/preserve-comments.js");
/// assert_eq!(kebab_path("views/kiwiPhone.js"), "views/kiwi-phone.js");
/// ```
pub fn kebab_path(path: &str) -> String {
    path.split('/')
        .map(kebab_case)
        .collect::<Vec<_>>()
        .join("/")
}
