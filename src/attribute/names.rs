//! Reserved attribute names.
//!
//! Framework-defined attributes use the `__NAME__` form so they never clash
//! with resource-native attribute names.

/// Identity of an object on the resource.
pub const UID: &str = "__UID__";
/// Human-meaningful, unique name of an object on the resource.
pub const NAME: &str = "__NAME__";

// Operational attributes
pub const ENABLE: &str = "__ENABLE__";
pub const ENABLE_DATE: &str = "__ENABLE_DATE__";
pub const DISABLE_DATE: &str = "__DISABLE_DATE__";
pub const LOCK_OUT: &str = "__LOCK_OUT__";
pub const PASSWORD_EXPIRATION_DATE: &str = "__PASSWORD_EXPIRATION_DATE__";
pub const PASSWORD_EXPIRED: &str = "__PASSWORD_EXPIRED__";
pub const PASSWORD: &str = "__PASSWORD__";
pub const CURRENT_PASSWORD: &str = "__CURRENT_PASSWORD__";

// Predefined attributes
pub const SHORT_NAME: &str = "__SHORT_NAME__";
pub const DESCRIPTION: &str = "__DESCRIPTION__";
pub const LAST_PASSWORD_CHANGE_DATE: &str = "__LAST_PASSWORD_CHANGE_DATE__";
pub const PASSWORD_CHANGE_INTERVAL: &str = "__PASSWORD_CHANGE_INTERVAL__";
pub const LAST_LOGIN_DATE: &str = "__LAST_LOGIN_DATE__";
pub const GROUPS: &str = "__GROUPS__";

/// Names whose single value must be a guarded secret.
pub const PASSWORD_NAMES: [&str; 2] = [PASSWORD, CURRENT_PASSWORD];

/// Case-insensitive attribute name comparison.
pub fn names_equal(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

/// Whether the name is in the reserved `__NAME__` form.
pub fn is_special_name(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// Wrap a plain name in the reserved form, e.g. `enable` becomes `__ENABLE__`.
pub fn create_special_name(name: &str) -> String {
    format!("__{}__", name.to_uppercase())
}

/// Strip the reserved form, e.g. `__ENABLE__` becomes `ENABLE`.
///
/// Names that are not special are returned unchanged.
pub fn name_from_special_name(name: &str) -> &str {
    if is_special_name(name) {
        &name[2..name.len() - 2]
    } else {
        name
    }
}

/// Whether the name is one of the guarded password attributes.
pub fn is_password_name(name: &str) -> bool {
    PASSWORD_NAMES.iter().any(|p| names_equal(p, name))
}
