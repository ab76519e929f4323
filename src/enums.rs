/*!
 * Enum description and parsing helpers
 *
 * Descriptions come from `#[strum(message = "...")]` and fall back to the
 * variant's static name. Parsing by name or by description ignores ASCII
 * case and can fall back to a caller-supplied default.
 */

use strum::{EnumMessage, IntoEnumIterator};

/// Display string for `value`
pub fn to_description<E>(value: E) -> &'static str
where
    E: EnumMessage + Into<&'static str>,
{
    match value.get_message() {
        Some(message) => message,
        None => value.into(),
    }
}

/// Variant whose name matches `value`, ignoring ASCII case
pub fn parse_enum<E>(value: &str) -> Option<E>
where
    E: IntoEnumIterator + Into<&'static str> + Copy,
{
    let value = value.trim();
    E::iter().find(|variant| {
        let name: &'static str = (*variant).into();
        name.eq_ignore_ascii_case(value)
    })
}

/// Like [`parse_enum`], falling back to `default`
pub fn parse_enum_or<E>(value: &str, default: E) -> E
where
    E: IntoEnumIterator + Into<&'static str> + Copy,
{
    parse_enum(value).unwrap_or(default)
}

/// Variant whose description matches `description`, or `default`
pub fn parse_from_description<E>(description: &str, default: E) -> E
where
    E: IntoEnumIterator + EnumMessage + Into<&'static str> + Copy,
{
    let description = description.trim();
    E::iter()
        .find(|variant| to_description(*variant).eq_ignore_ascii_case(description))
        .unwrap_or(default)
}
