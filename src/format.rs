//! Wire-format vocabulary and XML escaping.
//!
//! # Document layout
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <bean type="app::model::Person">
//!  <forename>Etienne</forename>
//!  <mainAddress type="CompanyAddress">
//!   <street>Park Lane</street>
//!  </mainAddress>
//!  <tags metatype="Set">
//!   <item>a</item>
//!   <item null="true"/>
//!  </tags>
//!  <codes>
//!   <entry key="A">1</entry>
//!  </codes>
//!  <counts>
//!   <item count="3">x</item>
//!  </counts>
//! </bean>
//! ```
//!
//! - Object element: named after the property (`bean` at the root); optional
//!   `type` attribute; one child per non-null serializable property.
//! - Leaf element: text body is the converted string.
//! - Collection element: optional `metatype`; one `item` (sequence shapes) or
//!   `entry` (maps) child per entry. Map keys go in a `key` attribute when
//!   leaf-convertible, otherwise the entry holds a key `item` then a value `item`.
//! - `count` appears only when not 1; `null="true"` marks a null slot.
//!
//! # Escaping
//!
//! | Character | Text | Attribute |
//! |-----------|------|-----------|
//! | `&` `<` `>` | `&amp;` `&lt;` `&gt;` | `&amp;` `&lt;` `&gt;` |
//! | `"` `'` | raw | `&#34;` `&#39;` |
//! | tab, LF, CR | raw | `&#9;` `&#10;` `&#13;` |
//! | other below U+0020 | error | error |

use crate::{Error, Result};

pub const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

pub const BEAN: &str = "bean";
pub const TYPE: &str = "type";
pub const METATYPE: &str = "metatype";
pub const KEY: &str = "key";
pub const COUNT: &str = "count";
pub const NULL: &str = "null";
pub const ITEM: &str = "item";
pub const ENTRY: &str = "entry";

/// Appends `text` escaped for use as element content.
///
/// # Errors
///
/// Returns [`Error::InvalidCharacter`] for control characters other than tab, CR and LF.
///
/// # Examples
///
/// ```rust
/// use beanxml::format::escape_text;
///
/// let mut out = String::new();
/// escape_text("a < b & c\n", &mut out).unwrap();
/// assert_eq!(out, "a &lt; b &amp; c\n");
/// ```
pub fn escape_text(text: &str, out: &mut String) -> Result<()> {
    out.reserve(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\t' | '\n' | '\r' => out.push(ch),
            c if (c as u32) < 32 => return Err(Error::invalid_character(c)),
            c => out.push(c),
        }
    }
    Ok(())
}

/// Appends `text` escaped for use inside a double-quoted attribute value.
///
/// # Errors
///
/// Returns [`Error::InvalidCharacter`] for control characters other than tab, CR and LF.
pub fn escape_attribute(text: &str, out: &mut String) -> Result<()> {
    out.reserve(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c if (c as u32) < 32 => return Err(Error::invalid_character(c)),
            c => out.push(c),
        }
    }
    Ok(())
}

/// Appends ` name="value"` with the value escaped.
pub fn push_attribute(out: &mut String, name: &str, value: &str) -> Result<()> {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_attribute(value, out)?;
    out.push('"');
    Ok(())
}

/// Returns `true` if `name` can be written as an element name.
///
/// A name starts with a letter or `_` and continues with letters, digits,
/// `_`, `-` or `.`.
///
/// # Examples
///
/// ```rust
/// use beanxml::format::is_name;
///
/// assert!(is_name("mainAddress"));
/// assert!(!is_name("first name"));
/// assert!(!is_name("x><y"));
/// ```
#[must_use]
pub fn is_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.'))
}

/// Resolves the body of a character reference (`amp`, `#34`, `#x22`).
#[must_use]
pub fn resolve_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let digits = name.strip_prefix('#')?;
            let code = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => digits.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
