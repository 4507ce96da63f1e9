//! Maps `Setting = value` pairs onto typed entity fields.
//!
//! Each entity declares a static table of [`FieldMapping`]s. [`resolve`] looks
//! the setting up in that table and coerces the raw value according to the
//! mapping's [`FieldKind`]. Settings that are not in the table resolve to
//! `None` and are dropped by the caller.

use crate::{ProtoError, ProtoResult};
use std::borrow::Cow;

const COMMENT_MARKER: char = '#';
const LIST_SEPARATOR: char = ',';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    StringList,
    IntegerList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    StringList(Vec<String>),
    IntegerList(Vec<i64>),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldMapping<F> {
    pub setting: &'static str,
    pub field: F,
    pub kind: FieldKind,
}

impl<F> FieldMapping<F> {
    pub const fn new(setting: &'static str, field: F, kind: FieldKind) -> Self {
        Self {
            setting,
            field,
            kind,
        }
    }
}

/// Comment-form settings (`#Name`, `#   Name`) are compared as `# Name`.
pub fn canonical_setting(setting: &str) -> Cow<'_, str> {
    match setting.strip_prefix(COMMENT_MARKER) {
        Some(rest) => Cow::Owned(format!("{COMMENT_MARKER} {}", rest.trim())),
        None => Cow::Borrowed(setting),
    }
}

fn parse_integer(setting: &str, raw: &str) -> ProtoResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ProtoError::MalformedValue {
            setting: setting.to_string(),
            value: raw.to_string(),
        })
}

pub fn coerce(kind: FieldKind, setting: &str, value: &str) -> ProtoResult<FieldValue> {
    let value = value.trim();
    let coerced = match kind {
        FieldKind::String => FieldValue::String(value.to_string()),
        FieldKind::Integer => FieldValue::Integer(parse_integer(setting, value)?),
        FieldKind::StringList => FieldValue::StringList(
            value
                .split(LIST_SEPARATOR)
                .map(|v| v.trim().to_string())
                .collect(),
        ),
        FieldKind::IntegerList => FieldValue::IntegerList(
            value
                .split(LIST_SEPARATOR)
                .map(|v| parse_integer(setting, v))
                .collect::<ProtoResult<Vec<i64>>>()?,
        ),
    };

    Ok(coerced)
}

pub fn resolve<F: Copy>(
    table: &[FieldMapping<F>],
    setting: &str,
    value: &str,
) -> ProtoResult<Option<(F, FieldValue)>> {
    let setting = canonical_setting(setting.trim());
    match table.iter().find(|m| m.setting == setting) {
        Some(mapping) => {
            let value = coerce(mapping.kind, mapping.setting, value)?;
            Ok(Some((mapping.field, value)))
        }
        None => Ok(None),
    }
}

/// Narrows a resolved integer into the entity's field type.
pub(crate) fn narrow<T: TryFrom<i64>>(setting: &str, v: i64) -> ProtoResult<T> {
    T::try_from(v).map_err(|_| ProtoError::MalformedValue {
        setting: setting.to_string(),
        value: v.to_string(),
    })
}

/// Values are written one per line, so a line break would smuggle in extra
/// settings.
pub fn ensure_single_line(setting: &str, value: &str) -> ProtoResult<()> {
    if value.contains(['\n', '\r']) {
        return Err(ProtoError::MalformedValue {
            setting: setting.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}
