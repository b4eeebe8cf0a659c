//! Attribute value types.
//!
//! Attribute values are limited to a fixed set of supported types. The set is
//! closed, so a value that exists has already passed the type check the
//! framework would otherwise perform when an attribute is built.

use super::guarded::GuardedString;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// A single value of an [`Attribute`](super::Attribute).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum AttributeValue {
    String(String),
    Integer(i32),
    Long(i64),
    Double(f64),
    Float(f32),
    Boolean(bool),
    Byte(i8),
    #[serde(serialize_with = "serialize_base64")]
    ByteArray(Vec<u8>),
    #[serde(serialize_with = "serialize_display")]
    BigInteger(i128),
    BigDecimal(Decimal),
    GuardedString(GuardedString),
    Script(ScriptRef),
}

/// The type tag of an [`AttributeValue`].
///
/// Used by the schema model to declare what an attribute holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeValueType {
    String,
    Integer,
    Long,
    Double,
    Float,
    Boolean,
    Byte,
    ByteArray,
    BigInteger,
    BigDecimal,
    GuardedString,
    Script,
}

impl AttributeValueType {
    /// Whether values of this type have an ordering usable by comparison filters.
    pub fn is_comparable(self) -> bool {
        !matches!(self, Self::ByteArray | Self::GuardedString | Self::Script)
    }
}

impl fmt::Display for AttributeValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Double => "double",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::ByteArray => "byte array",
            Self::BigInteger => "big integer",
            Self::BigDecimal => "big decimal",
            Self::GuardedString => "guarded string",
            Self::Script => "script",
        };
        f.write_str(name)
    }
}

/// A reference to a script held as an attribute value.
///
/// The framework never evaluates scripts; it only carries them to the
/// connector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRef {
    language: String,
    text: String,
}

impl ScriptRef {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl AttributeValue {
    /// Get the type tag of this value.
    pub fn value_type(&self) -> AttributeValueType {
        match self {
            Self::String(_) => AttributeValueType::String,
            Self::Integer(_) => AttributeValueType::Integer,
            Self::Long(_) => AttributeValueType::Long,
            Self::Double(_) => AttributeValueType::Double,
            Self::Float(_) => AttributeValueType::Float,
            Self::Boolean(_) => AttributeValueType::Boolean,
            Self::Byte(_) => AttributeValueType::Byte,
            Self::ByteArray(_) => AttributeValueType::ByteArray,
            Self::BigInteger(_) => AttributeValueType::BigInteger,
            Self::BigDecimal(_) => AttributeValueType::BigDecimal,
            Self::GuardedString(_) => AttributeValueType::GuardedString,
            Self::Script(_) => AttributeValueType::Script,
        }
    }

    /// Whether this value can be used in a comparison filter.
    ///
    /// NaN has no ordering against anything, so it is rejected too.
    pub fn is_comparable(&self) -> bool {
        match self {
            Self::Double(v) => !v.is_nan(),
            Self::Float(v) => !v.is_nan(),
            other => other.value_type().is_comparable(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the value as an integer if it belongs to the integer family.
    pub fn as_integer(&self) -> Option<i128> {
        match self {
            Self::Byte(v) => Some(i128::from(*v)),
            Self::Integer(v) => Some(i128::from(*v)),
            Self::Long(v) => Some(i128::from(*v)),
            Self::BigInteger(v) => Some(*v),
            _ => None,
        }
    }

    /// Get the value as a long, if it is an integer that fits.
    pub fn as_long(&self) -> Option<i64> {
        self.as_integer().and_then(|v| i64::try_from(v).ok())
    }

    /// Get the value as a float. Integer-family values are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            other => other.as_integer().map(|v| v as f64),
        }
    }

    pub fn as_guarded_string(&self) -> Option<&GuardedString> {
        match self {
            Self::GuardedString(g) => Some(g),
            _ => None,
        }
    }

    /// Order two values.
    ///
    /// Returns `None` when the values have no common ordering: either side is
    /// not comparable, or the types belong to unrelated families.
    pub fn compare(&self, other: &AttributeValue) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            (Self::BigDecimal(a), Self::BigDecimal(b)) => Some(a.cmp(b)),
            (Self::BigDecimal(_), _) | (_, Self::BigDecimal(_)) => None,
            _ => {
                if let (Some(a), Some(b)) = (self.as_integer(), other.as_integer()) {
                    return Some(a.cmp(&b));
                }
                match (self.as_float(), other.as_float()) {
                    (Some(a), Some(b)) => a.partial_cmp(&b),
                    _ => None,
                }
            }
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{:?}", s),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Long(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Byte(v) => write!(f, "{}", v),
            Self::ByteArray(bytes) => write!(f, "base64:{}", BASE64.encode(bytes)),
            Self::BigInteger(v) => write!(f, "{}", v),
            Self::BigDecimal(v) => write!(f, "{}", v),
            Self::GuardedString(g) => write!(f, "{}", g),
            Self::Script(script) => write!(f, "script({})", script.language),
        }
    }
}

fn serialize_base64<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&BASE64.encode(bytes))
}

fn serialize_display<S>(value: &i128, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

macro_rules! impl_from_value {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for AttributeValue {
                fn from(value: $source) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_value! {
    String => String,
    i32 => Integer,
    i64 => Long,
    f64 => Double,
    f32 => Float,
    bool => Boolean,
    i8 => Byte,
    Vec<u8> => ByteArray,
    i128 => BigInteger,
    Decimal => BigDecimal,
    GuardedString => GuardedString,
    ScriptRef => Script,
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
