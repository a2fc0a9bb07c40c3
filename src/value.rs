use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A number that preserves the distinction between I64, U64, and F64.
/// Imported collections round-trip integer fields without picking up a
/// trailing `.0` on export.
#[derive(Debug, Clone, PartialEq)]
pub enum JdNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl JdNumber {
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            JdNumber::I64(v) => Some(*v),
            JdNumber::U64(v) => i64::try_from(*v).ok(),
            JdNumber::F64(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            JdNumber::I64(v) => *v as f64,
            JdNumber::U64(v) => *v as f64,
            JdNumber::F64(v) => *v,
        }
    }

    fn write_json(&self, out: &mut String) {
        match self {
            JdNumber::I64(v) => out.push_str(&v.to_string()),
            JdNumber::U64(v) => out.push_str(&v.to_string()),
            JdNumber::F64(v) => {
                if v.is_finite() {
                    let mut buf = ryu::Buffer::new();
                    out.push_str(buf.format(*v));
                } else {
                    // Strict JSON has no NaN/Infinity literal.
                    out.push_str("null");
                }
            }
        }
    }
}

impl Serialize for JdNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JdNumber::I64(v) => serializer.serialize_i64(*v),
            JdNumber::U64(v) => serializer.serialize_u64(*v),
            JdNumber::F64(v) => serializer.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for JdNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumberVisitor;

        impl<'de> de::Visitor<'de> for NumberVisitor {
            type Value = JdNumber;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON number")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(JdNumber::I64(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(JdNumber::U64(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(JdNumber::F64(v))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

/// A JSON value with order-preserving objects. The tagged union keeps the
/// filter predicate exhaustive instead of probing types at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum JdValue {
    Null,
    Bool(bool),
    Number(JdNumber),
    String(String),
    Array(Vec<JdValue>),
    Object(IndexMap<String, JdValue>),
}

impl JdValue {
    pub fn as_object(&self) -> Option<&IndexMap<String, JdValue>> {
        match self {
            JdValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JdValue]> {
        match self {
            JdValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JdValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JdValue::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            JdValue::Null => "null",
            JdValue::Bool(_) => "bool",
            JdValue::Number(_) => "number",
            JdValue::String(_) => "string",
            JdValue::Array(_) => "array",
            JdValue::Object(_) => "object",
        }
    }

    /// Parse a JSON text. The parser is a JSON5 superset, so hand-edited
    /// fixtures with trailing commas still load; anything it rejects is
    /// malformed for our purposes too.
    pub fn parse(text: &str) -> anyhow::Result<JdValue> {
        Ok(json5::from_str::<JdValue>(text)?)
    }

    /// Serialize as indented JSON (2 spaces), the export format.
    pub fn to_pretty(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out, 0, true);
        out.push('\n');
        out
    }

    /// Serialize as compact single-line JSON. This is the canonical text
    /// the filter engine compares structured values against.
    pub fn to_compact(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out, 0, false);
        out
    }

    /// Unquoted stringification used for table cells and text matching:
    /// strings render bare, null renders empty, structured values render
    /// as their compact JSON.
    pub fn display_text(&self) -> String {
        match self {
            JdValue::Null => String::new(),
            JdValue::Bool(v) => v.to_string(),
            JdValue::Number(n) => {
                let mut out = String::new();
                n.write_json(&mut out);
                out
            }
            JdValue::String(s) => s.clone(),
            JdValue::Array(_) | JdValue::Object(_) => self.to_compact(),
        }
    }

    fn write_json(&self, out: &mut String, indent: usize, pretty: bool) {
        match self {
            JdValue::Null => out.push_str("null"),
            JdValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            JdValue::Number(n) => n.write_json(out),
            JdValue::String(s) => write_escaped_string(out, s),
            JdValue::Array(values) => {
                out.push('[');
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    if pretty {
                        out.push('\n');
                        out.push_str(&" ".repeat(indent + 2));
                    }
                    v.write_json(out, indent + 2, pretty);
                }
                if pretty && !values.is_empty() {
                    out.push('\n');
                    out.push_str(&" ".repeat(indent));
                }
                out.push(']');
            }
            JdValue::Object(map) => {
                out.push('{');
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    if pretty {
                        out.push('\n');
                        out.push_str(&" ".repeat(indent + 2));
                    }
                    write_escaped_string(out, k);
                    out.push(':');
                    if pretty {
                        out.push(' ');
                    }
                    v.write_json(out, indent + 2, pretty);
                }
                if pretty && !map.is_empty() {
                    out.push('\n');
                    out.push_str(&" ".repeat(indent));
                }
                out.push('}');
            }
        }
    }
}

fn write_escaped_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write as _;
                write!(out, "\\u{:04x}", c as u32).ok();
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl Serialize for JdValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JdValue::Null => serializer.serialize_unit(),
            JdValue::Bool(v) => serializer.serialize_bool(*v),
            JdValue::Number(n) => n.serialize(serializer),
            JdValue::String(s) => serializer.serialize_str(s),
            JdValue::Array(values) => values.serialize(serializer),
            JdValue::Object(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for JdValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = JdValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(JdValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(JdValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(JdValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(JdValue::Number(JdNumber::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(JdValue::Number(JdNumber::U64(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(JdValue::Number(JdNumber::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(JdValue::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(JdValue::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<JdValue>()? {
                    values.push(value);
                }
                Ok(JdValue::Array(values))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, JdValue>()? {
                    values.insert(key, value);
                }
                Ok(JdValue::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
