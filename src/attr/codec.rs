//! Wire codec for attribute values.
//!
//! Booleans, integers and floats travel as native JSON scalars. Every other
//! scalar travels as one tagged string `"<tag>:<payload>"`, so the wire has a
//! single string channel and plain strings always carry the `s:` tag. Arrays
//! and maps recurse.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Number, Value};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::warn;
use uuid::Uuid;

use super::value::{AttributeValue, Color, Point, Rect, Size, Uri};
use super::{AttributeName, Attributes};
use crate::error::{GraphError, Result};

/// Wire form of an attribute map.
pub type AttrMap = BTreeMap<String, Value>;

/// Prefix identifying the kind carried by a tagged string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StringTag {
    /// `s:` plain string.
    String,
    /// `ymd:` timestamp.
    Date,
    /// `url:` absolute URI.
    Url,
    /// `id:` UUID.
    Id,
    /// `xy:` point.
    Point,
    /// `wh:` size.
    Size,
    /// `xywh:` rectangle.
    Rect,
    /// `rgba:` color.
    Color,
}

impl StringTag {
    /// Every registered tag.
    pub const ALL: [StringTag; 8] = [
        StringTag::String,
        StringTag::Date,
        StringTag::Url,
        StringTag::Id,
        StringTag::Point,
        StringTag::Size,
        StringTag::Rect,
        StringTag::Color,
    ];

    /// The tag text written before the `:`.
    pub const fn code(self) -> &'static str {
        match self {
            StringTag::String => "s",
            StringTag::Date => "ymd",
            StringTag::Url => "url",
            StringTag::Id => "id",
            StringTag::Point => "xy",
            StringTag::Size => "wh",
            StringTag::Rect => "xywh",
            StringTag::Color => "rgba",
        }
    }

    /// Looks up a tag by its text.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.code() == code)
    }
}

impl fmt::Display for StringTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Options applied while decoding wire values.
#[derive(Clone, Debug, Default)]
pub struct CodecOptions {
    /// Accept strings written without a registered tag, reading them as plain
    /// strings. Needed for documents produced by writers that stored raw
    /// strings untagged.
    pub accept_untagged_strings: bool,
}

impl CodecOptions {
    /// Creates the strict default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the untagged-string reading mode.
    pub fn accept_untagged_strings(mut self, enabled: bool) -> Self {
        self.accept_untagged_strings = enabled;
        self
    }
}

/// Encodes one value into its wire form.
pub fn encode_value(value: &AttributeValue) -> Result<Value> {
    let wire = match value {
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Int(i) => Value::Number(Number::from(*i)),
        AttributeValue::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .ok_or_else(|| GraphError::encode(format!("float {f} has no JSON form")))?,
        AttributeValue::String(s) => tagged(StringTag::String, s),
        AttributeValue::Timestamp(ts) => tagged(StringTag::Date, &format_timestamp(ts)?),
        AttributeValue::Uri(uri) => tagged(StringTag::Url, uri.as_str()),
        AttributeValue::UniqueId(id) => tagged(StringTag::Id, &format!("{id:X}")),
        AttributeValue::Point(p) => tagged(StringTag::Point, &join_components(&[p.x, p.y])?),
        AttributeValue::Size(s) => {
            tagged(StringTag::Size, &join_components(&[s.width, s.height])?)
        }
        AttributeValue::Rect(r) => tagged(
            StringTag::Rect,
            &join_components(&[r.origin.x, r.origin.y, r.size.width, r.size.height])?,
        ),
        AttributeValue::Color(c) => {
            let components = c.components();
            if components.iter().any(|v| !(0.0..=1.0).contains(v)) {
                return Err(GraphError::encode(format!(
                    "color components must lie in [0, 1], got {components:?}"
                )));
            }
            tagged(StringTag::Color, &join_components(&components)?)
        }
        AttributeValue::Array(items) => Value::Array(
            items
                .iter()
                .map(encode_value)
                .collect::<Result<Vec<_>>>()?,
        ),
        AttributeValue::Map(entries) => {
            let mut map = Map::new();
            for (key, item) in entries {
                map.insert(key.clone(), encode_value(item)?);
            }
            Value::Object(map)
        }
    };
    Ok(wire)
}

/// Decodes one wire value.
///
/// Candidate kinds are tried in a fixed order: bool, int, float, tagged
/// string, array, map. A JSON `1` is an integer and `1.0` a float; a string is
/// never read as a number.
pub fn decode_value(wire: &Value, opts: &CodecOptions) -> Result<AttributeValue> {
    match wire {
        Value::Bool(b) => Ok(AttributeValue::Bool(*b)),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(AttributeValue::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(AttributeValue::Float(f))
            } else {
                Err(GraphError::decode(format!("unrepresentable number {n}")))
            }
        }
        Value::String(s) => decode_string(s, opts),
        Value::Array(items) => items
            .iter()
            .map(|item| decode_value(item, opts))
            .collect::<Result<Vec<_>>>()
            .map(AttributeValue::Array),
        Value::Object(map) => {
            let mut entries = BTreeMap::new();
            for (key, item) in map {
                entries.insert(key.clone(), decode_value(item, opts)?);
            }
            Ok(AttributeValue::Map(entries))
        }
        Value::Null => Err(GraphError::decode("null matches no attribute kind")),
    }
}

/// Encodes a bag into its wire map. Empty bags encode as `None` so callers can
/// omit them.
pub fn encode_attributes(attrs: &Attributes) -> Result<Option<AttrMap>> {
    if attrs.is_empty() {
        return Ok(None);
    }
    let mut map = AttrMap::new();
    for (name, value) in attrs.iter() {
        let wire = encode_value(value).map_err(|err| match err {
            GraphError::AttributeEncode(reason) => {
                GraphError::AttributeEncode(format!("'{name}': {reason}"))
            }
            other => other,
        })?;
        map.insert(name.as_str().to_owned(), wire);
    }
    Ok(Some(map))
}

/// Decodes a wire map into a bag. A single malformed entry fails the whole map.
pub fn decode_attributes(map: &AttrMap, opts: &CodecOptions) -> Result<Attributes> {
    let mut attrs = Attributes::new();
    for (name, wire) in map {
        let value = decode_value(wire, opts).map_err(|err| match err {
            GraphError::AttributeDecode(reason) => {
                GraphError::AttributeDecode(format!("'{name}': {reason}"))
            }
            other => other,
        })?;
        attrs.set(AttributeName::new(name.as_str()), value);
    }
    Ok(attrs)
}

fn tagged(tag: StringTag, payload: &str) -> Value {
    Value::String(format!("{}:{}", tag.code(), payload))
}

fn decode_string(text: &str, opts: &CodecOptions) -> Result<AttributeValue> {
    let split = text
        .split_once(':')
        .and_then(|(code, payload)| StringTag::from_code(code).map(|tag| (tag, payload)));
    let Some((tag, payload)) = split else {
        if opts.accept_untagged_strings {
            warn!(value = text, "codec.untagged_string");
            return Ok(AttributeValue::String(text.to_owned()));
        }
        return Err(match text.split_once(':') {
            None => GraphError::decode(format!("untagged string '{text}'")),
            Some((code, _)) => GraphError::decode(format!("unknown tag '{code}' in '{text}'")),
        });
    };
    match decode_payload(tag, payload) {
        Ok(value) => {
            if opts.accept_untagged_strings {
                warn!(
                    value = text,
                    tag = tag.code(),
                    kind = %value.kind(),
                    "codec.untagged_string.ambiguous_prefix"
                );
            }
            Ok(value)
        }
        Err(err) if opts.accept_untagged_strings => {
            warn!(
                value = text,
                tag = tag.code(),
                error = %err,
                "codec.untagged_string.malformed_payload"
            );
            Ok(AttributeValue::String(text.to_owned()))
        }
        Err(err) => Err(err),
    }
}

fn decode_payload(tag: StringTag, payload: &str) -> Result<AttributeValue> {
    let value = match tag {
        StringTag::String => AttributeValue::String(payload.to_owned()),
        StringTag::Date => AttributeValue::Timestamp(
            OffsetDateTime::parse(payload, &Rfc3339)
                .map_err(|err| GraphError::decode(format!("invalid date '{payload}': {err}")))?,
        ),
        StringTag::Url => AttributeValue::Uri(Uri::parse(payload)?),
        StringTag::Id => AttributeValue::UniqueId(
            Uuid::parse_str(payload)
                .map_err(|err| GraphError::decode(format!("invalid id '{payload}': {err}")))?,
        ),
        StringTag::Point => {
            let [x, y] = split_components(payload, tag)?;
            AttributeValue::Point(Point::new(x, y))
        }
        StringTag::Size => {
            let [width, height] = split_components(payload, tag)?;
            AttributeValue::Size(Size::new(width, height))
        }
        StringTag::Rect => {
            let [x, y, width, height] = split_components(payload, tag)?;
            AttributeValue::Rect(Rect::new(x, y, width, height))
        }
        StringTag::Color => {
            let [red, green, blue, alpha] = split_components(payload, tag)?;
            let color = Color::new(red, green, blue, alpha);
            if color.components().iter().any(|v| !(0.0..=1.0).contains(v)) {
                return Err(GraphError::decode(format!(
                    "color components must lie in [0, 1], got '{payload}'"
                )));
            }
            AttributeValue::Color(color)
        }
    };
    Ok(value)
}

fn split_components<const N: usize>(payload: &str, tag: StringTag) -> Result<[f64; N]> {
    let mut out = [0.0; N];
    let mut parts = payload.split(',');
    for slot in out.iter_mut() {
        let part = parts.next().ok_or_else(|| {
            GraphError::decode(format!("'{tag}' payload '{payload}' needs {N} numbers"))
        })?;
        let number: f64 = part.parse().map_err(|_| {
            GraphError::decode(format!("'{tag}' payload '{payload}' has non-numeric '{part}'"))
        })?;
        if !number.is_finite() {
            return Err(GraphError::decode(format!(
                "'{tag}' payload '{payload}' has non-finite '{part}'"
            )));
        }
        *slot = number;
    }
    if parts.next().is_some() {
        return Err(GraphError::decode(format!(
            "'{tag}' payload '{payload}' needs exactly {N} numbers"
        )));
    }
    Ok(out)
}

fn join_components(components: &[f64]) -> Result<String> {
    if let Some(bad) = components.iter().find(|v| !v.is_finite()) {
        return Err(GraphError::encode(format!("non-finite component {bad}")));
    }
    Ok(components
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(","))
}

fn format_timestamp(ts: &OffsetDateTime) -> Result<String> {
    let utc = ts.to_offset(UtcOffset::UTC);
    if !(0..=9999).contains(&utc.year()) {
        return Err(GraphError::encode(format!(
            "timestamp year {} is outside 0..=9999",
            utc.year()
        )));
    }
    let format = format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
    );
    utc.format(format)
        .map_err(|err| GraphError::encode(format!("timestamp {ts}: {err}")))
}
