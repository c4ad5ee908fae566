use serde::Deserialize;

use crate::error::SignatureError;
use crate::payload::{Number, Payload};

const ITEM_SEPARATOR: &str = ",";
const KEY_SEPARATOR: &str = ": ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Escaping {
    #[default]
    Ascii,
    Utf8,
}

pub fn canonical_json(payload: &Payload) -> Result<String, SignatureError> {
    canonical_json_with(payload, Escaping::default())
}

pub fn canonical_json_with(payload: &Payload, escaping: Escaping) -> Result<String, SignatureError> {
    let mut out = String::new();
    write_value(&mut out, payload, escaping)?;
    Ok(out.trim().to_string())
}

fn write_value(out: &mut String, value: &Payload, escaping: Escaping) -> Result<(), SignatureError> {
    match value {
        Payload::Null => out.push_str("null"),
        Payload::Bool(true) => out.push_str("true"),
        Payload::Bool(false) => out.push_str("false"),
        Payload::Number(Number::Integer(i)) => out.push_str(&i.to_string()),
        Payload::Number(Number::Float(f)) => write_float(out, *f)?,
        Payload::String(s) => write_str(out, s, escaping),
        Payload::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(ITEM_SEPARATOR);
                }
                write_value(out, item, escaping)?;
            }
            out.push(']');
        }
        Payload::Object(map) => {
            // BTreeMap<String, _> iterates in byte order, which for UTF-8 is code point order.
            out.push('{');
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(ITEM_SEPARATOR);
                }
                write_str(out, k, escaping);
                out.push_str(KEY_SEPARATOR);
                write_value(out, v, escaping)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn write_str(out: &mut String, s: &str, escaping: Escaping) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            ' '..='~' => out.push(c),
            c if escaping == Escaping::Utf8 && c >= ' ' => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{unit:04x}"));
                }
            }
        }
    }
    out.push('"');
}

fn write_float(out: &mut String, v: f64) -> Result<(), SignatureError> {
    if !v.is_finite() {
        return Err(SignatureError::Serialization(format!(
            "float {v} has no JSON representation"
        )));
    }
    if v.is_sign_negative() {
        out.push('-');
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. "1.2345e-7".
    let sci = format!("{:e}", v.abs());
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let point = exponent + 1;

    if point <= -4 || point > 16 {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        out.push_str(&format!("e{sign}{:02}", exponent.abs()));
    } else if point <= 0 {
        out.push_str("0.");
        out.push_str(&"0".repeat(point.unsigned_abs() as usize));
        out.push_str(&digits);
    } else {
        let point = point as usize;
        if point >= digits.len() {
            out.push_str(&digits);
            out.push_str(&"0".repeat(point - digits.len()));
            out.push_str(".0");
        } else {
            out.push_str(&digits[..point]);
            out.push('.');
            out.push_str(&digits[point..]);
        }
    }
    Ok(())
}
