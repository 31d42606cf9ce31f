//! Lenient timestamp coercion.
//!
//! Upstream timing fields arrive as strings, numbers, or not at all. Every
//! read goes through [`to_ms`], which maps any input to a finite number and
//! falls back to `0`.

use serde_json::Value;

/// Interpret an untrusted value as a millisecond offset.
pub fn to_ms(v: Option<&Value>) -> f64 {
    let n = match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_text(s),
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// Text to number. Blank text is zero; anything unparseable is NaN and gets
/// zeroed by the caller.
fn parse_text(s: &str) -> f64 {
    let s = s.trim();
    if s.is_empty() {
        return 0.0;
    }

    let radix = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
        .iter()
        .find_map(|(prefix, radix)| s.strip_prefix(prefix).map(|rest| (rest, *radix)));
    if let Some((digits, radix)) = radix {
        return u64::from_str_radix(digits, radix)
            .map(|n| n as f64)
            .unwrap_or(f64::NAN);
    }

    // f64::from_str also takes "inf"/"nan" spellings; those end up non-finite.
    s.parse::<f64>().unwrap_or(f64::NAN)
}

/// Render a coerced offset the way it is shown in string fields: integers
/// without a fractional part, everything else in shortest form. Magnitudes
/// from 1e21 up and below 1e-6 use exponent form (`1e+21`, `1.5e-7`).
pub fn format_ms(ms: f64) -> String {
    if ms == 0.0 {
        // also folds -0
        return "0".to_string();
    }

    let mag = ms.abs();
    if !(1e-6..1e21).contains(&mag) {
        let exp = format!("{ms:e}");
        return match exp.split_once('e') {
            Some((mantissa, e)) if !e.starts_with('-') => format!("{mantissa}e+{e}"),
            _ => exp,
        };
    }
    format!("{ms}")
}
