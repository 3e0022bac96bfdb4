use serde_json::Value;

/// Shown in place of any figure the provider did not report.
pub const UNAVAILABLE: &str = "N/A";

/// Render a provider value (number or numeric string) with a T/B/M magnitude suffix.
pub fn format_large_number(value: &Value) -> String {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => format_magnitude(n),
        _ => UNAVAILABLE.to_string(),
    }
}

pub fn format_magnitude(number: f64) -> String {
    if number >= 1_000_000_000_000.0 {
        format!("₹{:.2}T", number / 1_000_000_000_000.0)
    } else if number >= 1_000_000_000.0 {
        format!("₹{:.2}B", number / 1_000_000_000.0)
    } else if number >= 1_000_000.0 {
        format!("₹{:.2}M", number / 1_000_000.0)
    } else {
        format!("₹{}", group_thousands(number))
    }
}

/// Two decimals with comma-separated thousands, e.g. `12,345.60`.
fn group_thousands(number: f64) -> String {
    let fixed = format!("{:.2}", number.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if number < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

/// Pass a provider value through as text, the way it was reported.
pub fn format_raw(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => UNAVAILABLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
