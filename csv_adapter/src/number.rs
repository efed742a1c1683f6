/// Parses a number that may carry `,` thousands separators, e.g. `1,234.50`
pub fn parse_grouped(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse().ok().filter(|n: &f64| n.is_finite())
}

/// Two decimal places with `,` grouping, e.g. `-1,234,567.89`
pub fn format_grouped(value: f64) -> String {
    let plain = format!("{:.2}", value.abs());
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(plain.len() + integer.len() / 3 + 1);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let negative = value.is_sign_negative() && plain != "0.00";
    format!("{}{grouped}.{fraction}", if negative { "-" } else { "" })
}
