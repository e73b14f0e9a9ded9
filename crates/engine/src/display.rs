//! Text formatting for the calculator displays and ledger rows.

/// Symbol used by currency mode.
pub const CURRENCY_SYMBOL: &str = "$";

/// Shown instead of a value too large for an `f64`.
pub const OVERFLOW: &str = "Overflow";

/// Entry buffers longer than this switch to a compact rendering.
const MAX_PLAIN_LEN: usize = 12;

/// Insert `,` every three digits of the integer part.
///
/// The fractional part, a trailing `.` and a leading `-` are kept verbatim.
///
/// ```rust
/// use engine::display::group_thousands;
///
/// assert_eq!(group_thousands("1234567.891"), "1,234,567.891");
/// assert_eq!(group_thousands("-1000."), "-1,000.");
/// ```
#[must_use]
pub fn group_thousands(text: &str) -> String {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int, frac) = match rest.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (rest, None),
    };
    if int.is_empty() || !int.chars().all(|c| c.is_ascii_digit()) {
        return text.to_string();
    }

    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Render an entry buffer for the plain display.
///
/// Long buffers become exponent notation (very large or very small values)
/// or 12 significant digits; values from 1000 up get thousands separators.
#[must_use]
pub fn format_plain(entry: &str) -> String {
    let Ok(num) = entry.trim_end_matches('.').parse::<f64>() else {
        return entry.to_string();
    };
    if !num.is_finite() {
        return OVERFLOW.to_string();
    }

    let text = if entry.len() > MAX_PLAIN_LEN {
        compact(num)
    } else {
        entry.to_string()
    };

    if num.abs() >= 1000.0 {
        group_thousands(&text)
    } else {
        text
    }
}

/// Render a value as money: symbol, separators and exactly two decimals.
///
/// ```rust
/// use engine::display::format_currency;
///
/// assert_eq!(format_currency(1234.5), "$1,234.50");
/// assert_eq!(format_currency(-5.0), "-$5.00");
/// ```
#[must_use]
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return OVERFLOW.to_string();
    }
    let text = format!("{:.2}", value.abs());
    let sign = if value < 0.0 && text != "0.00" { "-" } else { "" };
    format!("{sign}{CURRENCY_SYMBOL}{}", group_thousands(&text))
}

fn compact(num: f64) -> String {
    let abs = num.abs();
    if abs >= 1e12 || (abs < 1e-6 && num != 0.0) {
        return format!("{num:.6e}");
    }

    let digits = if abs < 1.0 {
        1
    } else {
        abs.log10().floor() as i32 + 1
    };
    let decimals = (MAX_PLAIN_LEN as i32 - digits).max(0) as usize;
    let text = format!("{num:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}
