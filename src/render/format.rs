//! Price formatting for the overlay text.

/// Formats a USD price.
///
/// Prices of 1000 and above are rounded to whole dollars, smaller prices
/// keep two decimals. Both use thousands separators.
///
/// ```
/// use frog_price_bot::render::format_price;
///
/// assert_eq!(format_price(27_543.2), "$27,543");
/// assert_eq!(format_price(182.5), "$182.50");
/// ```
#[must_use]
pub fn format_price(price: f64) -> String {
    let fixed = if price >= 1000.0 {
        format!("{price:.0}")
    } else {
        format!("{price:.2}")
    };

    let (sign, unsigned) = fixed
        .strip_prefix('-')
        .map_or(("", fixed.as_str()), |rest| ("-", rest));
    let (int_part, frac_part) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(i, f)| (i, Some(f)));

    let mut out = format!("{sign}${}", group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Inserts `,` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Two-line overlay text.
#[must_use]
pub fn overlay_text(btc: f64, eth: f64) -> String {
    format!("BTC: {}\nETH: {}", format_price(btc), format_price(eth))
}
