//! Numeric argument parsing with C `strtod` / `atoi` leniency.

/// Sample rate in Hz: leading floating-point prefix, truncated
///
/// Fails only when no prefix parses at all. Negative values land on 0 and
/// anything past `u32::MAX` saturates.
pub fn parse_sample_rate(s: &str) -> Result<u32, String> {
    let value = float_prefix(s).ok_or_else(|| format!("'{}' is not a number", s))?;
    Ok(value as u32)
}

/// Symbol period in microseconds: leading integer, 0 when there is none
///
/// Negative periods wrap the way a C `int` stored into `uint32_t` does.
pub fn parse_symbol_period(s: &str) -> Result<u32, String> {
    Ok(int_prefix(s) as u32)
}

fn float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    // Longest prefix wins, e.g. "2e6Hz" is 2e6
    s.char_indices()
        .map(|(idx, ch)| idx + ch.len_utf8())
        .rev()
        .find_map(|end| s[..end].parse::<f64>().ok())
}

fn int_prefix(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add((d - b'0') as i64)
        });
    let value = if negative { -magnitude } else { magnitude };
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
