//! Formatting of wei amounts (the chain's smallest unit, 18 decimals) for
//! display.

pub const ETHER_SYMBOL: char = '\u{39e}';

const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Format a decimal wei string as ether, trailing zeros trimmed but always
/// with at least one fractional digit (`1000000000000000000` → `"1.0"`).
/// Malformed input formats as `"0.0"`; the composer has no error path.
pub fn format_ether(wei: &str) -> String {
    let wei: u128 = wei.parse().unwrap_or(0);
    let whole = wei / WEI_PER_ETHER;
    let fraction = wei % WEI_PER_ETHER;
    let fraction = format!("{fraction:018}");
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{fraction}")
    }
}
