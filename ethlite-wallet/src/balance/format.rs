//! Balance unit conversion and display formatting

use ethers::types::U256;

/// Decimals of the native ether unit
pub const ETHER_DECIMALS: usize = 18;

/// Convert wei to an exact ether decimal string
///
/// Uses integer division by 10^18, so arbitrarily large balances keep full
/// precision. Trailing zeros are trimmed but one fractional digit is always
/// kept (`"0.0"`, `"1.5"`, `"12.000000000000000001"`).
pub fn format_wei(wei: U256) -> String {
    let (whole, fraction) = wei.div_mod(U256::exp10(ETHER_DECIMALS));

    // fraction < 10^18 always fits in a u64
    let fraction = format!("{:0>width$}", fraction.as_u64(), width = ETHER_DECIMALS);
    let trimmed = fraction.trim_end_matches('0');

    format!("{}.{}", whole, if trimmed.is_empty() { "0" } else { trimmed })
}

/// Format an ether decimal string for display
///
/// Precision depends on magnitude; this only affects presentation. Input
/// that does not parse as a number renders as zero.
pub fn format_balance(balance_in_eth: &str) -> String {
    let balance = balance_in_eth.trim().parse::<f64>().unwrap_or(0.0);

    if balance == 0.0 || !balance.is_finite() {
        return "0.00 ETH".to_string();
    }

    let digits = if balance < 0.000001 {
        8
    } else if balance < 0.001 {
        6
    } else if balance < 1.0 {
        4
    } else {
        2
    };

    format!("{} ETH", to_fixed(balance, digits))
}

/// Enough fractional digits to print any finite `f64` exactly
const EXACT_DIGITS: usize = 1100;

/// Fixed-point rendering of `value` with `digits` fractional digits
///
/// Rounds on the exact binary value, with exact ties going away from zero.
/// `format!("{:.N}")` would send ties to even (`1.125` -> `1.12`).
fn to_fixed(value: f64, digits: usize) -> String {
    let exact = format!("{:.*}", EXACT_DIGITS, value.abs());
    let (whole, fraction) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = whole
        .bytes()
        .chain(fraction.bytes().chain(std::iter::repeat(b'0')).take(digits))
        .collect();

    if fraction.as_bytes().get(digits).is_some_and(|d| *d >= b'5') {
        round_up(&mut kept);
    }

    let (whole, fraction) = kept.split_at(kept.len() - digits);
    let sign = if value < 0.0 { "-" } else { "" };

    format!(
        "{}{}.{}",
        sign,
        String::from_utf8_lossy(whole),
        String::from_utf8_lossy(fraction)
    )
}

/// Add one unit in the last place of a string of ASCII digits
fn round_up(digits: &mut Vec<u8>) {
    for digit in digits.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return;
        }
    }
    digits.insert(0, b'1');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_wei() {
        assert_eq!(format_wei(U256::zero()), "0.0");
        assert_eq!(format_wei(U256::exp10(18)), "1.0");
        assert_eq!(format_wei(U256::from(1_500_000_000_000_000_000u64)), "1.5");
        assert_eq!(format_wei(U256::one()), "0.000000000000000001");
        assert_eq!(format_wei(U256::exp10(18) * U256::from(12u64) + U256::one()), "12.000000000000000001");
    }

    #[test]
    fn test_format_wei_beyond_u64() {
        // 123456789 ether does not fit in 64 bits of wei
        let wei = U256::from_dec_str("123456789000000000000000000").unwrap();
        assert_eq!(format_wei(wei), "123456789.0");
    }

    #[test]
    fn test_format_balance_zero() {
        assert_eq!(format_balance("0"), "0.00 ETH");
        assert_eq!(format_balance("0.0"), "0.00 ETH");
    }

    #[test]
    fn test_format_balance_precision_bands() {
        assert_eq!(format_balance("0.0000005"), "0.00000050 ETH");
        assert_eq!(format_balance("0.0005"), "0.000500 ETH");
        assert_eq!(format_balance("0.5"), "0.5000 ETH");
        assert_eq!(format_balance("1.5"), "1.50 ETH");
        assert_eq!(format_balance("1234.5678"), "1234.57 ETH");
    }

    #[test]
    fn test_format_balance_band_edges() {
        assert_eq!(format_balance("0.000001"), "0.000001 ETH");
        assert_eq!(format_balance("0.001"), "0.0010 ETH");
        assert_eq!(format_balance("1"), "1.00 ETH");
    }

    #[test]
    fn test_format_balance_rounds_ties_up() {
        assert_eq!(format_balance("1.125"), "1.13 ETH");
        assert_eq!(format_balance("0.03125"), "0.0313 ETH");
        assert_eq!(format_balance("0.0009765625"), "0.000977 ETH");

        let wei = U256::from(1_125_000_000_000_000_000u64);
        assert_eq!(format_balance(&format_wei(wei)), "1.13 ETH");
    }

    #[test]
    fn test_format_balance_rounds_binary_value() {
        // 1.005 is stored just below the tie, 1.0050000001 just above it
        assert_eq!(format_balance("1.005"), "1.00 ETH");
        assert_eq!(format_balance("1.0050000001"), "1.01 ETH");
        assert_eq!(format_balance("1.2345"), "1.23 ETH");
    }

    #[test]
    fn test_format_balance_carries_into_whole_part() {
        assert_eq!(format_balance("9.999"), "10.00 ETH");
        assert_eq!(format_balance("0.99996"), "1.0000 ETH");
    }

    #[test]
    fn test_to_fixed_negative() {
        assert_eq!(to_fixed(-1.125, 2), "-1.13");
    }

    #[test]
    fn test_format_balance_unparsable() {
        assert_eq!(format_balance("not a number"), "0.00 ETH");
        assert_eq!(format_balance(""), "0.00 ETH");
    }
}
