//! USDC amount formatting

use rust_decimal::Decimal;

/// Format a USDC amount with four decimals, e.g. `$0.0110`
pub fn format_usdc(amount: Decimal) -> String {
    format!("${:.4}", amount)
}
