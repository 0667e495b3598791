use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::NumberFormat;

static CURRENCY_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\d+\-.,]+").unwrap());

const RATING_SUFFIX: &str = "/5.0";
const RATING_SCALE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Parse a plain decimal (`1999.99`, ` 4.5 `, `1e3`). Anything else is null.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(t).ok())
}

/// Half-to-even, two places.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// `R$ 1.999,99` → `1999.99`. Unparseable prices are null.
pub fn parse_price(raw: &str, format: &NumberFormat) -> Option<Decimal> {
    let amount = CURRENCY_PREFIX_RE.replace(raw.trim(), "");
    let mut cleaned = amount.into_owned();
    if !format.thousands_separator.is_empty() {
        cleaned = cleaned.replace(format.thousands_separator.as_str(), "");
    }
    if !format.decimal_separator.is_empty() {
        cleaned = cleaned.replace(format.decimal_separator.as_str(), ".");
    }
    // `.50` and `-.50` need a leading zero
    let trimmed = cleaned.trim_start();
    let with_zero = if let Some(rest) = trimmed.strip_prefix("-.") {
        Some(format!("-0.{}", rest))
    } else if trimmed.starts_with('.') {
        Some(format!("0{}", trimmed))
    } else {
        None
    };
    parse_decimal(with_zero.as_deref().unwrap_or(&cleaned)).map(round2)
}

/// `10% OFF` → `10`. Unparseable discounts count as zero.
pub fn parse_discount(raw: &str) -> Decimal {
    parse_decimal(&raw.replace("% OFF", "").replace('%', "")).unwrap_or(Decimal::ZERO)
}

/// `4.5/5.0` → `90`, i.e. the 0-5 rating on a 0-100 scale.
pub fn parse_rating(raw: &str) -> Option<Decimal> {
    parse_decimal(&raw.replace(RATING_SUFFIX, ""))?.checked_mul(RATING_SCALE)
}

/// `27/11/2025` → `27-11-2025`. No calendar validation.
pub fn format_date(raw: &str) -> String {
    raw.replace('/', "-")
}

/// price × (1 − discount/100), rounded to two places. Null price (or overflow) gives null.
pub fn net_price(price: Option<Decimal>, discount_pct: Decimal) -> Option<Decimal> {
    let factor = Decimal::ONE.checked_sub(discount_pct.checked_div(Decimal::ONE_HUNDRED)?)?;
    price?.checked_mul(factor).map(round2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn brl() -> NumberFormat {
        NumberFormat::default()
    }

    #[test]
    fn price_with_thousands_and_comma() {
        assert_eq!(parse_price("R$ 1.999,99", &brl()), Some(dec("1999.99")));
        assert_eq!(parse_price("R$ 549,50", &brl()), Some(dec("549.50")));
        assert_eq!(parse_price("  R$ 4.500,00 ", &brl()), Some(dec("4500")));
    }

    #[test]
    fn price_other_currency_prefixes() {
        assert_eq!(parse_price("US$ 12,00", &brl()), Some(dec("12")));
        assert_eq!(parse_price("€1.000,5", &brl()), Some(dec("1000.5")));
        assert_eq!(parse_price("-5,25", &brl()), Some(dec("-5.25")));
    }

    #[test]
    fn price_rounds_to_two_places() {
        assert_eq!(parse_price("R$ 10,125", &brl()), Some(dec("10.12")));
        assert_eq!(parse_price("R$ 10,135", &brl()), Some(dec("10.14")));
    }

    #[test]
    fn unparseable_price_is_null() {
        assert_eq!(parse_price("Consulte", &brl()), None);
        assert_eq!(parse_price("", &brl()), None);
        assert_eq!(parse_price("R$ 1,2,3", &brl()), None);
    }

    #[test]
    fn price_leading_decimal_separator() {
        assert_eq!(parse_price("R$ ,50", &brl()), Some(dec("0.50")));
        assert_eq!(parse_price("R$ 0,50", &brl()), Some(dec("0.50")));
        assert_eq!(parse_price("-,25", &brl()), Some(dec("-0.25")));
        let us = NumberFormat {
            thousands_separator: ",".into(),
            decimal_separator: ".".into(),
        };
        assert_eq!(parse_price("$.99", &us), Some(dec("0.99")));
    }

    #[test]
    fn price_with_dot_decimal_format() {
        let us = NumberFormat {
            thousands_separator: ",".into(),
            decimal_separator: ".".into(),
        };
        assert_eq!(parse_price("$1,999.99", &us), Some(dec("1999.99")));
    }

    #[test]
    fn discount_variants() {
        assert_eq!(parse_discount("10% OFF"), dec("10"));
        assert_eq!(parse_discount("5%"), dec("5"));
        assert_eq!(parse_discount(" 12.5 "), dec("12.5"));
    }

    #[test]
    fn bad_discount_defaults_to_zero() {
        assert_eq!(parse_discount("Promo"), Decimal::ZERO);
        assert_eq!(parse_discount(""), Decimal::ZERO);
    }

    #[test]
    fn rating_scaled_to_percent() {
        assert_eq!(parse_rating("4.5/5.0"), Some(dec("90")));
        assert_eq!(parse_rating("5.0/5.0"), Some(dec("100")));
        assert_eq!(parse_rating("3.9/5.0"), Some(dec("78")));
        assert_eq!(parse_rating("n/a"), None);
    }

    #[test]
    fn date_separators() {
        assert_eq!(format_date("27/11/2025"), "27-11-2025");
        assert_eq!(format_date("31/02/2025"), "31-02-2025");
        assert_eq!(format_date("2025-11-27"), "2025-11-27");
    }

    #[test]
    fn net_price_scenario() {
        // 1999.99 × 0.9 = 1799.991
        assert_eq!(net_price(Some(dec("1999.99")), dec("10")), Some(dec("1799.99")));
    }

    #[test]
    fn net_price_rounds_half_to_even() {
        // 549.50 × 0.95 = 522.025
        assert_eq!(net_price(Some(dec("549.50")), dec("5")), Some(dec("522.02")));
        // 10.50 × 0.75 = 7.875
        assert_eq!(net_price(Some(dec("10.50")), dec("25")), Some(dec("7.88")));
    }

    #[test]
    fn net_price_null_propagates() {
        assert_eq!(net_price(None, dec("10")), None);
        assert_eq!(net_price(Some(dec("100")), Decimal::ZERO), Some(dec("100")));
    }

    #[test]
    fn net_price_overflow_is_null() {
        assert_eq!(net_price(Some(Decimal::MAX), dec("-100")), None);
    }
}
