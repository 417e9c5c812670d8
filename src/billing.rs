use std::fmt;
use std::str::FromStr;

use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use strum::VariantNames;
use strum_macros::{Display, EnumString, VariantNames};

use crate::error::{AmountError, InvoiceError};

#[derive(
    Display,
    EnumString,
    VariantNames,
    Serialize,
    Deserialize,
    Debug,
    PartialEq,
    Clone,
    Copy,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Cad,
    Aud,
    Chf,
}

impl Currency {
    pub fn parse(code: &str) -> Result<Self, InvoiceError> {
        Self::from_str(code.trim()).map_err(|_| InvoiceError::Currency {
            code: code.to_string(),
            supported: Self::VARIANTS.join(", "),
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Cad => "CA$",
            Currency::Aud => "A$",
            Currency::Chf => "CHF ",
        }
    }
}

/// A positive amount in the smallest currency unit.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl FromStr for Cents {
    type Err = AmountError;

    /// Accepts "500", "500.00", "50.5" and "$20". More than two fractional
    /// digits are rounded half away from zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
        let invalid = || AmountError::Invalid {
            input: s.to_string(),
        };

        // Decimal's parser skips digit separators; amounts never carry them.
        if digits.contains('_') {
            return Err(invalid());
        }
        let dollars = Decimal::from_str(digits).map_err(|_| invalid())?;
        if dollars <= Decimal::ZERO {
            return Err(AmountError::NotPositive);
        }

        let cents = dollars
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(invalid)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .ok_or_else(invalid)?;

        // 0.001 and friends round away to nothing.
        if cents <= 0 {
            return Err(AmountError::NotPositive);
        }
        Ok(Cents(cents))
    }
}

/// An amount paired with the currency it is billed in.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Money(pub Currency, pub Cents);

impl fmt::Display for Money {
    /// Whole amounts drop the decimals: `$1,250`, `€50.99`.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cents = self.1.value();
        let whole = (cents / 100).to_formatted_string(&Locale::en);
        match cents % 100 {
            0 => write!(f, "{}{}", self.0.symbol(), whole),
            fraction => write!(f, "{}{}.{:02}", self.0.symbol(), whole, fraction),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn cents(s: &str) -> Result<i64, AmountError> {
        s.parse::<Cents>().map(|c| c.value())
    }

    #[test]
    fn parses_plain_amounts() {
        assert_eq!(cents("500"), Ok(50000));
        assert_eq!(cents("500.00"), Ok(50000));
        assert_eq!(cents("50.5"), Ok(5050));
        assert_eq!(cents("50.99"), Ok(5099));
        assert_eq!(cents(" $20 "), Ok(2000));
        assert_eq!(cents("0.01"), Ok(1));
    }

    #[test]
    fn rounds_extra_precision() {
        assert_eq!(cents("10.005"), Ok(1001));
        assert_eq!(cents("10.004"), Ok(1000));
        assert_eq!(cents("0.001"), Err(AmountError::NotPositive));
    }

    #[test]
    fn rejects_non_positive() {
        assert_eq!(cents("0"), Err(AmountError::NotPositive));
        assert_eq!(cents("-5"), Err(AmountError::NotPositive));
        assert_eq!(cents("$0.00"), Err(AmountError::NotPositive));
    }

    #[test]
    fn rejects_garbage() {
        for input in ["", "abc", "12abc", "$", "1,000", "1_000", "10.5_0", "ten"] {
            assert_eq!(
                cents(input),
                Err(AmountError::Invalid {
                    input: input.to_string()
                }),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn currency_codes() {
        assert_eq!(Currency::parse("usd").unwrap(), Currency::Usd);
        assert_eq!(Currency::parse("EUR").unwrap(), Currency::Eur);
        assert_eq!(Currency::Gbp.to_string(), "gbp");
        assert_eq!(
            serde_json::to_string(&Currency::Chf).unwrap(),
            "\"chf\""
        );
        assert!(matches!(
            Currency::parse("doge"),
            Err(InvoiceError::Currency { .. })
        ));
    }

    #[test]
    fn display_money() {
        let money = |c: &str| Money(Currency::Usd, c.parse().unwrap());
        assert_eq!(money("500").to_string(), "$500");
        assert_eq!(money("1250").to_string(), "$1,250");
        assert_eq!(money("50.99").to_string(), "$50.99");
        assert_eq!(money("0.5").to_string(), "$0.50");
        assert_eq!(
            Money(Currency::Eur, "1234567.8".parse().unwrap()).to_string(),
            "€1,234,567.80"
        );
    }

    proptest! {
        #[test]
        fn two_decimal_amounts_are_exact(dollars in 0i64..10_000_000, fraction in 0i64..100) {
            prop_assume!(dollars > 0 || fraction > 0);
            let input = format!("{}.{:02}", dollars, fraction);
            prop_assert_eq!(cents(&input), Ok(dollars * 100 + fraction));
        }

        #[test]
        fn parsing_matches_decimal_rounding(raw in 1u64..1_000_000_000) {
            // raw thousandths of a dollar, e.g. 12345 -> "12.345"
            let input = format!("{}.{:03}", raw / 1000, raw % 1000);
            let expected = (Decimal::new(raw as i64, 3) * dec!(100))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
                .unwrap();
            if expected > 0 {
                prop_assert_eq!(cents(&input), Ok(expected));
            } else {
                prop_assert_eq!(cents(&input), Err(AmountError::NotPositive));
            }
        }

        #[test]
        fn non_positive_is_rejected(dollars in -1_000_000i64..=0) {
            prop_assert_eq!(cents(&dollars.to_string()), Err(AmountError::NotPositive));
        }
    }
}
