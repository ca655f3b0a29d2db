use crate::error::{CommodityMismatch, EvaluationError, ParseError};
use crate::parser::Rule;
use pest::iterators::Pair;
use rust_decimal::Decimal;

use std::fmt;

/// Unit or currency tag of an [`Amount`], e.g. `USD`, `$` or `AAPL`.
///
/// Commodities are compared verbatim, `usd` and `USD` are two different units.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Commodity(String);

impl Commodity {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn parse(token: Pair<'_, Rule>) -> Result<Commodity, ParseError> {
        if token.as_rule() != Rule::commodity {
            return Err(ParseError::at(
                &token,
                format!("unexpected token for commodity: '{}'", token.as_str()),
            ));
        }

        // commodity wraps either a bare or a quoted symbol, quotes are dropped
        let symbol = token
            .clone()
            .into_inner()
            .next()
            .ok_or_else(|| ParseError::at(&token, "empty commodity symbol"))?;
        Ok(Self::new(symbol.as_str()))
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Commodity {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Exact decimal quantity tagged with its [`Commodity`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Amount {
    number: Decimal,
    commodity: Commodity,
}

impl Amount {
    pub fn new(number: Decimal, commodity: impl Into<Commodity>) -> Self {
        Self {
            number,
            commodity: commodity.into(),
        }
    }

    pub fn zero(commodity: impl Into<Commodity>) -> Self {
        Self::new(Decimal::ZERO, commodity)
    }

    pub fn number(&self) -> Decimal {
        self.number
    }

    pub fn commodity(&self) -> &Commodity {
        &self.commodity
    }

    pub fn is_zero(&self) -> bool {
        self.number.is_zero()
    }

    /// `false` for zero, whatever sign the zero was written with.
    pub fn is_negative(&self) -> bool {
        !self.number.is_zero() && self.number.is_sign_negative()
    }

    pub fn is_positive(&self) -> bool {
        !self.number.is_zero() && self.number.is_sign_positive()
    }

    /// Fails on differing commodities, or when the sum leaves the decimal range.
    pub fn checked_add(&self, rhs: &Amount) -> Result<Amount, EvaluationError> {
        if self.commodity != rhs.commodity {
            return Err(CommodityMismatch {
                left: self.commodity.clone(),
                right: rhs.commodity.clone(),
            }
            .into());
        }

        let number = self
            .number
            .checked_add(rhs.number)
            .ok_or_else(|| EvaluationError::Overflow {
                commodity: self.commodity.clone(),
            })?;

        Ok(Amount {
            number,
            commodity: self.commodity.clone(),
        })
    }

    pub fn checked_sub(&self, rhs: &Amount) -> Result<Amount, EvaluationError> {
        self.checked_add(&-rhs)
    }

    /// Builds an amount out of an `amount` token, either `$-5`, `-$5` or `5 USD`.
    pub fn parse(token: Pair<'_, Rule>) -> Result<Amount, ParseError> {
        let form = match token.as_rule() {
            Rule::amount => token
                .clone()
                .into_inner()
                .next()
                .ok_or_else(|| ParseError::at(&token, "empty amount"))?,
            Rule::prefix_amount | Rule::suffix_amount => token.clone(),
            _ => {
                return Err(ParseError::at(
                    &token,
                    format!("unexpected token for amount: '{}'", token.as_str()),
                ))
            }
        };

        let mut negated = false;
        let mut number = None;
        let mut commodity = None;
        for pair in form.clone().into_inner() {
            match pair.as_rule() {
                Rule::sign => negated = pair.as_str() == "-",
                Rule::number | Rule::unsigned => number = Some(parse_number(&pair)?),
                Rule::commodity => commodity = Some(Commodity::parse(pair)?),
                _ => {
                    return Err(ParseError::at(
                        &pair,
                        format!("unexpected token in amount: '{}'", pair.as_str()),
                    ))
                }
            }
        }

        let number =
            number.ok_or_else(|| ParseError::at(&form, "amount is missing its number"))?;
        let commodity =
            commodity.ok_or_else(|| ParseError::at(&form, "amount is missing its commodity"))?;

        Ok(Amount {
            number: if negated { -number } else { number },
            commodity,
        })
    }
}

/// Normalizes `-1,234.50`, `+.5` and friends into an exact decimal.
/// `Decimal` negation is symmetric, so flipping the sign cannot overflow.
fn parse_number(token: &Pair<'_, Rule>) -> Result<Decimal, ParseError> {
    let raw = token.as_str();
    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let mut digits = unsigned.replace(',', "");
    if digits.starts_with('.') {
        digits.insert(0, '0');
    }

    // exact: literals beyond 28 fractional digits are refused, never rounded
    let value = Decimal::from_str_exact(&digits)
        .map_err(|e| ParseError::at(token, format!("invalid number '{}': {}", raw, e)))?;
    Ok(if negative { -value } else { value })
}

impl std::ops::Neg for &Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount {
            number: -self.number,
            commodity: self.commodity.clone(),
        }
    }
}

impl std::ops::Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        -&self
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.commodity)
    }
}
