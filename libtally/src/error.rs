use crate::amount::{Amount, Commodity};
use crate::parser::Rule;
use pest::error::LineColLocation;
use pest::iterators::Pair;
use thiserror::Error;

use std::fmt;

/// Coarse classification shared by every error the library returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    CommodityMismatch,
    AmbiguousInference,
    Unbalanced,
    Overflow,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Syntax => "syntax",
            ErrorKind::CommodityMismatch => "commodity-mismatch",
            ErrorKind::AmbiguousInference => "ambiguous-inference",
            ErrorKind::Unbalanced => "unbalanced",
            ErrorKind::Overflow => "overflow",
        })
    }
}

/// Malformed input, located by 1-based line and column.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }

    /// Error positioned at the start of `token`.
    pub fn at(token: &Pair<'_, Rule>, message: impl Into<String>) -> Self {
        let (line, column) = token.line_col();
        Self::new(line, column, message)
    }

    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Syntax
    }
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        let err = err.renamed_rules(rule_name);
        let (line, column) = match err.line_col {
            LineColLocation::Pos(pos) => pos,
            LineColLocation::Span(start, _) => start,
        };
        Self::new(line, column, err.variant.message().into_owned())
    }
}

fn rule_name(rule: &Rule) -> String {
    match rule {
        Rule::EOI => "end of input",
        Rule::comment_line => "comment",
        Rule::option => "option",
        Rule::string => "quoted string",
        Rule::account_directive => "account directive",
        Rule::commodity_directive => "commodity directive",
        Rule::transaction => "transaction",
        Rule::date => "date",
        Rule::state => "transaction state",
        Rule::title => "title",
        Rule::posting => "posting",
        Rule::account => "account",
        Rule::amount | Rule::prefix_amount | Rule::suffix_amount => "amount",
        Rule::sign => "sign",
        Rule::number | Rule::unsigned => "number",
        Rule::commodity => "commodity",
        other => return format!("{:?}", other),
    }
    .to_string()
}

/// Arithmetic attempted across two different commodities.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("cannot combine `{left}' with `{right}'")]
pub struct CommodityMismatch {
    pub left: Commodity,
    pub right: Commodity,
}

impl CommodityMismatch {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::CommodityMismatch
    }
}

/// Reasons a statement is rejected by [`LedgerState::apply`][crate::ledger::LedgerState::apply].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error(transparent)]
    CommodityMismatch(#[from] CommodityMismatch),

    #[error("cannot infer elided amount, explicit postings use {}", join(.commodities))]
    AmbiguousInference { commodities: Vec<Commodity> },

    #[error("transaction does not balance, off by {residual}")]
    Unbalanced { residual: Amount },

    #[error("sum of `{commodity}' amounts is out of range")]
    Overflow { commodity: Commodity },
}

impl EvaluationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvaluationError::CommodityMismatch(_) => ErrorKind::CommodityMismatch,
            EvaluationError::AmbiguousInference { .. } => ErrorKind::AmbiguousInference,
            EvaluationError::Unbalanced { .. } => ErrorKind::Unbalanced,
            EvaluationError::Overflow { .. } => ErrorKind::Overflow,
        }
    }
}

fn join(commodities: &[Commodity]) -> String {
    commodities
        .iter()
        .map(Commodity::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use crate::amount::{Amount, Commodity};
    use crate::error::{ErrorKind, EvaluationError, ParseError};
    use crate::parser::{LedgerParser, Rule};
    use pest::Parser;
    use rust_decimal_macros::dec;

    #[test]
    fn kind_names() {
        assert_eq!(ErrorKind::Syntax.to_string(), "syntax");
        assert_eq!(
            ErrorKind::CommodityMismatch.to_string(),
            "commodity-mismatch"
        );
        assert_eq!(
            ErrorKind::AmbiguousInference.to_string(),
            "ambiguous-inference"
        );
        assert_eq!(ErrorKind::Unbalanced.to_string(), "unbalanced");
        assert_eq!(ErrorKind::Overflow.to_string(), "overflow");
    }

    #[test]
    fn pest_error_location() {
        let err: ParseError = LedgerParser::parse(Rule::date, "2016/x1/01")
            .unwrap_err()
            .into();
        assert_eq!(err.line, 1);
        assert_eq!(err.kind(), ErrorKind::Syntax);
        assert!(err.message.contains("date"), "{}", err.message);
    }

    #[test]
    fn evaluation_messages() {
        let err = EvaluationError::AmbiguousInference {
            commodities: vec![Commodity::new("USD"), Commodity::new("EUR")],
        };
        assert_eq!(
            err.to_string(),
            "cannot infer elided amount, explicit postings use USD, EUR"
        );

        let err = EvaluationError::Unbalanced {
            residual: Amount::new(dec!(-1), "USD"),
        };
        assert_eq!(err.to_string(), "transaction does not balance, off by -1 USD");
        assert_eq!(err.kind(), ErrorKind::Unbalanced);

        let err = EvaluationError::Overflow {
            commodity: Commodity::new("USD"),
        };
        assert_eq!(err.to_string(), "sum of `USD' amounts is out of range");
    }
}
