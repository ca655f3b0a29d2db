use crate::error::ParseError;
use crate::parser::Rule;
use crate::{account::Account, amount::Amount, statement};

use chrono::NaiveDate;
use pest::iterators::Pair;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransactionState {
    Settled, // '*'
    Pending, // '!'
    #[default]
    Unmarked, // no symbol
}

impl TransactionState {
    pub fn parse(token: Pair<'_, Rule>) -> Result<TransactionState, ParseError> {
        match token.as_str() {
            "*" => Ok(TransactionState::Settled),
            "!" => Ok(TransactionState::Pending),
            _ => Err(ParseError::at(&token, "invalid transaction state")),
        }
    }
}

/// One line of a transaction, `amount` is `None` when elided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Posting {
    pub account: Account,
    pub amount: Option<Amount>,
}

impl Posting {
    pub fn new(account: Account, amount: Option<Amount>) -> Self {
        Self { account, amount }
    }

    pub fn is_elided(&self) -> bool {
        self.amount.is_none()
    }

    pub fn parse(token: Pair<'_, Rule>) -> Result<Posting, ParseError> {
        let mut pairs = token.clone().into_inner();
        let account = statement::parse_next!(Account, pairs, token);
        let amount = pairs.next().map(Amount::parse).transpose()?;
        Ok(Posting { account, amount })
    }
}

/// A transaction as written in the ledger, before any balancing happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// 1-based line of the transaction header.
    pub line: usize,
    pub date: NaiveDate,
    pub state: TransactionState,
    pub title: String,
    pub postings: Vec<Posting>,
}

impl Transaction {
    pub fn parse(token: Pair<'_, Rule>) -> Result<Transaction, ParseError> {
        let header = token.clone();
        let (line, _) = header.line_col();
        let mut date = None;
        let mut state = TransactionState::default();
        let mut title = "";
        let mut postings = Vec::new();

        for pair in token.into_inner() {
            match pair.as_rule() {
                Rule::date => date = Some(parse_date(pair)?),
                Rule::state => state = TransactionState::parse(pair)?,
                Rule::title => title = pair.as_str().trim(),
                Rule::posting => postings.push(Posting::parse(pair)?),
                _ => {
                    return Err(ParseError::at(
                        &pair,
                        format!("unexpected token in transaction: '{}'", pair.as_str()),
                    ))
                }
            }
        }

        let date = date.ok_or_else(|| ParseError::at(&header, "transaction without a date"))?;
        if title.is_empty() {
            return Err(ParseError::at(&header, "transaction without a title"));
        }

        if postings.len() < 2 {
            return Err(ParseError::at(
                &header,
                format!(
                    "transaction needs at least 2 postings, found {}",
                    postings.len()
                ),
            ));
        }

        let elided_count = postings.iter().filter(|p| p.is_elided()).count();
        if elided_count > 1 {
            return Err(ParseError::at(
                &header,
                format!(
                    "only 1 posting can have its amount elided, found {}",
                    elided_count
                ),
            ));
        }

        Ok(Transaction {
            line,
            date,
            state,
            title: title.to_string(),
            postings,
        })
    }

    pub fn elided(&self) -> Option<&Posting> {
        self.postings.iter().find(|p| p.is_elided())
    }
}

/// `2016/01/01` or `2016-1-1`, rejecting days that do not exist.
pub fn parse_date(token: Pair<'_, Rule>) -> Result<NaiveDate, ParseError> {
    let datestr = token.as_str();
    let mut parts = token.clone().into_inner().map(|p| p.as_str());
    let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ParseError::at(&token, format!("invalid date: '{}'", datestr)));
    };

    let invalid = |_| ParseError::at(&token, format!("invalid date: '{}'", datestr));
    let (y, m, d) = (
        y.parse::<i32>().map_err(invalid)?,
        m.parse::<u32>().map_err(invalid)?,
        d.parse::<u32>().map_err(invalid)?,
    );

    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| ParseError::at(&token, format!("no such day: '{}'", datestr)))
}

/// A posting whose amount is known, either written or inferred.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluatedPosting {
    pub account: Account,
    pub amount: Amount,
}

impl EvaluatedPosting {
    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn amount(&self) -> &Amount {
        &self.amount
    }
}

/// Balanced transaction with every amount resolved, produced by
/// [`LedgerState::apply`][crate::ledger::LedgerState::apply].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaluatedTransaction {
    pub date: NaiveDate,
    pub title: String,
    pub postings: Vec<EvaluatedPosting>,
}

impl EvaluatedTransaction {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn postings(&self) -> &[EvaluatedPosting] {
        &self.postings
    }
}
