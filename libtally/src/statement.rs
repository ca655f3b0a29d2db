use crate::account::Account;
use crate::amount::Commodity;
use crate::error::ParseError;
use crate::parser::{inner_str, Rule};
use crate::transaction::Transaction;
use pest::iterators::Pair;

macro_rules! next_pair {
    ($pairs:ident, $parent:ident, $expected:expr) => {
        $pairs.next().ok_or_else(|| {
            $crate::error::ParseError::at(
                &$parent,
                format!("invalid next token, expected {}", $expected),
            )
        })?
    };
}

macro_rules! parse_next {
    ($parser:ident, $pairs:ident, $parent:ident) => {
        $parser::parse($crate::statement::next_pair!($pairs, $parent, stringify!($parser)))?
    };
}

pub(crate) use next_pair;
pub(crate) use parse_next;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    Comment(String),
    SetOption(String, String),
    DeclareAccount(Account),
    DeclareCommodity(Commodity),
    Transaction(Transaction),
}

impl<'s> TryFrom<Pair<'s, Rule>> for Statement {
    type Error = ParseError;

    fn try_from(pair: Pair<'s, Rule>) -> Result<Self, Self::Error> {
        let token = pair.clone();
        let mut pairs = pair.into_inner();

        let stmt = match token.as_rule() {
            Rule::comment_line => Self::Comment(
                pairs
                    .next()
                    .map(|p| p.as_str().trim().to_string())
                    .unwrap_or_default(),
            ),
            Rule::option => {
                let key = next_pair!(pairs, token, "option key");
                let val = next_pair!(pairs, token, "option value");
                Self::SetOption(inner_str(key).to_string(), inner_str(val).to_string())
            }
            Rule::account_directive => Self::DeclareAccount(parse_next!(Account, pairs, token)),
            Rule::commodity_directive => {
                Self::DeclareCommodity(parse_next!(Commodity, pairs, token))
            }
            Rule::transaction => Self::Transaction(Transaction::parse(token)?),
            _ => {
                return Err(ParseError::at(
                    &token,
                    format!("unexpected token: '{}'", token.as_str()),
                ))
            }
        };

        Ok(stmt)
    }
}
