use crate::error::ParseError;
use crate::parser::Rule;
use pest::iterators::Pair;

use std::fmt;

/// Colon separated account path, e.g. `Assets:Bank:Jawir`.
///
/// Any root name is accepted, ledger files do not have to stick to the
/// usual `Assets`/`Liabilities`/`Equity`/`Income`/`Expenses` roots.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Account(String);

impl Account {
    pub fn parse(token: Pair<'_, Rule>) -> Result<Account, ParseError> {
        if token.as_rule() != Rule::account {
            return Err(ParseError::at(
                &token,
                format!("unexpected token for account: '{}'", token.as_str()),
            ));
        }

        Account::try_from(token.as_str()).map_err(|e| ParseError::at(&token, e.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(':')
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// `Assets:Bank` for `Assets:Bank:Jawir`, `None` for a root account.
    pub fn parent(&self) -> Option<Account> {
        self.0
            .rsplit_once(':')
            .map(|(parent, _)| Account(parent.to_string()))
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Account {
    type Error = anyhow::Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let name = s.trim();
        if name.is_empty() || name.split(':').any(|segment| segment.trim().is_empty()) {
            return Err(anyhow::Error::msg(format!(
                "input `{}' is not a valid token for Account",
                s
            )));
        }

        Ok(Account(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::account::Account;
    use crate::parser::{LedgerParser, Rule};
    use pest::Parser;

    use anyhow::{anyhow, Result};

    #[test]
    fn parse_account() -> Result<()> {
        let mut ast = LedgerParser::parse(Rule::account, "Assets:Checking account")?;
        let account = Account::parse(ast.next().ok_or(anyhow!("empty ast"))?)?;
        assert_eq!(account.name(), "Assets:Checking account");
        assert_eq!(
            account.segments().collect::<Vec<_>>(),
            vec!["Assets", "Checking account"]
        );
        Ok(())
    }

    #[test]
    fn parse_wrong_token() -> Result<()> {
        let mut ast = LedgerParser::parse(Rule::number, "1337")?;
        let err = Account::parse(ast.next().ok_or(anyhow!("empty ast"))?).unwrap_err();
        assert_eq!(err.message, "unexpected token for account: '1337'");
        Ok(())
    }

    #[test]
    fn parent_and_depth() -> Result<()> {
        let account: Account = "Expenses:Travels:Airplane".try_into()?;
        assert_eq!(account.depth(), 3);
        assert_eq!(account.parent(), Some("Expenses:Travels".try_into()?));
        assert_eq!(Account::try_from("Equity")?.parent(), None);
        Ok(())
    }

    #[test]
    fn reject_empty_segment() {
        assert_eq!(
            format!("{}", Account::try_from("Assets::Cash").unwrap_err()),
            "input `Assets::Cash' is not a valid token for Account"
        );
        assert!(Account::try_from("").is_err());
    }
}
