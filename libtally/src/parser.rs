use crate::error::ParseError;
use crate::ledger::LedgerState;
use crate::statement::Statement;
use anyhow::{Context, Result};
use pest::iterators::Pair;
use pest::Parser;
use tracing::{debug, trace};

#[derive(Parser)]
#[grammar = "ledger.pest"]
pub struct LedgerParser;

/// Parses ledger input as string slice, we are not concerning ourselves
/// with file input, so reading from files will need to be handled by the client code.
///
/// Statements come back in file order. The first malformed entry stops the
/// parse, no partial statement list is returned.
pub fn parse(input: &str) -> Result<Vec<Statement>, ParseError> {
    let pairs = LedgerParser::parse(Rule::ledger, input)?;

    let mut statements = Vec::new();
    for pair in pairs {
        match pair.as_rule() {
            Rule::EOI => break,
            _ => statements.push(Statement::try_from(pair)?),
        }
    }

    Ok(statements)
}

/// Parses `input` and folds every statement into a fresh [`LedgerState`],
/// aborting on the first statement that fails to apply.
pub fn evaluate(input: &str) -> Result<LedgerState> {
    let statements = parse(input).context("failed to parse ledger")?;

    let mut ledger = LedgerState::new();
    for statement in statements {
        let line = match &statement {
            Statement::Transaction(trx) => {
                debug!(line = trx.line, title = %trx.title, "applying transaction");
                Some(trx.line)
            }
            _ => {
                trace!(?statement, "applying directive");
                None
            }
        };

        match line {
            Some(line) => ledger
                .apply(statement)
                .with_context(|| format!("transaction at line {} rejected", line))?,
            None => ledger.apply(statement)?,
        }
    }

    debug!(
        transactions = ledger.evaluated_transactions().len(),
        "ledger evaluated"
    );
    Ok(ledger)
}

pub fn inner_str(token: Pair<Rule>) -> &str {
    token
        .into_inner()
        .next()
        .map(|p| p.as_str())
        .unwrap_or_default()
}
