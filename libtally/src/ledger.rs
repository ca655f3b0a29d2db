use crate::{
    account::Account,
    amount::{Amount, Commodity},
    error::EvaluationError,
    statement::Statement,
    transaction::{EvaluatedPosting, EvaluatedTransaction, Posting, Transaction},
};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// Running state of one evaluation run.
///
/// Statements are applied one at a time in file order. Every call to
/// [`apply`][LedgerState::apply] either commits completely, updating balances
/// and appending an [`EvaluatedTransaction`], or leaves the state untouched.
#[derive(Debug, Default)]
pub struct LedgerState {
    balances: IndexMap<(Account, Commodity), Amount>,
    evaluated: Vec<EvaluatedTransaction>,
    options: HashMap<String, String>,
    accounts: IndexSet<Account>,
    commodities: IndexSet<Commodity>,
}

impl LedgerState {
    pub fn new() -> LedgerState {
        LedgerState {
            balances: IndexMap::new(),
            evaluated: Vec::new(),
            options: HashMap::new(),
            accounts: IndexSet::new(),
            commodities: IndexSet::new(),
        }
    }

    pub fn set_option(&mut self, key: &str, val: &str) {
        self.options.insert(key.to_string(), val.to_string());
    }

    pub fn get_option(&self, key: &str) -> Option<&String> {
        self.options.get(key)
    }

    pub fn apply(&mut self, statement: Statement) -> Result<(), EvaluationError> {
        match statement {
            Statement::Comment(_) => Ok(()),
            Statement::SetOption(key, val) => {
                self.set_option(&key, &val);
                Ok(())
            }
            Statement::DeclareAccount(account) => {
                self.accounts.insert(account);
                Ok(())
            }
            Statement::DeclareCommodity(commodity) => {
                self.commodities.insert(commodity);
                Ok(())
            }
            Statement::Transaction(trx) => self.transaction(trx),
        }
    }

    /// Applies `statements` in order, stopping at the first failure.
    /// The error carries the index of the rejected statement.
    pub fn apply_all<I>(&mut self, statements: I) -> Result<(), (usize, EvaluationError)>
    where
        I: IntoIterator<Item = Statement>,
    {
        for (idx, statement) in statements.into_iter().enumerate() {
            self.apply(statement).map_err(|err| (idx, err))?;
        }
        Ok(())
    }

    pub fn evaluated_transactions(&self) -> &[EvaluatedTransaction] {
        &self.evaluated
    }

    pub fn balance(&self, account: &Account, commodity: &Commodity) -> Option<&Amount> {
        self.balances.get(&(account.clone(), commodity.clone()))
    }

    /// Every touched `(account, commodity)` balance, in the order first posted to.
    pub fn balances(&self) -> impl Iterator<Item = (&Account, &Amount)> {
        self.balances
            .iter()
            .map(|((account, _), amount)| (account, amount))
    }

    pub fn declared_accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn declared_commodities(&self) -> impl Iterator<Item = &Commodity> {
        self.commodities.iter()
    }

    fn transaction(&mut self, trx: Transaction) -> Result<(), EvaluationError> {
        let postings = resolve(&trx.postings)?;

        // stage every balance first, nothing is committed until all of them add up
        let mut staged: IndexMap<(Account, Commodity), Amount> = IndexMap::new();
        for posting in &postings {
            let key = (posting.account.clone(), posting.amount.commodity().clone());
            let current = staged
                .get(&key)
                .or_else(|| self.balances.get(&key))
                .cloned()
                .unwrap_or_else(|| Amount::zero(key.1.clone()));
            let next = current.checked_add(&posting.amount)?;
            staged.insert(key, next);
        }

        self.balances.extend(staged);
        self.evaluated.push(EvaluatedTransaction {
            date: trx.date,
            title: trx.title,
            postings,
        });
        Ok(())
    }
}

/// Makes every posting amount concrete, inferring the elided one if any.
fn resolve(postings: &[Posting]) -> Result<Vec<EvaluatedPosting>, EvaluationError> {
    let mut sums: IndexMap<Commodity, Amount> = IndexMap::new();
    for amount in postings.iter().filter_map(|p| p.amount.as_ref()) {
        let sum = sums
            .entry(amount.commodity().clone())
            .or_insert_with(|| Amount::zero(amount.commodity().clone()));
        *sum = sum.checked_add(amount)?;
    }

    let elided_count = postings.iter().filter(|p| p.is_elided()).count();
    let inferred = if elided_count == 0 {
        if let Some(residual) = sums.values().find(|sum| !sum.is_zero()) {
            return Err(EvaluationError::Unbalanced {
                residual: residual.clone(),
            });
        }
        None
    } else {
        match sums.values().next() {
            Some(sum) if sums.len() == 1 && elided_count == 1 => Some(-sum),
            _ => {
                return Err(EvaluationError::AmbiguousInference {
                    commodities: sums.keys().cloned().collect(),
                })
            }
        }
    };

    postings
        .iter()
        .map(|posting| {
            let amount = match (&posting.amount, &inferred) {
                (Some(amount), _) | (None, Some(amount)) => amount.clone(),
                (None, None) => {
                    return Err(EvaluationError::AmbiguousInference {
                        commodities: sums.keys().cloned().collect(),
                    })
                }
            };
            Ok(EvaluatedPosting {
                account: posting.account.clone(),
                amount,
            })
        })
        .collect()
}
