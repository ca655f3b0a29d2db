use colored::Colorize;
use libtally::{Amount, EvaluatedTransaction, LedgerState};
use rust_decimal::Decimal;

use std::fmt;

const ACCOUNT_WIDTH: usize = 40;
const AMOUNT_WIDTH: usize = 18;

/// One block per evaluated transaction, in evaluation order.
pub struct Register<'a> {
    state: &'a LedgerState,
    color: bool,
}

impl<'a> Register<'a> {
    pub fn new(state: &'a LedgerState, color: bool) -> Self {
        Self { state, color }
    }

    fn transaction(
        &self,
        f: &mut fmt::Formatter<'_>,
        trx: &EvaluatedTransaction,
    ) -> fmt::Result {
        writeln!(f, "{} {}", trx.date().format("%Y-%m-%d"), trx.title())?;
        for posting in trx.postings() {
            writeln!(
                f,
                "    {:<width$}{}",
                posting.account().name(),
                amount_cell(posting.amount(), self.color),
                width = ACCOUNT_WIDTH
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Register<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = self.state.get_option("title") {
            writeln!(f, "{}\n", heading(title, self.color))?;
        }

        for (idx, trx) in self.state.evaluated_transactions().iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            self.transaction(f, trx)?;
        }
        Ok(())
    }
}

/// Running balance per account and commodity, in the order first posted to.
pub struct Balances<'a> {
    state: &'a LedgerState,
    color: bool,
}

impl<'a> Balances<'a> {
    pub fn new(state: &'a LedgerState, color: bool) -> Self {
        Self { state, color }
    }
}

impl fmt::Display for Balances<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", heading("Balances", self.color))?;
        for (account, amount) in self.state.balances() {
            writeln!(
                f,
                "    {:<width$}{}",
                account.name(),
                amount_cell(amount, self.color),
                width = ACCOUNT_WIDTH
            )?;
        }
        Ok(())
    }
}

fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn amount_cell(amount: &Amount, color: bool) -> String {
    let cell = format!("{:>width$}", display_amount(amount), width = AMOUNT_WIDTH);
    if color && amount.is_negative() {
        cell.red().to_string()
    } else {
        cell
    }
}

/// `$1,000.00` and `-$5.00` for symbols, `153.17 EUR` for codes.
pub fn display_amount(amount: &Amount) -> String {
    let symbol = amount.commodity().as_str();
    let number = grouped(amount.number().abs());
    let sign = if amount.is_negative() { "-" } else { "" };

    if symbol.chars().any(char::is_alphabetic) {
        format!("{}{} {}", sign, number, symbol)
    } else {
        format!("{}{}{}", sign, symbol, number)
    }
}

/// At least two fractional digits and `,` between thousands.
fn grouped(number: Decimal) -> String {
    let mut number = number;
    if number.scale() < 2 {
        number.rescale(2);
    }

    let text = number.to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let mut int_grouped = String::new();
    for (idx, digit) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            int_grouped.push(',');
        }
        int_grouped.push(digit);
    }

    if frac_part.is_empty() {
        int_grouped
    } else {
        format!("{}.{}", int_grouped, frac_part)
    }
}
