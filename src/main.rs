//! `tally` prints the register of a ledger file.
//!
//! ```text
//! tally [--balances] [--keep-going] [--no-color] <ledger-file>
//! ```

mod register;

use anyhow::{anyhow, bail, Context, Result};
use libtally::{parse, LedgerState, Statement};
use tracing::{info, warn};

use std::fs;
use std::path::PathBuf;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("tally=info,libtally=info"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

#[derive(Debug, Default, PartialEq)]
struct Options {
    path: PathBuf,
    balances: bool,
    keep_going: bool,
    color: bool,
}

impl Options {
    fn from_args<I: IntoIterator<Item = String>>(args: I) -> Result<Options> {
        let mut path = None;
        let mut opts = Options {
            color: true,
            ..Default::default()
        };

        for arg in args {
            match arg.as_str() {
                "--balances" => opts.balances = true,
                "--keep-going" => opts.keep_going = true,
                "--no-color" => opts.color = false,
                flag if flag.starts_with("--") => bail!("unknown flag `{}'", flag),
                _ if path.is_some() => bail!("only one ledger file can be given"),
                _ => path = Some(PathBuf::from(arg)),
            }
        }

        opts.path = path.ok_or(anyhow!(
            "usage: tally [--balances] [--keep-going] [--no-color] <ledger-file>"
        ))?;
        Ok(opts)
    }
}

fn load(opts: &Options) -> Result<LedgerState> {
    let content = fs::read_to_string(&opts.path)
        .with_context(|| format!("failed to read `{}'", opts.path.display()))?;
    let statements = parse(&content)
        .with_context(|| format!("failed to parse `{}'", opts.path.display()))?;
    info!(path = %opts.path.display(), statements = statements.len(), "ledger loaded");

    let mut state = LedgerState::new();
    for statement in statements {
        let line = match &statement {
            Statement::Transaction(trx) => Some(trx.line),
            _ => None,
        };

        if let Err(err) = state.apply(statement) {
            let line = line.unwrap_or_default();
            if !opts.keep_going {
                return Err(err).with_context(|| {
                    format!("{}:{}: transaction rejected", opts.path.display(), line)
                });
            }
            warn!(line, kind = %err.kind(), "skipping transaction: {}", err);
        }
    }

    info!(
        transactions = state.evaluated_transactions().len(),
        "ledger evaluated"
    );
    Ok(state)
}

fn main() -> Result<()> {
    init_tracing();

    let opts = Options::from_args(std::env::args().skip(1))?;
    let state = load(&opts)?;

    print!("{}", register::Register::new(&state, opts.color));
    if opts.balances {
        println!();
        print!("{}", register::Balances::new(&state, opts.color));
    }

    Ok(())
}
