use levelup_client::commands;
use levelup_client::{ClientResult, SuccessEnvelope};

use crate::cli::{CategoriesCommand, Cli, Commands, TransactionsCommand};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Check { path, account, .. } => {
            commands::check::run(path.clone(), account.clone())
        }
        Commands::Transactions { command } => match command {
            TransactionsCommand::Import {
                path,
                account,
                skip_duplicates,
                json: _,
            } => commands::transactions::import(path.clone(), account.clone(), *skip_duplicates),
            TransactionsCommand::List {
                from, to, limit, ..
            } => commands::transactions::list(*from, *to, *limit),
        },
        Commands::Categories { command } => match command {
            CategoriesCommand::Add { name, .. } => commands::categories::add(name),
            CategoriesCommand::List { .. } => commands::categories::list(),
        },
    }
}
