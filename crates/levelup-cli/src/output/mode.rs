use crate::cli::{CategoriesCommand, Commands, TransactionsCommand};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    let json = match command {
        Commands::Check { json, .. } => *json,
        Commands::Transactions { command } => match command {
            TransactionsCommand::Import { json, .. } | TransactionsCommand::List { json, .. } => {
                *json
            }
        },
        Commands::Categories { command } => match command {
            CategoriesCommand::Add { json, .. } | CategoriesCommand::List { json } => *json,
        },
    };

    if json {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}

#[cfg(test)]
mod tests {
    use super::{OutputMode, mode_for_command};
    use crate::cli::parse_from;

    #[test]
    fn json_flag_selects_json_for_every_command() {
        let cases: [&[&str]; 5] = [
            &["levelup", "check", "rows.json", "--json"],
            &["levelup", "transactions", "import", "rows.csv", "--json"],
            &["levelup", "transactions", "list", "--json"],
            &["levelup", "categories", "add", "Fuel", "--json"],
            &["levelup", "categories", "list", "--json"],
        ];

        for case in cases {
            let parsed = parse_from(case);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                assert_eq!(mode_for_command(&cli.command), OutputMode::Json);
            }
        }
    }

    #[test]
    fn text_is_the_default() {
        let parsed = parse_from(["levelup", "check", "rows.json"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Text);
        }

        let parsed = parse_from(["levelup", "categories", "list"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Text);
        }
    }
}
