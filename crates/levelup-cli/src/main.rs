mod cli;
mod dispatch;
mod logging;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use levelup_client::ClientError;
use stdout_io::write_stdout_text;
use tracing::debug;

const ROOT_HELP: &str = "LevelUp - transaction de-duplication and category suggestions

Usage:
  levelup <command>

Start here:
  levelup check --help
  levelup categories list
  levelup transactions list
";

const TOP_LEVEL_HELP: &str = "LevelUp - transaction de-duplication and category suggestions

USAGE: levelup <command>

Check an incoming batch (read-only):
  levelup check <path>                                    Flag duplicates and suggest categories
  levelup check --help                                    Batch format and matching rules

Store transactions:
  levelup transactions import <path>                      Import a batch into your ledger
  levelup transactions import --skip-duplicates <path>    Import, leaving out duplicates
  levelup transactions list                               Show stored transactions

Categories:
  levelup categories add <name>                           Add a category
  levelup categories list                                 Show categories with counts

Every command accepts --json for machine-readable output.
The ledger lives in ~/.levelup unless LEVELUP_HOME is set.
Set LEVELUP_LOG=debug to print diagnostics on stderr.
";

fn main() -> ExitCode {
    logging::init();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }
    let parsed = cli::Cli::try_parse();
    let cli = match parsed {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let body = if is_top_level_help_request(&raw_args) {
                    TOP_LEVEL_HELP.to_string()
                } else {
                    err.to_string()
                };
                if write_stdout_text(&body).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }
            let command_hint = if matches!(
                err.kind(),
                ErrorKind::MissingRequiredArgument
                    | ErrorKind::InvalidValue
                    | ErrorKind::ValueValidation
                    | ErrorKind::WrongNumberOfValues
                    | ErrorKind::UnknownArgument
                    | ErrorKind::InvalidSubcommand
            ) {
                command_path_from_args(&raw_args)
            } else {
                None
            };
            let clean_message = strip_clap_boilerplate(&err.to_string());
            let parse_error =
                ClientError::invalid_argument_for_command(&clean_message, command_hint.as_deref());
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };
    let mode = output::mode_for_command(&cli.command);

    let dispatched = dispatch::dispatch(&cli);
    match dispatched {
        Ok(success) => {
            debug!(command = %success.command, "command succeeded");
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            debug!(code = %error.code, service_fault = error.is_service_fault(), "command failed");
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Strips clap's trailing boilerplate (Usage line, "For more information" hint)
/// so the "What to do next" section is the single source of guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

/// Subcommand path such as "transactions import", for help hints.
fn command_path_from_args(raw_args: &[String]) -> Option<String> {
    let non_flags: Vec<&str> = raw_args
        .iter()
        .skip(1)
        .filter(|value| !value.starts_with('-'))
        .map(String::as_str)
        .collect();

    let hint = match non_flags.as_slice() {
        ["check", ..] => Some("check"),
        ["transactions", "import", ..] => Some("transactions import"),
        ["transactions", "list", ..] => Some("transactions list"),
        ["transactions", ..] => Some("transactions"),
        ["categories", "add", ..] => Some("categories add"),
        ["categories", "list", ..] => Some("categories list"),
        ["categories", ..] => Some("categories"),
        _ => None,
    };
    hint.map(std::string::ToString::to_string)
}

fn exit_code_for_error(error: &ClientError) -> ExitCode {
    if error.is_service_fault() {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}

#[cfg(test)]
mod tests {
    use super::{command_path_from_args, strip_clap_boilerplate};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn command_path_ignores_flags_and_positional_values() {
        assert_eq!(
            command_path_from_args(&args(&["levelup", "transactions", "list", "--limit", "x"])),
            Some("transactions list".to_string())
        );
        assert_eq!(
            command_path_from_args(&args(&["levelup", "check", "rows.json", "--json"])),
            Some("check".to_string())
        );
        assert_eq!(command_path_from_args(&args(&["levelup", "--json"])), None);
    }

    #[test]
    fn clap_usage_footer_is_removed() {
        let message = "error: unexpected argument '--nope' found\n\nUsage: levelup check [PATH]\n\nFor more information, try '--help'.\n";
        assert_eq!(
            strip_clap_boilerplate(message),
            "error: unexpected argument '--nope' found"
        );
    }
}
