use std::time::Instant;

use clap::Parser;
use colored::Colorize;

use crate::config::HarnessSettings;
use crate::runner::{run_suite, SuiteOptions};

#[derive(Parser, Debug)]
#[command(name = "websentry-functional")]
#[command(about = "Functional test")]
#[command(version, arg_required_else_help = true)]
#[command(after_help = "Environment:\n  \
    WEBSENTRY_BIN               service binary, relative to the current directory (default ./websentry)\n  \
    WEBSENTRY_PING_ATTEMPTS     /ping attempts before giving up (default 4)\n  \
    WEBSENTRY_PING_INTERVAL_MS  delay between /ping attempts (default 500)\n\n\
Run from the WebSentry checkout or set WEBSENTRY_BIN to an absolute path.")]
pub struct Cli {
    #[arg(long, help = "db connection string")]
    pub db: String,

    #[arg(long, alias = "skip_clean_db", help = "db will be cleaned by default")]
    pub skip_clean_db: bool,

    #[arg(long, help = "port for websentry service")]
    pub port: u16,
}

impl From<&Cli> for SuiteOptions {
    fn from(cli: &Cli) -> Self {
        SuiteOptions {
            db: cli.db.clone(),
            skip_clean_db: cli.skip_clean_db,
            port: cli.port,
        }
    }
}

/// Run the suite and print the verdict; returns whether every case passed
pub async fn run(cli: Cli, settings: &HarnessSettings) -> bool {
    println!("{}", format!("{:?}", cli).blue());

    let start = Instant::now();
    let ok = run_suite(&SuiteOptions::from(&cli), settings).await;

    println!();
    println!("{}", "=".repeat(40));
    println!("Time used: {:.2}s", start.elapsed().as_secs_f64());
    if ok {
        println!("{}", "PASS".green());
    } else {
        println!("{}", "FAIL".red());
    }
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_all_arguments() {
        let cli = Cli::try_parse_from([
            "websentry-functional",
            "--db",
            "postgres://postgres@localhost/websentry_test",
            "--skip-clean-db",
            "--port",
            "9090",
        ])
        .unwrap();

        assert_eq!(cli.db, "postgres://postgres@localhost/websentry_test");
        assert!(cli.skip_clean_db);
        assert_eq!(cli.port, 9090);
    }

    #[test]
    fn cleans_db_by_default() {
        let cli = Cli::try_parse_from(["websentry-functional", "--db", "x", "--port", "1"]).unwrap();
        assert!(!SuiteOptions::from(&cli).skip_clean_db);
    }

    #[test]
    fn no_arguments_is_an_error() {
        assert!(Cli::try_parse_from(["websentry-functional"]).is_err());
    }

    #[test]
    fn help_documents_service_binary_lookup() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("WEBSENTRY_BIN"));
        assert!(help.contains("./websentry"));
    }

    #[test]
    fn rejects_out_of_range_port() {
        assert!(Cli::try_parse_from(["websentry-functional", "--db", "x", "--port", "70000"]).is_err());
    }
}
