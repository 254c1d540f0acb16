use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tmtrkr-tui")]
#[command(about = "Terminal UI for tmtrkr time records")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Commands {
    /// Run against a real tmtrkr server (default)
    Run,
    /// Run in dev mode with local in-memory data
    Dev,
    /// Request a token for USER from the server and save the session
    Login {
        /// User name passed to the server as X-Forwarded-User
        user: String,
    },
    /// Log out on the server and remove the local session
    Logout,
    /// List the users known to the server
    Users,
    /// Print config path and create default file if missing
    ConfigPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["tmtrkr-tui"]).unwrap();
        assert_eq!(cli.command.unwrap_or(Commands::Run), Commands::Run);
    }

    #[test]
    fn login_takes_a_user() {
        let cli = Cli::try_parse_from(["tmtrkr-tui", "login", "alice"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Login {
                user: "alice".to_string()
            })
        );
        assert!(Cli::try_parse_from(["tmtrkr-tui", "login"]).is_err());
    }

    #[test]
    fn config_path_is_kebab_case() {
        let cli = Cli::try_parse_from(["tmtrkr-tui", "config-path"]).unwrap();
        assert_eq!(cli.command, Some(Commands::ConfigPath));
    }
}
