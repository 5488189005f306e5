use std::fs;
use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgGroup;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use strum::VariantNames;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Session;
use crate::domain::services::help_text;
use crate::domain::services::ChatState;
use crate::infrastructure::stores::StoreManager;

/// Longest first line shown for a session in listings.
const SUMMARY_LENGTH: usize = 60;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

fn format_session(idx: usize, session: &Session) -> String {
    let mut res = format!(
        "- ({}) (ID: {}) {}, Messages: {}",
        idx + 1,
        session.id,
        session.name,
        session.messages.len()
    );

    if let Some(last) = session.messages.last() {
        let mut line = last.content.split('\n').next().unwrap_or_default().to_string();
        if line.chars().count() > SUMMARY_LENGTH {
            line = format!(
                "{}...",
                line.chars().take(SUMMARY_LENGTH - 3).collect::<String>()
            );
        }
        res = format!("{res}, Last: {line}");
    }

    return res;
}

fn load_chats() -> Result<ChatState> {
    return Ok(ChatState::load(StoreManager::get()?));
}

fn print_sessions_list() -> Result<()> {
    let chats = load_chats()?;
    let sessions = chats
        .sessions()
        .iter()
        .enumerate()
        .map(|(idx, session)| {
            return format_session(idx, session);
        })
        .collect::<Vec<String>>();

    println!("{}", sessions.join("\n"));
    return Ok(());
}

fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&config_file_path, Config::serialize_default(build()))?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn open_session(session_id: &str) -> Result<()> {
    let chats = load_chats()?;
    if chats.position(session_id).is_none() {
        bail!(format!("No session with ID {session_id} exists"));
    }

    Config::set(ConfigKey::SessionID, session_id);
    return Ok(());
}

fn open_session_interactive() -> Result<bool> {
    let chats = load_chats()?;
    let session_options = chats
        .sessions()
        .iter()
        .enumerate()
        .map(|(idx, session)| {
            return format_session(idx, session);
        })
        .collect::<Vec<String>>();

    let selected = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which session would you like to open?")
        .default(0)
        .items(&session_options)
        .interact_opt()?;

    if let Some(session) = selected.and_then(|idx| return chats.get(idx)) {
        Config::set(ConfigKey::SessionID, &session.id);
        return Ok(true);
    }

    return Ok(false);
}

fn delete_session(session_id: &str) -> Result<()> {
    let mut chats = load_chats()?;
    let idx = match chats.position(session_id) {
        Some(idx) => idx,
        None => bail!(format!("No session with ID {session_id} exists")),
    };

    if chats.len() == 1 {
        println!("Session {session_id} is the only session and was kept");
        return Ok(());
    }

    chats.delete_session(idx);
    println!("Deleted session {session_id}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    return Command::new("debug")
        .about("Debug helpers for Solendir")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running Solendir with environment variable RUST_LOG=solendir")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );
}

fn subcommand_sessions_delete() -> Command {
    return Command::new("delete")
        .about("Delete one or all sessions.")
        .arg(
            clap::Arg::new(ConfigKey::SessionID.to_string())
                .short('i')
                .long("id")
                .help("Session ID")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("all")
                .long("all")
                .help("Delete all sessions, leaving a single fresh one.")
                .action(ArgAction::SetTrue),
        )
        .group(
            ArgGroup::new("delete-args")
                .args([ConfigKey::SessionID.to_string(), "all".to_string()])
                .required(true),
        );
}

fn subcommand_sessions() -> Command {
    return Command::new("sessions")
        .about("Manage saved chat sessions.")
        .arg_required_else_help(true)
        .subcommand(Command::new("dir").about("Print the directory sessions are saved in."))
        .subcommand(Command::new("list").about("List all sessions, newest first, with their ids and names."))
        .subcommand(
            Command::new("open")
                .about("Open a session by ID. Omit passing any session ID to load an interactive selection.")
                .arg(
                    clap::Arg::new(ConfigKey::SessionID.to_string())
                        .short('i')
                        .long("id")
                        .help("Session ID")
                        .required(false),
                ),
        )
        .subcommand(subcommand_sessions_delete());
}

fn arg_backend_url() -> Arg {
    return Arg::new(ConfigKey::BackendURL.to_string())
        .long(ConfigKey::BackendURL.to_string())
        .env("SOLENDIR_BACKEND_URL")
        .num_args(1)
        .help(format!(
            "Base URL of the Solendir assistant backend. [default: {}]",
            Config::default(ConfigKey::BackendURL)
        ))
        .global(true);
}

fn arg_backend_health_check_timeout() -> Arg {
    return Arg::new(ConfigKey::BackendHealthCheckTimeout.to_string())
        .long(ConfigKey::BackendHealthCheckTimeout.to_string())
        .env("SOLENDIR_BACKEND_HEALTH_CHECK_TIMEOUT")
        .num_args(1)
        .help(
            format!("Time to wait in milliseconds before timing out when doing a healthcheck for the backend. [default: {}]", Config::default(ConfigKey::BackendHealthCheckTimeout)),
        )
        .global(true);
}

fn arg_data_dir() -> Arg {
    return Arg::new(ConfigKey::DataDir.to_string())
        .long(ConfigKey::DataDir.to_string())
        .env("SOLENDIR_DATA_DIR")
        .num_args(1)
        .help(format!(
            "Directory chat sessions and app credentials are saved in. [default: {}]",
            Config::default(ConfigKey::DataDir)
        ))
        .global(true);
}

fn arg_incognito() -> Arg {
    return Arg::new(ConfigKey::Incognito.to_string())
        .long(ConfigKey::Incognito.to_string())
        .env("SOLENDIR_INCOGNITO")
        .action(ArgAction::SetTrue)
        .help("Keep chats and credentials in memory only, nothing is saved. [default: false]")
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nBuilt: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_BUILD_DATE")
    );

    return Command::new("solendir")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Start chatting. This is the default when no subcommand is given."))
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(subcommand_sessions())
        .arg(arg_backend_url())
        .arg(arg_backend_health_check_timeout())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("SOLENDIR_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(arg_data_dir())
        .arg(arg_incognito())
        .arg(
            Arg::new(ConfigKey::Username.to_string())
                .long(ConfigKey::Username.to_string())
                .env("SOLENDIR_USERNAME")
                .num_args(1)
                .help(format!("Your name displayed above your chat bubbles. [default: {}]", Config::default(ConfigKey::Username)))
                .global(true),
        );
}

fn parse_sessions(matches: &ArgMatches, subcmd_matches: &ArgMatches) -> Result<bool> {
    match subcmd_matches.subcommand() {
        Some(("dir", dir_matches)) => {
            Config::load(build(), vec![matches, subcmd_matches, dir_matches])?;
            println!("{}", Config::get(ConfigKey::DataDir));
        }
        Some(("list", list_matches)) => {
            Config::load(build(), vec![matches, subcmd_matches, list_matches])?;
            print_sessions_list()?;
        }
        Some(("open", open_matches)) => {
            Config::load(build(), vec![matches, subcmd_matches, open_matches])?;
            if let Some(session_id) =
                open_matches.get_one::<String>(&ConfigKey::SessionID.to_string())
            {
                open_session(session_id)?;
                return Ok(true);
            }
            return open_session_interactive();
        }
        Some(("delete", delete_matches)) => {
            Config::load(build(), vec![matches, subcmd_matches])?;
            if let Some(session_id) =
                delete_matches.get_one::<String>(&ConfigKey::SessionID.to_string())
            {
                delete_session(session_id)?;
            } else if delete_matches.get_flag("all") {
                load_chats()?.reset();
                println!("Deleted all sessions");
            } else {
                subcommand_sessions_delete().print_long_help()?;
            }
        }
        _ => {
            subcommand_sessions().print_long_help()?;
        }
    }

    return Ok(false);
}

/// Parses the command line, returning true when the chat UI should start.
pub fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_path().to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches])?;
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file()?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("sessions", subcmd_matches)) => {
            return parse_sessions(&matches, subcmd_matches);
        }
        _ => {
            Config::load(build(), vec![&matches])?;
        }
    }

    return Ok(true);
}

/// Where the debug log is written when `RUST_LOG` mentions solendir.
pub fn log_path() -> path::PathBuf {
    if let Ok(dir) = std::env::var("SOLENDIR_LOG_DIR") {
        return path::PathBuf::from(dir).join("debug.log");
    }

    return dirs::cache_dir()
        .unwrap_or_else(|| return path::PathBuf::from("."))
        .join("solendir/debug.log");
}
