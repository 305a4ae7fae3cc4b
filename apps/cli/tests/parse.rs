//! Tests for CLI argument parsing.

use clap::Parser;
use std::path::Path;
use tern_cli::{
    Cli, Command,
    cmd::ConfigCommand,
    config::{Config, MAX_STEPS},
};

fn config() -> Config {
    Config::from_toml(
        r#"
        system = "be brief"

        [provider]
        kind = "ollama"
        "#,
    )
    .unwrap()
}

#[test]
fn cli_parse_ask() {
    let cli = Cli::parse_from(["tern", "ask", "what time is it?"]);
    match cli.command {
        Command::Ask(ask) => {
            assert_eq!(ask.prompt, "what time is it?");
            assert_eq!(ask.max_steps, None);
            assert!(!ask.no_tools);
        }
        _ => panic!("expected Ask command"),
    }
}

#[test]
fn cli_parse_ask_flags() {
    let cli = Cli::parse_from([
        "tern",
        "ask",
        "--max-steps",
        "6",
        "--system",
        "answer in French",
        "--no-tools",
        "--usage",
        "hi",
    ]);
    match cli.command {
        Command::Ask(ask) => {
            assert_eq!(ask.max_steps, Some(6));
            assert_eq!(ask.system.as_deref(), Some("answer in French"));
            assert!(ask.no_tools);
            assert!(ask.usage);
        }
        _ => panic!("expected Ask command"),
    }
}

#[test]
fn cli_parse_global_flags() {
    let cli = Cli::parse_from(["tern", "ask", "hi", "--config", "a.toml", "--model", "gpt-4o"]);
    assert_eq!(cli.config.as_deref(), Some(Path::new("a.toml")));
    assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
}

#[test]
fn cli_parse_config_init() {
    let cli = Cli::parse_from(["tern", "config", "init", "--force"]);
    assert!(matches!(
        cli.command,
        Command::Config {
            action: ConfigCommand::Init { force: true }
        }
    ));
}

#[test]
fn ask_params_use_config_defaults() {
    let cli = Cli::parse_from(["tern", "ask", "hi"]);
    let Command::Ask(ask) = cli.command else {
        panic!("expected Ask command");
    };
    let params = ask.params(&config());

    assert_eq!(params.max_steps, MAX_STEPS);
    assert_eq!(params.messages.len(), 2);
    assert_eq!(params.messages[0], tern::Message::system("be brief"));
    assert_eq!(params.messages[1], tern::Message::user("hi"));
    let names: Vec<_> = params.tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["current_time", "calculate"]);
}

#[test]
fn ask_flags_override_config() {
    let cli = Cli::parse_from([
        "tern",
        "ask",
        "--max-steps",
        "2",
        "--system",
        "answer in French",
        "--no-tools",
        "hi",
    ]);
    let Command::Ask(ask) = cli.command else {
        panic!("expected Ask command");
    };
    let params = ask.params(&config());

    assert_eq!(params.max_steps, 2);
    assert_eq!(params.messages[0], tern::Message::system("answer in French"));
    assert!(params.tools.is_empty());
}
