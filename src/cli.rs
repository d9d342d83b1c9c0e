use std::path::PathBuf;

use crate::config::Config;
use crate::data::loader::load_dataset;
use crate::data::validate::{validate_dataset_file, ValidationSeverity};
use crate::frames::FrameService;
use crate::server::{self, ServerState};

const DEFAULT_CLI_USER: &str = "anon";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Query,
    Validate,
    Characters,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("query") => Some(Command::Query),
        Some("validate") => Some(Command::Validate),
        Some("characters") => Some(Command::Characters),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = Config::from_env();
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(config),
        Some(Command::Query) => handle_query(args, &config),
        Some(Command::Validate) => handle_validate(args, &config),
        Some(Command::Characters) => handle_characters(args, &config),
        None => {
            eprintln!("usage: menat <serve|query|validate|characters>");
            2
        }
    }
}

fn handle_serve(config: Config) -> i32 {
    let service = match FrameService::from_config(&config) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("failed to load dataset: {err}");
            return 1;
        }
    };

    let state = ServerState {
        service,
        token: config.token.clone(),
    };
    match server::run_server(&config.bind_addr, state) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct QueryArgs {
    text: String,
    user: String,
    json: bool,
}

fn parse_query_args(args: &[String]) -> Option<QueryArgs> {
    let mut words = Vec::new();
    let mut user = DEFAULT_CLI_USER.to_string();
    let mut json = false;

    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--user" => user = rest.next()?.clone(),
            _ => words.push(arg.as_str()),
        }
    }

    let text = words.join(" ");
    (!text.trim().is_empty()).then_some(QueryArgs { text, user, json })
}

fn handle_query(args: &[String], config: &Config) -> i32 {
    let Some(query) = parse_query_args(args) else {
        eprintln!("usage: menat query <text...> [--user NAME] [--json]");
        return 2;
    };

    let service = match FrameService::from_config(config) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("failed to load dataset: {err}");
            return 1;
        }
    };

    let replies = match service.handle(&query.text, &query.user) {
        Ok(replies) => replies,
        Err(err) => {
            log::error!("{err}");
            eprintln!("query failed: {err}");
            return 1;
        }
    };

    if query.json {
        match serde_json::to_string_pretty(&replies) {
            Ok(payload) => println!("{payload}"),
            Err(err) => {
                eprintln!("failed to serialize replies: {err}");
                return 1;
            }
        }
    } else {
        for reply in &replies {
            println!("{}", reply.as_text());
        }
    }
    0
}

fn path_arg(args: &[String], config: &Config) -> PathBuf {
    args.get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_path.clone())
}

fn handle_validate(args: &[String], config: &Config) -> i32 {
    let path = path_arg(args, config);
    let display = path.display();

    match validate_dataset_file(&path) {
        Ok(report) => {
            for diagnostic in &report.diagnostics {
                eprintln!("- {diagnostic}");
            }
            if report.has_errors() {
                eprintln!(
                    "validation failed: {} error(s), {} warning(s)",
                    report.count(ValidationSeverity::Error),
                    report.count(ValidationSeverity::Warning)
                );
                1
            } else {
                println!(
                    "validation passed: {display} ({} warning(s))",
                    report.count(ValidationSeverity::Warning)
                );
                0
            }
        }
        Err(err) => {
            eprintln!("validation failed: {err}");
            1
        }
    }
}

fn handle_characters(args: &[String], config: &Config) -> i32 {
    let path = path_arg(args, config);
    match load_dataset(&path) {
        Ok(dataset) => {
            for name in dataset.character_names() {
                println!("{name}");
            }
            0
        }
        Err(err) => {
            eprintln!("failed to load dataset: {err}");
            1
        }
    }
}
