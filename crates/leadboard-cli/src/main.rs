// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result};
use config::Config;
use leadboard_app::{AppState, LeadBoard};
use leadboard_remote::Client;
use leadboard_tui::HostOptions;
use runtime::BoardRuntime;
use std::env;
use std::path::PathBuf;
use tracing::info;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `leadboard --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let mut runtime = if options.demo {
        BoardRuntime::demo()
    } else {
        let client = Client::new(config.base_url(), config.timeout()?).with_context(|| {
            format!(
                "invalid [backend] config in {}; fix base_url/timeout values",
                options.config_path.display()
            )
        })?;
        BoardRuntime::Remote(client)
    };

    if options.check_only {
        if let BoardRuntime::Remote(client) = &runtime {
            client.ping().with_context(|| {
                format!("backend check failed for {}", client.base_url())
            })?;
        }
        println!("ok: {}", runtime.describe());
        return Ok(());
    }

    let log_path = config.log_file()?;
    logging::init_logging(&log_path, config.log_level())?;
    info!(backend = %runtime.describe(), log = %log_path.display(), "starting leadboard");

    let host_options = HostOptions {
        status_ttl: config.status_ttl()?,
        initial_filter: config.initial_filter().map(str::to_owned),
    };
    let mut state = AppState::default();
    let mut board = LeadBoard::new();
    leadboard_tui::run_app(&mut state, &mut board, &mut runtime, &host_options)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow::anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("leadboard: bulk status and owner edits for CRM leads");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Run against seeded in-memory leads");
    println!("  --check                  Validate config and reach the backend, then exit");
    println!("  --help                   Show this help");
}
