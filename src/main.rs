// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::process;

use the_dustpan::backends::local::LocalUnitFactory;
use the_dustpan::config::consts::{DEFAULT_CONFIG_ENV_KEY, DEFAULT_CONFIG_PATH};
use the_dustpan::config::RuntimeBuilder;
use the_dustpan::engine::{RunReport, Stage};
use tracing_subscriber::EnvFilter;

/// Options of the `run` command
struct RunArgs {
    suite: String,
    config_file: String,
    config_variable: String,
    debug: bool,
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {} run -s <suite> [-c <config file>] [-e <env variable>] [-d]", program);
    eprintln!("       {} units", program);
    eprintln!();
    eprintln!("  -s, --suite     suite to run");
    eprintln!("  -c, --config    config file (default: {})", DEFAULT_CONFIG_PATH);
    eprintln!("  -e, --env       variable holding the config (default: {})", DEFAULT_CONFIG_ENV_KEY);
    eprintln!("  -d, --debug     debug logging");
    process::exit(2);
}

fn parse_run_args(program: &str, args: &[String]) -> RunArgs {
    let mut suite = None;
    let mut config_file = DEFAULT_CONFIG_PATH.to_string();
    let mut config_variable = DEFAULT_CONFIG_ENV_KEY.to_string();
    let mut debug = false;

    let mut args = args.iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-s" | "--suite" => suite = args.next().cloned(),
            "-c" | "--config" => match args.next() {
                Some(value) => config_file = value.clone(),
                None => usage(program),
            },
            "-e" | "--env" => match args.next() {
                Some(value) => config_variable = value.clone(),
                None => usage(program),
            },
            "-d" | "--debug" => debug = true,
            _ => usage(program),
        }
    }

    match suite {
        Some(suite) => RunArgs {
            suite,
            config_file,
            config_variable,
            debug,
        },
        None => usage(program),
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_report(report: &RunReport) {
    println!();
    println!("🧹 Run summary");
    println!("══════════════");
    for stage in Stage::ALL {
        if let Some(summary) = report.summary(stage) {
            println!(
                "  {:<11} {} executed, {} failed, {} scheduled",
                stage.name(),
                summary.executed.len(),
                summary.failed.len(),
                summary.scheduled.len()
            );
        }
    }
    println!("  findings    {}", report.findings.len());
    println!("  errors      {}", report.error_count());
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("the-dustpan");

    match args.get(1).map(String::as_str) {
        Some("units") => {
            let factories = LocalUnitFactory::factory_map();
            for stage in Stage::ALL {
                println!("{}:", stage.section());
                for path in factories.paths(stage) {
                    println!("  {}", path);
                }
            }
        }
        Some("run") => {
            let run = parse_run_args(program, &args[2..]);
            init_logging(run.debug);

            let mut pipeline = match RuntimeBuilder::from_source(
                &run.config_variable,
                &run.config_file,
                &run.suite,
                LocalUnitFactory::factory_map(),
            ) {
                Ok(pipeline) => pipeline,
                Err(e) => {
                    eprintln!("❌ {}", e);
                    process::exit(1);
                }
            };

            match pipeline.run().await {
                Ok(report) => print_report(&report),
                Err(e) => {
                    eprintln!("❌ {}", e);
                    process::exit(1);
                }
            }
        }
        _ => usage(program),
    }
}
