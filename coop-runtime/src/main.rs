use anyhow::{anyhow, Result};
use clap::{arg, ArgAction, Command};
use coop_runtime::{evaluate_routes, route_scenario, RouteMap};
use coop_structs::{config::RoutingMode, core::Scenario};
use coop_utils::{compress_obj, jsonify, load_json_arg};
use std::{fs, path::PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

fn cli() -> Command {
    Command::new("coop-runtime")
        .about("Plans cooperative routes for a group of agents")
        .arg_required_else_help(true)
        .arg(
            arg!(--"log-level" [LEVEL] "Log filter used when RUST_LOG is not set")
                .global(true)
                .default_value("warn")
                .value_parser(clap::value_parser!(String)),
        )
        .subcommand(
            Command::new("route")
                .about("Computes one route per agent")
                .arg(
                    arg!(<SCENARIO> "Scenario json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--seed [SEED] "Overrides the scenario seed")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--mode [MODE] "Routing mode")
                        .default_value("cooperative")
                        .value_parser(["cooperative", "individual", "mixed"]),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the output will be saved to this file path (default json)")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--compress [COMPRESS] "If output file is set, the output will be compressed as zlib")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("evaluate")
                .about("Reports the cost of a given set of routes")
                .arg(
                    arg!(<SCENARIO> "Scenario json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(<ROUTES> "Json object of agent id to route, or path to json file")
                        .value_parser(clap::value_parser!(String)),
                ),
        )
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let matches = cli().get_matches();
    init_logging(
        matches
            .get_one::<String>("log-level")
            .map(String::as_str)
            .unwrap_or("warn"),
    );

    if let Err(e) = match matches.subcommand() {
        Some(("route", sub_m)) => route(
            sub_m.get_one::<String>("SCENARIO").unwrap().clone(),
            sub_m.get_one::<u64>("seed").copied(),
            sub_m.get_one::<String>("mode").unwrap().clone(),
            sub_m.get_one::<PathBuf>("output").cloned(),
            *sub_m.get_one::<bool>("compress").unwrap(),
        ),
        Some(("evaluate", sub_m)) => evaluate(
            sub_m.get_one::<String>("SCENARIO").unwrap().clone(),
            sub_m.get_one::<String>("ROUTES").unwrap().clone(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_mode(mode: &str) -> Result<RoutingMode> {
    serde_json::from_value(serde_json::Value::String(mode.to_string()))
        .map_err(|_| anyhow!("Unknown routing mode '{}'", mode))
}

pub fn route(
    scenario: String,
    seed: Option<u64>,
    mode: String,
    output_file: Option<PathBuf>,
    compress: bool,
) -> Result<()> {
    let scenario: Scenario = load_json_arg(&scenario)?;
    let output = route_scenario(&scenario, parse_mode(&mode)?, seed)?;

    if let Some(path) = output_file {
        if compress {
            fs::write(&path, compress_obj(&output)?)?;
        } else {
            fs::write(&path, jsonify(&output)?)?;
        }
        println!("routes written to: {:?}", path);
    } else {
        println!("{}", jsonify(&output)?);
    }
    Ok(())
}

pub fn evaluate(scenario: String, routes: String) -> Result<()> {
    let scenario: Scenario = load_json_arg(&scenario)?;
    let routes: RouteMap = load_json_arg(&routes)?;
    let output = evaluate_routes(&scenario, &routes)?;
    println!("{}", jsonify(&output.cost)?);
    Ok(())
}
