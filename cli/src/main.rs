/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use prudens::parser_prudens::{parse_context, parse_knowledge_base};
use prudens::reasoning::to_dot::ToDot;
use prudens::{InferenceResult, OperationMode, Reasoner, ReasonerConfig};
use std::fs;
use std::time::Duration;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
    Dot,
}

#[derive(Parser)]
#[command(
    name = "prudens",
    version = "0.1.0",
    author = "Volodymyr Kadzhaia <vkadzhaia@gmail.com>",
    author = "Pieter Bonte <pieter.bonte@kuleuven.be>",
    about = "Forward-chaining over a prioritized knowledge base",
    long_about = "Loads a knowledge base and a context, derives facts until nothing changes, and prints what holds. Earlier rules win conflicts against later ones."
)]
struct Args {
    #[arg(short, long, help = "Knowledge base file", value_name = "FILE")]
    kb: String,

    #[arg(short, long, help = "Context file with ground facts", value_name = "FILE")]
    context: Option<String>,

    #[arg(long, help = "Reasoner settings as JSON", value_name = "FILE")]
    config: Option<String>,

    #[arg(long, help = "Give up after this many rounds")]
    max_rounds: Option<usize>,

    #[arg(long, help = "Give up after this many milliseconds")]
    time_budget_ms: Option<u64>,

    #[arg(long, help = "Join rule bodies on all cores")]
    parallel: bool,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[arg(short, long, help = "Log the fixpoint rounds to stderr")]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<ReasonerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            ReasonerConfig::from_json(&text).with_context(|| format!("parsing {}", path))?
        }
        None => ReasonerConfig::default(),
    };
    if let Some(max_rounds) = args.max_rounds {
        config = config.with_max_rounds(max_rounds);
    }
    if let Some(ms) = args.time_budget_ms {
        config = config.with_time_budget(Duration::from_millis(ms));
    }
    if args.parallel {
        config = config.with_operation_mode(OperationMode::MultiThread);
    }
    Ok(config)
}

fn print_result(result: &InferenceResult, format: Format) -> Result<()> {
    match format {
        Format::Text => {
            println!("{}", result);
            for retraction in &result.retractions {
                println!(
                    "retracted in round {}: {} (by {})",
                    retraction.round, retraction.defeated, retraction.instance
                );
            }
            for anomaly in &result.anomalies {
                println!("anomaly: {}", anomaly);
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(result)?),
        Format::Dot => println!("{}", result.to_dot()),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let kb_text = fs::read_to_string(&args.kb).with_context(|| format!("reading {}", args.kb))?;
    let parsed = parse_knowledge_base(&kb_text)?;
    for warning in &parsed.warnings {
        eprintln!("warning: {}", warning);
    }

    let context = match &args.context {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
            parse_context(&text)?
        }
        None => Vec::new(),
    };

    let reasoner = Reasoner::from_knowledge_base(parsed.knowledge_base())?.with_config(load_config(&args)?);
    match reasoner.infer(&context) {
        Ok(result) => print_result(&result, args.format),
        Err(err) => {
            // Still show how far it got.
            print_result(err.partial(), args.format)?;
            Err(err.into())
        }
    }
}
