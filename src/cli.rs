//! Command-line front-end: argument parsing and file plumbing around [`rewrite_source`].

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{debug, info};

use crate::rewrite::config::DEFAULT_PROGRAM_COUNTER;
use crate::rewrite::{NameMatching, RewriteConfig, RewriteOutcome, rewrite_source};
use crate::sleigh::CONSTRUCTOR_GRAMMAR;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LONG_ABOUT: &str = "Rewrites a SLEIGH specification so that every constructor whose disassembly
actions derive a value from inst_next also claims, at runtime, that the value matches the same
expression evaluated against the program counter.

The program-counter definition file is spliced verbatim right after the leading
`define endian=...;` declaration, followed by `define pcodeop <claim-op>;`.";

#[derive(Parser, Debug)]
#[command(
    name = "pcrel-claims",
    version = VERSION,
    about = "Inject program-counter claims for inst_next-relative disassembly actions",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    /// Specification file to rewrite
    #[arg(value_name = "TARGET_FILE")]
    pub target_file: PathBuf,
    #[arg(
        long = "pc-def",
        alias = "pc_def",
        value_name = "FILE",
        long_help = "File whose contents define the runtime program counter; inserted after the endian declaration."
    )]
    pub pc_def: PathBuf,
    #[arg(
        long = "inst-next-size-hint",
        alias = "inst_next_size_hint",
        value_name = "SIZE",
        long_help = "Size annotation for the temporary that holds each checked value, e.g. 4 or 4:4."
    )]
    pub inst_next_size_hint: String,
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    pub out: PathBuf,
    #[arg(
        long = "program-counter",
        value_name = "EXPR",
        default_value = DEFAULT_PROGRAM_COUNTER,
        long_help = "Runtime expression substituted for inst_next inside every claim."
    )]
    pub program_counter: String,
    #[arg(long = "temp-name", value_name = "NAME")]
    pub temp_name: Option<String>,
    #[arg(long = "claim-op", value_name = "NAME")]
    pub claim_op: Option<String>,
    #[arg(
        long = "match-identifiers",
        action = ArgAction::SetTrue,
        long_help = "Only treat a semantics statement as using an action name when the name appears as a whole identifier, instead of as any substring."
    )]
    pub match_identifiers: bool,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn config(&self) -> RewriteConfig {
        let mut config = RewriteConfig::new(self.inst_next_size_hint.clone())
            .with_program_counter(self.program_counter.clone());
        if let Some(temp_name) = &self.temp_name {
            config = config.with_temp_name(temp_name.clone());
        }
        if let Some(claim_op) = &self.claim_op {
            config = config.with_claim_op(claim_op.clone());
        }
        if self.match_identifiers {
            config = config.with_name_matching(NameMatching::Identifier);
        }
        config
    }

    /// Default `tracing` filter directive for the requested verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Reads the inputs, rewrites the target and writes the result. Nothing is written on failure.
pub fn run(cli: &Cli) -> Result<RewriteOutcome> {
    debug!(grammar = CONSTRUCTOR_GRAMMAR, "constructor layout");
    let target = fs::read_to_string(&cli.target_file)
        .with_context(|| format!("reading {}", cli.target_file.display()))?;
    let pc_def = fs::read_to_string(&cli.pc_def)
        .with_context(|| format!("reading {}", cli.pc_def.display()))?;

    let config = cli.config();
    let outcome = rewrite_source(&target, &pc_def, &config)
        .with_context(|| format!("rewriting {}", cli.target_file.display()))?;

    fs::write(&cli.out, &outcome.text)
        .with_context(|| format!("writing {}", cli.out.display()))?;
    info!(
        constructors = outcome.constructors_seen,
        rewritten = outcome.rewritten.len(),
        claims = outcome.claims_inserted(),
        out = %cli.out.display(),
        "rewrite complete"
    );
    Ok(outcome)
}
