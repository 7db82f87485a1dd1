//! `chainplan` — CLI
//!
//! Ici on fait uniquement : parsing d'arguments, initialisation (logger, couleur), et
//! délégation à `chainplan_cli` (lib).

#![forbid(unsafe_code)]

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use chainplan_cli as cli;

// ──────────────────────────── CLI (clap) ────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "chainplan", version, about = "chainplan — planifier des séquences d'appels de contrats", long_about = None)]
struct Opt {
    /// Augmente la verbosité (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux (casse la verbosité)
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue, global = true)]
    quiet: bool,

    /// Force la couleur (si la feature `color` est compilée)
    #[arg(long = "color", value_enum, default_value_t = ColorChoice::Auto, global = true)]
    color: ColorChoice,

    /// Sous-commandes
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Disasm,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Planifier un script JSON (contrats + appels) en instructions + état initial
    Plan {
        /// Script (ou - pour stdin)
        script: Option<PathBuf>,
        /// Fichier de sortie (stdout si omis)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Format de sortie
        #[arg(short, long, value_enum, default_value_t = Format::Json)]
        format: Format,
        /// Afficher le temps de planification
        #[arg(long)]
        time: bool,
    },

    /// Calculer le sélecteur 4 octets de signatures
    Selector {
        /// Signatures (`add(uint256,uint256)`, `function f(uint a) returns (bool)`)
        #[arg(required = true)]
        signatures: Vec<String>,
    },
}

// ──────────────────────────── Logger / Verbosité ────────────────────────────

fn init_telemetry(verbose: u8, quiet: bool) {
    #[cfg(feature = "trace")]
    {
        let level = if quiet {
            "error"
        } else {
            match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        };
        std::env::set_var(
            "RUST_LOG",
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
        );
        cli::init_logger();
    }
    #[cfg(not(feature = "trace"))]
    {
        let _ = (verbose, quiet);
    }
}

fn init_color(choice: ColorChoice) {
    match choice {
        ColorChoice::Auto => {}
        ColorChoice::Always => {
            std::env::set_var("CLICOLOR_FORCE", "1");
            std::env::remove_var("NO_COLOR");
        }
        ColorChoice::Never => {
            std::env::set_var("NO_COLOR", "1");
            std::env::remove_var("CLICOLOR_FORCE");
        }
    }
}

// ──────────────────────────── main ────────────────────────────

fn main() -> ExitCode {
    match real_main() {
        Ok(0) => ExitCode::SUCCESS,
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn real_main() -> Result<i32> {
    let opt = Opt::parse();

    init_color(opt.color);
    init_telemetry(opt.verbose, opt.quiet);

    let command = match opt.cmd {
        Command::Plan { script, output, format, time } => {
            let input = match script {
                Some(p) if p.as_os_str() != "-" => cli::Input::Path(p),
                _ => cli::Input::Stdin,
            };
            let output = output.map_or(cli::Output::Stdout, cli::Output::Path);
            let format = match format {
                Format::Json => cli::OutputFormat::Json,
                Format::Disasm => cli::OutputFormat::Disasm,
            };
            cli::Command::Plan(cli::PlanTask { input, output, format, time })
        }
        Command::Selector { signatures } => {
            cli::Command::Selector(cli::SelectorTask { signatures })
        }
    };

    cli::execute(command).context("échec d'exécution de la commande")
}
