//! password-rules - derive password candidates from natural-language phrases
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::process;
use std::sync::Arc;

use password_rules::cli::{Args, Command, RULE_HELP};
use password_rules::processor::{BatchConfig, BatchProcessor, Generator, GeneratorConfig};
use password_rules::progress::{print_banner, print_error, print_header, print_info};
use password_rules::rules::{PrefixDictionary, Rule, RuleConfig, Step};

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else if !args.quiet {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    // Configure thread pool
    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .ok();
    }

    // Rule problems are usage errors
    let config = match args.rule_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!();
            eprintln!("Usage:");
            eprintln!("  {}", args.command.usage());
            eprintln!();
            eprint!("{}", RULE_HELP);
            process::exit(1);
        }
    };

    if let Err(e) = run(&args, &config) {
        print_error(&format!("{}", e));

        // Print chain of errors
        let mut source = e.source();
        while let Some(err) = source {
            print_error(&format!("  Caused by: {}", err));
            source = err.source();
        }

        process::exit(1);
    }
}

fn run(args: &Args, config: &RuleConfig) -> anyhow::Result<()> {
    let quiet = args.quiet || matches!(args.command, Command::Steps { .. });

    if !quiet {
        print_banner();
    }

    let rule = build_rule(args, config)?;

    if !quiet && args.verbose {
        print_config(args, config);
    }

    match &args.command {
        Command::Apply { .. } => {
            let generator = Generator::new(rule, GeneratorConfig::from_args(args)?);
            generator.process()?;
        }
        Command::Batch { .. } => {
            let processor = BatchProcessor::new(rule, BatchConfig::from_args(args)?);
            processor.process()?;
        }
        Command::Steps { phrase, .. } => {
            for (step, snapshot) in Step::ALL.iter().zip(rule.apply_in_steps(phrase)) {
                println!("{:<18} {}", format!("{}:", step.name()), snapshot);
            }
        }
    }

    Ok(())
}

/// Load the prefix dictionary once, if the rule needs one, and compose the rule
fn build_rule(args: &Args, config: &RuleConfig) -> anyhow::Result<Rule> {
    let prefixes = if config.replacement.needs_dictionary() {
        let dictionary = match args.prefix_map {
            Some(ref path) => PrefixDictionary::from_file(path)?,
            None => PrefixDictionary::builtin()?,
        };
        log::info!("Using {} prefix mappings", dictionary.len());
        Some(Arc::new(dictionary))
    } else {
        None
    };

    Ok(Rule::new(config, prefixes)?)
}

/// Print configuration summary
fn print_config(args: &Args, config: &RuleConfig) {
    print_header("Configuration");

    print_info(&format!("Character set: {}", config.charset));
    print_info(&format!("Replacement:   {}", config.replacement));
    print_info(&format!("Every nth:     {}", config.token_selector));
    print_info(&format!("Characters:    {:?}", config.character_selector));
    print_info(&format!("Add spaces:    {}", config.add_spaces));
    if let Some(ref path) = args.prefix_map {
        print_info(&format!("Prefix map:    {:?}", path));
    }
    print_info(&format!("Threads:       {}", args.threads.unwrap_or_else(num_cpus::get)));
}
