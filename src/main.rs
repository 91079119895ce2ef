//! shexplain: explain a shell command.
//!
//! Takes the command as arguments (or prompts for it), prints the command with
//! each recognized token highlighted, then one line of explanation per token.

use std::io::Write;

use clap::Parser;
use log::{LevelFilter, debug};

use shexplain::config::{ColorMode, Config};
use shexplain::console::ExplainConsole;
use shexplain::highlight::{AnsiDecorator, Decorator, PlainDecorator};
use shexplain::knowledge::Registry;
use shexplain::parse::ShellParser;
use shexplain::{Result, logging};

#[derive(Debug, Parser)]
#[command(name = "shexplain", version)]
#[command(about = "Explain a shell command, token by token")]
struct Cli {
    /// Command to explain. Prompts interactively when omitted.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
    /// Print nodes and explanations as JSON instead of styled text.
    #[arg(long)]
    json: bool,
    /// When to use colors (overrides the config setting).
    #[arg(long, value_enum)]
    color: Option<ColorMode>,
    /// Config overlay to merge over the defaults (default: ~/.config/shexplain/config.toml).
    #[arg(long)]
    config: Option<String>,
    /// Print the merged configuration as TOML and exit.
    #[arg(long)]
    dump_config: bool,
    /// Log debug detail to the log file.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("shexplain: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        logging::level_from_str(&config.settings.log_level)
    };
    logging::init(level);

    if cli.dump_config {
        write!(std::io::stdout(), "{}", config.to_toml()?)?;
        return Ok(());
    }

    let registry = Registry::from_config(&config);
    debug!("loaded {} programs", registry.len());

    let decorator: Box<dyn Decorator> = if cli.json {
        Box::new(PlainDecorator)
    } else {
        let mode = cli.color.unwrap_or(config.settings.color);
        Box::new(AnsiDecorator::new(mode.into()))
    };
    let console = ExplainConsole::new(config.settings.icon.clone(), decorator);

    let query = if cli.command.is_empty() {
        console.prompt()?
    } else {
        cli.command.join(" ")
    };

    let response = ShellParser::new()?.parse(&query, &registry);
    let mut stdout = std::io::stdout().lock();
    if cli.json {
        console.render_json(&mut stdout, &response)
    } else {
        console.render(&mut stdout, &response)
    }
}
