use anyhow::Result;
use recipe_units::config::ConverterConfig;
use recipe_units::observability;
use recipe_units::{Recipe, UnitConverter};
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use tracing::info;

const USAGE: &str = "Usage: recipe-units [--recipe <file.json> | --name | --prep]

  --recipe <file>  convert a recipe JSON document and print it
  --name           convert stdin lines as ingredient names
  --prep           convert stdin lines as preparation steps (default)";

enum Mode {
    Recipe(String),
    Names,
    Steps,
}

fn parse_args(args: &[String]) -> Result<Mode> {
    match args.first().map(String::as_str) {
        None | Some("--prep") => Ok(Mode::Steps),
        Some("--name") => Ok(Mode::Names),
        Some("--recipe") => args
            .get(1)
            .map(|path| Mode::Recipe(path.clone()))
            .ok_or_else(|| anyhow::anyhow!("--recipe requires a file path\n\n{}", USAGE)),
        Some(other) => Err(anyhow::anyhow!("Unknown argument '{}'\n\n{}", other, USAGE)),
    }
}

fn convert_lines(convert: impl Fn(&str) -> String) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        writeln!(out, "{}", convert(&line?))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = ConverterConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    observability::init_tracing(&config)?;

    let mode = parse_args(&env::args().skip(1).collect::<Vec<_>>())?;
    let converter = UnitConverter::from_config(&config)?;

    match mode {
        Mode::Recipe(path) => {
            info!(path = %path, "Converting recipe document");
            let recipe = Recipe::from_json(&fs::read_to_string(&path)?)?;
            let converted = converter.convert_recipe(&recipe)?;
            println!("{}", converted.to_json()?);
        }
        Mode::Names => convert_lines(|line| converter.convert_units_name(line))?,
        Mode::Steps => convert_lines(|line| converter.convert_units_prep(line))?,
    }

    Ok(())
}
