use anyhow::{Context, Result};
use htmlsplit_config::Config;
use htmlsplit_engine::split_message;
use std::{env, fs, path::PathBuf, process};

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} [--max-len N] <input-file>");
    process::exit(1);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    let mut max_len: Option<usize> = None;
    let mut input: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--max-len" => {
                i += 1;
                let Some(value) = args.get(i) else {
                    usage(&args[0]);
                };
                match value.parse::<usize>() {
                    Ok(parsed) => max_len = Some(parsed),
                    Err(_) => {
                        eprintln!("Error: --max-len expects an integer, got '{value}'");
                        process::exit(1);
                    }
                }
            }
            arg if input.is_none() => input = Some(PathBuf::from(arg)),
            _ => usage(&args[0]),
        }
        i += 1;
    }

    let Some(input) = input else {
        usage(&args[0]);
    };

    // Flag wins over config file, config file over the built-in default.
    let max_len = match max_len {
        Some(value) => value,
        None => match Config::load() {
            Ok(Some(config)) => config.max_len,
            Ok(None) => Config::default().max_len,
            Err(e) => {
                eprintln!("Error: failed to load config file: {e}");
                process::exit(1);
            }
        },
    };

    let source = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let fragments = match split_message(&source, max_len) {
        Ok(fragments) => fragments,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    for (i, fragment) in fragments.enumerate() {
        match fragment {
            Ok(fragment) => {
                println!("fragment #{}: {} chars.", i + 1, fragment.chars().count());
                println!("{fragment}");
            }
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(1);
            }
        }
    }

    Ok(())
}
