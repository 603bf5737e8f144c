#![warn(clippy::pedantic)]

use std::cmp::Ordering;
use std::env;
use std::process;
use std::sync::Arc;

use log::warn;
use unicol::{make_collator, parse_allkeys, read_table, write_table, Collator, Result};

const USAGE: &str = "\
Usage:
  unicol import <allkeys.txt> <table.bin>
  unicol conformance <table.bin> <CollationTest.txt>
  unicol key <table.bin> <text>";

fn main() {
    let _ = simple_logger::SimpleLogger::new().env().init();

    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    let outcome = match args.as_slice() {
        ["import", allkeys, out] => import(allkeys, out),
        ["conformance", table, test_file] => conformance(table, test_file),
        ["key", table, text] => print_key(table, text),
        _ => {
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("ERROR: {e}");
        process::exit(1);
    }
}

fn import(allkeys: &str, out: &str) -> Result<()> {
    let text = std::fs::read_to_string(allkeys)?;
    let data = parse_allkeys(&text)?;
    println!(
        "Parsed {} entries (version {})",
        data.entries.len(),
        data.version.as_deref().unwrap_or("unknown")
    );

    write_table(out, &data)
}

fn load_collator(table: &str) -> Result<Collator> {
    let table = Arc::new(read_table(table)?);
    make_collator(table, true, 3, None)
}

fn print_key(table: &str, text: &str) -> Result<()> {
    let collator = load_collator(table)?;
    let key: Vec<String> = collator
        .key(text)
        .iter()
        .map(|w| format!("{w:04X}"))
        .collect();

    println!("{}", key.join(" "));
    Ok(())
}

/// Each line of a CollationTest file must sort at or after the line before it.
fn conformance(table: &str, test_file: &str) -> Result<()> {
    let collator = load_collator(table)?;
    let test_data = std::fs::read_to_string(test_file)?;

    let mut max_line = String::new();
    let mut checked = 0_usize;
    let mut failures = 0_usize;

    'lines: for (index, line) in test_data.lines().enumerate() {
        let code_points = line.split(['#', ';']).next().unwrap_or_default().trim();
        if code_points.is_empty() {
            continue;
        }

        let mut test_string = String::new();

        for s in code_points.split_whitespace() {
            match u32::from_str_radix(s, 16).ok().and_then(char::from_u32) {
                Some(c) => test_string.push(c),
                None => {
                    // The test files deliberately include lone surrogates
                    warn!("line {}: skipping {s}, not a scalar value", index + 1);
                    continue 'lines;
                }
            }
        }

        checked += 1;
        if collator.compare(&test_string, &max_line) == Ordering::Less {
            failures += 1;
            warn!("line {}: {code_points} sorts before the previous line", index + 1);
        }

        max_line = test_string;
    }

    println!("Checked {checked} lines, {failures} out of order");
    Ok(())
}
