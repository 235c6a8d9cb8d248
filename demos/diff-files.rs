use std::{env, fs, process};

use markup_diff::diff_markup;

/// Diffs two versions of a markup file and renders their annotated merge.
///
/// Run it with:
/// `cargo run --example diff-files old.html new.html [output_file.html]`
///
/// Set `RUST_LOG=trace` to see the reconciliation decisions.
fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 || args.len() > 4 {
        eprintln!("Usage: diff-files <old> <new> [output]");
        process::exit(1);
    }

    let old_file = &args[1];
    let new_file = &args[2];
    let output_file = args.get(3);

    // Read files
    let old_content = fs::read_to_string(old_file).unwrap_or_else(|error| {
        eprintln!("Error reading {old_file}: {error}");
        process::exit(1);
    });

    let new_content = fs::read_to_string(new_file).unwrap_or_else(|error| {
        eprintln!("Error reading {new_file}: {error}");
        process::exit(1);
    });

    // Diff the two documents into one annotated document
    let annotated = diff_markup(&old_content, &new_content).unwrap_or_else(|error| {
        eprintln!("Error diffing the files: {error}");
        process::exit(1);
    });

    // Write the result
    if let Some(output_path) = output_file {
        if let Err(error) = fs::write(output_path, annotated) {
            eprintln!("Error writing to {output_path}: {error}");
            process::exit(1);
        }
    } else {
        print!("{annotated}");
    }
}
