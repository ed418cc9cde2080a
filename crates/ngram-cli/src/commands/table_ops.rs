use std::fs;
use std::path::Path;
use std::process;

use ngram_core::settings::settings;
use ngram_core::{PredictionEngine, TableBuilder};

use super::megabytes;

pub struct CompileOptions {
    pub max_depth: Option<u32>,
    pub min_count: Option<u64>,
}

/// Count n-grams over every corpus file and write a table to `output_file`.
pub fn compile(corpus_files: &[String], output_file: &str, opts: &CompileOptions) {
    let max_depth = opts.max_depth.unwrap_or(settings().build.max_depth);
    let min_count = opts.min_count.unwrap_or(settings().build.min_count);

    let builder = die!(TableBuilder::new(max_depth), "Error: {}");
    let mut builder = builder.min_count(min_count as f64);

    for file in corpus_files {
        eprintln!("Reading {file}...");
        let text = die!(fs::read_to_string(file), "Error reading {file}: {}");
        builder.add_text(&text);
    }

    eprintln!(
        "Building table from {} keys (depth {max_depth}, min count {min_count})...",
        builder.key_count()
    );
    die!(
        builder.save(Path::new(output_file)),
        "Error writing {output_file}: {}"
    );

    let file_size = fs::metadata(output_file).map(|m| m.len()).unwrap_or(0);
    eprintln!("Wrote {output_file} ({:.1} MB)", megabytes(file_size));
}

pub fn info(table_file: &str) {
    let engine = open_or_die(Path::new(table_file));
    let Some(info) = engine.info() else {
        return;
    };

    println!("Table:      {table_file}");
    println!("File size:  {:.1} MB", megabytes(info.file_len as u64));
    println!("Version:    {}", info.header.version);
    println!("Depth:      {}", info.header.max_context_depth);
    println!("Weights:    {}", info.weight_count);
    println!("Keys:       {}", engine.key_count());
    for (kind, section) in ngram_core::table::SectionKind::ALL
        .iter()
        .zip(info.header.sections.iter())
    {
        println!(
            "Section:    {kind:<8} offset {:>10}  length {:>10}",
            section.offset, section.length
        );
    }
}

pub fn lookup(table_file: &str, key: &str) {
    let engine = open_or_die(Path::new(table_file));
    match engine.lookup(key) {
        Some(weight) => println!("{key} → {weight}"),
        None => println!("{key} → (not found)"),
    }
}

/// Open a table, exiting with the load error if the engine comes up disabled.
pub(crate) fn open_or_die(path: &Path) -> PredictionEngine {
    let engine = PredictionEngine::open(path);
    if let Some(reason) = engine.disabled_reason() {
        eprintln!("Error opening table {}: {reason}", path.display());
        process::exit(1);
    }
    engine
}
