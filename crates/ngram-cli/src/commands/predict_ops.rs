use std::path::Path;

use ngram_core::PredictionEngine;

use super::table_ops::open_or_die;

pub fn predict(table_file: &str, context: &str, scores: bool) {
    let engine = open_or_die(Path::new(table_file));
    let predictions = engine.predict_scored(context);

    if predictions.is_empty() {
        println!("(no predictions)");
        return;
    }

    if scores {
        println!("{:>4}  {:<6} {:>10}  context", "rank", "next", "weight");
        for (rank, p) in predictions.iter().enumerate() {
            println!(
                "{:>4}  {:<6} {:>10.1}  {}",
                rank + 1,
                p.text,
                p.weight,
                p.context_len
            );
        }
    } else {
        let texts: Vec<&str> = predictions.iter().map(|p| p.text.as_str()).collect();
        println!("{}", texts.join(" "));
    }
}

/// Predict for every line of standard input, one result line per input line.
pub fn predict_stdin(table_file: &str) {
    let engine = open_or_die(Path::new(table_file));
    for line in std::io::stdin().lines() {
        let line = die!(line, "Error reading stdin: {}");
        println!("{}", format_line(&engine, &line));
    }
}

fn format_line(engine: &PredictionEngine, context: &str) -> String {
    format!("{context}\t{}", engine.predict(context).join(" "))
}
