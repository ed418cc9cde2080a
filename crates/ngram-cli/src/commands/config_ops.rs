use std::fs;

pub fn settings_export() {
    print!("{}", ngram_core::settings::default_toml());
}

pub fn settings_validate(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    let s = die!(
        ngram_core::settings::parse_settings_toml(&content),
        "Error: {}"
    );
    println!(
        "OK: predict.max_results={}, build.max_depth={}, build.min_count={}",
        s.predict.max_results, s.build.max_depth, s.build.min_count
    );
}

/// Install a custom settings file before any command reads settings.
pub fn settings_load(file: &str) {
    let content = die!(fs::read_to_string(file), "Error reading {file}: {}");
    die!(
        ngram_core::settings::init_custom(content),
        "Error loading settings from {file}: {}"
    );
}
