//! CLI `config` command: print the resolved configuration.

use std::path::Path;

use crate::config::LifelogConfig;

/// Print the configuration the other commands would run with.
pub fn show_config(config: &LifelogConfig, path: &Path) {
    print!("{}", describe(config, path));
}

fn describe(config: &LifelogConfig, path: &Path) -> String {
    let source = if path.exists() {
        path.display().to_string()
    } else {
        format!("{} (not found, using defaults)", path.display())
    };

    let api_key = match config.api.api_key.as_deref().filter(|k| !k.is_empty()) {
        Some(key) => super::mask_secret(key),
        None => "(not set)".to_owned(),
    };

    let mut out = String::new();
    out.push_str("Lifelog Configuration\n");
    out.push_str("=====================\n");
    out.push_str(&format!("Config file:       {source}\n"));
    out.push_str(&format!("Base URL:          {}\n", config.api.base_url));
    out.push_str(&format!("Timeout:           {}s\n", config.api.timeout_secs));
    out.push_str(&format!("API key:           {api_key}\n"));
    out.push_str(&format!("Default limit:     {}\n", config.output.default_limit));
    out.push_str(&format!("Output format:     {:?}\n", config.output.format));
    out.push_str(&format!("Log level:         {}\n", config.log.level));
    out
}
