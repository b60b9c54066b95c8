use super::prompts;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use popcorn_config::{Config, PathManager, API_KEY_ENV};
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, output),
        ConfigCommands::Init => init_config(output),
        ConfigCommands::SetKey { api_key } => set_key(&PathManager::default(), api_key, output),
    }
}

fn show_config(full: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    let config = Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    let key_display = if full { config.omdb.api_key.clone() } else { mask_string(&config.omdb.api_key) };
    let key_from_env = std::env::var(API_KEY_ENV).map(|v| !v.trim().is_empty()).unwrap_or(false);

    if !output.is_human() {
        output.json(&json!({
            "type": "config",
            "config_file": config_file.display().to_string(),
            "exists": config_file.exists(),
            "omdb": {
                "api_key": key_display,
                "api_key_from_env": key_from_env,
                "base_url": config.omdb.base_url,
            },
            "storage": {
                "directory": path_manager.storage_dir().display().to_string(),
                "watched_slot": config.storage.watched_slot,
            },
            "display": {
                "default_title": config.display.default_title,
                "detail_title_prefix": config.display.detail_title_prefix,
            },
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Showing defaults. Run 'popcorn config init' to create one.");
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Configuration").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(config_file.display().to_string()),
    ]);
    let key_source = if key_from_env { format!(" (from {})", API_KEY_ENV) } else { String::new() };
    table.add_row(vec![Cell::new("OMDb API key"), Cell::new(format!("{}{}", key_display, key_source))]);
    table.add_row(vec![Cell::new("OMDb URL"), Cell::new(&config.omdb.base_url)]);
    table.add_row(vec![
        Cell::new("Storage"),
        Cell::new(path_manager.storage_dir().display().to_string()),
    ]);
    table.add_row(vec![Cell::new("Watched slot"), Cell::new(&config.storage.watched_slot)]);
    table.add_row(vec![Cell::new("Window title"), Cell::new(&config.display.default_title)]);
    table.add_row(vec![Cell::new("Log file"), Cell::new(path_manager.log_file().display().to_string())]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    output.table(&table);

    if let Err(e) = config.validate() {
        println!("{} {}", "Invalid:".red().bold(), e);
    }
    Ok(())
}

fn init_config(output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create configuration directories: {}", e))?;
    let config_file = path_manager.config_file();

    let mut config = if config_file.exists() {
        Config::load_from_file(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?
    } else {
        Config::default()
    };

    if output.is_human() {
        println!("\n{}", "OMDb API Setup".bright_cyan().bold());
        println!("Request a free key at https://www.omdbapi.com/apikey.aspx\n");
    }

    let api_key = prompts::prompt_string("OMDb API key", Some(&config.omdb.api_key))?;
    if !api_key.trim().is_empty() {
        config.omdb.api_key = api_key.trim().to_string();
    }
    config.omdb.base_url = prompts::prompt_url("OMDb URL", &config.omdb.base_url)?;
    let slot = prompts::prompt_string("Watched list slot", Some(&config.storage.watched_slot))?;
    if !slot.trim().is_empty() {
        config.storage.watched_slot = slot.trim().to_string();
    }

    config.validate().map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Configuration saved to {}", config_file.display()));
    Ok(())
}

fn set_key(path_manager: &PathManager, api_key: String, output: &Output) -> Result<()> {
    let api_key = api_key.trim().to_string();
    if api_key.is_empty() {
        return Err(color_eyre::eyre::eyre!("API key cannot be empty"));
    }

    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create configuration directories: {}", e))?;
    let config_file = path_manager.config_file();

    let mut config = if config_file.exists() {
        Config::load_from_file(&config_file)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?
    } else {
        Config::default()
    };
    config.omdb.api_key = api_key;
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("API key saved ({})", mask_string(&config.omdb.api_key)));
    if std::env::var(API_KEY_ENV).is_ok() {
        output.warn(format!("{} is set and takes precedence over the saved key", API_KEY_ENV));
    }
    Ok(())
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
