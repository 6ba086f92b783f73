use crate::commands::ui;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Color, Table};
use media_request_config::{Config, CredentialStore, PathManager, Settings};
use serde_json::{json, Map, Value};

pub fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    let paths = PathManager::default();
    match cmd {
        ConfigCommands::Show { full } => show_config(&paths, full, output),
        ConfigCommands::Path => show_paths(&paths, output),
        ConfigCommands::Init => init_config(&paths, output),
    }
}

fn show_config(paths: &PathManager, full: bool, output: &Output) -> Result<()> {
    let settings = Settings::load(paths).map_err(|e| eyre!("{:#}", e))?;
    let entries = settings.describe(full);
    let missing = settings.missing();

    if !output.is_human() {
        let values: Map<String, Value> = entries.into_iter().map(|(k, v)| (k.to_string(), json!(v))).collect();
        output.json(&json!({
            "config_file": paths.config_file().display().to_string(),
            "settings": values,
            "missing": missing,
        }));
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![ui::header("Setting"), ui::header("Value")]);
    for (key, value) in entries {
        let cell = if value == "<unset>" {
            Cell::new(value).fg(Color::Yellow)
        } else {
            Cell::new(value)
        };
        table.add_row(vec![Cell::new(key), cell]);
    }
    ui::styled(&mut table);

    output.println(format!("Config file: {}", paths.config_file().display()));
    output.println(table);
    if !missing.is_empty() {
        output.warn(format!("Not configured: {}", missing.join(", ")));
    }
    Ok(())
}

fn show_paths(paths: &PathManager, output: &Output) -> Result<()> {
    let entries = [
        ("config", paths.config_file()),
        ("credentials", paths.credentials_file()),
        ("daemon_log", paths.daemon_log_file()),
    ];

    if output.is_human() {
        for (name, path) in &entries {
            output.println(format!("{:<12} {}", name, path.display()));
        }
    } else {
        let values: Map<String, Value> = entries
            .iter()
            .map(|(name, path)| (name.to_string(), json!(path.display().to_string())))
            .collect();
        output.json(&Value::Object(values));
    }
    Ok(())
}

fn init_config(paths: &PathManager, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() {
        output.warn(format!("{} already exists; leaving it unchanged", config_file.display()));
        return Ok(());
    }

    paths.ensure_directories().map_err(|e| eyre!("{:#}", e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {:#}", config_file.display(), e))?;

    output.success(format!("Wrote default configuration to {}", config_file.display()));

    let credentials = CredentialStore::open(paths.credentials_file()).map_err(|e| eyre!("{:#}", e))?;
    credentials.write_template().map_err(|e| eyre!("{:#}", e))?;
    output.info(format!(
        "Fill in API tokens in {} or set them in the environment (NOTION_TOKEN, TMDB_API_KEY, ...)",
        credentials.path().display()
    ));
    Ok(())
}
