use crate::commands::AppContext;
use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use nexttowatch_config::ReconcilePolicy;
use owo_colors::OwoColorize;
use serde_json::json;

pub fn run_config(cmd: ConfigCommands, context: &AppContext, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(context, output),
        ConfigCommands::OmdbKey { key } => configure_omdb_key(key, context, output),
    }
}

fn mask_string(s: &str) -> String {
    if s.is_empty() {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}

fn policy_name(policy: ReconcilePolicy) -> &'static str {
    match policy {
        ReconcilePolicy::PrimaryWins => "primary-wins",
        ReconcilePolicy::Newest => "newest",
    }
}

fn show_config(context: &AppContext, output: &Output) -> Result<()> {
    let paths = &context.paths;
    let store = &context.config.store;
    let catalog = &context.config.catalog;
    let primary = store.primary_path.clone().unwrap_or_else(|| paths.store_file());
    let mirror = store.mirror_path.clone().unwrap_or_else(|| paths.mirror_file());
    let omdb_key = context.credentials()?.get_omdb_api_key().unwrap_or_default();

    if !output.is_human() {
        output.data(&json!({
            "configFile": paths.config_file(),
            "store": {
                "primary": primary,
                "mirror": mirror,
                "reconcilePolicy": policy_name(store.reconcile_policy),
            },
            "catalog": {
                "timeoutSeconds": catalog.timeout_seconds,
                "animePageLimit": catalog.anime_page_limit,
                "requestDelayMs": catalog.request_delay_ms,
                "jikanBaseUrl": catalog.jikan_base_url,
                "omdbBaseUrl": catalog.omdb_base_url,
                "omdbApiKey": mask_string(&omdb_key),
            },
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    println!("\n{}", "Configuration".bright_cyan().bold());
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    let rows = [
        ("Config file", paths.config_file().display().to_string()),
        ("Primary store", primary.display().to_string()),
        ("Mirror file", mirror.display().to_string()),
        ("Reconcile policy", policy_name(store.reconcile_policy).to_string()),
        ("Jikan", catalog.jikan_base_url.clone()),
        ("OMDb", catalog.omdb_base_url.clone()),
        ("OMDb API key", mask_string(&omdb_key)),
        ("Timeout", format!("{}s", catalog.timeout_seconds)),
        ("Anime results per search", catalog.anime_page_limit.to_string()),
        ("Jikan request spacing", format!("{}ms", catalog.request_delay_ms)),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label).add_attribute(comfy_table::Attribute::Bold), Cell::new(value)]);
    }
    println!("{}", table);
    Ok(())
}

fn configure_omdb_key(key: Option<String>, context: &AppContext, output: &Output) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => rpassword::prompt_password("OMDb API key: ")
            .map_err(|e| eyre!("Failed to read API key: {}", e))?,
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        bail!("OMDb API key cannot be empty");
    }

    let mut credentials = context.credentials()?;
    credentials.set_omdb_api_key(key);
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;

    output.success(format!(
        "OMDb API key saved to {}",
        context.paths.credentials_file().display()
    ));
    Ok(())
}
