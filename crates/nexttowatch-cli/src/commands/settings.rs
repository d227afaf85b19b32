use crate::output::Output;
use crate::SettingsCommands;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use nexttowatch_models::Settings;
use nexttowatch_store::WatchlistStore;

pub fn run_settings(cmd: SettingsCommands, store: &WatchlistStore, output: &Output) -> Result<()> {
    match cmd {
        SettingsCommands::Show => show(&store.settings()?, output),
        SettingsCommands::Set {
            theme,
            notifications,
            auto_update,
            language,
        } => {
            let mut settings = store.settings()?;
            if let Some(theme) = theme {
                settings.theme = theme;
            }
            if let Some(notifications) = notifications {
                settings.notifications = notifications;
            }
            if let Some(auto_update) = auto_update {
                settings.auto_update = auto_update;
            }
            if let Some(language) = language {
                settings.language = language;
            }
            store.save_settings(settings.clone())?;
            output.success("Settings saved");
            show(&settings, output)
        }
    }
}

fn show(settings: &Settings, output: &Output) -> Result<()> {
    if !output.is_human() {
        output.data(settings);
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Setting").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Value").add_attribute(comfy_table::Attribute::Bold),
    ]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.add_row(vec![Cell::new("theme"), Cell::new(&settings.theme)]);
    table.add_row(vec![Cell::new("notifications"), Cell::new(settings.notifications)]);
    table.add_row(vec![Cell::new("autoUpdate"), Cell::new(settings.auto_update)]);
    table.add_row(vec![Cell::new("language"), Cell::new(&settings.language)]);
    println!("{}", table);
    Ok(())
}
