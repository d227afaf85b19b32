use crate::commands::AppContext;
use crate::output::Output;
use color_eyre::eyre::{bail, eyre};
use color_eyre::Result;
use comfy_table::{Cell, Color, Table};
use nexttowatch_models::{ContentRef, ContentType, WatchStatus, WatchlistItem};
use nexttowatch_store::{dispatch, AddOutcome, Request, WatchlistStore};
use owo_colors::OwoColorize;
use std::io::Read;

fn status_cell(status: WatchStatus) -> Cell {
    let color = match status {
        WatchStatus::ToWatch => Color::Yellow,
        WatchStatus::Watching => Color::Cyan,
        WatchStatus::Watched => Color::Green,
    };
    Cell::new(status.as_str()).fg(color)
}

fn progress_label(item: &WatchlistItem) -> String {
    match (item.progress, item.total_episodes) {
        (0, 0) => "-".to_string(),
        (progress, 0) => progress.to_string(),
        (progress, total) => format!("{}/{}", progress, total),
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_header(header.into_iter().map(|h| Cell::new(h).add_attribute(comfy_table::Attribute::Bold)));
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

pub fn list(store: &WatchlistStore, content_type: Option<ContentType>, output: &Output) -> Result<()> {
    let watchlist = store.watchlist()?;

    if !output.is_human() {
        match content_type {
            Some(content_type) => output.data(&watchlist.partition(content_type)),
            None => output.data(&watchlist),
        }
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    let types: Vec<ContentType> = content_type.map(|ct| vec![ct]).unwrap_or_else(|| ContentType::ALL.to_vec());
    let mut table = new_table(vec!["Type", "ID", "Title", "Status", "Progress", "Year", "Updated"]);
    let mut rows = 0;
    for content_type in types {
        for item in watchlist.partition(content_type) {
            table.add_row(vec![
                Cell::new(content_type.as_str()),
                Cell::new(&item.id),
                Cell::new(&item.title),
                status_cell(item.status),
                Cell::new(progress_label(item)),
                Cell::new(item.year.as_deref().unwrap_or("")),
                Cell::new(item.updated_at.format("%Y-%m-%d").to_string()),
            ]);
            rows += 1;
        }
    }

    if rows == 0 {
        println!("{}", "Watchlist is empty".bright_black());
    } else {
        println!("{}", table);
    }
    Ok(())
}

/// Assemble the add payload, optionally filling gaps from the catalog
#[allow(clippy::too_many_arguments)]
pub async fn build_item(
    context: &AppContext,
    id: String,
    content_type: ContentType,
    title: Option<String>,
    poster: Option<String>,
    year: Option<String>,
    fetch: bool,
    output: &Output,
) -> Result<ContentRef> {
    let mut item = if fetch {
        let aggregator = context.aggregator()?;
        let detail = aggregator.get_content_details(&id, content_type).await?;
        output.info(format!("Fetched '{}' from the catalog", detail.summary.title));
        let mut item = ContentRef::from(&detail);
        // The catalog may classify differently (e.g. OMDb reports "series" for episodes)
        item.content_type = content_type;
        item
    } else {
        let title = title.clone().ok_or_else(|| eyre!("--title is required unless --fetch is given"))?;
        ContentRef::new(id, content_type, title)
    };

    if let Some(title) = title {
        item.title = title;
    }
    if poster.is_some() {
        item.poster = poster;
    }
    if year.is_some() {
        item.year = year;
    }
    Ok(item)
}

pub fn add(store: &WatchlistStore, item: ContentRef, status: Option<WatchStatus>, output: &Output) -> Result<()> {
    let label = format!("{} '{}'", item.content_type, item.title);
    match store.add_or_update(item, status)? {
        AddOutcome::Inserted => output.success(format!("Added {} to the watchlist", label)),
        AddOutcome::Merged => output.success(format!("Updated {} (already in the watchlist)", label)),
    }
    Ok(())
}

pub fn remove(store: &WatchlistStore, id: &str, content_type: ContentType, output: &Output) -> Result<()> {
    if store.remove(id, content_type)? {
        output.success(format!("Removed {} '{}'", content_type, id));
    } else {
        output.warn(format!("{} '{}' was not in the watchlist", content_type, id));
    }
    Ok(())
}

pub fn set_status(
    store: &WatchlistStore,
    id: &str,
    content_type: ContentType,
    status: WatchStatus,
    output: &Output,
) -> Result<()> {
    store.update_status(id, content_type, status)?;
    output.success(format!("{} '{}' is now {}", content_type, id, status));
    Ok(())
}

pub fn set_progress(
    store: &WatchlistStore,
    id: &str,
    content_type: ContentType,
    progress: u32,
    total: u32,
    output: &Output,
) -> Result<()> {
    let status = store.update_progress(id, content_type, progress, total)?;
    let progress = if total > 0 {
        format!("{}/{}", progress.min(total), total)
    } else {
        progress.to_string()
    };
    output.success(format!("{} '{}' progress {} ({})", content_type, id, progress, status));
    Ok(())
}

pub fn history(store: &WatchlistStore, output: &Output) -> Result<()> {
    let history = store.watch_history()?;

    if !output.is_human() {
        output.data(&history);
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }
    if history.is_empty() {
        println!("{}", "Nothing watched yet".bright_black());
        return Ok(());
    }

    let mut table = new_table(vec!["Watched", "Type", "ID", "Title"]);
    for entry in &history {
        table.add_row(vec![
            Cell::new(entry.watched_at.format("%Y-%m-%d %H:%M").to_string()),
            Cell::new(entry.content_type.as_str()),
            Cell::new(&entry.id),
            Cell::new(&entry.title),
        ]);
    }
    println!("{}", table);
    Ok(())
}

/// Execute one JSON request and print the JSON response
pub fn request(store: &WatchlistStore, json: Option<String>, output: &Output) -> Result<()> {
    let raw = match json {
        Some(json) => json,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    if raw.trim().is_empty() {
        bail!("Empty request");
    }

    let request: Request = serde_json::from_str(&raw).map_err(|e| eyre!("Invalid request: {}", e))?;
    let response = dispatch(store, request);
    output.data(&response);
    Ok(())
}
