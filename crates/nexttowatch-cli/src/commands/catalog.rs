use crate::commands::AppContext;
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use indicatif::{ProgressBar, ProgressStyle};
use nexttowatch_catalog::SearchScope;
use nexttowatch_models::{ContentType, NormalizedDetail, SearchResponse};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

/// Spinner on stderr while a catalog request is in flight; hidden when not interactive
fn spinner(output: &Output, msg: String) -> ProgressBar {
    if !output.is_human() || output.is_quiet() || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
    {
        spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn print_results(response: &SearchResponse, output: &Output) {
    if !output.is_human() {
        output.data(response);
        return;
    }

    if let Some(error) = &response.error {
        output.warn(error);
    }
    if output.is_quiet() {
        return;
    }
    if response.items.is_empty() {
        println!("{}", "No results".bright_black());
        return;
    }

    let mut table = Table::new();
    table.set_header(
        ["Type", "ID", "Title", "Year", "Score", "Episodes"]
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(comfy_table::Attribute::Bold)),
    );
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    for item in &response.items {
        table.add_row(vec![
            Cell::new(item.content_type.as_str()),
            Cell::new(&item.id),
            Cell::new(&item.title),
            Cell::new(item.year.as_deref().unwrap_or("")),
            Cell::new(item.score.map(|s| format!("{:.2}", s)).unwrap_or_default()),
            Cell::new(item.episodes.map(|e| e.to_string()).unwrap_or_default()),
        ]);
    }
    println!("{}", table);
}

pub async fn search(context: &AppContext, query: &str, scope: SearchScope, output: &Output) -> Result<()> {
    let aggregator = context.aggregator()?;

    let progress = spinner(output, format!("Searching {} for '{}'...", scope, query));
    let response = aggregator.search_content(query, scope).await;
    progress.finish_and_clear();

    print_results(&response, output);
    Ok(())
}

pub async fn popular(context: &AppContext, scope: SearchScope, limit: u32, output: &Output) -> Result<()> {
    let aggregator = context.aggregator()?;

    let progress = spinner(output, "Fetching popular titles...".to_string());
    let response = aggregator.get_popular_content(scope, limit).await;
    progress.finish_and_clear();

    print_results(&response, output);
    Ok(())
}

fn print_detail(detail: &NormalizedDetail) {
    let summary = &detail.summary;
    println!("\n{} {}", summary.title.bright_cyan().bold(), format!("({})", summary.content_type).bright_black());

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);

    let artwork = summary.poster.as_deref().or(summary.image.as_deref());
    let rows: [(&str, Option<String>); 11] = [
        ("ID", Some(summary.id.clone())),
        ("Year", summary.year.clone()),
        ("Score", summary.score.map(|s| format!("{:.2}", s))),
        ("Episodes", summary.episodes.map(|e| e.to_string())),
        ("Airing", summary.airing_status.clone()),
        ("Seasons", detail.total_seasons.clone()),
        ("Runtime", detail.runtime.clone()),
        ("Genres", Some(detail.genres.join(", ")).filter(|g| !g.is_empty())),
        ("Director", detail.director.clone()),
        ("Actors", detail.actors.clone()),
        ("Artwork", artwork.map(str::to_string)),
    ];
    for (label, value) in rows {
        if let Some(value) = value {
            table.add_row(vec![Cell::new(label).add_attribute(comfy_table::Attribute::Bold), Cell::new(value)]);
        }
    }
    println!("{}", table);

    if let Some(synopsis) = &summary.synopsis {
        println!("\n{}", synopsis);
    }
}

pub async fn details(context: &AppContext, id: &str, content_type: ContentType, output: &Output) -> Result<()> {
    let aggregator = context.aggregator()?;

    let progress = spinner(output, format!("Fetching {} '{}'...", content_type, id));
    let result = aggregator.get_content_details(id, content_type).await;
    progress.finish_and_clear();

    let detail = result?;
    if !output.is_human() {
        output.data(&detail);
    } else if !output.is_quiet() {
        print_detail(&detail);
    }
    Ok(())
}
