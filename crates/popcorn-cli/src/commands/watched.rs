use crate::commands::progress::FetchSpinner;
use crate::commands::prompts::prompt_yes_no;
use crate::commands::{fetch_failed, AppContext};
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use popcorn_core::WatchedSummary;
use popcorn_models::{WatchedEntry, MovieDetail};
use popcorn_sources::MovieCatalog;
use serde_json::json;

pub async fn run_rate(imdb_id: &str, rating: u8, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    rate_movie(&ctx, imdb_id, rating, output).await
}

async fn rate_movie(ctx: &AppContext, imdb_id: &str, rating: u8, output: &Output) -> Result<()> {
    let mut watched = ctx.watched_list();

    if let Some(existing) = watched.get(imdb_id) {
        output.warn(format!(
            "{} is already on your watched list (rated {})",
            existing.title, existing.user_rating
        ));
        return Ok(());
    }

    let catalog = ctx.catalog();
    let spinner = FetchSpinner::start(format!("Fetching {}...", imdb_id), output.is_human());
    let result = catalog.movie_details(imdb_id).await;
    spinner.finish();

    let detail: MovieDetail = result.map_err(|e| fetch_failed("detail", e))?;

    let Some(mut entry) = WatchedEntry::from_detail(&detail, rating) else {
        return Err(color_eyre::eyre::eyre!("Rating must be between 1 and 10 (got {})", rating));
    };
    entry.imdb_id = imdb_id.to_string();

    let title = entry.title.clone();
    let runtime = entry.runtime;
    if watched.add(entry) {
        output.success(format!("Added {} ({} min) with rating {}", title, runtime, rating));
    } else {
        output.warn(format!("{} was not added", title));
    }
    Ok(())
}

pub fn run_watched(output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let watched = ctx.watched_list();
    let summary = WatchedSummary::from_entries(watched.entries());

    if !output.is_human() {
        output.json(&json!({
            "type": "watched",
            "summary": summary,
            "entries": watched.entries(),
        }));
        return Ok(());
    }

    output.info(format!(
        "#️⃣ {} movies  ⭐️ {}  🌟 {}  ⏳ {}",
        summary.count,
        summary.imdb_rating_display(),
        summary.user_rating_display(),
        summary.runtime_display()
    ));

    if watched.is_empty() {
        output.info("Your watched list is empty. Rate a movie with 'popcorn rate <IMDB_ID> <RATING>'.");
        return Ok(());
    }

    output.table(&watched_table(watched.entries()));
    Ok(())
}

pub fn run_remove(imdb_id: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut watched = ctx.watched_list();

    if watched.remove(imdb_id) {
        output.success(format!("Removed {} from your watched list", imdb_id));
    } else {
        output.info(format!("{} is not on your watched list", imdb_id));
    }
    Ok(())
}

pub fn run_clear(yes: bool, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let mut watched = ctx.watched_list();

    if watched.is_empty() {
        output.info("Watched list is already empty");
        return Ok(());
    }

    if !yes && !prompt_yes_no(&format!("Remove all {} movies from your watched list?", watched.len()), Some(false))? {
        output.info("Nothing cleared");
        return Ok(());
    }

    let removed = watched.clear();
    output.success(format!("Cleared {} movies from your watched list", removed));
    Ok(())
}

fn watched_table(entries: &[WatchedEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["IMDb ID", "Title", "⭐️ IMDb", "🌟 You", "⏳ Runtime"]);
    for entry in entries {
        table.add_row(vec![
            entry.imdb_id.clone(),
            entry.title.clone(),
            format!("{:.1}", entry.imdb_rating),
            entry.user_rating.to_string(),
            format!("{} min", entry.runtime),
        ]);
    }
    table
}
