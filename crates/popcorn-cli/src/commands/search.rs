use crate::commands::progress::FetchSpinner;
use crate::commands::{fetch_failed, AppContext};
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use popcorn_core::{MIN_QUERY_LEN, NO_MOVIES_FOUND};
use popcorn_models::{MovieDetail, SearchResultItem};
use popcorn_sources::MovieCatalog;
use serde_json::json;

pub async fn run_search(query: &str, output: &Output) -> Result<()> {
    if query.chars().count() < MIN_QUERY_LEN {
        output.warn(format!("Search needs at least {} characters", MIN_QUERY_LEN));
        return Ok(());
    }

    let ctx = AppContext::load()?;
    search_catalog(&ctx, query, output).await
}

async fn search_catalog(ctx: &AppContext, query: &str, output: &Output) -> Result<()> {
    let catalog = ctx.catalog();

    let spinner = FetchSpinner::start(format!("Searching for \"{}\"...", query), output.is_human());
    let result = catalog.search(query).await;
    spinner.finish();

    let items = result.map_err(|e| fetch_failed("search", e))?;

    if !output.is_human() {
        output.json(&json!({
            "type": "search",
            "query": query,
            "count": items.len(),
            "results": items,
        }));
        return Ok(());
    }

    if items.is_empty() {
        output.warn(NO_MOVIES_FOUND);
        return Ok(());
    }

    output.info(format!("Found {} results", items.len()));
    output.table(&results_table(&items));
    Ok(())
}

pub async fn run_show(imdb_id: &str, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    show_movie(&ctx, imdb_id, output).await
}

async fn show_movie(ctx: &AppContext, imdb_id: &str, output: &Output) -> Result<()> {
    let catalog = ctx.catalog();

    let spinner = FetchSpinner::start(format!("Fetching {}...", imdb_id), output.is_human());
    let result = catalog.movie_details(imdb_id).await;
    spinner.finish();

    let detail = result.map_err(|e| fetch_failed("detail", e))?;

    let watched = ctx.watched_list();
    let user_rating = watched.get(imdb_id).map(|e| e.user_rating);

    if !output.is_human() {
        output.json(&json!({
            "type": "movie",
            "movie": detail,
            "user_rating": user_rating,
        }));
        return Ok(());
    }

    output.table(&detail_table(&detail, user_rating));
    Ok(())
}

fn results_table(items: &[SearchResultItem]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["IMDb ID", "Title", "Year", "Poster"]);
    for item in items {
        let poster = if item.has_poster() { item.poster.as_str() } else { "–" };
        table.add_row(vec![item.imdb_id.as_str(), item.title.as_str(), item.year.as_str(), poster]);
    }
    table
}

fn detail_table(detail: &MovieDetail, user_rating: Option<u8>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Title", detail.title.as_str()]);
    table.add_row(vec!["Released", detail.released.as_str()]);
    table.add_row(vec!["Runtime", detail.runtime.as_str()]);
    table.add_row(vec!["Genre", detail.genre.as_str()]);
    table.add_row(vec!["IMDb rating", detail.imdb_rating.as_str()]);
    table.add_row(vec!["Plot", detail.plot.as_str()]);
    table.add_row(vec!["Starring", detail.actors.as_str()]);
    table.add_row(vec!["Directed by", detail.director.as_str()]);
    let rated = match user_rating {
        Some(rating) => format!("You have rated this movie: {} ⭐", rating),
        None => "Not on your watched list".to_string(),
    };
    table.add_row(vec!["Your rating".to_string(), rated]);
    table
}
