use crate::commands::AppContext;
use crate::ui;
use color_eyre::Result;
use std::sync::Arc;

pub async fn run_tui() -> Result<()> {
    let ctx = AppContext::load()?;
    tracing::info!(
        storage = %ctx.paths.storage_dir().display(),
        catalog = %ctx.config.omdb.base_url,
        "Starting interactive UI"
    );

    ui::run(Arc::new(ctx.catalog()), ctx.store(), &ctx.config)
        .await
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))
}
