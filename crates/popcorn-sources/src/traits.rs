use async_trait::async_trait;
use popcorn_models::{MovieDetail, SearchResultItem};
use crate::error::SourceError;

/// A remote movie catalog that can be searched by title and queried by identifier.
///
/// Implementations are shared with spawned fetch tasks, hence `Send + Sync`.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    fn catalog_name(&self) -> &str;

    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, SourceError>;

    async fn movie_details(&self, imdb_id: &str) -> Result<MovieDetail, SourceError>;
}
