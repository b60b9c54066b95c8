use popcorn_models::{MovieDetail, SearchResultItem};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use crate::error::SourceError;

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<SearchResultItem>,
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbDetailResponse {
    #[serde(flatten)]
    detail: MovieDetail,
    #[serde(rename = "Response", default)]
    response: String,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// OMDb signals failure in-band with `"Response": "False"`
fn is_failure(response: &str) -> bool {
    response.eq_ignore_ascii_case("false")
}

fn endpoint(base_url: &str) -> String {
    format!("{}/", base_url.trim_end_matches('/'))
}

pub fn search_url(base_url: &str, api_key: &str, query: &str) -> String {
    format!(
        "{}?apikey={}&s={}",
        endpoint(base_url),
        urlencoding::encode(api_key),
        urlencoding::encode(query)
    )
}

pub fn detail_url(base_url: &str, api_key: &str, imdb_id: &str) -> String {
    format!(
        "{}?apikey={}&i={}",
        endpoint(base_url),
        urlencoding::encode(api_key),
        urlencoding::encode(imdb_id)
    )
}

pub fn parse_search_response(body: &str) -> Result<Vec<SearchResultItem>, SourceError> {
    let parsed: OmdbSearchResponse = serde_json::from_str(body)?;
    if is_failure(&parsed.response) {
        return Err(SourceError::api(parsed.error));
    }
    Ok(parsed.search)
}

pub fn parse_detail_response(body: &str) -> Result<MovieDetail, SourceError> {
    let parsed: OmdbDetailResponse = serde_json::from_str(body)?;
    if is_failure(&parsed.response) {
        return Err(SourceError::api(parsed.error));
    }
    Ok(parsed.detail)
}

async fn get_body(client: &Client, url: &str) -> Result<String, SourceError> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        warn!("OMDb request failed: {} - {}", status, error_text);
        return Err(SourceError::Status(status));
    }

    Ok(response.text().await?)
}

/// Search titles matching `query`
pub async fn search(
    client: &Client,
    base_url: &str,
    api_key: &str,
    query: &str,
) -> Result<Vec<SearchResultItem>, SourceError> {
    let url = search_url(base_url, api_key, query);
    let body = get_body(client, &url).await?;
    let items = parse_search_response(&body)?;
    debug!(query = %query, results = items.len(), "OMDb search returned");
    Ok(items)
}

/// Fetch the full record for one identifier
pub async fn get_details(
    client: &Client,
    base_url: &str,
    api_key: &str,
    imdb_id: &str,
) -> Result<MovieDetail, SourceError> {
    let url = detail_url(base_url, api_key, imdb_id);
    let body = get_body(client, &url).await?;
    let detail = parse_detail_response(&body)?;
    debug!(imdb_id = %imdb_id, title = %detail.title, "OMDb detail returned");
    Ok(detail)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BATMAN_SEARCH: &str = r#"{
        "Search": [
            {"Title":"Batman Begins","Year":"2005","imdbID":"tt0372784","Type":"movie","Poster":"https://example.com/1.jpg"},
            {"Title":"The Batman","Year":"2022","imdbID":"tt1877830","Type":"movie","Poster":"https://example.com/2.jpg"},
            {"Title":"Batman v Superman: Dawn of Justice","Year":"2016","imdbID":"tt2975590","Type":"movie","Poster":"N/A"}
        ],
        "totalResults":"3",
        "Response":"True"
    }"#;

    #[test]
    fn test_search_url_encodes_query() {
        let url = search_url("https://www.omdbapi.com/", "bcd56b42", "the dark knight");
        assert_eq!(url, "https://www.omdbapi.com/?apikey=bcd56b42&s=the%20dark%20knight");
    }

    #[test]
    fn test_detail_url_without_trailing_slash() {
        let url = detail_url("http://localhost:8080", "k", "tt0372784");
        assert_eq!(url, "http://localhost:8080/?apikey=k&i=tt0372784");
    }

    #[test]
    fn test_parse_search_success() {
        let items = parse_search_response(BATMAN_SEARCH).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].imdb_id, "tt0372784");
        assert_eq!(items[2].poster, "N/A");
    }

    #[test]
    fn test_parse_search_in_band_failure() {
        let err = parse_search_response(r#"{"Response":"False","Error":"Movie not found!"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Api(ref m) if m == "Movie not found!"));

        let err = parse_search_response(r#"{"Response":"False","Error":"Too many results."}"#).unwrap_err();
        assert_eq!(err.to_string(), "Too many results.");
    }

    #[test]
    fn test_parse_search_failure_without_message() {
        let err = parse_search_response(r#"{"Response":"False"}"#).unwrap_err();
        assert_eq!(err.to_string(), crate::error::FALLBACK_API_MESSAGE);
    }

    #[test]
    fn test_parse_search_garbage() {
        let err = parse_search_response("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
        assert_eq!(err.to_string(), "Something went wrong!");
    }

    #[test]
    fn test_parse_detail() {
        let body = r#"{"Title":"Batman Begins","Year":"2005","Released":"15 Jun 2005","Runtime":"140 min","Genre":"Action, Crime, Drama","Director":"Christopher Nolan","Actors":"Christian Bale, Michael Caine","Plot":"After witnessing his parents' death...","Poster":"N/A","imdbRating":"8.2","imdbID":"tt0372784","Response":"True"}"#;
        let detail = parse_detail_response(body).unwrap();
        assert_eq!(detail.title, "Batman Begins");
        assert_eq!(detail.director, "Christopher Nolan");
        assert_eq!(detail.runtime_minutes(), 140);
    }

    #[test]
    fn test_parse_detail_unknown_id() {
        let err = parse_detail_response(r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#).unwrap_err();
        assert_eq!(err.to_string(), "Incorrect IMDb ID.");
    }
}
