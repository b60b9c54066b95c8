/// Parse a free-text runtime such as `"142 min"` into whole minutes.
///
/// Only the first whitespace-separated token is considered. Anything that
/// does not parse (`"N/A"`, empty text) yields 0.
pub fn parse_runtime_minutes(runtime: &str) -> u32 {
    runtime
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<u32>().ok())
        .unwrap_or(0)
}
