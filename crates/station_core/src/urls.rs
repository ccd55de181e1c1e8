use url::Url;

/// Schemes the download service accepts directly.
pub const DOWNLOADABLE_PROTOCOLS: &[&str] = &["http", "https", "ftp", "ftps", "magnet"];

/// Extracts downloadable URLs from free-form selection text.
///
/// Splits on line breaks, trims, and keeps only lines that parse as a URL
/// with a scheme in `protocols`.
pub fn extract_download_urls(selection: &str, protocols: &[&str]) -> Vec<String> {
    selection
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            Url::parse(line)
                .map(|url| protocols.contains(&url.scheme()))
                .unwrap_or(false)
        })
        .map(ToOwned::to_owned)
        .collect()
}
