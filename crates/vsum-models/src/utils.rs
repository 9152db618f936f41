//! YouTube URL parsing.

/// Length of every YouTube video id.
pub const YOUTUBE_ID_LEN: usize = 11;

/// Errors that can occur during YouTube ID extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YoutubeIdError {
    /// Input is neither a YouTube URL nor a bare video id
    InvalidYoutubeUrl,
    /// Candidate id has the wrong length or characters
    InvalidVideoId,
    /// YouTube URL without a recognizable id segment
    VideoIdNotFound,
}

impl std::fmt::Display for YoutubeIdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            YoutubeIdError::InvalidYoutubeUrl => "Invalid YouTube URL",
            YoutubeIdError::InvalidVideoId => "Invalid YouTube video ID",
            YoutubeIdError::VideoIdNotFound => "Could not find a video ID in the URL",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for YoutubeIdError {}

/// Result type for YouTube ID extraction.
pub type YoutubeIdResult<T> = Result<T, YoutubeIdError>;

/// Path prefixes that are directly followed by the video id.
const ID_PATH_MARKERS: &[&str] = &["youtu.be/", "/embed/", "/v/", "/shorts/", "/live/"];

/// Extract the 11-character video id from a YouTube URL.
///
/// Accepts `watch?v=`, `youtu.be/`, `/embed/`, `/v/`, `/shorts/` and
/// `/live/` forms with arbitrary trailing query or fragment, as well as a
/// bare video id.
pub fn extract_youtube_id(input: &str) -> YoutubeIdResult<String> {
    let input = input.trim();

    if is_valid_youtube_id(input) {
        return Ok(input.to_string());
    }

    let lower = input.to_ascii_lowercase();
    if !(lower.contains("youtube.com") || lower.contains("youtu.be")) {
        return Err(YoutubeIdError::InvalidYoutubeUrl);
    }

    let candidate = query_param(input, "v").or_else(|| {
        ID_PATH_MARKERS.iter().find_map(|marker| {
            lower
                .find(marker)
                .map(|pos| leading_segment(&input[pos + marker.len()..]))
        })
    });

    match candidate {
        Some(id) if id.is_empty() && !input.contains("v=") => Err(YoutubeIdError::VideoIdNotFound),
        Some(id) if is_valid_youtube_id(id) => Ok(id.to_string()),
        Some(_) => Err(YoutubeIdError::InvalidVideoId),
        None => Err(YoutubeIdError::VideoIdNotFound),
    }
}

/// Value of a query parameter, searched without a full URL parser.
fn query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Text up to the first path, query or fragment delimiter.
fn leading_segment(s: &str) -> &str {
    let end = s.find(['&', '#', '?', '/']).unwrap_or(s.len());
    s[..end].trim()
}

fn is_valid_youtube_id(s: &str) -> bool {
    s.len() == YOUTUBE_ID_LEN
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
