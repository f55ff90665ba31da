//! Search response types for the supported image APIs.
//!
//! Only the fields needed to build candidates are modelled. Records missing
//! an image URL are kept as [`ImageRecord`]s with `url: None` so the caller
//! can report and skip them.
//!
//! See: <https://www.pexels.com/api/documentation/#photos-search> and
//! <https://unsplash.com/documentation#search-photos>

use serde::Deserialize;

/// Photo identifier as returned by the APIs: Pexels uses integers while
/// Unsplash uses opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric identifier.
    Number(u64),
    /// Textual identifier.
    Text(String),
}

impl RecordId {
    /// Render the identifier as an item id.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value,
        }
    }
}

/// API-independent view of one search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Provider identifier.
    pub id: String,
    /// Display URL, when the record carried one.
    pub url: Option<String>,
}

/// Pexels `GET /v1/search` response.
#[derive(Debug, Deserialize)]
pub struct PexelsSearchResponse {
    /// Matching photos.
    #[serde(default)]
    pub photos: Vec<PexelsPhoto>,
}

/// One Pexels photo.
#[derive(Debug, Deserialize)]
pub struct PexelsPhoto {
    /// Pexels photo id.
    pub id: RecordId,
    /// Rendition URLs.
    #[serde(default)]
    pub src: PexelsSources,
}

/// Pexels rendition URLs; only the medium size is used.
#[derive(Debug, Default, Deserialize)]
pub struct PexelsSources {
    /// Medium-sized rendition.
    pub medium: Option<String>,
}

impl PexelsSearchResponse {
    /// Flatten the response into records.
    #[must_use]
    pub fn into_records(self) -> Vec<ImageRecord> {
        self.photos
            .into_iter()
            .map(|photo| ImageRecord {
                id: photo.id.into_string(),
                url: photo.src.medium,
            })
            .collect()
    }
}

/// Unsplash `GET /search/photos` response.
#[derive(Debug, Deserialize)]
pub struct UnsplashSearchResponse {
    /// Matching photos.
    #[serde(default)]
    pub results: Vec<UnsplashPhoto>,
}

/// One Unsplash photo.
#[derive(Debug, Deserialize)]
pub struct UnsplashPhoto {
    /// Unsplash photo id.
    pub id: RecordId,
    /// Rendition URLs.
    #[serde(default)]
    pub urls: UnsplashUrls,
}

/// Unsplash rendition URLs; only the regular size is used.
#[derive(Debug, Default, Deserialize)]
pub struct UnsplashUrls {
    /// Regular-sized rendition.
    pub regular: Option<String>,
}

impl UnsplashSearchResponse {
    /// Flatten the response into records.
    #[must_use]
    pub fn into_records(self) -> Vec<ImageRecord> {
        self.results
            .into_iter()
            .map(|photo| ImageRecord {
                id: photo.id.into_string(),
                url: photo.urls.regular,
            })
            .collect()
    }
}
