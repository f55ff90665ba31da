//! Tags and the candidate items that carry them.

use std::borrow::Borrow;
use std::fmt;

use thiserror::Error;

/// An opaque label attached to an [`Item`].
///
/// Tags compare by their exact text. No case folding or trimming is applied.
///
/// # Examples
/// ```
/// use palette_core::Tag;
///
/// let tag = Tag::new("sunset");
/// assert_eq!(tag.as_str(), "sunset");
/// assert_eq!(tag, Tag::from("sunset"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Tag(String);

impl Tag {
    /// Wrap a label as a tag.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Borrow the tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Tag {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl Borrow<str> for Tag {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// Errors returned by [`Item::new`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ItemError {
    /// The identifier was empty or whitespace.
    #[error("item identifier must not be empty")]
    EmptyId,
    /// No tags were supplied.
    #[error("item {id} must have at least one tag")]
    MissingTags {
        /// Identifier of the rejected item.
        id: String,
    },
}

/// A candidate shown to the user, typically an image.
///
/// Tags keep their insertion order; repeated tags are collapsed onto the
/// first occurrence so each tag contributes once to aggregate scores.
///
/// # Examples
/// ```
/// use palette_core::{Item, Tag};
///
/// # fn main() -> Result<(), palette_core::ItemError> {
/// let item = Item::new("p-1", "https://example.com/p-1.jpg", ["sea", "sky", "sea"])?;
/// assert_eq!(item.tags(), &[Tag::new("sea"), Tag::new("sky")]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawItem", into = "RawItem"))]
pub struct Item {
    id: String,
    url: String,
    tags: Vec<Tag>,
}

impl Item {
    /// Validate and construct an [`Item`].
    ///
    /// # Errors
    /// Returns [`ItemError::EmptyId`] for a blank identifier and
    /// [`ItemError::MissingTags`] when `tags` is empty.
    pub fn new<I, T>(
        id: impl Into<String>,
        url: impl Into<String>,
        tags: I,
    ) -> Result<Self, ItemError>
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        let identifier = id.into();
        if identifier.trim().is_empty() {
            return Err(ItemError::EmptyId);
        }
        let mut unique: Vec<Tag> = Vec::new();
        for tag in tags.into_iter().map(Into::into) {
            if !unique.contains(&tag) {
                unique.push(tag);
            }
        }
        if unique.is_empty() {
            return Err(ItemError::MissingTags { id: identifier });
        }
        Ok(Self {
            id: identifier,
            url: url.into(),
            tags: unique,
        })
    }

    /// Unique identifier of the item.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display payload, usually an image URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Tags in insertion order, without duplicates.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Report whether the item carries `tag`.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.as_str() == tag)
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.id)?;
        for (idx, tag) in self.tags.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            f.write_str(tag.as_str())?;
        }
        f.write_str("]")
    }
}

/// Wire shape used to validate deserialised items.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RawItem {
    id: String,
    #[serde(default)]
    url: String,
    tags: Vec<Tag>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawItem> for Item {
    type Error = ItemError;

    fn try_from(raw: RawItem) -> Result<Self, Self::Error> {
        Self::new(raw.id, raw.url, raw.tags)
    }
}

#[cfg(feature = "serde")]
impl From<Item> for RawItem {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            url: item.url,
            tags: item.tags,
        }
    }
}
