//! Content filter pipeline.
//!
//! Composes the policy engine and membership index to narrow an unfiltered
//! collection down to what the current identity may see, with free-text,
//! tag, status, and adventure-scope refinement layered on top. Steps run in
//! a fixed order and are all intersective, so the pipeline is idempotent and
//! never mutates its inputs.
//!
//! Free-text matching is case- and accent-insensitive: both sides are
//! decomposed (NFD), stripped of combining marks, and lowercased before the
//! substring test, so "Velho Traçado" matches "traca".

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::adventure::{Adventure, AdventureId, AdventureStatus};
use crate::identity::Identity;
use crate::membership::MembershipIndex;
use crate::policy;
use crate::post::Post;

/// Status refinement for adventure listings.
///
/// Only meaningful for admins: the policy step has already removed inactive
/// adventures from everyone else's view, so for non-admins this is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Keep only active adventures.
    Active,
    /// Keep only inactive adventures.
    Inactive,
    /// Keep both.
    #[default]
    All,
}

impl StatusFilter {
    fn matches(&self, status: AdventureStatus) -> bool {
        match self {
            Self::Active => status.is_active(),
            Self::Inactive => !status.is_active(),
            Self::All => true,
        }
    }
}

/// Which fields the free-text filter searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchFields {
    /// Match against titles.
    pub title: bool,
    /// Match against descriptions / captions.
    pub description: bool,
    /// Match against tags.
    pub tags: bool,
}

impl Default for SearchFields {
    fn default() -> Self {
        Self {
            title: true,
            description: true,
            tags: true,
        }
    }
}

/// A refinement query applied after the policy filter.
///
/// ```
/// use fireside_core::filter::{ContentQuery, StatusFilter};
///
/// let query = ContentQuery::new()
///     .with_search("dragon")
///     .with_tag("loot")
///     .with_status(StatusFilter::Active);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentQuery {
    /// Free-text needle; `None` skips the text step.
    pub search: Option<String>,
    /// Tag needle; `None` skips the tag step. Posts only.
    pub tag: Option<String>,
    /// Status refinement. Adventures only, honored for admins.
    pub status: StatusFilter,
    /// Keep only posts scoped to this adventure.
    pub adventure: Option<AdventureId>,
    /// Fields the free-text step searches.
    pub fields: SearchFields,
}

impl ContentQuery {
    /// An empty query: the pipeline applies the policy filter and sort only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text needle.
    pub fn with_search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    /// Set the tag needle.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Set the status refinement.
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Keep only posts scoped to the given adventure.
    pub fn in_adventure(mut self, adventure_id: impl Into<AdventureId>) -> Self {
        self.adventure = Some(adventure_id.into());
        self
    }

    /// Restrict which fields the free-text step searches.
    pub fn with_fields(mut self, fields: SearchFields) -> Self {
        self.fields = fields;
        self
    }
}

/// Fold a string for matching: NFD decomposition, combining marks stripped,
/// lowercased.
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Case- and accent-insensitive substring test.
fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold(haystack).contains(&fold(needle))
}

fn adventure_matches_search(adventure: &Adventure, needle: &str, fields: &SearchFields) -> bool {
    (fields.title && contains_folded(&adventure.title, needle))
        || (fields.description
            && adventure
                .description
                .as_deref()
                .is_some_and(|d| contains_folded(d, needle)))
}

fn post_matches_search(post: &Post, needle: &str, fields: &SearchFields) -> bool {
    (fields.title && contains_folded(&post.title, needle))
        || (fields.description && contains_folded(&post.captions, needle))
        || (fields.tags && post.tags.iter().any(|t| contains_folded(t, needle)))
}

/// Sort adventures: active before inactive, then newest first.
///
/// The sort must be stable so that items comparing equal keep their input
/// order; `slice::sort_by` guarantees that.
fn sort_adventures(adventures: &mut [Adventure]) {
    adventures.sort_by(|a, b| {
        b.status
            .is_active()
            .cmp(&a.status.is_active())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Sort posts newest first, stable.
fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// Filter and sort adventures for the given identity.
///
/// Steps, in order: policy filter, free-text filter, status filter
/// (admins only), then the stable active-first / newest-first sort.
pub fn filter_adventures(
    adventures: &[Adventure],
    identity: &Identity,
    index: &MembershipIndex,
    query: &ContentQuery,
) -> Vec<Adventure> {
    let mut out: Vec<Adventure> = adventures
        .iter()
        .filter(|a| policy::can_view_adventure(identity, a, index).allowed())
        .filter(|a| {
            query
                .search
                .as_deref()
                .is_none_or(|needle| adventure_matches_search(a, needle, &query.fields))
        })
        .filter(|a| !identity.is_admin() || query.status.matches(a.status))
        .cloned()
        .collect();

    sort_adventures(&mut out);
    out
}

/// Filter and sort posts for the given identity.
///
/// Steps, in order: policy filter, free-text filter, tag filter,
/// adventure-scope filter, then the stable newest-first sort.
pub fn filter_posts(
    posts: &[Post],
    identity: &Identity,
    index: &MembershipIndex,
    query: &ContentQuery,
) -> Vec<Post> {
    let mut out: Vec<Post> = posts
        .iter()
        .filter(|p| policy::can_view_post(identity, p, index).allowed())
        .filter(|p| {
            query
                .search
                .as_deref()
                .is_none_or(|needle| post_matches_search(p, needle, &query.fields))
        })
        .filter(|p| {
            query
                .tag
                .as_deref()
                .is_none_or(|tag| p.tags.iter().any(|t| contains_folded(t, tag)))
        })
        .filter(|p| {
            query
                .adventure
                .as_deref()
                .is_none_or(|adventure_id| p.scoped_to(adventure_id))
        })
        .cloned()
        .collect();

    sort_posts(&mut out);
    out
}

/// All posts visible to the identity: the union of public posts and posts
/// whose scopes intersect the user's audience, deduplicated by post id
/// (first occurrence wins), sorted newest first.
///
/// Admins bypass the union and receive the full sorted collection.
pub fn visible_posts(posts: &[Post], identity: &Identity, index: &MembershipIndex) -> Vec<Post> {
    let mut out: Vec<Post> = if identity.is_admin() {
        posts.to_vec()
    } else {
        let mut seen: HashSet<&str> = HashSet::new();
        posts
            .iter()
            .filter(|p| p.is_public() || p.adventures.iter().any(|a| index.can_reach(a)))
            .filter(|p| seen.insert(p.id.as_str()))
            .cloned()
            .collect()
    };

    sort_posts(&mut out);
    out
}

/// All adventures visible to the identity, sorted active-first, newest
/// first.
pub fn visible_adventures(
    adventures: &[Adventure],
    identity: &Identity,
    index: &MembershipIndex,
) -> Vec<Adventure> {
    let mut out: Vec<Adventure> = adventures
        .iter()
        .filter(|a| policy::can_view_adventure(identity, a, index).allowed())
        .cloned()
        .collect();

    sort_adventures(&mut out);
    out
}
