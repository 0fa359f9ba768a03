//! Sitemap and feed assembly. Every public post contributes one
//! [`SiteEntry`]. The feeds list exactly those entries, in canonical order.
//! The sitemap lists them too, plus one entry for the site root when there is
//! a latest public post.
//!
//! Each output format is optional: it's written only if its template exists
//! (see [`FORMATS`]).

use crate::config::Site;
use crate::post::Post;
use crate::value::{array, object, optional, rfc2822, rfc3339, string};
use chrono::{DateTime, Utc};
use gtmpl::Value;

/// The sitemap priority of a post page.
pub const POST_PRIORITY: &str = "0.5";

/// The sitemap priority of the site root.
pub const HOME_PRIORITY: &str = "1.0";

/// The sitemap change frequency of the site root.
pub const HOME_CHANGEFREQ: &str = "daily";

/// A public post (or the site root) as it appears in the sitemap and feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteEntry {
    /// The absolute URL.
    pub url: String,
    pub title: String,
    pub modified_at: DateTime<Utc>,
    pub priority: Option<&'static str>,
    pub changefreq: Option<&'static str>,
}

impl SiteEntry {
    pub fn for_post(site: &Site, post: &Post) -> SiteEntry {
        SiteEntry {
            url: site.url(post.output_filename()),
            title: post.title().to_owned(),
            modified_at: post.modified_date(),
            priority: Some(POST_PRIORITY),
            changefreq: None,
        }
    }

    /// The synthetic entry pointing at the site root, dated like `latest`.
    fn home(site: &Site, latest: &SiteEntry) -> SiteEntry {
        SiteEntry {
            url: site.home_page(),
            title: site.name.unwrap_or(&latest.title).to_owned(),
            modified_at: latest.modified_at,
            priority: Some(HOME_PRIORITY),
            changefreq: Some(HOME_CHANGEFREQ),
        }
    }
}

/// The entry sets for the feeds and the sitemap.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entries {
    pub feed: Vec<SiteEntry>,
    pub sitemap: Vec<SiteEntry>,
}

impl Entries {
    /// Builds both sets from the public posts' entries, given in canonical
    /// order. The first of them is the latest public post.
    pub fn assemble(site: &Site, public: Vec<SiteEntry>) -> Entries {
        let mut sitemap = public.clone();
        if let Some(latest) = public.first() {
            sitemap.push(SiteEntry::home(site, latest));
        }
        Entries {
            feed: public,
            sitemap,
        }
    }

    /// The latest public post's entry, if there are any public posts.
    pub fn latest(&self) -> Option<&SiteEntry> {
        self.feed.first()
    }
}

/// An optional output format: the template that produces it (which is also
/// the output filename) and the function building its variables.
pub struct Format {
    pub template: &'static str,
    pub vars: fn(&Site, &Entries) -> Value,
}

/// Every optional format, in the order they're written.
pub const FORMATS: [Format; 3] = [
    Format {
        template: "sitemap.xml",
        vars: sitemap_vars,
    },
    Format {
        template: "atom.xml",
        vars: feed_vars,
    },
    Format {
        template: "rss.xml",
        vars: feed_vars,
    },
];

fn sitemap_vars(site: &Site, entries: &Entries) -> Value {
    object([
        ("baseurl", string(site.base_url)),
        ("urls", array(&entries.sitemap)),
    ])
}

fn feed_vars(site: &Site, entries: &Entries) -> Value {
    let updated = entries.latest().map(|latest| latest.modified_at);
    object([
        ("name", optional(site.name)),
        ("description", optional(site.description)),
        ("base_url", string(site.base_url)),
        ("home_page", string(site.home_page())),
        (
            "author",
            match site.author {
                Some(author) => author.into(),
                None => Value::Nil,
            },
        ),
        ("updated", optional(updated.map(rfc3339))),
        ("pub_date", optional(updated.map(rfc2822))),
        ("entries", array(&entries.feed)),
    ])
}
