//! Rendering a [`Post`] into a complete page. Each post is rendered twice:
//! first its body through the `post.html` template (the "article"), then the
//! article through the `page.html` template together with the site-wide
//! navigation [`Link`]s.

use crate::config::Site;
use crate::markdown::Markdown;
use crate::post::Post;
use crate::template::{self, Templates};
use crate::value::{array, object, optional, string, ymd};

/// The template for a post's article.
pub const POST_TEMPLATE: &str = "post.html";

/// The template for a full page wrapping an article.
pub const PAGE_TEMPLATE: &str = "page.html";

/// One entry of the site-wide navigation list. Only public posts get one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The post's output filename, relative to the site root.
    pub url: String,
    pub title: String,
}

impl From<&Post> for Link {
    fn from(post: &Post) -> Link {
        Link {
            url: post.output_filename().to_owned(),
            title: post.title().to_owned(),
        }
    }
}

/// Renders `post` into a full page. `links` is the navigation list shared by
/// every page. `canonical` is set only for the latest public post, the one
/// that doubles as the site's index.
pub fn render(
    site: &Site,
    post: &mut Post,
    markdown: &dyn Markdown,
    templates: &dyn Templates,
    links: &[Link],
    canonical: Option<String>,
) -> template::Result<String> {
    let body = post.html(markdown).to_owned();
    let modified_at = ymd(post.modified_date());

    let article = templates.render(
        POST_TEMPLATE,
        object([
            ("title", string(post.title())),
            ("modified_at", string(modified_at.as_str())),
            ("post", string(body)),
            ("filename", string(post.output_filename())),
        ]),
    )?;

    templates.render(
        PAGE_TEMPLATE,
        object([
            ("article", string(article)),
            ("links", array(links)),
            ("title", string(post.title())),
            ("modified_at", string(modified_at)),
            ("filename", string(post.output_filename())),
            ("canonical", optional(canonical)),
            ("name", optional(site.name)),
            ("description", optional(site.description)),
            ("base_url", string(site.base_url)),
        ]),
    )
}
