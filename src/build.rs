//! Exports [`build_site`], which stitches together the steps of a run:
//! discovering and loading posts ([`crate::parser`]), planning every output
//! file ([`plan_site`]) and writing the plan to disk ([`crate::write`]).
//!
//! Planning touches no files beyond what its collaborators read, so it can be
//! exercised with in-memory fakes.

use crate::config::{self, Config, Site};
use crate::feed::{Entries, SiteEntry, FORMATS};
use crate::markdown::{Markdown, MarkdownExtra};
use crate::page::{self, Link};
use crate::parser;
use crate::post::{Post, HTML_EXTENSION, INDEX_PAGE};
use crate::template::{self, TemplateDirectory, Templates};
use crate::write::{self, Output, Writer};
use log::{debug, info, warn};

/// Everything a run will write, in order.
#[derive(Debug, Default)]
pub struct Plan {
    pub outputs: Vec<Output>,

    /// The navigation list shared by every page.
    pub links: Vec<Link>,

    pub entries: Entries,

    /// The optional formats whose templates exist.
    pub formats: Vec<&'static str>,

    pub drafts: usize,
}

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// The number of post pages written, drafts included.
    pub posts: usize,
    pub drafts: usize,

    /// The output filename of the latest public post, if any.
    pub latest: Option<String>,
    pub formats: Vec<&'static str>,
}

/// Plans the pages, the home page and the optional formats for `posts`,
/// which must already be in canonical order.
pub fn plan_site(
    site: &Site,
    posts: &mut [Post],
    markdown: &dyn Markdown,
    templates: &dyn Templates,
) -> Result<Plan> {
    let links: Vec<Link> = posts
        .iter()
        .filter(|post| post.is_public())
        .map(Link::from)
        .collect();
    let latest = posts.iter().position(Post::is_public);

    let mut plan = Plan {
        outputs: Vec::with_capacity(posts.len() + 1 + FORMATS.len()),
        ..Plan::default()
    };

    for (i, post) in posts.iter_mut().enumerate() {
        let url = site.url(post.output_filename());
        if !post.is_public() {
            plan.drafts += 1;
            info!("draft at {}", url);
        } else if post.output_filename() == HTML_EXTENSION {
            warn!(
                "`{}` has no letters or digits in its title; writing it to `{}`",
                post.source_path().display(),
                HTML_EXTENSION
            );
        }

        let is_latest = latest == Some(i);
        let content = page::render(
            site,
            post,
            markdown,
            templates,
            &links,
            if is_latest { Some(url) } else { None },
        )?;
        let modified_at = Some(post.modified_at());

        if is_latest {
            plan.outputs.push(Output {
                path: site.output_directory.join(INDEX_PAGE),
                content: content.clone(),
                modified_at,
            });
        }
        plan.outputs.push(Output {
            path: site.output_directory.join(post.output_filename()),
            content,
            modified_at,
        });
    }

    plan.entries = Entries::assemble(
        site,
        posts
            .iter()
            .filter(|post| post.is_public())
            .map(|post| SiteEntry::for_post(site, post))
            .collect(),
    );

    let updated = latest.map(|i| posts[i].modified_at());
    for format in FORMATS.iter() {
        if !templates.exists(format.template) {
            debug!("skipping {}: no template", format.template);
            continue;
        }
        let content = templates.render(format.template, (format.vars)(site, &plan.entries))?;
        plan.outputs.push(Output {
            path: site.output_directory.join(format.template),
            content,
            modified_at: updated,
        });
        plan.formats.push(format.template);
    }

    plan.links = links;
    Ok(plan)
}

/// Builds the site described by `config`: validates it, discovers the
/// sources, clears stale pages from the output directory, loads the posts,
/// then plans and writes every output.
///
/// Stale pages are removed before the posts are loaded, so a run that fails
/// on an unreadable source or a filename collision leaves no pages behind.
pub fn build_site(config: &Config) -> Result<Summary> {
    let site = config.site()?;

    let sources = parser::discover(site.source_directory)?;
    info!(
        "found {} posts in `{}`",
        sources.len(),
        site.source_directory.display()
    );

    let writer = Writer::new(site.output_directory);
    writer.remove(&writer.stale_pages()?)?;

    let mut posts = parser::parse_posts(&sources)?;
    let templates = TemplateDirectory::new(site.template_directory);
    let plan = plan_site(&site, &mut posts, &MarkdownExtra, &templates)?;

    writer.write_all(&plan.outputs)?;
    for format in &plan.formats {
        info!("wrote {}", format);
    }

    Ok(Summary {
        posts: posts.len(),
        drafts: plan.drafts,
        latest: plan.links.first().map(|link| link.url.clone()),
        formats: plan.formats,
    })
}

/// The result of a fallible build operation.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site: whatever went wrong in configuration,
/// loading posts, templating or writing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] config::Error),

    #[error(transparent)]
    Parse(#[from] parser::Error),

    #[error(transparent)]
    Template(#[from] template::Error),

    #[error(transparent)]
    Write(#[from] write::Error),
}
