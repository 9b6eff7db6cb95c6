//! List blog posts

use anyhow::Result;
use serde::Serialize;

use crate::blog;
use crate::content::BlogEntry;
use crate::helpers::date_iso;
use crate::Folio;

/// One row of the listing
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub date: String,
    pub slug: String,
    pub title: String,
    pub draft: bool,
    pub tags: Vec<String>,
}

impl From<&BlogEntry> for PostSummary {
    fn from(entry: &BlogEntry) -> Self {
        Self {
            date: date_iso(&entry.data.publish_date),
            slug: entry.slug.clone(),
            title: entry.data.title.clone(),
            draft: !entry.is_live(),
            tags: entry.data.tags.clone(),
        }
    }
}

/// Posts newest first; drafts only when `all` is set
pub fn summaries(folio: &Folio, all: bool) -> Result<Vec<PostSummary>> {
    let store = folio.store();
    let mut entries = if all {
        blog::get_all_blog_entries(&store)?
    } else {
        blog::get_live_blog_entries(&store)?
    };
    blog::sort(&mut entries);

    Ok(entries.iter().map(PostSummary::from).collect())
}

/// Print the post listing
pub fn run(folio: &Folio, all: bool, json: bool) -> Result<()> {
    let posts = summaries(folio, all)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    println!("Posts ({}):", posts.len());
    for post in &posts {
        let draft = if post.draft { " (draft)" } else { "" };
        if post.tags.is_empty() {
            println!("  {} - {} [{}]{}", post.date, post.title, post.slug, draft);
        } else {
            println!(
                "  {} - {} [{}]{} #{}",
                post.date,
                post.title,
                post.slug,
                draft,
                post.tags.join(" #")
            );
        }
    }

    Ok(())
}
