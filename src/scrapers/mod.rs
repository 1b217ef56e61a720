//! Network scrapers: RSS feed polling and article-page snippet extraction.
//!
//! Both collaborators are best effort. A feed that fails to download or
//! parse contributes zero entries; an article page that yields no snippet
//! leaves the entry's description empty. Neither aborts the run.

pub mod page;
pub mod rss;
