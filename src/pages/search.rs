//! Search page.

use std::fmt;

use crate::models::{Book, SearchHit};
use crate::pages::{Pages, settle_alert};
use crate::render::{Alert, Page, layout};
use crate::utils::{display_title, non_blank};

/// Articles and books matching one query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub query: String,
    pub articles: Vec<SearchHit>,
    /// A failed book search only hides the book section
    pub books: Result<Vec<Book>, Alert>,
}

impl SearchPage {
    pub fn total(&self) -> usize {
        self.articles.len() + self.books.as_ref().map_or(0, Vec::len)
    }
}

impl fmt::Display for SearchPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        layout::header(f, &format!("Search results for \"{}\"", self.query))?;
        writeln!(f, "{}", layout::count(self.total(), "result"))?;

        layout::section(f, &format!("Articles ({})", self.articles.len()))?;
        if self.articles.is_empty() {
            writeln!(f, "No articles found.")?;
        }
        for hit in &self.articles {
            writeln!(f, "* {}", display_title(&hit.title))?;
            if let Some(snippet) = non_blank(hit.snippet.as_deref()) {
                layout::sub_item(f, snippet)?;
            }
        }

        match &self.books {
            Ok(books) => {
                layout::section(f, &format!("Books ({})", books.len()))?;
                if books.is_empty() {
                    writeln!(f, "No books found.")?;
                }
                for book in books {
                    writeln!(f, "#{} {} by {}", book.id, book.title, book.author)?;
                }
                Ok(())
            }
            Err(alert) => {
                layout::section(f, "Books")?;
                write!(f, "{alert}")
            }
        }
    }
}

impl Pages<'_> {
    /// Search articles and books at once.
    ///
    /// A blank query is rejected without calling the server.
    pub async fn search(&self, query: &str) -> Page<SearchPage> {
        let Some(query) = non_blank(Some(query)) else {
            return Page::Failed(Alert::warning("Search", "Please enter a search term."));
        };

        let (articles, books) = futures::join!(
            self.backend.search_articles(query),
            self.backend.list_books(Some(query))
        );

        let books = books.map_err(|e| {
            log::info!("Book search failed, showing articles only: {e}");
            Alert::from_error("Books unavailable", "Book search failed", &e)
        });

        settle_alert(articles, "Search failed", "Could not search articles").map(|articles| {
            SearchPage {
                query: query.to_string(),
                articles,
                books,
            }
        })
    }
}
