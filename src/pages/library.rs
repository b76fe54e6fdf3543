//! Library pages.

use crate::pages::{Pages, settle, settle_alert};
use crate::render::Page;
use crate::services::{BookDetail, BookList};
use crate::utils::non_blank;

impl Pages<'_> {
    /// Books, optionally filtered by a search query.
    pub async fn books(&self, search: Option<&str>) -> Page<BookList> {
        let query = non_blank(search);
        let result = self.backend.list_books(query).await;
        settle_alert(result, "Error loading library", "Could not load the library").map(
            |books| BookList {
                query: query.map(str::to_string),
                books,
            },
        )
    }

    /// One book.
    pub async fn book(&self, id: i64) -> Page<BookDetail> {
        let result = self.backend.get_book(id).await;
        settle(
            result,
            &format!("Book #{id}"),
            "Error loading book",
            "Could not load the book",
        )
        .map(|book| BookDetail {
            book,
            date_format: self.display.date_format.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::models::{Book, DisplayConfig};
    use url::Url;

    fn pages(backend: &FakeBackend) -> Pages<'_> {
        Pages::new(
            backend,
            Url::parse("http://localhost:8000/").unwrap(),
            DisplayConfig::default(),
        )
    }

    fn book() -> Book {
        serde_json::from_str(
            r#"{"id": 4, "title": "Sundiata", "author": "D. T. Niane",
                "published_date": "1965-01-01", "summary": "Epic of old Mali"}"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_search_is_trimmed() {
        let mut backend = FakeBackend::new();
        backend.books = vec![book()];

        let page = pages(&backend).books(Some(" Mali ")).await;
        assert_eq!(page.ready().unwrap().query.as_deref(), Some("Mali"));

        pages(&backend).books(Some("   ")).await;
        assert_eq!(backend.calls(), vec!["list_books Mali", "list_books"]);
    }

    #[tokio::test]
    async fn test_book_detail_and_not_found() {
        let mut backend = FakeBackend::new();
        backend.books = vec![book()];

        let text = pages(&backend).book(4).await.to_string();
        assert!(text.contains("by D. T. Niane"));
        assert!(text.contains("Published: 1/1/1965"));
        assert!(text.contains("Epic of old Mali"));

        assert_eq!(
            pages(&backend).book(5).await,
            Page::NotFound("Book #5".into())
        );
    }

    #[tokio::test]
    async fn test_library_failure_is_alert() {
        let backend = FakeBackend::new().failing("list_books", 500);
        let page = pages(&backend).books(None).await;
        assert!(page.to_string().contains("Could not load the library"));
    }
}
