//! Book library: form validation and list/detail views.

use std::fmt;

use crate::backend::Backend;
use crate::error::{AppError, Result};
use crate::models::{Book, BookPayload};
use crate::render::{Alert, layout};
use crate::utils::{non_blank, time};

/// Book create/edit form as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub publication_date: String,
    pub description: String,
    pub cover_image: String,
    pub isbn: String,
}

impl BookForm {
    /// Pre-fill the form from an existing book for editing.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            publication_date: book
                .publication_date
                .as_deref()
                .and_then(time::to_iso_date)
                .unwrap_or_default(),
            description: book.description.clone().unwrap_or_default(),
            cover_image: book.cover_image.clone().unwrap_or_default(),
            isbn: book.isbn.clone().unwrap_or_default(),
        }
    }

    /// Check required fields and build the request body.
    ///
    /// Blank optional fields become `null`; the date is sent as `YYYY-MM-DD`.
    pub fn validate(&self) -> Result<BookPayload> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::validation("Book title is required"));
        }
        let author = self.author.trim();
        if author.is_empty() {
            return Err(AppError::validation("Author name is required"));
        }

        let publication_date = match non_blank(Some(self.publication_date.as_str())) {
            Some(raw) => Some(time::to_iso_date(raw).ok_or_else(|| {
                AppError::validation(format!(
                    "Publication date must look like YYYY-MM-DD, got {raw:?}"
                ))
            })?),
            None => None,
        };

        let optional = |value: &str| non_blank(Some(value)).map(str::to_string);
        Ok(BookPayload {
            title: title.to_string(),
            author: author.to_string(),
            publication_date,
            description: optional(&self.description),
            cover_image: optional(&self.cover_image),
            isbn: optional(&self.isbn),
        })
    }

    /// Validate and create a new book.
    pub async fn create(&self, backend: &dyn Backend) -> Result<(Book, Alert)> {
        let payload = self.validate()?;
        let book = backend.create_book(&payload).await?;
        log::info!("Created book {} ({})", book.id, book.title);
        let alert = Alert::success(
            "Book Added!",
            format!(
                "\"{}\" by {} added successfully.",
                book.title, book.author
            ),
        );
        Ok((book, alert))
    }

    /// Validate and update an existing book.
    pub async fn update(&self, backend: &dyn Backend, id: i64) -> Result<(Book, Alert)> {
        let payload = self.validate()?;
        let book = backend.update_book(id, &payload).await?;
        log::info!("Updated book {}", book.id);
        let alert = Alert::success(
            "Book Updated!",
            format!("\"{}\" updated successfully.", book.title),
        );
        Ok((book, alert))
    }
}

/// Library index, optionally filtered by a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookList {
    pub query: Option<String>,
    pub books: Vec<Book>,
}

impl fmt::Display for BookList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match &self.query {
            Some(q) => format!("Library: \"{q}\""),
            None => "Library".to_string(),
        };
        layout::header(f, &title)?;
        if self.books.is_empty() {
            return writeln!(f, "No books found in the library.");
        }
        for book in &self.books {
            writeln!(f, "#{} {}", book.id, book.title)?;
            layout::sub_item(f, &format!("by {}", book.author))?;
            layout::sub_item(
                f,
                non_blank(book.description.as_deref()).unwrap_or("No description available."),
            )?;
        }
        Ok(())
    }
}

/// A single book page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDetail {
    pub book: Book,
    pub date_format: String,
}

impl fmt::Display for BookDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let book = &self.book;
        layout::header(f, &book.title)?;
        writeln!(f, "by {}", book.author)?;

        let mut items: Vec<(&str, String)> = Vec::new();
        if let Some(isbn) = non_blank(book.isbn.as_deref()) {
            items.push(("ISBN", isbn.to_string()));
        }
        if let Some(date) = non_blank(book.publication_date.as_deref()) {
            items.push(("Published", time::format_timestamp(date, &self.date_format)));
        }
        if let Some(genre) = non_blank(book.genre.as_deref()) {
            items.push(("Genre", genre.to_string()));
        }
        if let Some(added) = non_blank(book.created_at.as_deref()) {
            items.push(("Added", time::format_timestamp(added, &self.date_format)));
        }
        if let Some(cover) = non_blank(book.cover_image.as_deref()) {
            items.push(("Cover", cover.to_string()));
        }
        if !items.is_empty() {
            layout::summary(f, "Details", &items)?;
        }

        layout::section(f, "Description")?;
        writeln!(
            f,
            "{}",
            non_blank(book.description.as_deref()).unwrap_or("No description available.")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::fake::FakeBackend;

    fn form() -> BookForm {
        BookForm {
            title: " Things Fall Apart ".into(),
            author: "Chinua Achebe".into(),
            publication_date: "1958-06-17".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_required_fields() {
        let mut f = form();
        f.title = "  ".into();
        assert_eq!(
            f.validate().unwrap_err().user_message(),
            "Book title is required"
        );

        let mut f = form();
        f.author = String::new();
        assert_eq!(
            f.validate().unwrap_err().user_message(),
            "Author name is required"
        );
    }

    #[test]
    fn test_blank_optionals_become_null() {
        let payload = form().validate().unwrap();
        assert_eq!(payload.title, "Things Fall Apart");
        assert_eq!(payload.publication_date.as_deref(), Some("1958-06-17"));
        assert_eq!(payload.isbn, None);
        assert_eq!(payload.description, None);
    }

    #[test]
    fn test_date_is_normalized() {
        let mut f = form();
        f.publication_date = "1958-06-17T00:00:00".into();
        assert_eq!(
            f.validate().unwrap().publication_date.as_deref(),
            Some("1958-06-17")
        );

        f.publication_date = "June 1958".into();
        assert!(f.validate().is_err());
    }

    #[tokio::test]
    async fn test_invalid_form_makes_no_call() {
        let backend = FakeBackend::new();
        let mut f = form();
        f.author = " ".into();
        assert!(f.create(&backend).await.is_err());
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_reports_success() {
        let backend = FakeBackend::new();
        let (book, alert) = form().create(&backend).await.unwrap();
        assert_eq!(book.id, 900);
        assert_eq!(
            alert.description,
            "\"Things Fall Apart\" by Chinua Achebe added successfully."
        );
    }

    #[test]
    fn test_empty_list_message() {
        let list = BookList {
            query: Some("zzz".into()),
            books: Vec::new(),
        };
        let text = list.to_string();
        assert!(text.contains("Library: \"zzz\""));
        assert!(text.contains("No books found in the library."));
    }
}
