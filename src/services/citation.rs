//! Citation strings and the reference list view.

use std::fmt;

use crate::models::{Reference, Source, SourceType};
use crate::render::layout;
use crate::utils::{non_blank, time};

/// Date format used by [`format_reference`].
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y";

/// Format a reference as one citation string with the default date format.
pub fn format_reference(reference: &Reference) -> String {
    format_source(&reference.source, DEFAULT_DATE_FORMAT)
}

/// Format a source as a citation.
///
/// Present fields are joined with `". "` in a fixed order: author, quoted
/// title, publication, year, URL, ISBN, DOI, access date. Blank fields are
/// skipped; nothing else is.
pub fn format_source(source: &Source, date_format: &str) -> String {
    let mut segments: Vec<String> = Vec::with_capacity(8);

    if let Some(author) = non_blank(source.author.as_deref()) {
        segments.push(author.to_string());
    }
    if let Some(title) = non_blank(Some(source.title.as_str())) {
        segments.push(format!("\"{title}\""));
    }
    if let Some(publication) = non_blank(source.publication.as_deref()) {
        segments.push(publication.to_string());
    }
    if let Some(year) = non_blank(source.publication_date.as_deref()).and_then(time::year_of) {
        segments.push(year.to_string());
    }
    if let Some(url) = non_blank(source.url.as_deref()) {
        segments.push(url.to_string());
    }
    if let Some(isbn) = non_blank(source.isbn.as_deref()) {
        segments.push(format!("ISBN: {isbn}"));
    }
    if let Some(doi) = non_blank(source.doi.as_deref()) {
        segments.push(format!("DOI: {doi}"));
    }
    if let Some(accessed) = non_blank(source.access_date.as_deref()) {
        segments.push(format!(
            "Accessed: {}",
            time::format_timestamp(accessed, date_format)
        ));
    }

    segments.join(". ")
}

/// One rendered entry of a reference list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub number: u32,
    pub source_type: SourceType,
    pub title: String,
    pub citation: String,
    pub context: Option<String>,
    pub page: Option<String>,
    pub section: Option<String>,
}

impl ReferenceEntry {
    pub fn color(&self) -> &'static str {
        self.source_type.color()
    }
}

/// The "References" section of an article page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceList {
    pub entries: Vec<ReferenceEntry>,
    pub collapse_threshold: usize,
    pub expanded: bool,
}

impl ReferenceList {
    /// Build the list, ordered by reference number.
    pub fn new(references: &[Reference], date_format: &str, collapse_threshold: usize) -> Self {
        let mut entries: Vec<ReferenceEntry> = references
            .iter()
            .map(|r| ReferenceEntry {
                number: r.reference_number,
                source_type: r.source.source_type,
                title: r.source.title.clone(),
                citation: format_source(&r.source, date_format),
                context: non_blank(r.context.as_deref()).map(str::to_string),
                page: non_blank(r.page_number.as_deref()).map(str::to_string),
                section: non_blank(r.section.as_deref()).map(str::to_string),
            })
            .collect();
        entries.sort_by_key(|e| e.number);

        Self {
            entries,
            collapse_threshold,
            expanded: false,
        }
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the list is long enough to offer a "show all" toggle.
    pub fn is_collapsible(&self) -> bool {
        self.entries.len() > self.collapse_threshold
    }

    /// Entries currently shown.
    pub fn visible(&self) -> &[ReferenceEntry] {
        if self.expanded || !self.is_collapsible() {
            &self.entries
        } else {
            &self.entries[..self.collapse_threshold]
        }
    }
}

impl fmt::Display for ReferenceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        let count = layout::badge(&layout::count(self.entries.len(), "source"));
        layout::section(f, &format!("References {count}"))?;

        for entry in self.visible() {
            writeln!(
                f,
                "{} {}",
                layout::badge(&entry.number.to_string()),
                entry.citation
            )?;
            if let Some(context) = &entry.context {
                layout::sub_item(f, &format!("Context: {context}"))?;
            }
            if let Some(page) = &entry.page {
                layout::sub_item(f, &format!("Page: {page}"))?;
            }
            if let Some(section) = &entry.section {
                layout::sub_item(f, &format!("Section: {section}"))?;
            }
        }

        let hidden = self.entries.len() - self.visible().len();
        if hidden > 0 {
            writeln!(f, "... {hidden} more (Show All)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_source() -> Source {
        Source {
            id: 1,
            title: "The Walls of Great Zimbabwe".into(),
            url: Some("https://example.org/zimbabwe".into()),
            author: Some("Garlake, Peter".into()),
            publication: Some("Antiquity".into()),
            publication_date: Some("1973-04-01T00:00:00".into()),
            access_date: Some("2021-05-01".into()),
            source_type: SourceType::Journal,
            isbn: Some("978-0-500".into()),
            doi: Some("10.1017/xyz".into()),
            description: None,
        }
    }

    fn reference(number: u32, source: Source) -> Reference {
        Reference {
            id: number as i64,
            reference_number: number,
            source,
            ..Default::default()
        }
    }

    #[test]
    fn test_full_citation_order() {
        assert_eq!(
            format_reference(&reference(1, full_source())),
            "Garlake, Peter. \"The Walls of Great Zimbabwe\". Antiquity. 1973. \
             https://example.org/zimbabwe. ISBN: 978-0-500. DOI: 10.1017/xyz. Accessed: 5/1/2021"
        );
    }

    #[test]
    fn test_missing_fields_are_omitted_in_order() {
        let mut source = full_source();
        source.author = None;
        source.publication = Some("   ".into());
        source.isbn = None;
        source.access_date = None;

        assert_eq!(
            format_source(&source, DEFAULT_DATE_FORMAT),
            "\"The Walls of Great Zimbabwe\". 1973. https://example.org/zimbabwe. DOI: 10.1017/xyz"
        );
    }

    #[test]
    fn test_every_subset_keeps_relative_order() {
        let full = format_source(&full_source(), DEFAULT_DATE_FORMAT);
        let full_segments: Vec<&str> = full.split(". ").collect();

        // Drop each optional field in turn.
        for mask in 0u8..64 {
            let mut source = full_source();
            if mask & 1 != 0 {
                source.author = None;
            }
            if mask & 2 != 0 {
                source.publication = None;
            }
            if mask & 4 != 0 {
                source.publication_date = None;
            }
            if mask & 8 != 0 {
                source.url = None;
            }
            if mask & 16 != 0 {
                source.isbn = None;
            }
            if mask & 32 != 0 {
                source.doi = None;
            }
            let formatted = format_source(&source, DEFAULT_DATE_FORMAT);
            let segments: Vec<&str> = formatted.split(". ").collect();
            let positions: Vec<usize> = segments
                .iter()
                .map(|s| full_segments.iter().position(|f| f == s).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]), "{formatted}");
            assert_eq!(segments.len(), 8 - mask.count_ones() as usize);
        }
    }

    #[test]
    fn test_unparseable_publication_date_is_skipped() {
        let source = Source {
            title: "Oral traditions".into(),
            publication_date: Some("unknown".into()),
            ..Default::default()
        };
        assert_eq!(
            format_source(&source, DEFAULT_DATE_FORMAT),
            "\"Oral traditions\""
        );
    }

    #[test]
    fn test_empty_list_renders_nothing() {
        let list = ReferenceList::new(&[], DEFAULT_DATE_FORMAT, 3);
        assert_eq!(list.to_string(), "");
    }

    #[test]
    fn test_list_collapses_past_threshold() {
        let refs: Vec<Reference> = (1..=5)
            .rev()
            .map(|n| {
                let mut r = reference(
                    n,
                    Source {
                        title: format!("Source {n}"),
                        ..Default::default()
                    },
                );
                if n == 2 {
                    r.page_number = Some("14".into());
                }
                r
            })
            .collect();

        let list = ReferenceList::new(&refs, DEFAULT_DATE_FORMAT, 3);
        assert_eq!(list.visible().len(), 3);
        assert_eq!(list.visible()[0].number, 1);

        let text = list.to_string();
        assert!(text.contains("References [5 sources]"));
        assert!(text.contains("    Page: 14"));
        assert!(text.contains("2 more"));
        assert!(!text.contains("Source 5"));

        let text = list.expanded(true).to_string();
        assert!(text.contains("Source 5"));
        assert!(!text.contains("more (Show All)"));
    }

    #[test]
    fn test_entry_color_follows_source_type() {
        let list = ReferenceList::new(&[reference(1, full_source())], DEFAULT_DATE_FORMAT, 3);
        assert_eq!(list.entries[0].color(), "purple");
    }
}
