//! Positioned text tokens and the token-dump reader
//!
//! Tokens come from an upstream PDF text layer. This module holds the
//! page/document containers and reads the plain-text dump format:
//!
//! ```text
//! # page  x      y      text
//! 1       100.0  200.0  WPA1302-0101
//! 1       180.0  200.5  5
//! 2
//! ```
//!
//! A line holding only a page number declares that page, so an empty page
//! is distinguishable from a page that failed to load.

use crate::{Error, Result};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

/// A text token with position information
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The text content
    pub text: String,
    /// X position on page (larger is further right)
    pub x: f32,
    /// Y position on page (larger is further down)
    pub y: f32,
}

impl Token {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }
}

/// All tokens of one page, in extraction order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,
    pub tokens: Vec<Token>,
}

impl Page {
    pub fn new(number: u32, tokens: Vec<Token>) -> Self {
        Self { number, tokens }
    }

    /// Raw reading-order text of the page.
    ///
    /// Preserves extraction order (which is usually reading order) and only
    /// merges consecutive tokens sitting on the same baseline. Merged tokens
    /// are joined with a space, lines with a newline.
    pub fn reading_text(&self) -> String {
        let y_tolerance = 3.0;
        let mut text = String::new();
        let mut last_y: Option<f32> = None;

        for token in &self.tokens {
            if let Some(y) = last_y {
                if (token.y - y).abs() < y_tolerance {
                    text.push(' ');
                } else {
                    text.push('\n');
                }
            }
            text.push_str(&token.text);
            last_y = Some(token.y);
        }

        text
    }
}

/// A document: pages in ascending page-number order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pages: Vec<Page>,
}

impl Document {
    /// Build a document; pages are stably sorted by page number.
    pub fn new(mut pages: Vec<Page>) -> Self {
        pages.sort_by_key(|p| p.number);
        Self { pages }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn token_count(&self) -> usize {
        self.pages.iter().map(|p| p.tokens.len()).sum()
    }
}

/// Load a token dump from a file
pub fn load_tokens<P: AsRef<Path>>(path: P) -> Result<Document> {
    let file = std::fs::File::open(path)?;
    read_tokens(std::io::BufReader::new(file))
}

/// Parse a token dump held in memory
pub fn load_tokens_mem(content: &str) -> Result<Document> {
    read_tokens(content.as_bytes())
}

/// Read a token dump from any buffered reader
pub fn read_tokens<R: BufRead>(reader: R) -> Result<Document> {
    let mut pages: Vec<Page> = Vec::new();
    let mut page_index: HashMap<u32, usize> = HashMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let record = line.trim_start_matches('\u{feff}');
        if record.trim().is_empty() || record.trim_start().starts_with('#') {
            continue;
        }

        let mut fields = record.splitn(4, '\t');
        let page_field = fields.next().unwrap_or_default().trim();
        let number: u32 = page_field
            .parse()
            .map_err(|_| invalid(line_no, format!("invalid page number '{}'", page_field)))?;

        let page = page_entry(&mut pages, &mut page_index, number);

        let Some(x_field) = fields.next() else {
            // page declaration only
            continue;
        };
        let x = parse_coordinate(x_field, "x", line_no)?;
        let y_field = fields
            .next()
            .ok_or_else(|| invalid(line_no, "missing y coordinate".to_string()))?;
        let y = parse_coordinate(y_field, "y", line_no)?;
        let text = fields
            .next()
            .ok_or_else(|| invalid(line_no, "missing token text".to_string()))?;

        if text.trim().is_empty() {
            continue;
        }
        page.tokens.push(Token::new(text.trim(), x, y));
    }

    let document = Document::new(pages);
    log::debug!(
        "Read token dump: {} pages, {} tokens",
        document.page_count(),
        document.token_count()
    );
    Ok(document)
}

fn page_entry<'a>(
    pages: &'a mut Vec<Page>,
    index: &mut HashMap<u32, usize>,
    number: u32,
) -> &'a mut Page {
    let pos = *index.entry(number).or_insert_with(|| {
        pages.push(Page::new(number, Vec::new()));
        pages.len() - 1
    });
    &mut pages[pos]
}

fn parse_coordinate(field: &str, axis: &str, line: usize) -> Result<f32> {
    let value: f32 = field
        .trim()
        .parse()
        .map_err(|_| invalid(line, format!("invalid {} coordinate '{}'", axis, field.trim())))?;
    if !value.is_finite() {
        return Err(invalid(line, format!("non-finite {} coordinate", axis)));
    }
    Ok(value)
}

fn invalid(line: usize, reason: String) -> Error {
    Error::InvalidTokenRecord { line, reason }
}
