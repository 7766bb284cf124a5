use crate::errors::Result;
use crate::model::{non_empty, OralHistory, Site};
use std::fmt;

const NO_DESCRIPTION: &str = "No description";
const NO_LOCATION: &str = "Location N/A";
const UNTITLED: &str = "Untitled";
const NO_STORY: &str = "No story";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Sites,
    OralHistories,
}

impl Collection {
    pub fn path(self) -> &'static str {
        match self {
            Collection::Sites => "sites",
            Collection::OralHistories => "oral-histories",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            Collection::Sites => "Heritage Sites",
            Collection::OralHistories => "Oral Histories",
        }
    }

    pub fn empty_message(self) -> &'static str {
        match self {
            Collection::Sites => "No sites found.",
            Collection::OralHistories => "No oral histories found.",
        }
    }

    fn error_prefix(self) -> &'static str {
        match self {
            Collection::Sites => "Error loading sites",
            Collection::OralHistories => "Error loading histories",
        }
    }
}

/// Summary card for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub body: String,
    pub detail: Option<String>,
}

pub fn site_card(site: &Site) -> Card {
    Card {
        title: site.name.clone(),
        body: non_empty(&site.description).unwrap_or(NO_DESCRIPTION).to_string(),
        detail: Some(
            site.display_location()
                .unwrap_or_else(|| NO_LOCATION.to_string()),
        ),
    }
}

pub fn oral_history_card(item: &OralHistory) -> Card {
    Card {
        title: non_empty(&item.title).unwrap_or(UNTITLED).to_string(),
        body: non_empty(&item.story).unwrap_or(NO_STORY).to_string(),
        detail: None,
    }
}

/// What a section of the page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Loading,
    Empty(&'static str),
    Cards(Vec<Card>),
    Error(String),
}

impl Listing {
    pub fn from_result<T>(collection: Collection, result: Result<Vec<T>>, card: impl Fn(&T) -> Card) -> Self {
        match result {
            Ok(items) if items.is_empty() => Listing::Empty(collection.empty_message()),
            Ok(items) => Listing::Cards(items.iter().map(card).collect()),
            Err(e) => Listing::Error(format!("{}: {}", collection.error_prefix(), e)),
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Listing::Loading => "⏳ Loading...".to_string(),
            Listing::Empty(message) => format!("<p>{}</p>", escape_html(message)),
            Listing::Error(message) => {
                format!("<p class='text-red-500'>{}</p>", escape_html(message))
            }
            Listing::Cards(cards) => cards.iter().map(card_html).collect(),
        }
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Listing::Loading => writeln!(f, "⏳ Loading..."),
            Listing::Empty(message) => writeln!(f, "{}", message),
            Listing::Error(message) => writeln!(f, "{}", message),
            Listing::Cards(cards) => {
                for card in cards {
                    writeln!(f, "• {}", card.title)?;
                    writeln!(f, "    {}", card.body)?;
                    if let Some(detail) = &card.detail {
                        writeln!(f, "    {}", detail)?;
                    }
                }
                Ok(())
            }
        }
    }
}

fn card_html(card: &Card) -> String {
    let mut html = format!(
        "<li class=\"border p-3 rounded-lg\"><h3 class=\"font-semibold\">{}</h3><p class=\"text-sm text-gray-600\">{}</p>",
        escape_html(&card.title),
        escape_html(&card.body)
    );
    if let Some(detail) = &card.detail {
        html.push_str(&format!(
            "<p class=\"text-xs text-gray-500\">{}</p>",
            escape_html(detail)
        ));
    }
    html.push_str("</li>");
    html
}

/// Escapes the five HTML-significant characters for text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
