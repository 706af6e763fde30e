//! Query predicates and options in Prismic query syntax

use chrono::{DateTime, Utc};
use std::fmt;

use super::Document;

/// A single query condition
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field equals value, e.g. `[at(document.type, "posts")]`
    At { path: String, value: String },
    /// Date field strictly before the given instant
    DateBefore { path: String, date: DateTime<Utc> },
    /// Date field strictly after the given instant
    DateAfter { path: String, date: DateTime<Utc> },
}

impl Predicate {
    pub fn at(path: &str, value: &str) -> Self {
        Predicate::At {
            path: path.to_string(),
            value: value.to_string(),
        }
    }

    pub fn date_before(path: &str, date: DateTime<Utc>) -> Self {
        Predicate::DateBefore {
            path: path.to_string(),
            date,
        }
    }

    pub fn date_after(path: &str, date: DateTime<Utc>) -> Self {
        Predicate::DateAfter {
            path: path.to_string(),
            date,
        }
    }

    /// Evaluate the predicate against a document.
    ///
    /// Supports the `document.*` metadata paths and `my.<type>.<field>`
    /// string fields; anything else never matches.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Predicate::At { path, value } => {
                field_text(document, path).is_some_and(|field| field == *value)
            }
            Predicate::DateBefore { path, date } => {
                field_date(document, path).is_some_and(|field| field < *date)
            }
            Predicate::DateAfter { path, date } => {
                field_date(document, path).is_some_and(|field| field > *date)
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::At { path, value } => {
                write!(f, "[at({}, \"{}\")]", path, value.replace('"', "\\\""))
            }
            Predicate::DateBefore { path, date } => {
                write!(f, "[date.before({}, {})]", path, date.timestamp_millis())
            }
            Predicate::DateAfter { path, date } => {
                write!(f, "[date.after({}, {})]", path, date.timestamp_millis())
            }
        }
    }
}

/// Render a predicate list as the `q` query parameter
pub fn to_query(predicates: &[Predicate]) -> String {
    let inner: String = predicates.iter().map(|p| p.to_string()).collect();
    format!("[{}]", inner)
}

/// Sort key for a query
#[derive(Debug, Clone, PartialEq)]
pub struct Ordering {
    pub field: String,
    pub descending: bool,
}

impl Ordering {
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: false,
        }
    }

    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: true,
        }
    }

    /// Compare two documents on this key. Documents lacking the field sort last.
    pub fn compare(&self, a: &Document, b: &Document) -> std::cmp::Ordering {
        use std::cmp::Ordering as Cmp;

        let ordering = match (field_date(a, &self.field), field_date(b, &self.field)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => return Cmp::Less,
            (None, Some(_)) => return Cmp::Greater,
            (None, None) => match (field_text(a, &self.field), field_text(b, &self.field)) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => return Cmp::Less,
                (None, Some(_)) => return Cmp::Greater,
                (None, None) => Cmp::Equal,
            },
        };

        if self.descending {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            write!(f, "{} desc", self.field)
        } else {
            write!(f, "{}", self.field)
        }
    }
}

/// Options accompanying a predicate query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    /// Restrict returned data fields, e.g. `posts.title`
    pub fetch: Vec<String>,
    pub page_size: Option<usize>,
    pub orderings: Vec<Ordering>,
    /// Content release to read from; the master ref when `None`
    pub reference: Option<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetch<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fetch = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn order_by(mut self, ordering: Ordering) -> Self {
        self.orderings.push(ordering);
        self
    }

    pub fn reference(mut self, reference: Option<&str>) -> Self {
        self.reference = reference.map(str::to_string);
        self
    }

    /// Render orderings as the `orderings` query parameter
    pub fn orderings_param(&self) -> Option<String> {
        if self.orderings.is_empty() {
            return None;
        }
        let keys: Vec<String> = self.orderings.iter().map(|o| o.to_string()).collect();
        Some(format!("[{}]", keys.join(",")))
    }
}

fn field_text(document: &Document, path: &str) -> Option<String> {
    match path {
        "document.id" => Some(document.id.clone()),
        "document.type" => Some(document.doc_type.clone()),
        "document.uid" => document.uid.clone(),
        _ => {
            let field = custom_field(document, path)?;
            if field == "uid" {
                return document.uid.clone();
            }
            document.data.get(field)?.as_str().map(str::to_string)
        }
    }
}

fn field_date(document: &Document, path: &str) -> Option<DateTime<Utc>> {
    match path {
        "document.first_publication_date" => document.first_publication_date,
        "document.last_publication_date" => document.last_publication_date,
        _ => {
            let field = custom_field(document, path)?;
            let raw = document.data.get(field)?.as_str()?;
            super::parse_timestamp(raw).ok()
        }
    }
}

/// Resolve `my.<type>.<field>` to `<field>` when `<type>` matches the document
fn custom_field<'a>(document: &Document, path: &'a str) -> Option<&'a str> {
    let rest = path.strip_prefix("my.")?;
    let (doc_type, field) = rest.split_once('.')?;
    (doc_type == document.doc_type).then_some(field)
}
