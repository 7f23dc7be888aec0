//! Transport-neutral rendering of records and collections.
//!
//! Handlers build a [`Document`] and pick a [`Format`] from the request's
//! `Accept` header; the encoders in [`json`] and [`xml`] turn the pair into a
//! response body.

pub mod json;
pub mod xml;

use crate::entity::{Entity, EntityId, EntityKind, RelationKind};
use crate::error::{Result, TodoManagerError};

/// Output encodings the service can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Xml,
}

impl Format {
    const ALL: [Format; 2] = [Format::Json, Format::Xml];

    pub fn content_type(self) -> &'static str {
        match self {
            Format::Json => "application/json",
            Format::Xml => "application/xml",
        }
    }

    /// Media types that name this format exactly
    fn media_types(self) -> &'static [&'static str] {
        match self {
            Format::Json => &["application/json"],
            Format::Xml => &["application/xml", "text/xml"],
        }
    }

    /// Choose an encoding from an `Accept` header value.
    ///
    /// Each format takes its quality from the most specific range naming it
    /// (exact type, then `type/*`, then `*/*`). The highest quality wins and
    /// ties go to header order. Unsupported types fall back to JSON; the only
    /// failure is a header that gives both formats a quality of zero.
    pub fn negotiate(accept: Option<&str>) -> Result<Format> {
        let header = match accept.map(str::trim) {
            None | Some("") => return Ok(Format::Json),
            Some(h) => h,
        };

        let ranges: Vec<MediaRange> = header.split(',').filter_map(MediaRange::parse).collect();
        let preferences: Vec<(Format, Option<Preference>)> = Format::ALL
            .iter()
            .map(|format| (*format, Preference::of(*format, &ranges)))
            .collect();

        // min_by keeps the first of equal candidates, so JSON wins full ties
        let chosen = preferences
            .iter()
            .filter_map(|(format, pref)| pref.filter(|p| p.quality > 0.0).map(|p| (*format, p)))
            .min_by(|(_, a), (_, b)| {
                b.quality
                    .total_cmp(&a.quality)
                    .then(a.position.cmp(&b.position))
            })
            .map(|(format, _)| format);

        if let Some(format) = chosen {
            return Ok(format);
        }

        preferences
            .iter()
            .find(|(_, pref)| !pref.is_some_and(|p| p.quality <= 0.0))
            .map(|(format, _)| *format)
            .ok_or_else(|| TodoManagerError::UnsupportedFormat(header.to_string()))
    }
}

/// Quality a header assigns to one format, and where the deciding range sits
#[derive(Debug, Clone, Copy)]
struct Preference {
    quality: f32,
    position: usize,
}

impl Preference {
    fn of(format: Format, ranges: &[MediaRange]) -> Option<Self> {
        ranges
            .iter()
            .enumerate()
            .filter_map(|(position, range)| {
                range
                    .specificity(format)
                    .map(|specificity| (specificity, position, range.quality))
            })
            .min_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)))
            .map(|(_, position, quality)| Preference { quality, position })
    }
}

#[derive(Debug)]
struct MediaRange {
    media_type: String,
    quality: f32,
}

impl MediaRange {
    fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(';');
        let media_type = parts.next()?.trim().to_ascii_lowercase();
        if media_type.is_empty() {
            return None;
        }

        let quality = parts
            .filter_map(|p| p.trim().strip_prefix("q="))
            .find_map(|q| q.trim().parse::<f32>().ok())
            .unwrap_or(1.0);

        Some(Self {
            media_type,
            quality,
        })
    }

    /// 2 for an exact match, 1 for `type/*`, 0 for `*/*`
    fn specificity(&self, format: Format) -> Option<u8> {
        let exact = format.media_types();
        if exact.contains(&self.media_type.as_str()) {
            return Some(2);
        }
        if self.media_type == "*/*" {
            return Some(0);
        }
        let prefix = self.media_type.strip_suffix('*')?;
        exact
            .iter()
            .any(|media_type| media_type.starts_with(prefix))
            .then_some(1)
    }
}

/// Value of a field in a rendered record
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Text(String),
    /// Ids of linked records, rendered as `[{ "id": .. }]`
    Links(Vec<EntityId>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Singular element name used by XML
    pub element: &'static str,
    pub fields: Vec<(&'static str, Field)>,
}

impl Record {
    /// Full rendering: scalar fields plus every non-empty outgoing relation.
    pub fn full(entity: &Entity, links: Vec<(RelationKind, Vec<EntityId>)>) -> Self {
        let mut fields: Vec<(&'static str, Field)> = entity
            .scalar_fields()
            .into_iter()
            .map(|(name, value)| (name, Field::Text(value)))
            .collect();
        for (relation, ids) in links {
            fields.push((relation.name(), Field::Links(ids)));
        }
        Self {
            element: entity.kind().singular(),
            fields,
        }
    }

    /// Summary rendering used in relationship listings.
    pub fn summary(entity: &Entity) -> Self {
        let base = entity.base();
        Self {
            element: entity.kind().singular(),
            fields: vec![
                ("id", Field::Text(base.id.to_string())),
                ("title", Field::Text(base.title.clone())),
                ("description", Field::Text(base.description.clone())),
            ],
        }
    }

    #[cfg(test)]
    fn text(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|(n, f)| match f {
            Field::Text(value) if *n == name => Some(value.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// A bare record, as returned by create and update
    Record(Record),
    /// A named list; `errors` is only filled for not-found relationship lists
    Collection {
        name: &'static str,
        records: Vec<Record>,
        errors: Vec<String>,
    },
    Errors(Vec<String>),
}

impl Document {
    pub fn collection(kind: EntityKind, records: Vec<Record>) -> Self {
        Document::Collection {
            name: kind.plural(),
            records,
            errors: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Document::Errors(vec![message.into()])
    }

    pub fn encode(&self, format: Format) -> String {
        match format {
            Format::Json => json::encode(self),
            Format::Xml => xml::encode(self),
        }
    }
}
