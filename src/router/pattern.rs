//! Route template compilation.
//!
//! A template such as `/users/{id}/posts/{post_id}` is parsed once at registration time into
//! literal and capture segments, then turned into an anchored regex like
//! `^/users/([^/]+)/posts/([^/]+)$`. Capture groups are positional; their names are kept in
//! template order alongside the regex.

use std::sync::Arc;

use regex::Regex;

use super::core::ParamVec;
use crate::error::PatternError;

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text that must appear verbatim in the path.
    Literal(String),
    /// A named capture matching one or more non-`/` characters.
    Capture(Arc<str>),
}

/// A compiled route template. Immutable after [`RoutePattern::compile`].
#[derive(Debug, Clone)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
    regex: Regex,
    param_names: Vec<Arc<str>>,
}

impl PartialEq for RoutePattern {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for RoutePattern {}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split a template into literal and capture segments.
pub(crate) fn parse_segments(template: &str) -> Result<Vec<Segment>, PatternError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = template.char_indices();

    while let Some((pos, c)) = rest.next() {
        match c {
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for (_, inner) in rest.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    if inner == '{' {
                        break;
                    }
                    name.push(inner);
                }
                if !closed {
                    return Err(PatternError::UnclosedBrace {
                        template: template.to_string(),
                        position: pos,
                    });
                }
                if name.is_empty() {
                    return Err(PatternError::EmptyCapture {
                        template: template.to_string(),
                    });
                }
                if !is_valid_name(&name) {
                    return Err(PatternError::InvalidCaptureName {
                        template: template.to_string(),
                        name,
                    });
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                if let Some(Segment::Capture(prev)) = segments.last() {
                    return Err(PatternError::AdjacentCaptures {
                        template: template.to_string(),
                        first: prev.to_string(),
                        second: name,
                    });
                }
                let duplicate = segments
                    .iter()
                    .any(|s| matches!(s, Segment::Capture(existing) if existing.as_ref() == name));
                if duplicate {
                    return Err(PatternError::DuplicateCapture {
                        template: template.to_string(),
                        name,
                    });
                }
                segments.push(Segment::Capture(Arc::from(name)));
            }
            '}' => {
                return Err(PatternError::StrayClosingBrace {
                    template: template.to_string(),
                    position: pos,
                });
            }
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

impl RoutePattern {
    /// Compile a template into a matcher.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] for malformed templates (unbalanced braces, empty, invalid,
    /// duplicate or adjacent capture names).
    pub fn compile(template: &str) -> Result<Self, PatternError> {
        let segments = parse_segments(template)?;

        let mut pattern = String::with_capacity(template.len() + 16);
        pattern.push('^');
        let mut param_names = Vec::new();
        for segment in &segments {
            match segment {
                Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
                Segment::Capture(name) => {
                    pattern.push_str("([^/]+)");
                    param_names.push(Arc::clone(name));
                }
            }
        }
        pattern.push('$');

        let regex = Regex::new(&pattern).map_err(|e| PatternError::Regex {
            template: template.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            raw: template.to_string(),
            segments,
            regex,
            param_names,
        })
    }

    /// The template exactly as registered.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Capture names in template order.
    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.param_names
    }

    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match `path` and return the captured values keyed by capture name, in template order.
    #[must_use]
    pub fn extract(&self, path: &str) -> Option<ParamVec> {
        let caps = self.regex.captures(path)?;
        let mut params = ParamVec::new();
        for (i, name) in self.param_names.iter().enumerate() {
            let value = caps.get(i + 1)?.as_str();
            params.push((Arc::clone(name), value.to_string()));
        }
        Some(params)
    }
}
