//! Path templates such as `students/{id}/update`.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use crate::routing::error::RouteError;

/// Variable bindings produced by a successful match, keyed by variable name.
pub type PathVariables = HashMap<String, String>;

/// One `/`-separated piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches only this exact text.
    Literal(String),
    /// Matches any non-empty segment and binds it to this name.
    Variable(String),
}

/// A parsed route pattern.
///
/// A single leading `/` is optional, so `students/{id}` and `/students/{id}`
/// parse to the same template. The pattern `/` is the root template and
/// matches only the root path.
#[derive(Debug, Clone)]
pub struct PathTemplate {
    pattern: String,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Parse a pattern into its segments.
    ///
    /// Fails when the pattern is empty, contains an empty segment, a variable
    /// with no closing `}` or no name, braces mixed with literal text, or the
    /// same variable name twice.
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let malformed = |reason: String| RouteError::MalformedTemplate {
            pattern: pattern.to_string(),
            reason,
        };

        if pattern.is_empty() {
            return Err(malformed("pattern is empty".to_string()));
        }

        let trimmed = pattern.strip_prefix('/').unwrap_or(pattern);
        if trimmed.is_empty() {
            return Ok(Self {
                pattern: pattern.to_string(),
                segments: vec![Segment::Literal(String::new())],
            });
        }

        let mut segments = Vec::new();
        let mut names = HashSet::new();
        for raw in trimmed.split('/') {
            let segment = parse_segment(raw).map_err(malformed)?;
            if let Segment::Variable(name) = &segment {
                if !names.insert(name.clone()) {
                    return Err(malformed(format!("variable {{{name}}} is declared twice")));
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
        })
    }

    /// The pattern exactly as registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of literal segments; higher means more specific.
    pub fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Literal(_)))
            .count()
    }

    /// Names of the variables, in path order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Variable(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables().any(|variable| variable == name)
    }

    /// Whether both templates accept exactly the same paths.
    ///
    /// Variable names are ignored: `students/{id}` and `students/{sid}` have
    /// the same shape.
    pub fn same_shape(&self, other: &PathTemplate) -> bool {
        self.segments.len() == other.segments.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|pair| match pair {
                    (Segment::Literal(a), Segment::Literal(b)) => a == b,
                    (Segment::Variable(_), Segment::Variable(_)) => true,
                    _ => false,
                })
    }

    /// Match a request path against the template.
    ///
    /// Each path segment is percent-decoded once, then compared with the
    /// literal or bound to the variable. Returns the variable bindings, or
    /// `None` when the segment counts differ, a literal differs, or a variable
    /// would bind an empty segment.
    pub fn matches(&self, path: &str) -> Option<PathVariables> {
        let parts: Vec<&str> = split_path(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut variables = PathVariables::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            let part = decode_segment(part);
            match segment {
                Segment::Literal(text) if *text == part => {}
                Segment::Literal(_) => return None,
                Segment::Variable(_) if part.is_empty() => return None,
                Segment::Variable(name) => {
                    variables.insert(name.clone(), part.into_owned());
                }
            }
        }
        Some(variables)
    }
}

fn split_path(path: &str) -> std::str::Split<'_, char> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

fn parse_segment(raw: &str) -> Result<Segment, String> {
    if raw.is_empty() {
        return Err("empty path segment".to_string());
    }

    let is_brace = |c: char| c == '{' || c == '}';
    match raw.strip_prefix('{') {
        Some(rest) => {
            let name = rest
                .strip_suffix('}')
                .ok_or_else(|| format!("variable segment {raw:?} has no closing '}}'"))?;
            if name.is_empty() {
                return Err("variable segment has no name".to_string());
            }
            if name.contains(is_brace) {
                return Err(format!("variable segment {raw:?} contains nested braces"));
            }
            Ok(Segment::Variable(name.to_string()))
        }
        None if raw.contains(is_brace) => Err(format!(
            "segment {raw:?} mixes literal text with braces"
        )),
        None => Ok(Segment::Literal(raw.to_string())),
    }
}

// Undecodable input is used as-is.
fn decode_segment(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}
