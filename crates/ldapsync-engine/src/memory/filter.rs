//! Search filter subset
//!
//! Parses the string form of search filters and evaluates them against an
//! [`Entry`]. Supported: equality `(a=v)`, presence `(a=*)`, substrings
//! `(a=ab*c*d)`, and the `&`, `|`, `!` combinators. Attribute names and
//! values compare case-insensitively. Values may carry `\XX` hex escapes.

use ldapsync_core::Entry;
use thiserror::Error;

/// Parsed search filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Not(Box<Filter>),
    Equals {
        attribute: String,
        value: String,
    },
    Present {
        attribute: String,
    },
    Substring {
        attribute: String,
        initial: Option<String>,
        any: Vec<String>,
        last: Option<String>,
    },
}

/// A filter string that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid filter {filter:?} at offset {offset}: {reason}")]
pub struct FilterError {
    pub filter: String,
    pub offset: usize,
    pub reason: &'static str,
}

impl Filter {
    /// Parse a parenthesized filter string
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] for unbalanced parentheses, empty `&`/`|`
    /// lists, items without `=`, and unsupported match types
    /// (`>=`, `<=`, `~=`, extensible matches).
    ///
    /// # Example
    /// ```
    /// use ldapsync_engine::memory::filter::Filter;
    ///
    /// let filter = Filter::parse("(&(objectClass=person)(!(uid=jim)))").unwrap();
    /// assert!(matches!(filter, Filter::And(ref parts) if parts.len() == 2));
    /// ```
    pub fn parse(input: &str) -> Result<Self, FilterError> {
        let input = input.trim();
        let mut parser = Parser { input, pos: 0 };
        let filter = parser.filter()?;
        if parser.pos != input.len() {
            return Err(parser.error("trailing characters after filter"));
        }
        Ok(filter)
    }

    /// True if `entry` satisfies the filter
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            Filter::And(filters) => filters.iter().all(|f| f.matches(entry)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(entry)),
            Filter::Not(filter) => !filter.matches(entry),
            Filter::Present { attribute } => values_of(entry, attribute).is_some(),
            Filter::Equals { attribute, value } => values_of(entry, attribute)
                .is_some_and(|values| values.iter().any(|v| v.to_lowercase() == *value)),
            Filter::Substring {
                attribute,
                initial,
                any,
                last,
            } => values_of(entry, attribute).is_some_and(|values| {
                values
                    .iter()
                    .any(|v| substring_match(&v.to_lowercase(), initial.as_deref(), any, last.as_deref()))
            }),
        }
    }
}

/// Values of an attribute, looked up case-insensitively
pub fn values_of<'e>(entry: &'e Entry, attribute: &str) -> Option<&'e [String]> {
    entry
        .attributes
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(attribute))
        .map(|(_, values)| values.as_slice())
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn error(&self, reason: &'static str) -> FilterError {
        FilterError {
            filter: self.input.to_string(),
            offset: self.pos,
            reason,
        }
    }

    fn expect(&mut self, byte: u8, reason: &'static str) -> Result<(), FilterError> {
        if self.peek() != Some(byte) {
            return Err(self.error(reason));
        }
        self.pos += 1;
        Ok(())
    }

    fn filter(&mut self) -> Result<Filter, FilterError> {
        self.expect(b'(', "expected '('")?;
        let filter = match self.peek() {
            Some(b'&') => {
                self.pos += 1;
                Filter::And(self.list()?)
            }
            Some(b'|') => {
                self.pos += 1;
                Filter::Or(self.list()?)
            }
            Some(b'!') => {
                self.pos += 1;
                Filter::Not(Box::new(self.filter()?))
            }
            Some(_) => self.item()?,
            None => return Err(self.error("unexpected end of filter")),
        };
        self.expect(b')', "expected ')'")?;
        Ok(filter)
    }

    fn list(&mut self) -> Result<Vec<Filter>, FilterError> {
        let mut filters = Vec::new();
        while self.peek() == Some(b'(') {
            filters.push(self.filter()?);
        }
        if filters.is_empty() {
            return Err(self.error("empty filter list"));
        }
        Ok(filters)
    }

    fn item(&mut self) -> Result<Filter, FilterError> {
        let rest = &self.input[self.pos..];
        let len = rest
            .find(')')
            .ok_or_else(|| self.error("unterminated filter item"))?;
        let text = &rest[..len];

        let (attribute, raw) = text
            .split_once('=')
            .ok_or_else(|| self.error("filter item without '='"))?;
        let attribute = attribute.trim();
        if attribute.is_empty() {
            return Err(self.error("filter item without attribute"));
        }
        if attribute.ends_with(['>', '<', '~', ':']) {
            return Err(self.error("unsupported match type"));
        }

        let attribute = attribute.to_string();
        let filter = if raw == "*" {
            Filter::Present { attribute }
        } else if raw.contains('*') {
            let mut parts: Vec<String> = raw.split('*').map(unescape_value).collect();
            // split on '*' always yields at least two parts here
            let last = parts.pop().filter(|s| !s.is_empty());
            let initial = Some(parts.remove(0)).filter(|s| !s.is_empty());
            Filter::Substring {
                attribute,
                initial,
                any: parts.into_iter().filter(|s| !s.is_empty()).collect(),
                last,
            }
        } else {
            Filter::Equals {
                attribute,
                value: unescape_value(raw),
            }
        };

        self.pos += len;
        Ok(filter)
    }
}

/// Resolve `\XX` hex escapes and lower-case the result
fn unescape_value(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if let Some(byte) = raw
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
            {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).to_lowercase()
}

fn substring_match(value: &str, initial: Option<&str>, any: &[String], last: Option<&str>) -> bool {
    let mut rest = value;
    if let Some(initial) = initial {
        match rest.strip_prefix(initial) {
            Some(r) => rest = r,
            None => return false,
        }
    }
    for part in any {
        match rest.find(part.as_str()) {
            Some(index) => rest = &rest[index + part.len()..],
            None => return false,
        }
    }
    last.map_or(true, |last| rest.ends_with(last))
}
