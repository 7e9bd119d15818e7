//! Topic filter patterns for event queries.
//!
//! A pattern lists one segment per topic position. Each segment is either an
//! exact wire value (sent as base64 XDR) or a wildcard matching any value
//! at that position.
//!
//! ```
//! use sorokit_events::TopicFilter;
//!
//! // transfer(from = *, to = *)
//! let filter = TopicFilter::new().symbol("transfer").any().any();
//! assert_eq!(filter.segments()[1], "*");
//! ```

use std::fmt;

use sorokit_codec::WireValue;

/// Wildcard segment text understood by the event query.
pub const WILDCARD: &str = "*";

/// Longest topic pattern the query accepts.
pub const MAX_TOPIC_SEGMENTS: usize = 4;

/// One position in a topic pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicSegment {
    Any,
    Exact(WireValue),
}

impl TopicSegment {
    /// Query text of this segment.
    pub fn to_query_text(&self) -> String {
        match self {
            Self::Any => WILDCARD.to_string(),
            Self::Exact(value) => value.to_base64(),
        }
    }
}

/// An ordered topic pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicFilter {
    segments: Vec<TopicSegment>,
}

impl TopicFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match exactly `value` at the next position.
    pub fn exact(mut self, value: WireValue) -> Self {
        self.segments.push(TopicSegment::Exact(value));
        self
    }

    /// Match the symbol `name` at the next position.
    pub fn symbol(self, name: impl Into<String>) -> Self {
        self.exact(WireValue::Symbol(name.into()))
    }

    /// Match anything at the next position.
    pub fn any(mut self) -> Self {
        self.segments.push(TopicSegment::Any);
        self
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments in query form.
    pub fn segments(&self) -> Vec<String> {
        self.segments.iter().map(TopicSegment::to_query_text).collect()
    }
}

impl fmt::Display for TopicFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .segments
            .iter()
            .map(|s| match s {
                TopicSegment::Any => WILDCARD.to_string(),
                TopicSegment::Exact(v) => v.to_string(),
            })
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}

impl From<TopicFilter> for Vec<String> {
    fn from(filter: TopicFilter) -> Self {
        filter.segments()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_segment_is_base64_xdr() {
        let filter = TopicFilter::new().symbol("transfer").any();
        assert_eq!(filter.segments(), vec!["AAAADwAAAAh0cmFuc2Zlcg==".to_string(), "*".to_string()]);
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn exact_segment() {
        let filter = TopicFilter::new().exact(WireValue::U32(1));
        assert_eq!(Vec::<String>::from(filter), vec!["AAAAAwAAAAE=".to_string()]);
    }

    #[test]
    fn empty_filter() {
        assert!(TopicFilter::new().is_empty());
        assert!(TopicFilter::new().segments().is_empty());
    }
}
