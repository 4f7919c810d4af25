//! Topic matching used to scan the retained-message repository.

use std::fmt;

use crate::utils::{StoreError, StoreResult};

/// A predicate over topic names.
///
/// Any `Fn(&str) -> bool` closure is a matching condition, so callers can
/// pass their own matcher; [`TopicFilter`] provides MQTT wildcard matching.
pub trait MatchingCondition {
    fn matches(&self, topic: &str) -> bool;
}

impl<F> MatchingCondition for F
where
    F: Fn(&str) -> bool,
{
    fn matches(&self, topic: &str) -> bool {
        self(topic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Level {
    Literal(String),
    SingleWildcard,
    MultiWildcard,
}

/// A validated MQTT topic filter.
///
/// `+` matches exactly one level and `#` matches any number of trailing
/// levels, including none. Both must occupy a whole level, and `#` must be
/// the last one. A filter starting with a wildcard does not match topics
/// starting with `$`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicFilter {
    filter: String,
    levels: Vec<Level>,
}

impl TopicFilter {
    pub fn new(filter: &str) -> StoreResult<Self> {
        if filter.is_empty() {
            return Err(StoreError::InvalidTopicFilter(filter.to_string()));
        }

        let parts: Vec<&str> = filter.split('/').collect();
        let last = parts.len() - 1;
        let mut levels = Vec::with_capacity(parts.len());

        for (i, part) in parts.into_iter().enumerate() {
            let level = match part {
                "+" => Level::SingleWildcard,
                "#" if i == last => Level::MultiWildcard,
                p if p.contains(['+', '#']) => {
                    return Err(StoreError::InvalidTopicFilter(filter.to_string()));
                }
                p => Level::Literal(p.to_string()),
            };
            levels.push(level);
        }

        Ok(Self {
            filter: filter.to_string(),
            levels,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.filter
    }

    pub fn match_topic(&self, topic: &str) -> bool {
        if topic.starts_with('$') && !matches!(self.levels.first(), Some(Level::Literal(_))) {
            return false;
        }

        let mut topic_levels = topic.split('/');
        for level in &self.levels {
            match level {
                Level::MultiWildcard => return true,
                Level::SingleWildcard => {
                    if topic_levels.next().is_none() {
                        return false;
                    }
                }
                Level::Literal(expected) => match topic_levels.next() {
                    Some(actual) if actual == expected => {}
                    _ => return false,
                },
            }
        }

        topic_levels.next().is_none()
    }
}

impl MatchingCondition for TopicFilter {
    fn matches(&self, topic: &str) -> bool {
        self.match_topic(topic)
    }
}

impl fmt::Display for TopicFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.filter)
    }
}
