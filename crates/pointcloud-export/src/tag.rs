use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Record label drawn from a fixed seven-symbol alphabet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Tag {
    /// The alphabet in cycling order.
    pub const ALL: [Tag; 7] = [Tag::A, Tag::B, Tag::C, Tag::D, Tag::E, Tag::F, Tag::G];

    /// Tag assigned to the record with global index `n`.
    #[inline]
    pub fn for_index(n: u64) -> Tag {
        Self::ALL[(n % Self::ALL.len() as u64) as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::A => "a",
            Tag::B => "b",
            Tag::C => "c",
            Tag::D => "d",
            Tag::E => "e",
            Tag::F => "f",
            Tag::G => "g",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of `a..g`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown tag {0:?}")]
pub struct UnknownTag(pub String);

impl FromStr for Tag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// Monotonic count of records emitted in a session.
///
/// The counter is never reset between flushes, so tags keep cycling across
/// batch boundaries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCounter(u64);

impl TagCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter that resumes after `emitted` records.
    pub fn starting_at(emitted: u64) -> Self {
        Self(emitted)
    }

    /// Number of records tagged so far.
    #[inline]
    pub fn emitted(&self) -> u64 {
        self.0
    }

    /// Tag for the next record, advancing the counter.
    pub fn next_tag(&mut self) -> Tag {
        let tag = Tag::for_index(self.0);
        self.0 += 1;
        tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_cycles_through_alphabet() {
        let mut counter = TagCounter::new();
        let tags: String = (0..10).map(|_| counter.next_tag().as_str()).collect();
        assert_eq!(tags, "abcdefgabc");
        assert_eq!(counter.emitted(), 10);
    }

    #[test]
    fn resumed_counter_picks_up_mid_cycle() {
        let mut counter = TagCounter::starting_at(13);
        assert_eq!(counter.next_tag(), Tag::G);
        assert_eq!(counter.next_tag(), Tag::A);
    }

    #[test]
    fn parses_display_output() {
        for tag in Tag::ALL {
            assert_eq!(tag.to_string().parse::<Tag>(), Ok(tag));
        }
        assert!("h".parse::<Tag>().is_err());
        assert!("A".parse::<Tag>().is_err());
    }
}
