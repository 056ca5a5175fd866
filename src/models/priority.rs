use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Task priority as stored in the `tasks.priority` smallint column.
///
/// The three named buckets map to the codes `0`, `1` and `2`. Any other code
/// read back from the database is kept verbatim as [`Priority::Unknown`] and
/// rendered as its decimal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Unknown(i16),
}

impl Priority {
    /// Normalizes a client supplied priority string.
    ///
    /// Input is trimmed and lowercased. `low`, `normal`/`medium` and `high`
    /// select the named buckets; otherwise the text is parsed as a smallint
    /// code. Anything else, including numbers outside the smallint range,
    /// falls back to [`Priority::Low`].
    pub fn parse_lenient(input: &str) -> Self {
        let normalized = input.trim().to_lowercase();
        match normalized.as_str() {
            "low" => Priority::Low,
            "normal" | "medium" => Priority::Medium,
            "high" => Priority::High,
            other => other.parse::<i16>().map(Priority::from_code).unwrap_or_default(),
        }
    }

    pub fn from_code(code: i16) -> Self {
        match code {
            0 => Priority::Low,
            1 => Priority::Medium,
            2 => Priority::High,
            other => Priority::Unknown(other),
        }
    }

    pub fn code(self) -> i16 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
            Priority::Unknown(code) => code,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Unknown(code) => write!(f, "{}", code),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Priority::parse_lenient(&raw))
    }
}
