use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a bus line, like "15" or "20". Opaque; nothing parses it.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(String);

impl LineId {
    pub fn new<I: Into<String>>(id: I) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LineId {
    fn from(x: &str) -> Self {
        Self(x.to_string())
    }
}

impl From<String> for LineId {
    fn from(x: String) -> Self {
        Self(x)
    }
}
