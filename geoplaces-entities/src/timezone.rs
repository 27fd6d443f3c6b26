use std::{fmt, str::FromStr};

/// IANA timezone identifier, e.g. `America/New_York`.
#[derive(Default, Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TimezoneId(String);

impl TimezoneId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for TimezoneId {
    fn from(from: String) -> Self {
        Self(from)
    }
}

impl From<&str> for TimezoneId {
    fn from(from: &str) -> Self {
        from.to_owned().into()
    }
}

impl From<TimezoneId> for String {
    fn from(from: TimezoneId) -> Self {
        from.0
    }
}

impl FromStr for TimezoneId {
    type Err = ();
    fn from_str(s: &str) -> Result<TimezoneId, Self::Err> {
        Ok(s.into())
    }
}

impl fmt::Display for TimezoneId {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.write_str(self.as_str())
    }
}
