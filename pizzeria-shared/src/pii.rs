use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Wrapper for customer data that must not leak into log output.
///
/// `Debug` and `Display` keep only the first character, which is enough to
/// correlate log lines without exposing the value. Serialization is left
/// untouched because API responses need the real value.
#[derive(Clone, Deserialize)]
pub struct Masked<T>(pub T);

impl<T: fmt::Display> Masked<T> {
    fn masked(&self) -> String {
        let raw = self.0.to_string();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => format!("{}{}", first, "*".repeat(chars.count().max(3))),
            None => String::new(),
        }
    }
}

impl<T: fmt::Display> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl<T: fmt::Display> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

impl<T: Serialize> Serialize for Masked<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}
