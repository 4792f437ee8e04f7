use ulid::{Generator, Ulid};

/// Prefix used for generated segment ids unless configured otherwise.
pub const DEFAULT_ID_PREFIX: &str = "urn:segment:id:";

///
/// IdSource
///
/// Supplies ids for segments whose record carries none. Owned by the tree
/// root and handed down during population, so tests can inject a
/// deterministic source.
///

pub trait IdSource {
    fn next_id(&mut self) -> String;
}

///
/// CounterIds
///
/// `prefix` followed by 1, 2, 3, ...
///

#[derive(Clone, Debug)]
pub struct CounterIds {
    prefix: String,
    next: u64,
}

impl CounterIds {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl Default for CounterIds {
    fn default() -> Self {
        Self::new(DEFAULT_ID_PREFIX)
    }
}

impl IdSource for CounterIds {
    fn next_id(&mut self) -> String {
        let n = self.next;
        self.next = self.next.saturating_add(1);

        format!("{}{n}", self.prefix)
    }
}

///
/// UlidIds
///
/// `prefix` followed by a monotonic ULID.
///

pub struct UlidIds {
    prefix: String,
    generator: Generator,
}

impl UlidIds {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            generator: Generator::new(),
        }
    }
}

impl Default for UlidIds {
    fn default() -> Self {
        Self::new(DEFAULT_ID_PREFIX)
    }
}

impl IdSource for UlidIds {
    fn next_id(&mut self) -> String {
        // overflow within one millisecond; fall back to a fresh random ulid
        let ulid = self.generator.generate().unwrap_or_else(|_| Ulid::new());

        format!("{}{ulid}", self.prefix)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_deterministic() {
        let mut ids = CounterIds::new("seg-");

        assert_eq!(ids.next_id(), "seg-1");
        assert_eq!(ids.next_id(), "seg-2");
    }

    #[test]
    fn ulids_are_monotonic() {
        let mut ids = UlidIds::default();
        let a = ids.next_id();
        let b = ids.next_id();

        assert!(a.starts_with(DEFAULT_ID_PREFIX));
        assert!(a < b);
    }
}
