//! Command tags.

/// Hands out `A0000`, `A0001`, ... for one connection.
///
/// The counter wraps at `u32::MAX`.
#[derive(Debug, Clone, Default)]
pub struct TagGenerator {
    issued: u32,
}

impl TagGenerator {
    /// Starts again from `A0000`.
    #[must_use]
    pub const fn new() -> Self {
        Self { issued: 0 }
    }

    /// Returns a fresh tag.
    pub fn next_tag(&mut self) -> String {
        let tag = format!("A{:04}", self.issued);
        self.issued = self.issued.wrapping_add(1);
        tag
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    #[test]
    fn tags_count_up_with_padding() {
        let mut tags = TagGenerator::new();
        let first: Vec<String> = (0..3).map(|_| tags.next_tag()).collect();
        assert_eq!(first, ["A0000", "A0001", "A0002"]);

        for _ in 3..12_345 {
            tags.next_tag();
        }
        assert_eq!(tags.next_tag(), "A12345");
    }

    #[test]
    fn counter_wraps() {
        let mut tags = TagGenerator { issued: u32::MAX };
        assert_eq!(tags.next_tag(), "A4294967295");
        assert_eq!(tags.next_tag(), "A0000");
    }
}
