//! Repetition bookkeeping for the hypothetical line under search.
//!
//! The board collaborator keeps the played game's hash history; this stack
//! holds the hashes of positions visited only inside the current search
//! branch. Pushes and pops must bracket each child descent exactly, and the
//! concatenation of both histories is the universe for threefold detection.

#[derive(Default, Debug)]
pub struct PathHistory {
    stack: Vec<u64>,
}

impl PathHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: u64) {
        self.stack.push(key);
    }

    /// An unpaired pop is a programming defect, not a runtime condition.
    pub fn pop(&mut self) -> u64 {
        debug_assert!(
            !self.stack.is_empty(),
            "path history pop without a matching push"
        );
        self.stack.pop().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.stack
    }
}

/// Occurrences of `key` across the real game history and the current
/// search path.
pub fn occurrences(real: &[u64], path: &[u64], key: u64) -> usize {
    real.iter().filter(|&&h| h == key).count() + path.iter().filter(|&&h| h == key).count()
}

/// Rules-level draw: the position stands on the board for the third time.
pub fn is_threefold(real: &[u64], path: &[u64], key: u64) -> bool {
    occurrences(real, path, key) >= 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_is_lifo() {
        let mut path = PathHistory::new();
        path.push(1);
        path.push(2);
        assert_eq!(path.len(), 2);
        assert_eq!(path.pop(), 2);
        assert_eq!(path.pop(), 1);
        assert!(path.is_empty());
    }

    #[test]
    fn occurrences_span_both_histories() {
        let real = [10u64, 20, 10];
        let path = [10u64, 30];
        assert_eq!(occurrences(&real, &path, 10), 3);
        assert_eq!(occurrences(&real, &path, 20), 1);
        assert_eq!(occurrences(&real, &path, 99), 0);
    }

    #[test]
    fn threefold_needs_three_total() {
        let real = [5u64, 5];
        assert!(!is_threefold(&real, &[], 5));
        assert!(is_threefold(&real, &[5], 5));
        assert!(is_threefold(&[5, 5, 5, 5], &[], 5));
    }
}
