//! Password length filtering
//!
//! Routes generated passwords to length partitions for the batch mode.

/// Inclusive range of accepted password lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRange {
    min: usize,
    max: usize,
}

impl LengthRange {
    pub fn new(min: usize, max: usize) -> anyhow::Result<Self> {
        if min > max {
            anyhow::bail!(
                "Invalid length range: minimum ({}) must be <= maximum ({})",
                min,
                max
            );
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> usize {
        self.min
    }

    pub fn max(&self) -> usize {
        self.max
    }

    #[inline]
    pub fn contains(&self, length: usize) -> bool {
        length >= self.min && length <= self.max
    }

    /// Length partition for `password`, if its length is in range
    #[inline]
    pub fn route(&self, password: &str) -> Option<usize> {
        let length = password_length(password);
        self.contains(length).then_some(length)
    }
}

/// Length of a password not counting whitespace.
///
/// Spaced passwords (`"H W"`) count the same as their unspaced form.
#[inline]
pub fn password_length(password: &str) -> usize {
    if password.is_ascii() {
        password.bytes().filter(|b| !b.is_ascii_whitespace()).count()
    } else {
        password.chars().filter(|c| !c.is_whitespace()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_length() {
        assert_eq!(password_length("HW"), 2);
        assert_eq!(password_length("H W"), 2);
        assert_eq!(password_length("a\tb\nc"), 3);
        assert_eq!(password_length(""), 0);
        assert_eq!(password_length("hëllo"), 5);
    }

    #[test]
    fn test_route() {
        let range = LengthRange::new(4, 6).unwrap();

        assert_eq!(range.route("pass"), Some(4));
        assert_eq!(range.route("p a s s w o"), Some(6));
        assert_eq!(range.route("abc"), None);
        assert_eq!(range.route("abcdefg"), None);
        assert_eq!(range.route(""), None);
    }

    #[test]
    fn test_single_length() {
        let range = LengthRange::new(8, 8).unwrap();
        assert!(range.contains(8));
        assert!(!range.contains(7));
        assert!(!range.contains(9));
    }

    #[test]
    fn test_invalid_range() {
        assert!(LengthRange::new(10, 8).is_err());
    }
}
