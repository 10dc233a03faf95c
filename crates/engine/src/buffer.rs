//! Fixed-length digit buffer backing the entry widget.

use otp_entry_types::extract_digits;

/// Ordered slots, each empty or holding one ASCII decimal digit.
///
/// The length is fixed at construction; every write goes through
/// [`CodeBuffer::set`] or [`CodeBuffer::overwrite_from`], which both refuse
/// anything that is not a digit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBuffer {
    slots: Vec<Option<char>>,
}

impl CodeBuffer {
    pub fn new(length: usize) -> Self {
        Self { slots: vec![None; length] }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// True when every slot holds a digit.
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn get(&self, index: usize) -> Option<char> {
        self.slots.get(index).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<char>] {
        &self.slots
    }

    /// Writes `value` into slot `index`. Returns `false` without touching the
    /// buffer when the index is out of range or the value is not a digit.
    pub fn set(&mut self, index: usize, value: Option<char>) -> bool {
        if value.is_some_and(|c| !c.is_ascii_digit()) {
            return false;
        }
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Replaces the whole buffer with the digits found in `text`, starting at
    /// slot 0. Trailing slots are cleared. Returns how many digits landed.
    pub fn overwrite_from(&mut self, text: &str) -> usize {
        let mut digits = extract_digits(text);
        let mut written = 0;
        for slot in &mut self.slots {
            *slot = digits.next();
            if slot.is_some() {
                written += 1;
            }
        }
        written
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Concatenation of all filled slots in order.
    pub fn joined(&self) -> String {
        self.slots.iter().flatten().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty_with_fixed_length() {
        let buffer = CodeBuffer::new(6);
        assert_eq!(buffer.len(), 6);
        assert!(buffer.is_empty());
        assert!(!buffer.is_full());
        assert_eq!(buffer.joined(), "");
    }

    #[test]
    fn set_rejects_non_digits_and_bad_indices() {
        let mut buffer = CodeBuffer::new(3);
        assert!(!buffer.set(0, Some('x')));
        assert!(!buffer.set(3, Some('1')));
        assert!(buffer.is_empty());
        assert!(buffer.set(1, Some('7')));
        assert_eq!(buffer.get(1), Some('7'));
        assert!(buffer.set(1, None));
        assert_eq!(buffer.get(1), None);
    }

    #[test]
    fn overwrite_truncates_and_clears_trailing_slots() {
        let mut buffer = CodeBuffer::new(4);
        assert_eq!(buffer.overwrite_from("9 8 7 6 5"), 4);
        assert_eq!(buffer.joined(), "9876");

        assert_eq!(buffer.overwrite_from("1-2"), 2);
        assert_eq!(buffer.slots(), &[Some('1'), Some('2'), None, None]);
    }
}
