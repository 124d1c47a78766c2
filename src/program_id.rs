use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT: AtomicU32 = AtomicU32::new(1);

/// Identifies the program that owns a node or symbol.
///
/// Nodes of two different programs must never be mixed. The default id is invalid and
/// matches everything in the `_if_valid` checks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId {
    value: u32,
}

impl ProgramId {
    pub const INVALID: ProgramId = ProgramId { value: 0 };

    /// Mints a new, unique, valid id.
    pub fn new() -> Self {
        Self::next_from(&NEXT)
    }

    /// Takes the next id from `counter`, which never wraps back to the invalid id.
    #[track_caller]
    fn next_from(counter: &AtomicU32) -> Self {
        match counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| v.checked_add(1)) {
            Ok(value) => Self { value },
            Err(_) => crate::ice!("ran out of ProgramIds"),
        }
    }

    pub fn value(self) -> u32 {
        self.value
    }

    pub fn is_valid(self) -> bool {
        self.value != 0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "program {}", self.value)
        } else {
            write!(f, "<invalid program>")
        }
    }
}

/// Anything owned by a program.
pub trait ProgramIdOf {
    fn program_id(&self) -> ProgramId;
}

impl ProgramIdOf for ProgramId {
    fn program_id(&self) -> ProgramId {
        *self
    }
}

impl<T: ProgramIdOf + ?Sized> ProgramIdOf for &T {
    fn program_id(&self) -> ProgramId {
        (**self).program_id()
    }
}

/// Raises an internal compiler error unless `a` and `b` have the same id.
/// With `if_valid`, an invalid id on either side passes.
#[track_caller]
pub fn assert_program_ids_equal(a: ProgramId, b: ProgramId, if_valid: bool) {
    if a == b || (if_valid && (!a.is_valid() || !b.is_valid())) {
        return;
    }
    crate::ice!("ProgramId mismatch: {a} and {b}");
}

/// [`assert_program_ids_equal`] for two owned things.
#[track_caller]
pub fn assert_same_program(a: impl ProgramIdOf, b: impl ProgramIdOf) {
    assert_program_ids_equal(a.program_id(), b.program_id(), false);
}

/// [`assert_program_ids_equal`] for two owned things, ignoring invalid ids.
#[track_caller]
pub fn assert_same_program_if_valid(a: impl ProgramIdOf, b: impl ProgramIdOf) {
    assert_program_ids_equal(a.program_id(), b.program_id(), true);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_valid_and_unique() {
        let a = ProgramId::new();
        let b = ProgramId::new();
        assert!(a.is_valid());
        assert_ne!(a, b);
        assert!(!ProgramId::default().is_valid());
    }

    #[test]
    fn ids_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..64).map(|_| ProgramId::new()).collect::<Vec<_>>()))
            .collect();
        let mut ids: Vec<_> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 256);
    }

    #[test]
    fn exhausted_counter_stays_exhausted() {
        let counter = AtomicU32::new(u32::MAX - 1);
        assert_eq!(ProgramId::next_from(&counter).value(), u32::MAX - 1);
        for _ in 0..2 {
            let result = std::panic::catch_unwind(|| ProgramId::next_from(&counter));
            assert!(result.is_err());
        }
        assert_eq!(counter.load(Ordering::Relaxed), u32::MAX);
    }

    #[test]
    fn invalid_passes_if_valid() {
        let a = ProgramId::new();
        assert_same_program_if_valid(a, ProgramId::INVALID);
        assert_same_program_if_valid(ProgramId::INVALID, a);
        assert_same_program(a, a);
    }

    #[test]
    #[should_panic(expected = "ProgramId mismatch")]
    fn invalid_fails_strict() {
        assert_same_program(ProgramId::new(), ProgramId::INVALID);
    }

    #[test]
    #[should_panic(expected = "ProgramId mismatch")]
    fn mismatch_is_fatal() {
        assert_same_program_if_valid(ProgramId::new(), ProgramId::new());
    }
}
