use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::error::AllocError;

/// Moves `value` into a new heap allocation, handing the value back instead of aborting when the
/// allocator returns null.
pub(crate) fn try_box<T>(value: T) -> Result<Box<T>, (T, AllocError)> {
    let layout = Layout::new::<T>();
    if layout.size() == 0 {
        return Ok(Box::new(value));
    }

    if injected_failure() {
        return Err((value, AllocError::new(layout)));
    }

    // SAFETY: `layout` has a non-zero size.
    let ptr = unsafe { alloc::alloc(layout) }.cast::<T>();
    match NonNull::new(ptr) {
        Some(ptr) => {
            // SAFETY: `ptr` is non-null, freshly allocated with the layout of `T` by the global
            // allocator and therefore aligned and valid for writes. `Box::from_raw` takes ownership
            // of memory allocated exactly this way.
            unsafe {
                ptr.as_ptr().write(value);
                Ok(Box::from_raw(ptr.as_ptr()))
            }
        }
        None => Err((value, AllocError::new(layout))),
    }
}

#[cfg(not(test))]
#[inline(always)]
fn injected_failure() -> bool {
    false
}

#[cfg(test)]
fn injected_failure() -> bool {
    failpoint::should_fail()
}

/// Lets tests make an upcoming `try_box` call fail as if the allocator were out of memory.
#[cfg(test)]
pub(crate) mod failpoint {
    use std::cell::Cell;

    thread_local! {
        static REMAINING: Cell<Option<usize>> = Cell::new(None);
    }

    /// The next `successes` allocations succeed and the one after fails. Every allocation after
    /// that succeeds again.
    pub(crate) fn fail_after(successes: usize) {
        REMAINING.with(|r| r.set(Some(successes)));
    }

    pub(crate) fn reset() {
        REMAINING.with(|r| r.set(None));
    }

    pub(super) fn should_fail() -> bool {
        REMAINING.with(|r| match r.get() {
            None => false,
            Some(0) => {
                r.set(None);
                true
            }
            Some(n) => {
                r.set(Some(n - 1));
                false
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxes_value() {
        let boxed = try_box(String::from("node")).ok().unwrap();
        assert_eq!(*boxed, "node");
    }

    #[test]
    fn zero_sized() {
        assert!(try_box(()).is_ok());
    }

    #[test]
    fn failpoint_hands_value_back() {
        failpoint::fail_after(1);
        assert!(try_box(1u32).is_ok());

        let (value, err) = try_box(2u32).err().unwrap();
        assert_eq!(value, 2);
        assert_eq!(err.layout(), Layout::new::<u32>());

        // Only one failure is injected.
        assert!(try_box(3u32).is_ok());
        failpoint::reset();
    }
}
