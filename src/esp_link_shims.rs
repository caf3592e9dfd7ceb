//! ESP-IDF runtime symbol providers for third-party crates.
//!
//! `embassy-sync`'s `CriticalSectionRawMutex` needs a `critical-section`
//! implementation.  Both pipeline tasks are ordinary FreeRTOS tasks, so a
//! process-wide mutex held by the outermost acquire is enough.  Nesting is
//! tracked per thread.

#[cfg(target_os = "espidf")]
use core::cell::{Cell, RefCell};
#[cfg(target_os = "espidf")]
use std::sync::{Mutex, MutexGuard, PoisonError};

#[cfg(target_os = "espidf")]
static SECTION: Mutex<()> = Mutex::new(());

#[cfg(target_os = "espidf")]
thread_local! {
    static NESTING: Cell<u8> = const { Cell::new(0) };
    static HELD: RefCell<Option<MutexGuard<'static, ()>>> = const { RefCell::new(None) };
}

/// `critical-section` 1.x acquire hook.
#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_acquire() -> u8 {
    let depth = NESTING.get();
    if depth == 0 {
        let guard = SECTION.lock().unwrap_or_else(PoisonError::into_inner);
        HELD.with_borrow_mut(|held| *held = Some(guard));
    }
    let depth = depth.saturating_add(1);
    NESTING.set(depth);
    depth
}

/// `critical-section` 1.x release hook.  The token is ignored; nesting is
/// tracked in the thread-local counter.
#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_release(_token: u8) {
    let depth = NESTING.get();
    if depth == 0 {
        return;
    }
    NESTING.set(depth - 1);
    if depth == 1 {
        HELD.with_borrow_mut(|held| *held = None);
    }
}
