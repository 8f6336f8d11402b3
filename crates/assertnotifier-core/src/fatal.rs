//! Fatal halt for failed assertions.
//!
//! The panic message names the assertion's call site, not this file.

use crate::location::SourceLocation;

#[cold]
#[inline(never)]
pub fn assertion_failure(message: &str, location: SourceLocation) -> ! {
    if message.is_empty() {
        panic!("assertion failed at {location}");
    }
    panic!("assertion failed at {location}: {message}");
}
