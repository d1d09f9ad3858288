//! Build-family entry-point strategy.
//!
//! Exactly one target binary family is selected per build via Cargo
//! features; there is no runtime branching. Building without a family (or
//! with more than one) fails at compile time.

/// The host's intended entry point, function-pointer sized. Overwritten at
/// most once, only in the post-load phase.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EntryPointSlot(pub usize);

#[cfg(not(any(feature = "gta-ny", feature = "payne", feature = "amd64")))]
compile_error!("no target binary family selected; enable one of: gta-ny, payne, amd64");

#[cfg(any(
    all(feature = "gta-ny", feature = "payne"),
    all(feature = "gta-ny", feature = "amd64"),
    all(feature = "payne", feature = "amd64"),
))]
compile_error!(
    "more than one target binary family selected; build with --no-default-features and exactly one of: gta-ny, payne, amd64"
);

/// Where execution resumes in the legacy binary after the load-time phases.
#[cfg(feature = "gta-ny")]
const LEGACY_ENTRY_POINT: usize = 0xD0D011;

#[cfg(all(feature = "gta-ny", not(any(feature = "payne", feature = "amd64"))))]
pub(crate) fn redirect(slot: &mut EntryPointSlot) {
    slot.0 = LEGACY_ENTRY_POINT;
}

// Don't modify the entry point.
#[cfg(all(feature = "payne", not(any(feature = "gta-ny", feature = "amd64"))))]
pub(crate) fn redirect(_slot: &mut EntryPointSlot) {}

// 64-bit titles keep the entry point the loader resolved.
#[cfg(all(feature = "amd64", not(any(feature = "gta-ny", feature = "payne"))))]
pub(crate) fn redirect(_slot: &mut EntryPointSlot) {}
