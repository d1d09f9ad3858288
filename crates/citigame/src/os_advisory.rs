//! End-of-support advisory for old Windows versions.

use log::*;

/// Whether the host OS meets the minimum supported version (Windows 8,
/// kernel 6.2).
#[cfg(windows)]
pub(crate) fn is_supported_os() -> bool {
    use windows::Win32::System::SystemInformation::{GetVersionExW, OSVERSIONINFOW};

    let mut info = OSVERSIONINFOW {
        dwOSVersionInfoSize: size_of::<OSVERSIONINFOW>() as u32,
        ..Default::default()
    };

    // SAFETY: info is a properly sized OSVERSIONINFOW.
    if unsafe { GetVersionExW(&mut info) }.is_err() {
        // If the version can't be determined, don't nag.
        return true;
    }

    info.dwMajorVersion > 6 || (info.dwMajorVersion == 6 && info.dwMinorVersion >= 2)
}

#[cfg(not(windows))]
pub(crate) fn is_supported_os() -> bool {
    true
}

/// Shows the blocking, dismiss-only out-of-support advisory. Always returns
/// control to the caller and never affects the continuation flag.
pub(crate) fn warn_os_version() {
    warn!("host OS is older than Windows 8, warning the user");

    shared::message_box(
        "Your Windows 7 PC is out of support\n\n\
         As of January 14, 2020, support for Windows 7 has come to an end. Your PC is more \
         vulnerable to viruses and malware due to:\n\n\
         - No security updates\n\
         - No software updates\n\
         - No tech support\n\n\
         Please upgrade to Windows 8.1 or higher as soon as possible. The game will continue \
         to start now.",
    );
}
