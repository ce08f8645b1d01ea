/// State management module
///
/// This module holds the data that drives the UI:
/// - acquisition mode, image list and scan status (session.rs)
///
/// Everything here is plain data with no widget or device types, so it can
/// be unit tested without an event loop.
pub mod session;
