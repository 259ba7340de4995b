//! Calendar math for the booking page's time windows.

/// Resolve the calendar month a window ordinal represents.
///
/// Window 1 is the current month, window 2 the next, window 3 the one
/// after, wrapping past December into the following year.
pub fn resolve_window_month(year: i32, month: u32, ordinal: u32) -> (i32, u32) {
    let zero_based = (month - 1) + (ordinal - 1);
    (year + (zero_based / 12) as i32, zero_based % 12 + 1)
}
