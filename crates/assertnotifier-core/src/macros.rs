/// Asserts through a specific [`AssertionNotifier`](crate::AssertionNotifier).
///
/// ```ignore
/// assert_notify_on!(notifier, slots.len() < 8);
/// assert_notify_on!(notifier, slots.len() < 8, "too many slots");
/// assert_notify_on!(notifier, slots.len() < 8, "too many slots", Duration::from_secs(10));
/// ```
///
/// The condition is evaluated lazily, once, and only in debug builds.
#[macro_export]
macro_rules! assert_notify_on {
    ($notifier:expr, $cond:expr $(,)?) => {
        $crate::assert_notify_on!($notifier, $cond, "")
    };
    ($notifier:expr, $cond:expr, $msg:expr $(,)?) => {
        $crate::assert_notify_on!($notifier, $cond, $msg, $crate::DEFAULT_DELAY)
    };
    ($notifier:expr, $cond:expr, $msg:expr, $delay:expr $(,)?) => {
        $notifier.assert(
            || $cond,
            ::core::convert::AsRef::<str>::as_ref(&$msg),
            $delay,
            $crate::SourceLocation::new(::core::file!(), ::core::line!()),
            ::core::option::Option::None,
        )
    };
}

/// Asserts through the process-wide [`AssertionNotifier::shared`](crate::AssertionNotifier::shared).
///
/// Same forms as [`assert_notify_on!`] without the notifier argument.
#[macro_export]
macro_rules! assert_notify {
    ($cond:expr $(,)?) => {
        $crate::assert_notify_on!($crate::AssertionNotifier::shared(), $cond)
    };
    ($cond:expr, $msg:expr $(,)?) => {
        $crate::assert_notify_on!($crate::AssertionNotifier::shared(), $cond, $msg)
    };
    ($cond:expr, $msg:expr, $delay:expr $(,)?) => {
        $crate::assert_notify_on!($crate::AssertionNotifier::shared(), $cond, $msg, $delay)
    };
}
