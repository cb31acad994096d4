/// Runs `$block` and logs how long it took at debug level.
#[macro_export]
macro_rules! timer_debug {
    ($msg:literal,$block:expr) => {{
        let now = jiff::Timestamp::now();
        let result = $block;
        let elapsed = jiff::Timestamp::now().duration_since(now);

        tracing::debug!("{}: Took {:?}", $msg, elapsed);

        result
    }};
}

/// Whole minutes in `duration`, rounded up. Negative durations count as zero.
pub fn ceil_minutes(duration: jiff::SignedDuration) -> i64 {
    if duration <= jiff::SignedDuration::ZERO {
        return 0;
    }

    let seconds = duration.as_secs() + i64::from(duration.subsec_nanos() > 0);
    (seconds + 59) / 60
}

/// `timestamp` moved by `minutes`, saturating at the bounds of the representable range.
pub fn add_minutes(timestamp: jiff::Timestamp, minutes: i64) -> jiff::Timestamp {
    let duration = jiff::SignedDuration::from_secs(minutes.saturating_mul(60));

    match timestamp.checked_add(duration) {
        Ok(moved) => moved,
        Err(_) if minutes < 0 => jiff::Timestamp::MIN,
        Err(_) => jiff::Timestamp::MAX,
    }
}
