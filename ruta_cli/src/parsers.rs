use jiff::{SignedDuration, Span, SpanRelativeTo};

/// Accepts `30s`, `PT1M30S`, `1h 30m` or a bare number of seconds.
pub fn parse_duration(input: &str) -> Result<SignedDuration, String> {
    let duration = input
        .parse::<SignedDuration>()
        .ok()
        .or_else(|| {
            input
                .parse::<Span>()
                .and_then(|span| span.to_duration(SpanRelativeTo::days_are_24_hours()))
                .ok()
        })
        .or_else(|| input.parse::<i64>().ok().map(SignedDuration::from_secs))
        .ok_or_else(|| format!("invalid duration: {input}"))?;

    if duration.is_negative() {
        return Err(format!("duration must not be negative: {input}"));
    }

    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30s"), Ok(SignedDuration::from_secs(30)));
        assert_eq!(parse_duration("PT2M"), Ok(SignedDuration::from_secs(120)));
        assert_eq!(parse_duration("45"), Ok(SignedDuration::from_secs(45)));
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("-5").is_err());
    }
}
