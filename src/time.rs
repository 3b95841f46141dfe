// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable times.
//!
//! [`pretty_time`] renders an elapsed number of seconds the way execution-time
//! reports print it; [`now`] renders the local wall-clock time.

use std::time::Duration;

/**
Formats a non-negative number of seconds as `<H> h <M> min <S.D> s`.

Hours are printed only when there is at least one whole hour, minutes only when at least
one whole minute remains after the hours, and the remaining seconds always, with one
decimal.

```rust
use prettylog::time::pretty_time;

assert_eq!(pretty_time(124.0), "2 min 4.0 s");
assert_eq!(pretty_time(3601.4), "1 h 1.4 s");
assert_eq!(pretty_time(0.3), "0.3 s");
```
*/
pub fn pretty_time(seconds: f64) -> String {
    let hours = seconds.div_euclid(3600.0);
    let rest = seconds - hours * 3600.0;
    let minutes = rest.div_euclid(60.0);
    let rest = rest - minutes * 60.0;

    let mut out = String::new();
    if hours > 0.0 {
        out.push_str(&format!("{hours:.0} h "));
    }
    if minutes > 0.0 {
        out.push_str(&format!("{minutes:.0} min "));
    }
    out.push_str(&format!("{rest:.1} s"));
    out
}

/// [pretty_time] for a [Duration].
pub fn pretty_duration(duration: Duration) -> String {
    pretty_time(duration.as_secs_f64())
}

/// The local time as `%Y-%m-%d %H:%M:%S`.
pub fn now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minutes_and_seconds() {
        assert_eq!(pretty_time(124.0), "2 min 4.0 s");
        assert_eq!(pretty_time(60.0), "1 min 0.0 s");
    }

    #[test]
    fn hours_without_minutes() {
        assert_eq!(pretty_time(3601.4), "1 h 1.4 s");
        assert_eq!(pretty_time(7322.0), "2 h 2 min 2.0 s");
    }

    #[test]
    fn seconds_only() {
        let formatted = pretty_time(59.95);
        assert!(formatted.ends_with(" s"));
        assert!(!formatted.contains("min"));
        assert!(!formatted.contains(" h "));
        let number = formatted.trim_end_matches(" s");
        assert_eq!(number.split('.').nth(1).map(str::len), Some(1));
        assert_eq!(pretty_time(0.0), "0.0 s");
    }

    #[test]
    fn durations() {
        assert_eq!(pretty_duration(Duration::from_millis(1_500)), "1.5 s");
        assert_eq!(pretty_duration(Duration::from_secs(3_660)), "1 h 1 min 0.0 s");
    }

    #[test]
    fn now_has_expected_shape() {
        let now = now();
        assert_eq!(now.len(), "2024-01-01 00:00:00".len());
        assert_eq!(&now[4..5], "-");
        assert_eq!(&now[10..11], " ");
    }
}
