use std::ops::Range;
use std::time::Duration;

use rand::Rng;

/// Sleeps for a random duration drawn from `range`, if pacing is enabled.
pub(crate) async fn pause(range: Option<&Range<Duration>>) {
    if let Some(delay) = pick_delay(range) {
        tokio::time::sleep(delay).await;
    }
}

fn pick_delay(range: Option<&Range<Duration>>) -> Option<Duration> {
    let range = range?;
    if range.start >= range.end {
        return Some(range.start);
    }
    Some(rand::thread_rng().gen_range(range.clone()))
}

#[cfg(test)]
mod tests {
    use super::pick_delay;
    use std::time::Duration;

    #[test]
    fn delay_stays_within_range() {
        let range = Duration::from_millis(100)..Duration::from_millis(300);
        for _ in 0..100 {
            let delay = pick_delay(Some(&range)).unwrap();
            assert!(range.contains(&delay));
        }
    }

    #[test]
    fn disabled_or_degenerate_ranges() {
        assert_eq!(pick_delay(None), None);
        let fixed = Duration::from_secs(1)..Duration::from_secs(1);
        assert_eq!(pick_delay(Some(&fixed)), Some(Duration::from_secs(1)));
    }
}
