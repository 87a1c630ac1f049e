//! Free text and `format`-specific strings.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use uuid::Uuid;

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in", "reprehenderit",
    "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur", "excepteur", "sint",
    "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui", "officia", "deserunt",
    "mollit", "anim", "id", "est", "laborum",
];

/// Earliest generated timestamp: 2000-01-01T00:00:00Z.
const EPOCH_START: i64 = 946_684_800;

/// Span of generated timestamps, roughly thirty years.
const EPOCH_SPAN_SECS: i64 = 30 * 365 * 24 * 60 * 60;

/// One random word.
pub fn word<R: Rng>(rng: &mut R) -> &'static str {
    WORDS[rng.gen_range(0..WORDS.len())]
}

/// Space-separated words, `1..=max_words` of them.
pub fn words<R: Rng>(rng: &mut R, max_words: usize) -> String {
    let count = rng.gen_range(1..=max_words.max(1));
    (0..count).map(|_| word(rng)).collect::<Vec<_>>().join(" ")
}

/// Free text whose length in characters lies in `min..=max`.
///
/// `max` of `None` means no upper bound beyond what a few words produce.
pub fn text<R: Rng>(rng: &mut R, min: usize, max: Option<usize>) -> String {
    let mut s = words(rng, 6);
    while s.chars().count() < min {
        s.push(' ');
        s.push_str(word(rng));
    }
    if let Some(max) = max {
        if s.chars().count() > max {
            s = s.chars().take(max).collect();
        }
        // A trailing space is still a character, but reads badly in fixtures.
        while s.len() > min && s.ends_with(' ') {
            s.pop();
        }
    }
    s
}

/// A string satisfying a JSON Schema `format`, or `None` for formats this
/// module does not know.
pub fn formatted<R: Rng>(rng: &mut R, format: &str) -> Option<String> {
    match format {
        "date-time" => Some(date_time(rng).to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
        "date" => Some(date(rng).format("%Y-%m-%d").to_string()),
        "uri" | "uri-reference" | "url" => Some(format!(
            "https://www.gov.uk/{}/{}",
            word(rng),
            word(rng)
        )),
        "email" => Some(format!("{}.{}@example.com", word(rng), word(rng))),
        "hostname" => Some(format!("{}.example.com", word(rng))),
        "uuid" => Some(uuid(rng).to_string()),
        _ => None,
    }
}

/// A random UTC instant between 2000 and 2030, whole seconds.
pub fn date_time<R: Rng>(rng: &mut R) -> DateTime<Utc> {
    let offset = rng.gen_range(0..EPOCH_SPAN_SECS);
    DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(EPOCH_START + offset)
}

/// A random calendar date between 2000 and 2030.
pub fn date<R: Rng>(rng: &mut R) -> NaiveDate {
    date_time(rng).date_naive()
}

/// A version 4 UUID drawn from `rng`, so seeded generators stay
/// reproducible.
pub fn uuid<R: Rng>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn text_respects_length_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for (min, max) in [(0, 5), (10, 12), (40, 60), (1, 1)] {
            for _ in 0..20 {
                let s = text(&mut rng, min, Some(max));
                let len = s.chars().count();
                assert!(len >= min && len <= max, "{s:?} not in {min}..={max}");
            }
        }
    }

    #[test]
    fn text_without_max_reaches_min() {
        let mut rng = StdRng::seed_from_u64(4);
        assert!(text(&mut rng, 200, None).chars().count() >= 200);
    }

    #[test]
    fn date_time_is_rfc3339_utc() {
        let mut rng = StdRng::seed_from_u64(5);
        let s = formatted(&mut rng, "date-time").unwrap();
        assert!(s.ends_with('Z'), "{s}");
        assert!(DateTime::parse_from_rfc3339(&s).is_ok());
    }

    #[test]
    fn date_format() {
        let mut rng = StdRng::seed_from_u64(6);
        let s = formatted(&mut rng, "date").unwrap();
        assert!(NaiveDate::parse_from_str(&s, "%Y-%m-%d").is_ok());
    }

    #[test]
    fn seeded_uuid_is_reproducible() {
        let a = uuid(&mut StdRng::seed_from_u64(9));
        let b = uuid(&mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
        assert_eq!(a.get_version_num(), 4);
    }

    #[test]
    fn unknown_format_is_none() {
        assert!(formatted(&mut StdRng::seed_from_u64(0), "ipv6").is_none());
    }
}
