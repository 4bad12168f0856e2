use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::announcement::Announcement;
use crate::services::timestamp::parse_utc;
use crate::store::Document;

/// The visibility bounds of one announcement, borrowed from either a typed
/// record or a raw stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveWindow<'a> {
    pub start_date: Option<&'a str>,
    /// `None` when the stored value is missing or not a string.
    pub expiration_date: Option<&'a str>,
}

impl<'a> ActiveWindow<'a> {
    pub fn of(announcement: &'a Announcement) -> Self {
        Self {
            start_date: announcement.start_date.as_deref().filter(|s| !s.is_empty()),
            expiration_date: Some(announcement.expiration_date.as_str()),
        }
    }

    /// Null and empty start dates count as "no start date". A start date of
    /// any other non-string type is kept so that it fails to parse.
    pub fn of_document(document: &'a Document) -> Self {
        let start_date = match document.get("start_date") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.as_str()),
            Some(_) => Some(""),
        };
        Self {
            start_date,
            expiration_date: document.get("expiration_date").and_then(Value::as_str),
        }
    }

    /// Visible iff `start <= now <= expiration`. Anything unparseable makes
    /// the announcement invisible rather than failing.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        let Some(expiration) = self.expiration_date.and_then(|s| parse_utc(s).ok()) else {
            return false;
        };
        if expiration < now {
            return false;
        }
        match self.start_date {
            None => true,
            Some(start) => parse_utc(start).is_ok_and(|start| start <= now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-02T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn iso(dt: DateTime<Utc>) -> String {
        dt.to_rfc3339()
    }

    fn window<'a>(start: Option<&'a str>, expiration: &'a str) -> ActiveWindow<'a> {
        ActiveWindow {
            start_date: start,
            expiration_date: Some(expiration),
        }
    }

    #[test]
    fn test_future_expiration_without_start_is_active() {
        let exp = iso(now() + Duration::hours(1));
        assert!(window(None, &exp).is_active(now()));
    }

    #[test]
    fn test_past_expiration_is_inactive() {
        let exp = iso(now() - Duration::minutes(1));
        assert!(!window(None, &exp).is_active(now()));
    }

    #[test]
    fn test_expiration_boundary() {
        // The expiration instant itself is still inside the window.
        let exp = iso(now());
        assert!(window(None, &exp).is_active(now() - Duration::seconds(1)));
        assert!(window(None, &exp).is_active(now()));
        assert!(!window(None, &exp).is_active(now() + Duration::seconds(1)));
    }

    #[test]
    fn test_start_date_bounds() {
        let exp = iso(now() + Duration::days(1));
        let started = iso(now() - Duration::hours(1));
        let at_now = iso(now());
        let pending = iso(now() + Duration::hours(1));
        assert!(window(Some(&started), &exp).is_active(now()));
        assert!(window(Some(&at_now), &exp).is_active(now()));
        assert!(!window(Some(&pending), &exp).is_active(now()));
    }

    #[test]
    fn test_start_after_expiration_never_active() {
        let start = iso(now() + Duration::hours(2));
        let exp = iso(now() + Duration::hours(1));
        for offset in [0, 1, 2, 3] {
            assert!(!window(Some(&start), &exp).is_active(now() + Duration::hours(offset)));
        }
    }

    #[test]
    fn test_offsets_compare_as_instants() {
        // 10:30+02:00 is 08:30Z, already past.
        assert!(!window(None, "2026-03-02T10:30:00+02:00").is_active(now()));
        // 09:30+00:20 is 09:10Z, still ahead.
        assert!(window(None, "2026-03-02T09:30+00:20").is_active(now()));
    }

    #[test]
    fn test_malformed_dates_are_inactive() {
        let exp = iso(now() + Duration::hours(1));
        assert!(!window(None, "soon").is_active(now()));
        assert!(!window(Some("yesterday"), &exp).is_active(now()));
        assert!(!ActiveWindow {
            start_date: None,
            expiration_date: None
        }
        .is_active(now()));
    }

    #[test]
    fn test_of_announcement() {
        let announcement = Announcement {
            id: "a1".into(),
            message: "Spirit week".into(),
            start_date: Some(String::new()),
            expiration_date: iso(now() + Duration::hours(2)),
            created_by: "t1".into(),
            created_at: iso(now()),
        };
        let window = ActiveWindow::of(&announcement);
        assert_eq!(window.start_date, None);
        assert!(window.is_active(now()));
        assert!(!window.is_active(now() + Duration::hours(3)));
    }

    #[test]
    fn test_of_document_reads_stored_shapes() {
        let exp = iso(now() + Duration::hours(1));
        let doc = json!({ "_id": "a", "start_date": null, "expiration_date": exp })
            .as_object()
            .cloned()
            .unwrap();
        assert!(ActiveWindow::of_document(&doc).is_active(now()));

        let empty_start = json!({ "start_date": "", "expiration_date": exp })
            .as_object()
            .cloned()
            .unwrap();
        assert!(ActiveWindow::of_document(&empty_start).is_active(now()));

        let numeric_exp = json!({ "expiration_date": 1_900_000_000 })
            .as_object()
            .cloned()
            .unwrap();
        assert!(!ActiveWindow::of_document(&numeric_exp).is_active(now()));

        let numeric_start = json!({ "start_date": 5, "expiration_date": exp })
            .as_object()
            .cloned()
            .unwrap();
        assert!(!ActiveWindow::of_document(&numeric_start).is_active(now()));
    }
}
