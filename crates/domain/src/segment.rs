use serde::Serialize;

/// One upstream query window, seconds since epoch, inclusive-exclusive.
///
/// `from = to = None` denotes "most recent records, no time bound".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl Segment {
    /// Unbounded "latest records" query.
    pub const LATEST: Segment = Segment {
        from: None,
        to: None,
    };

    pub fn bounded(from: i64, to: i64) -> Self {
        debug_assert!(from <= to, "bounded segment must satisfy from <= to");
        Segment {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Span in seconds, `None` for unbounded segments.
    pub fn span_secs(&self) -> Option<i64> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => Some(to - from),
            _ => None,
        }
    }

    /// Split a bounded segment at its midpoint. Returns `None` for unbounded
    /// or degenerate segments that cannot be split further.
    pub fn bisect(&self) -> Option<(Segment, Segment)> {
        let (from, to) = (self.from?, self.to?);
        if to - from < 2 {
            return None;
        }
        let mid = from + (to - from) / 2;
        Some((Segment::bounded(from, mid), Segment::bounded(mid, to)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bisect_halves_cover_the_whole_span() {
        let seg = Segment::bounded(1_000, 8_200);
        let (a, b) = seg.bisect().unwrap();
        assert_eq!(a.from, Some(1_000));
        assert_eq!(a.to, b.from);
        assert_eq!(b.to, Some(8_200));
        assert_eq!(
            a.span_secs().unwrap() + b.span_secs().unwrap(),
            seg.span_secs().unwrap()
        );
    }

    #[test]
    fn bisect_refuses_unbounded_and_degenerate() {
        assert!(Segment::LATEST.bisect().is_none());
        assert!(Segment::bounded(5, 5).bisect().is_none());
        assert!(Segment::bounded(5, 6).bisect().is_none());
    }
}
