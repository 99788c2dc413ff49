use routeguide_core::proto::RouteNote;

/// The notes the send half of a chat pushes out, in order.
///
/// The binary chats with an empty feed, closing its direction straight away
/// and only listening. [`NoteFeed::sample`] holds the classic six demo notes
/// for exercising outbound traffic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoteFeed {
    notes: Vec<RouteNote>,
}

impl NoteFeed {
    pub const fn empty() -> Self {
        Self { notes: Vec::new() }
    }

    /// Six notes spread over three locations, two per location.
    #[allow(dead_code, reason = "the binary only listens")]
    pub fn sample() -> Self {
        Self::from_notes(vec![
            RouteNote::new(0, 1, "First message"),
            RouteNote::new(0, 2, "Second message"),
            RouteNote::new(0, 3, "Third message"),
            RouteNote::new(0, 1, "Fourth message"),
            RouteNote::new(0, 2, "Fifth message"),
            RouteNote::new(0, 3, "Sixth message"),
        ])
    }

    pub const fn from_notes(notes: Vec<RouteNote>) -> Self {
        Self { notes }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl IntoIterator for NoteFeed {
    type Item = RouteNote;
    type IntoIter = std::vec::IntoIter<RouteNote>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.into_iter()
    }
}
