/// An item as the feed provider describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    pub guid: String,
    pub title: Option<String>,
    pub link: Option<String>,
}

/// A post that can be announced: numeric id plus what goes in the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub link: String,
}

impl From<feed_rs::model::Entry> for RawEntry {
    fn from(entry: feed_rs::model::Entry) -> Self {
        RawEntry {
            guid: entry.id,
            title: entry.title.map(|t| t.content),
            // entry.links may be an empty Vec
            link: entry.links.into_iter().next().map(|l| l.href),
        }
    }
}
