use rss::Channel;
use tracing::info;

use crate::error::{Error, Result};
use crate::http::Fetch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub url: String,
}

/// Fetch the feed at `url` and return the item at `index` (0 is the newest).
///
/// Only RSS 2.0 is understood; an Atom feed fails with [`Error::FeedParse`].
pub async fn fetch_item(fetch: &dyn Fetch, url: &str, index: usize) -> Result<FeedItem> {
    info!("Reading feed...");
    let res = fetch.get(url).await?;
    if !res.is_success() {
        return Err(Error::FeedStatus {
            url: url.to_string(),
            status: res.status,
        });
    }

    let channel = Channel::read_from(&res.body[..])?;
    let item = select_item(&channel, index)?;
    info!("Proceeding with feed item \"{}\"...", item.title);
    Ok(item)
}

pub fn select_item(channel: &Channel, index: usize) -> Result<FeedItem> {
    let items = channel.items();
    let item = items.get(index).ok_or(Error::EntryOutOfRange {
        index,
        len: items.len(),
    })?;

    let title = item
        .title()
        .ok_or(Error::MissingField { index, field: "title" })?;
    let url = item
        .enclosure()
        .map(|e| e.url())
        .filter(|u| !u.is_empty())
        .ok_or(Error::MissingField { index, field: "enclosure" })?;

    Ok(FeedItem {
        title: title.to_string(),
        url: url.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Fetched;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Working Draft</title>
    <link>https://workingdraft.de/</link>
    <description>Podcast</description>
    <item>
      <title>Revision 5: Launch</title>
      <enclosure url="http://x/audio.mp3" length="1" type="audio/mpeg"/>
    </item>
    <item>
      <title>Revision 4</title>
      <enclosure url="http://x/four.mp3" length="1" type="audio/mpeg"/>
    </item>
    <item>
      <title>No audio here</title>
    </item>
  </channel>
</rss>"#;

    fn channel() -> Channel {
        Channel::read_from(FEED.as_bytes()).unwrap()
    }

    #[test]
    fn selects_newest_by_default() {
        let item = select_item(&channel(), 0).unwrap();
        assert_eq!(
            item,
            FeedItem {
                title: "Revision 5: Launch".to_string(),
                url: "http://x/audio.mp3".to_string(),
            }
        );
    }

    #[test]
    fn selects_older_entry() {
        let item = select_item(&channel(), 1).unwrap();
        assert_eq!(item.title, "Revision 4");
        assert_eq!(item.url, "http://x/four.mp3");
    }

    #[test]
    fn out_of_range_reports_length() {
        let err = select_item(&channel(), 7).unwrap_err();
        assert!(matches!(err, Error::EntryOutOfRange { index: 7, len: 3 }));
    }

    struct Static(&'static str);

    #[async_trait::async_trait]
    impl Fetch for Static {
        async fn get(&self, _url: &str) -> Result<Fetched> {
            Ok(Fetched {
                status: 200,
                body: bytes::Bytes::from_static(self.0.as_bytes()),
            })
        }
    }

    #[tokio::test]
    async fn atom_feeds_are_rejected() {
        let atom = Static(
            r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Working Draft</title>
  <entry><title>Revision 5</title></entry>
</feed>"#,
        );
        let err = fetch_item(&atom, "http://feed.test/", 0).await.unwrap_err();
        assert!(matches!(err, Error::FeedParse(_)));
    }

    #[test]
    fn missing_enclosure_is_an_error() {
        let err = select_item(&channel(), 2).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                index: 2,
                field: "enclosure"
            }
        ));
    }
}
