use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedTitle {
    Revision { number: u32, text: Option<String> },
    Unparsed { raw: String },
}

fn revision_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^Revision ([0-9]+)(?::(.+))?").unwrap())
}

/// Parse `Revision <n>[: <text>]`, warning when the title does not follow it.
pub fn parse_title(title: &str) -> ParsedTitle {
    let parsed = revision_pattern().captures(title).and_then(|caps| {
        let number = caps[1].parse::<u32>().ok()?;
        let text = caps
            .get(2)
            .map(|m| m.as_str().trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Some(ParsedTitle::Revision { number, text })
    });

    parsed.unwrap_or_else(|| {
        warn!(
            "Unable to parse title \"{}\", check if generated thumbnail is ok",
            title
        );
        ParsedTitle::Unparsed {
            raw: title.to_string(),
        }
    })
}

/// The two lines drawn on a thumbnail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleCard {
    pub tag: String,
    pub caption: String,
}

impl TitleCard {
    pub fn from_title(title: &str, special_label: &str) -> Self {
        match parse_title(title) {
            ParsedTitle::Revision { number, text } => TitleCard {
                tag: format!("#{}", number),
                caption: text.unwrap_or_else(|| title.to_string()),
            },
            ParsedTitle::Unparsed { raw } => TitleCard {
                tag: special_label.to_string(),
                caption: raw,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logs_while(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn parses_number_and_text() {
        assert_eq!(
            parse_title("Revision 42: Foo"),
            ParsedTitle::Revision {
                number: 42,
                text: Some("Foo".to_string())
            }
        );
    }

    #[test]
    fn parses_number_only() {
        assert_eq!(
            parse_title("Revision 7"),
            ParsedTitle::Revision {
                number: 7,
                text: None
            }
        );
    }

    #[test]
    fn blank_trailing_text_counts_as_missing() {
        assert_eq!(
            parse_title("Revision 7:   "),
            ParsedTitle::Revision {
                number: 7,
                text: None
            }
        );
    }

    #[test]
    fn other_titles_are_unparsed() {
        assert_eq!(
            parse_title("Something else"),
            ParsedTitle::Unparsed {
                raw: "Something else".to_string()
            }
        );
    }

    #[test]
    fn unparsed_title_warns_the_operator() {
        let logs = logs_while(|| {
            parse_title("Something else");
        });
        assert!(logs.contains("WARN"));
        assert!(logs.contains("Unable to parse title \"Something else\""));
    }

    #[test]
    fn parsed_title_does_not_warn() {
        let logs = logs_while(|| {
            parse_title("Revision 42: Foo");
        });
        assert!(logs.is_empty());
    }

    #[test]
    fn oversized_number_is_unparsed() {
        assert!(matches!(
            parse_title("Revision 99999999999999999999"),
            ParsedTitle::Unparsed { .. }
        ));
    }

    #[test]
    fn card_for_revision_with_text() {
        let card = TitleCard::from_title("Revision 42: Foo", "#spezial");
        assert_eq!(card.tag, "#42");
        assert_eq!(card.caption, "Foo");
    }

    #[test]
    fn card_falls_back_to_raw_title() {
        let card = TitleCard::from_title("Revision 7", "#spezial");
        assert_eq!(card.tag, "#7");
        assert_eq!(card.caption, "Revision 7");

        let card = TitleCard::from_title("Sommerpause", "#spezial");
        assert_eq!(card.tag, "#spezial");
        assert_eq!(card.caption, "Sommerpause");
    }
}
