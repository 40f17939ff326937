use crate::ast::{Biblio, Work};

use super::Format;

/// A type wrapper around [`String`] to represent a RIS format string.
#[derive(Debug, PartialEq, Eq)]
pub struct Ris(String);

impl Format for Ris {
    fn compose(biblio: &Biblio) -> Self {
        let entries = biblio.works().map(Self::compose_entry).collect::<Vec<_>>();
        Self(entries.join("\n"))
    }

    fn compose_entry(work: &Work) -> String {
        let mut lines = vec![tag_line("TY", work.kind.ris_code())];
        lines.extend(work.authors.iter().map(|author| tag_line("AU", author)));
        lines.push(tag_line("TI", &work.title));

        for (tag, value) in [("JO", &work.journal), ("PY", &work.year), ("DO", &work.doi)] {
            if !value.is_empty() {
                lines.push(tag_line(tag, value));
            }
        }

        lines.push(tag_line("ID", work.put_code.as_str()));
        // the trailing newline leaves a blank line once entries are joined
        lines.push("ER  -\n".to_owned());
        lines.join("\n")
    }

    fn raw(self) -> String {
        self.0
    }

    fn name() -> &'static str {
        "RIS"
    }

    fn ext() -> &'static str {
        "ris"
    }
}

fn tag_line(tag: &str, value: &str) -> String {
    format!("{tag}  - {value}")
}
