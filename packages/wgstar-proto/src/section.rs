use crate::{ProtoError, ProtoResult};
use strum::{AsRefStr, Display, EnumString};

const SECTION_START: char = '[';
const SETTING_SEPARATOR: char = '=';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString)]
pub enum SectionKind {
    #[strum(serialize = "[Interface]")]
    Interface,
    #[strum(serialize = "[Peer]")]
    Peer,
}

impl SectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            SectionKind::Interface => "Interface",
            SectionKind::Peer => "Peer",
        }
    }
}

/// One bracketed block of a document: its header line followed by its
/// non-blank setting lines, newline-joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    body: String,
}

impl Section {
    fn new(header: &str) -> Self {
        Self {
            body: header.to_string(),
        }
    }

    fn push_line(&mut self, line: &str) {
        self.body.push('\n');
        self.body.push_str(line);
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn header(&self) -> &str {
        self.body.lines().next().unwrap_or_default()
    }

    pub fn kind(&self) -> Option<SectionKind> {
        let header = self.header();
        [SectionKind::Interface, SectionKind::Peer]
            .into_iter()
            .find(|k| {
                let tag: &str = k.as_ref();
                header.starts_with(tag)
            })
    }

    /// `(setting, value)` pairs split on the first `=`, both trimmed. The
    /// header and lines without a separator are skipped.
    pub fn settings(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.body
            .lines()
            .skip(1)
            .filter_map(|line| line.split_once(SETTING_SEPARATOR))
            .map(|(setting, value)| (setting.trim(), value.trim()))
    }
}

impl From<&str> for Section {
    fn from(body: &str) -> Self {
        Self {
            body: body.to_string(),
        }
    }
}

pub fn split_sections(document: &str) -> ProtoResult<Vec<Section>> {
    let mut sections: Vec<Section> = Vec::new();

    for line in document.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with(SECTION_START) {
            sections.push(Section::new(line));
            continue;
        }

        match sections.last_mut() {
            Some(section) => section.push_line(line),
            None => return Err(ProtoError::MalformedDocument),
        }
    }

    Ok(sections)
}
