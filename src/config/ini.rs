//! Ordered sectioned key=value documents (the `basic.ini` / `global.ini` format)
//!
//! Sections and keys keep insertion order; nothing is ever sorted. Parsing is
//! lenient (BOM, CRLF, comments), rendering is canonical: UTF-8, `\n` line
//! endings, one blank line between sections.

use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IniSection {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl IniSection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the value in place, or append the key if it is new
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IniDocument {
    pub sections: Vec<IniSection>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Get a section, appending an empty one at the end if missing
    pub fn section_mut(&mut self, name: &str) -> &mut IniSection {
        let index = match self.sections.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(IniSection::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section).and_then(|s| s.get(key))
    }

    pub fn set(&mut self, section: &str, key: impl Into<String>, value: impl ToString) {
        self.section_mut(section).set(key, value);
    }

    /// Render with empty sections left out
    pub fn render(&self) -> String {
        let mut out = String::new();
        for section in self.sections.iter().filter(|s| !s.is_empty()) {
            if !out.is_empty() {
                out.push('\n');
            }
            let _ = writeln!(out, "[{}]", section.name);
            for (key, value) in &section.entries {
                let _ = writeln!(out, "{key}={value}");
            }
        }
        out
    }

    /// Parse leniently; keys before the first section header are dropped
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut doc = IniDocument::new();
        let mut current: Option<usize> = None;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim();
                current = Some(match doc.sections.iter().position(|s| s.name == name) {
                    Some(index) => index,
                    None => {
                        doc.sections.push(IniSection::new(name));
                        doc.sections.len() - 1
                    }
                });
                continue;
            }
            if let (Some(index), Some((key, value))) = (current, line.split_once('=')) {
                doc.sections[index].set(key.trim(), value.trim());
            }
        }
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_insertion_order() {
        let mut doc = IniDocument::new();
        doc.set("Video", "BaseCX", 1920);
        doc.set("Video", "BaseCY", 1080);
        doc.set("General", "Name", "Streaming");
        doc.set("Video", "FPSCommon", 60);

        assert_eq!(
            doc.render(),
            "[Video]\nBaseCX=1920\nBaseCY=1080\nFPSCommon=60\n\n[General]\nName=Streaming\n"
        );
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut doc = IniDocument::new();
        doc.set("Basic", "Profile", "Old");
        doc.set("Basic", "SceneCollection", "Scenes");
        doc.set("Basic", "Profile", "New");

        let basic = doc.section("Basic").unwrap();
        assert_eq!(basic.entries[0], ("Profile".to_string(), "New".to_string()));
        assert_eq!(basic.entries.len(), 2);
    }

    #[test]
    fn test_empty_sections_are_not_rendered() {
        let mut doc = IniDocument::new();
        doc.section_mut("Hotkeys");
        doc.set("General", "Name", "x");
        assert_eq!(doc.render(), "[General]\nName=x\n");
    }

    #[test]
    fn test_parse_lenient_input() {
        let text = "\u{feff}; comment\r\n[General]\r\nName = Streaming \r\n# other\r\n\r\n[Video]\r\nBaseCX=1920\r\nstray line\r\n";
        let doc = IniDocument::parse(text);
        assert_eq!(doc.get("General", "Name"), Some("Streaming"));
        assert_eq!(doc.get("Video", "BaseCX"), Some("1920"));
        assert_eq!(doc.sections.len(), 2);
    }

    #[test]
    fn test_parse_merges_repeated_sections() {
        let doc = IniDocument::parse("[A]\nx=1\n[B]\ny=2\n[A]\nz=3\n");
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.get("A", "z"), Some("3"));
    }

    #[test]
    fn test_value_may_contain_equals() {
        let doc = IniDocument::parse("[Stream]\nServer=rtmp://host/app?x=1\n");
        assert_eq!(doc.get("Stream", "Server"), Some("rtmp://host/app?x=1"));
    }

    #[test]
    fn test_render_parse_preserves_document() {
        let mut doc = IniDocument::new();
        doc.set("General", "Name", "Streaming");
        doc.set("Output", "Mode", "Advanced");
        assert_eq!(IniDocument::parse(&doc.render()), doc);
    }
}
