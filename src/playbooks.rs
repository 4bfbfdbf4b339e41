//! Playbook kinds, bullet parsing, and bulk import
//!
//! Playbooks are the seller's reusable lines, stored as newline-separated
//! bullets under one of four standardized kinds. Legacy kind labels from
//! older data are normalized leniently instead of rejected. Bulk import
//! splits pasted Markdown on headings so a whole document becomes several
//! playbooks in one paste.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The four standardized playbook kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybookKind {
    /// Call openers and hooks
    OpeningHooks,

    /// Open questions for needs discovery
    DiscoveryQuestions,

    /// Reframes for common objections
    ObjectionResponses,

    /// Commitment asks and scheduling lines
    ClosingNextSteps,
}

impl PlaybookKind {
    pub const ALL: [PlaybookKind; 4] = [
        PlaybookKind::OpeningHooks,
        PlaybookKind::DiscoveryQuestions,
        PlaybookKind::ObjectionResponses,
        PlaybookKind::ClosingNextSteps,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybookKind::OpeningHooks => "opening_hooks",
            PlaybookKind::DiscoveryQuestions => "discovery_questions",
            PlaybookKind::ObjectionResponses => "objection_responses",
            PlaybookKind::ClosingNextSteps => "closing_next_steps",
        }
    }

    /// Map a raw kind label onto a standardized kind.
    ///
    /// Accepts the four canonical labels plus legacy synonyms from older
    /// exports. Anything unrecognized lands on `OpeningHooks`.
    pub fn normalize(raw: &str) -> PlaybookKind {
        match raw.trim().to_lowercase().as_str() {
            "opening_hooks" => PlaybookKind::OpeningHooks,
            "discovery_questions" => PlaybookKind::DiscoveryQuestions,
            "objection_responses" => PlaybookKind::ObjectionResponses,
            "closing_next_steps" => PlaybookKind::ClosingNextSteps,
            "script" | "opening" => PlaybookKind::OpeningHooks,
            "framework" | "discovery" => PlaybookKind::DiscoveryQuestions,
            "objection_library" | "objection" => PlaybookKind::ObjectionResponses,
            "close" | "closing" => PlaybookKind::ClosingNextSteps,
            _ => PlaybookKind::OpeningHooks,
        }
    }
}

impl std::fmt::Display for PlaybookKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One stored playbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playbook {
    pub title: String,
    pub kind: PlaybookKind,
    pub content: String,
}

impl Playbook {
    pub fn new(title: impl Into<String>, kind: PlaybookKind, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind,
            content: content.into(),
        }
    }

    /// Build from raw stored fields, normalizing a legacy kind label
    pub fn from_raw(title: impl Into<String>, raw_kind: &str, content: impl Into<String>) -> Self {
        Self::new(title, PlaybookKind::normalize(raw_kind), content)
    }
}

/// Parse playbook content as newline-separated bullets (trim, drop empty)
pub fn parse_bullets(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// All of a user's bullets, grouped by kind. The coach reads from this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybookLibrary {
    pub opening_hooks: Vec<String>,
    pub discovery_questions: Vec<String>,
    pub objection_responses: Vec<String>,
    pub closing_next_steps: Vec<String>,
}

impl PlaybookLibrary {
    /// Group parsed bullets from a set of playbooks
    pub fn from_playbooks(playbooks: &[Playbook]) -> Self {
        let mut library = Self::default();
        for p in playbooks {
            library
                .bullets_for_mut(p.kind)
                .extend(parse_bullets(&p.content));
        }
        library
    }

    pub fn bullets_for(&self, kind: PlaybookKind) -> &[String] {
        match kind {
            PlaybookKind::OpeningHooks => &self.opening_hooks,
            PlaybookKind::DiscoveryQuestions => &self.discovery_questions,
            PlaybookKind::ObjectionResponses => &self.objection_responses,
            PlaybookKind::ClosingNextSteps => &self.closing_next_steps,
        }
    }

    fn bullets_for_mut(&mut self, kind: PlaybookKind) -> &mut Vec<String> {
        match kind {
            PlaybookKind::OpeningHooks => &mut self.opening_hooks,
            PlaybookKind::DiscoveryQuestions => &mut self.discovery_questions,
            PlaybookKind::ObjectionResponses => &mut self.objection_responses,
            PlaybookKind::ClosingNextSteps => &mut self.closing_next_steps,
        }
    }

    /// Iterate kinds in declaration order with their bullets
    pub fn iter(&self) -> impl Iterator<Item = (PlaybookKind, &[String])> {
        PlaybookKind::ALL
            .into_iter()
            .map(move |k| (k, self.bullets_for(k)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, bullets)| bullets.is_empty())
    }
}

/// A playbook candidate recovered from pasted text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPlaybook {
    pub title: String,
    pub content: String,
}

static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(#{1,6})\s*(.+)$").unwrap());

/// Split pasted text into playbook candidates by Markdown headings.
///
/// Each heading's text becomes a title and the lines until the next
/// heading become the content. Text without any headings becomes a
/// single playbook with the first line as its title (or a default when
/// that line is blank). Candidates whose title trims to nothing are
/// dropped along with their content.
pub fn parse_bulk_playbooks(text: &str) -> Vec<ParsedPlaybook> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let matches: Vec<(usize, usize, String)> = HEADING
        .captures_iter(trimmed)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let title = caps.get(2)?.as_str().trim().to_string();
            Some((whole.start(), whole.end(), title))
        })
        .collect();

    if matches.is_empty() {
        let mut lines = trimmed.split('\n');
        let first_line = lines.next().map(str::trim).unwrap_or("");
        let rest = lines.collect::<Vec<_>>().join("\n").trim().to_string();
        let title = if first_line.is_empty() {
            "Imported playbook".to_string()
        } else {
            first_line.to_string()
        };
        return vec![ParsedPlaybook {
            title,
            content: rest,
        }];
    }

    let mut result = Vec::with_capacity(matches.len());
    for (i, (_, end, title)) in matches.iter().enumerate() {
        let content_end = matches
            .get(i + 1)
            .map(|(start, _, _)| *start)
            .unwrap_or(trimmed.len());
        let content = trimmed[*end..content_end].trim().to_string();
        result.push(ParsedPlaybook {
            title: title.clone(),
            content,
        });
    }

    result.into_iter().filter(|p| !p.title.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_canonical_labels() {
        for kind in PlaybookKind::ALL {
            assert_eq!(PlaybookKind::normalize(kind.as_str()), kind);
        }
    }

    #[test]
    fn test_normalize_legacy_labels() {
        assert_eq!(
            PlaybookKind::normalize("script"),
            PlaybookKind::OpeningHooks
        );
        assert_eq!(
            PlaybookKind::normalize(" Framework "),
            PlaybookKind::DiscoveryQuestions
        );
        assert_eq!(
            PlaybookKind::normalize("OBJECTION_LIBRARY"),
            PlaybookKind::ObjectionResponses
        );
        assert_eq!(
            PlaybookKind::normalize("closing"),
            PlaybookKind::ClosingNextSteps
        );
    }

    #[test]
    fn test_normalize_unknown_defaults_to_opening() {
        assert_eq!(
            PlaybookKind::normalize("mystery"),
            PlaybookKind::OpeningHooks
        );
        assert_eq!(PlaybookKind::normalize(""), PlaybookKind::OpeningHooks);
    }

    #[test]
    fn test_parse_bullets_drops_blank_lines() {
        let bullets = parse_bullets("  First hook  \n\n Second hook\n   \nThird");
        assert_eq!(bullets, vec!["First hook", "Second hook", "Third"]);
    }

    #[test]
    fn test_library_groups_by_normalized_kind() {
        let playbooks = vec![
            Playbook::from_raw("Openers", "script", "Hook A\nHook B"),
            Playbook::from_raw("Questions", "discovery_questions", "Q1"),
            Playbook::from_raw("More openers", "opening", "Hook C"),
        ];
        let library = PlaybookLibrary::from_playbooks(&playbooks);
        assert_eq!(library.opening_hooks, vec!["Hook A", "Hook B", "Hook C"]);
        assert_eq!(library.discovery_questions, vec!["Q1"]);
        assert!(library.objection_responses.is_empty());
    }

    #[test]
    fn test_bulk_import_splits_on_headings() {
        let text = "# Cold opens\nHook one\nHook two\n\n## Objections\nReframe one";
        let parsed = parse_bulk_playbooks(text);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].title, "Cold opens");
        assert_eq!(parsed[0].content, "Hook one\nHook two");
        assert_eq!(parsed[1].title, "Objections");
        assert_eq!(parsed[1].content, "Reframe one");
    }

    #[test]
    fn test_bulk_import_without_headings_uses_first_line() {
        let parsed = parse_bulk_playbooks("My lines\nLine one\nLine two");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "My lines");
        assert_eq!(parsed[0].content, "Line one\nLine two");
    }

    #[test]
    fn test_bulk_import_empty_input() {
        assert!(parse_bulk_playbooks("").is_empty());
        assert!(parse_bulk_playbooks("   \n ").is_empty());
    }

    #[test]
    fn test_bulk_import_heading_only_document() {
        let parsed = parse_bulk_playbooks("# Title only");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "Title only");
        assert_eq!(parsed[0].content, "");
    }
}
