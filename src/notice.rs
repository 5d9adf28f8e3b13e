//! User-visible notices.
//!
//! Every failure the running session survives ends up here, tagged with the page
//! region it belongs to, rather than propagating out of an event handler.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// Page region a notice is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeRegion {
    Main,
    Sidebar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub region: NoticeRegion,
    pub text: String,
}

/// Notices raised during the current interaction.
#[derive(Debug, Clone, Default)]
pub struct Notices {
    items: Vec<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: NoticeLevel, region: NoticeRegion, text: impl Into<String>) {
        self.items.push(Notice {
            level,
            region,
            text: text.into(),
        });
    }

    pub fn success(&mut self, region: NoticeRegion, text: impl Into<String>) {
        self.push(NoticeLevel::Success, region, text);
    }

    pub fn info(&mut self, region: NoticeRegion, text: impl Into<String>) {
        self.push(NoticeLevel::Info, region, text);
    }

    pub fn warning(&mut self, region: NoticeRegion, text: impl Into<String>) {
        self.push(NoticeLevel::Warning, region, text);
    }

    pub fn error(&mut self, region: NoticeRegion, text: impl Into<String>) {
        self.push(NoticeLevel::Error, region, text);
    }

    pub fn items(&self) -> &[Notice] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|n| n.level == NoticeLevel::Error)
    }

    /// Forget notices from the previous interaction.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_clear() {
        let mut notices = Notices::new();
        assert!(notices.is_empty());

        notices.success(NoticeRegion::Sidebar, "saved");
        notices.error(NoticeRegion::Main, "Error: boom");

        assert_eq!(notices.items().len(), 2);
        assert!(notices.has_errors());
        assert_eq!(notices.items()[0].level, NoticeLevel::Success);
        assert_eq!(notices.items()[1].region, NoticeRegion::Main);

        notices.clear();
        assert!(notices.is_empty());
        assert!(!notices.has_errors());
    }

    #[test]
    fn test_notice_serialization() {
        let mut notices = Notices::new();
        notices.warning(NoticeRegion::Sidebar, "No file was uploaded.");

        let json = serde_json::to_value(&notices.items()[0]).unwrap();
        assert_eq!(json["level"], "warning");
        assert_eq!(json["region"], "sidebar");
        assert_eq!(json["text"], "No file was uploaded.");
    }
}
