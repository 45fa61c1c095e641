//! # Site Controller
//!
//! File: cli/src/site/controller.rs
//!
//! ## Overview
//!
//! `SiteController` owns the view state of one page: sidebar, focus mode,
//! chatbot window, code modal and the highlighted table-of-contents entry.
//! State only changes through the transition methods below; a renderer reads
//! the state and the derived labels and applies them to the document.
//!
//! Which transitions are live depends on the page:
//! - guide pages (`.content.panel`): sidebar, TOC, anchors, code modal, copy buttons
//! - tracker pages (`.table-container`): focus mode, chatbot window
//!
//! Transitions for a feature the page lacks leave the state unchanged.
//!
//! ## Examples
//!
//! ```ignore
//! let features = PageFeatures::detect(&html);
//! let mut controller = SiteController::new(features, cfg.ui);
//! controller.toggle_sidebar();
//! assert_eq!(controller.sidebar_label(), SIDEBAR_CLOSE_LABEL);
//! controller.outside_click(600, false); // closes on mobile widths
//! ```
//!
use super::code_block::{
    copyable_text, COPIED_LABEL, COPY_FAILED_MESSAGE, COPY_FEEDBACK, COPY_LABEL,
};
use crate::core::config::UiConfig;
use chrono::Datelike;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, warn};

pub const SIDEBAR_OPEN_LABEL: &str = "☰ Menu";
pub const SIDEBAR_CLOSE_LABEL: &str = "✕ Close";
pub const FOCUS_ENTER_LABEL: &str = "🎯 Focus Mode";
pub const FOCUS_EXIT_LABEL: &str = "🏠 Exit Focus";
/// Delay before scrolling to the URL fragment after page load.
pub const HASH_SCROLL_DELAY: Duration = Duration::from_millis(300);

const GUIDE_SELECTOR: &str = ".content.panel";
const TRACKER_SELECTOR: &str = ".table-container";

/// Feature sets present on a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageFeatures {
    pub guide: bool,
    pub tracker: bool,
}

impl PageFeatures {
    pub const GUIDE: Self = Self {
        guide: true,
        tracker: false,
    };
    pub const TRACKER: Self = Self {
        guide: false,
        tracker: true,
    };

    /// Detects page features from the marker elements of an HTML document.
    ///
    /// A page is a guide when some element carries both `content` and
    /// `panel` classes, and a tracker when some element has `table-container`.
    /// A page may be both.
    pub fn detect(html: &str) -> Self {
        let document = Html::parse_document(html);
        Self {
            guide: has_element(&document, GUIDE_SELECTOR),
            tracker: has_element(&document, TRACKER_SELECTOR),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.guide && !self.tracker
    }
}

fn has_element(document: &Html, css: &str) -> bool {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).next().is_some(),
        Err(e) => {
            warn!("Selector parse error for '{}': {}", css, e);
            false
        }
    }
}

/// Result of the last copy-button press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyFeedback {
    /// The block's button shows the copied label until the feedback expires.
    Copied { block_id: String },
    /// The clipboard write failed.
    Failed,
}

/// Vertical extent of a TOC target section, relative to the viewport top.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionBounds {
    pub id: String,
    pub top: f64,
    pub bottom: f64,
}

/// Everything a renderer needs to draw the page chrome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub sidebar_open: bool,
    pub focus_mode: bool,
    pub chatbot_open: bool,
    /// Text shown in the code modal; `None` when the modal is hidden.
    pub modal: Option<String>,
    /// Id of the section whose TOC link is highlighted.
    pub active_section: Option<String>,
    pub copy_feedback: Option<CopyFeedback>,
}

#[derive(Debug, Clone)]
pub struct SiteController {
    features: PageFeatures,
    ui: UiConfig,
    state: ViewState,
}

impl SiteController {
    pub fn new(features: PageFeatures, ui: UiConfig) -> Self {
        debug!(?features, "Creating site controller");
        Self {
            features,
            ui,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn features(&self) -> PageFeatures {
        self.features
    }

    pub fn is_mobile(&self, viewport_width: u32) -> bool {
        viewport_width <= self.ui.mobile_breakpoint
    }

    // --- Sidebar ---

    pub fn toggle_sidebar(&mut self) -> bool {
        if self.features.guide {
            self.state.sidebar_open = !self.state.sidebar_open;
        }
        self.state.sidebar_open
    }

    pub fn sidebar_label(&self) -> &'static str {
        if self.state.sidebar_open {
            SIDEBAR_CLOSE_LABEL
        } else {
            SIDEBAR_OPEN_LABEL
        }
    }

    /// A click anywhere on the document. `inside` is true when it landed on
    /// the sidebar or its toggle button.
    pub fn outside_click(&mut self, viewport_width: u32, inside: bool) {
        if !inside && self.state.sidebar_open && self.is_mobile(viewport_width) {
            self.state.sidebar_open = false;
        }
    }

    /// Following a TOC link closes the sidebar on mobile widths.
    pub fn toc_link_clicked(&mut self, viewport_width: u32) {
        if self.features.guide && self.is_mobile(viewport_width) {
            self.state.sidebar_open = false;
        }
    }

    // --- Tracker chrome ---

    pub fn toggle_focus_mode(&mut self) -> bool {
        if self.features.tracker {
            self.state.focus_mode = !self.state.focus_mode;
        }
        self.state.focus_mode
    }

    pub fn focus_mode_label(&self) -> &'static str {
        if self.state.focus_mode {
            FOCUS_EXIT_LABEL
        } else {
            FOCUS_ENTER_LABEL
        }
    }

    pub fn toggle_chatbot(&mut self) -> bool {
        if self.features.tracker {
            self.state.chatbot_open = !self.state.chatbot_open;
        }
        self.state.chatbot_open
    }

    // --- Code modal ---

    /// Shows a code block in the modal. Returns false on pages without it.
    pub fn open_modal(&mut self, rendered_block: &str) -> bool {
        if !self.features.guide {
            return false;
        }
        self.state.modal = Some(copyable_text(rendered_block));
        true
    }

    pub fn close_modal(&mut self) {
        self.state.modal = None;
    }

    /// Clicks on the backdrop close the modal; clicks on its content do not.
    pub fn modal_backdrop_click(&mut self, on_backdrop: bool) {
        if on_backdrop {
            self.close_modal();
        }
    }

    // --- Copy buttons ---

    /// Text to put on the clipboard for a code block, or `None` on pages
    /// without copy buttons.
    pub fn copy_code(&self, rendered_block: &str) -> Option<String> {
        self.features.guide.then(|| copyable_text(rendered_block))
    }

    /// Records the outcome of the clipboard write started by `copy_code`.
    ///
    /// On success returns how long to wait before calling
    /// `copy_feedback_expired` to restore the button.
    pub fn copy_finished(&mut self, block_id: &str, succeeded: bool) -> Option<Duration> {
        if !self.features.guide {
            return None;
        }
        if succeeded {
            self.state.copy_feedback = Some(CopyFeedback::Copied {
                block_id: block_id.to_string(),
            });
            Some(COPY_FEEDBACK)
        } else {
            warn!(block_id, "Clipboard write failed");
            self.state.copy_feedback = Some(CopyFeedback::Failed);
            None
        }
    }

    /// Restores `block_id`'s button. Feedback for another block is kept.
    pub fn copy_feedback_expired(&mut self, block_id: &str) {
        if matches!(&self.state.copy_feedback, Some(CopyFeedback::Copied { block_id: id }) if id == block_id)
        {
            self.state.copy_feedback = None;
        }
    }

    pub fn copy_button_label(&self, block_id: &str) -> &'static str {
        match &self.state.copy_feedback {
            Some(CopyFeedback::Copied { block_id: id }) if id == block_id => COPIED_LABEL,
            _ => COPY_LABEL,
        }
    }

    /// Alert text to show after a failed copy.
    pub fn copy_error(&self) -> Option<&'static str> {
        matches!(self.state.copy_feedback, Some(CopyFeedback::Failed)).then_some(COPY_FAILED_MESSAGE)
    }

    pub fn dismiss_copy_error(&mut self) {
        if self.copy_error().is_some() {
            self.state.copy_feedback = None;
        }
    }

    // --- Table of contents ---

    /// Recomputes the highlighted TOC entry after a scroll.
    ///
    /// The active section is the last one spanning the TOC offset line.
    pub fn highlight_toc(&mut self, sections: &[SectionBounds]) -> Option<&str> {
        if !self.features.guide {
            return None;
        }
        let offset = self.ui.toc_offset;
        self.state.active_section = sections
            .iter()
            .filter(|s| s.top <= offset && s.bottom > offset)
            .last()
            .map(|s| s.id.clone());
        self.state.active_section.as_deref()
    }

    /// Fragment id an in-page link scrolls to; `#` and empty hrefs do nothing.
    pub fn anchor_target(href: &str) -> Option<&str> {
        href.strip_prefix('#').filter(|id| !id.is_empty())
    }

    /// Scroll scheduled on page load for the URL fragment (`location.hash`).
    ///
    /// Returns the target id and the delay to wait before scrolling.
    pub fn initial_hash_target<'a>(&self, hash: &'a str) -> Option<(&'a str, Duration)> {
        if !self.features.guide {
            return None;
        }
        Self::anchor_target(hash).map(|id| (id, HASH_SCROLL_DELAY))
    }
}

/// Year printed in page footers.
pub fn footer_year(today: impl Datelike) -> i32 {
    today.year()
}

/// Footer year for the local date.
pub fn current_year() -> i32 {
    footer_year(chrono::Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn guide() -> SiteController {
        SiteController::new(PageFeatures::GUIDE, UiConfig::default())
    }

    fn tracker() -> SiteController {
        SiteController::new(PageFeatures::TRACKER, UiConfig::default())
    }

    fn section(id: &str, top: f64, bottom: f64) -> SectionBounds {
        SectionBounds {
            id: id.to_string(),
            top,
            bottom,
        }
    }

    #[test]
    fn test_detect_page_features() {
        let guide_html = r#"<main class="content panel"><h1>Guide</h1></main>"#;
        assert_eq!(PageFeatures::detect(guide_html), PageFeatures::GUIDE);

        let tracker_html = r#"<div class='table-container wide'><table></table></div>"#;
        assert_eq!(PageFeatures::detect(tracker_html), PageFeatures::TRACKER);

        let both = format!("{guide_html}{tracker_html}");
        let features = PageFeatures::detect(&both);
        assert!(features.guide && features.tracker);

        assert!(PageFeatures::detect("<p class=\"content\">x</p>").is_empty());
        assert!(PageFeatures::detect("<p>content panel</p>").is_empty());
    }

    #[test]
    fn test_detect_page_features_follows_html_parsing() {
        let spaced = r#"<main class = "content  panel"><h1>Guide</h1></main>"#;
        assert_eq!(PageFeatures::detect(spaced), PageFeatures::GUIDE);

        let unquoted = "<section class=panel><div class=content>x</div></section>";
        assert!(PageFeatures::detect(unquoted).is_empty());

        let data_attr = r#"<div data-class="table-container">x</div>"#;
        assert!(PageFeatures::detect(data_attr).is_empty());

        let in_script = r#"<script>const row = '<div class="table-container">';</script>"#;
        assert!(PageFeatures::detect(in_script).is_empty());

        let in_comment = r#"<!-- <main class="content panel"> -->"#;
        assert!(PageFeatures::detect(in_comment).is_empty());
    }

    #[test]
    fn test_sidebar_toggle_and_label() {
        let mut c = guide();
        assert_eq!(c.sidebar_label(), SIDEBAR_OPEN_LABEL);
        assert!(c.toggle_sidebar());
        assert_eq!(c.sidebar_label(), SIDEBAR_CLOSE_LABEL);
        assert!(!c.toggle_sidebar());
        assert_eq!(c.sidebar_label(), SIDEBAR_OPEN_LABEL);
    }

    #[test]
    fn test_outside_click_closes_only_on_mobile() {
        let mut c = guide();
        c.toggle_sidebar();

        c.outside_click(1200, false);
        assert!(c.state().sidebar_open);

        c.outside_click(968, true);
        assert!(c.state().sidebar_open);

        c.outside_click(968, false);
        assert!(!c.state().sidebar_open);
    }

    #[test]
    fn test_toc_link_closes_sidebar_on_mobile() {
        let mut c = guide();
        c.toggle_sidebar();
        c.toc_link_clicked(1400);
        assert!(c.state().sidebar_open);
        c.toc_link_clicked(375);
        assert!(!c.state().sidebar_open);
    }

    #[test]
    fn test_custom_breakpoint() {
        let ui = UiConfig {
            mobile_breakpoint: 600,
            ..UiConfig::default()
        };
        let c = SiteController::new(PageFeatures::GUIDE, ui);
        assert!(c.is_mobile(600));
        assert!(!c.is_mobile(601));
    }

    #[test]
    fn test_focus_mode_and_chatbot_are_tracker_only() {
        let mut c = tracker();
        assert!(c.toggle_focus_mode());
        assert_eq!(c.focus_mode_label(), FOCUS_EXIT_LABEL);
        assert!(c.toggle_chatbot());
        assert!(!c.toggle_chatbot());

        let mut g = guide();
        assert!(!g.toggle_focus_mode());
        assert_eq!(g.focus_mode_label(), FOCUS_ENTER_LABEL);
        assert!(!g.toggle_chatbot());
        assert_eq!(g.state(), &ViewState::default());
    }

    #[test]
    fn test_guide_transitions_are_noops_on_tracker() {
        let mut c = tracker();
        assert!(!c.toggle_sidebar());
        assert!(!c.open_modal("code\nCopy"));
        assert_eq!(c.highlight_toc(&[section("intro", 0.0, 500.0)]), None);
        assert_eq!(c.state().modal, None);
    }

    #[test]
    fn test_modal_lifecycle() {
        let mut c = guide();
        assert!(c.open_modal("fn main() {}\nCopy"));
        assert_eq!(c.state().modal.as_deref(), Some("fn main() {}"));

        c.modal_backdrop_click(false);
        assert!(c.state().modal.is_some());

        c.modal_backdrop_click(true);
        assert_eq!(c.state().modal, None);

        c.open_modal("x");
        c.close_modal();
        assert_eq!(c.state().modal, None);
    }

    #[test]
    fn test_highlight_toc_picks_last_spanning_section() {
        let mut c = guide();
        let sections = [
            section("intro", -400.0, 50.0),
            section("basics", 20.0, 600.0),
            section("nested", 80.0, 300.0),
            section("later", 700.0, 1200.0),
        ];
        assert_eq!(c.highlight_toc(&sections), Some("nested"));
        assert_eq!(c.state().active_section.as_deref(), Some("nested"));
    }

    #[test]
    fn test_highlight_toc_boundaries() {
        let mut c = guide();
        // Top exactly at the offset counts, bottom exactly at the offset does not.
        assert_eq!(c.highlight_toc(&[section("a", 100.0, 400.0)]), Some("a"));
        assert_eq!(c.highlight_toc(&[section("b", 0.0, 100.0)]), None);
        assert_eq!(c.state().active_section, None);
    }

    #[test]
    fn test_anchor_target() {
        assert_eq!(SiteController::anchor_target("#oop"), Some("oop"));
        assert_eq!(SiteController::anchor_target("#"), None);
        assert_eq!(SiteController::anchor_target(""), None);
        assert_eq!(SiteController::anchor_target("page.html#x"), None);
    }

    #[test]
    fn test_copy_feedback_lifecycle() {
        let mut c = guide();
        assert_eq!(
            c.copy_code("System.out.println(1);\nCopy").as_deref(),
            Some("System.out.println(1);")
        );
        assert_eq!(c.copy_button_label("code-1"), COPY_LABEL);

        let restore_after = c.copy_finished("code-1", true);
        assert_eq!(restore_after, Some(Duration::from_millis(1500)));
        assert_eq!(c.copy_button_label("code-1"), COPIED_LABEL);
        assert_eq!(c.copy_button_label("code-2"), COPY_LABEL);
        assert_eq!(c.copy_error(), None);

        // A stale timer for another block leaves the feedback alone.
        c.copy_feedback_expired("code-2");
        assert_eq!(c.copy_button_label("code-1"), COPIED_LABEL);

        c.copy_feedback_expired("code-1");
        assert_eq!(c.copy_button_label("code-1"), COPY_LABEL);
        assert_eq!(c.state().copy_feedback, None);
    }

    #[test]
    fn test_copy_failure_message() {
        let mut c = guide();
        assert_eq!(c.copy_finished("code-1", false), None);
        assert_eq!(c.copy_error(), Some(COPY_FAILED_MESSAGE));
        assert_eq!(c.copy_button_label("code-1"), COPY_LABEL);

        c.dismiss_copy_error();
        assert_eq!(c.copy_error(), None);
    }

    #[test]
    fn test_copy_is_guide_only() {
        let mut c = tracker();
        assert_eq!(c.copy_code("x\nCopy"), None);
        assert_eq!(c.copy_finished("code-1", true), None);
        assert_eq!(c.state().copy_feedback, None);
    }

    #[test]
    fn test_initial_hash_target() {
        let c = guide();
        assert_eq!(
            c.initial_hash_target("#collections"),
            Some(("collections", HASH_SCROLL_DELAY))
        );
        assert_eq!(HASH_SCROLL_DELAY, Duration::from_millis(300));
        assert_eq!(c.initial_hash_target(""), None);
        assert_eq!(c.initial_hash_target("#"), None);
        assert_eq!(tracker().initial_hash_target("#collections"), None);
    }

    #[test]
    fn test_footer_year() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(footer_year(date), 2025);
        assert!(current_year() >= 2025);
    }
}
