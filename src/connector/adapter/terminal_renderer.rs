use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use crossterm::style::Stylize;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use regex::Regex;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};
use tracing::debug;

use crate::application::MessageRenderer;
use crate::domain::{ChatMessage, Role};

const RESET: &str = "\x1b[0m";
const BULLET: &str = "• ";
const RULE: &str = "────────";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    fn syntect_name(self) -> &'static str {
        match self {
            Theme::Dark => "base16-ocean.dark",
            Theme::Light => "InspiredGitHub",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }
}

fn bold_pattern() -> &'static Regex {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    BOLD.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"))
}

fn italic_pattern() -> &'static Regex {
    static ITALIC: OnceLock<Regex> = OnceLock::new();
    ITALIC.get_or_init(|| Regex::new(r"\*(.*?)\*").expect("valid italic pattern"))
}

/// Terminal presentation of chat messages.
///
/// Replies containing a code fence are parsed as markdown, with fenced
/// blocks highlighted by syntect. Replies without one only get the
/// `**bold**` / `*italic*` treatment.
pub struct TerminalRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    light: AtomicBool,
    color: bool,
}

impl TerminalRenderer {
    pub fn new(theme: Theme, color: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            light: AtomicBool::new(theme == Theme::Light),
            color,
        }
    }

    pub fn theme(&self) -> Theme {
        if self.light.load(Ordering::Relaxed) {
            Theme::Light
        } else {
            Theme::Dark
        }
    }

    /// Switch between dark and light, returning the new theme.
    pub fn toggle_theme(&self) -> Theme {
        let previous = if self.light.fetch_xor(true, Ordering::Relaxed) {
            Theme::Light
        } else {
            Theme::Dark
        };
        let theme = previous.toggled();
        debug!("Theme switched to {}", theme.as_str());
        theme
    }

    pub fn format_message(&self, message: &ChatMessage) -> String {
        match message.role() {
            Role::User => self.format_user(message.text()),
            Role::Bot if message.has_code_block() => self.format_markdown(message.text()),
            Role::Bot => self.style_prose(message.text()).trim_end().to_string(),
        }
    }

    pub fn format_user(&self, text: &str) -> String {
        let line = format!("{}: {}", Role::User, text);
        if self.color {
            line.dim().to_string()
        } else {
            line
        }
    }

    pub fn format_reply(&self, text: &str) -> String {
        self.format_message(&ChatMessage::bot(text))
    }

    pub fn format_error(&self, message: &str) -> String {
        let line = format!("✗ {message}");
        if self.color {
            line.red().to_string()
        } else {
            line
        }
    }

    fn format_markdown(&self, text: &str) -> String {
        let mut out = String::new();
        let mut code: Option<(String, String)> = None;
        let mut lists: Vec<Option<u64>> = Vec::new();
        let mut link_url: Option<String> = None;
        let mut bold = 0usize;
        let mut italic = 0usize;

        for event in Parser::new(text) {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().unwrap_or_default().to_string()
                        }
                        CodeBlockKind::Indented => String::new(),
                    };
                    code = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, body)) = code.take() {
                        out.push_str(&self.highlight_code(&lang, &body));
                        if !out.ends_with('\n') {
                            out.push('\n');
                        }
                        out.push('\n');
                    }
                }
                Event::Text(t) => match code.as_mut() {
                    Some((_, body)) => body.push_str(&t),
                    None => out.push_str(&self.paint(&t, bold > 0, italic > 0)),
                },
                Event::Code(c) => {
                    if self.color {
                        out.push_str(&c.to_string().cyan().to_string());
                    } else {
                        out.push_str(&c);
                    }
                }

                Event::Start(Tag::Heading { .. }) | Event::Start(Tag::Strong) => bold += 1,
                Event::End(TagEnd::Heading(_)) => {
                    bold = bold.saturating_sub(1);
                    out.push_str("\n\n");
                }
                Event::End(TagEnd::Strong) => bold = bold.saturating_sub(1),
                Event::Start(Tag::Emphasis) => italic += 1,
                Event::End(TagEnd::Emphasis) => italic = italic.saturating_sub(1),

                Event::End(TagEnd::Paragraph) => {
                    out.push_str(if lists.is_empty() { "\n\n" } else { "\n" });
                }

                Event::Start(Tag::List(first)) => lists.push(first),
                Event::End(TagEnd::List(_)) => {
                    lists.pop();
                    if lists.is_empty() {
                        out.push('\n');
                    }
                }
                Event::Start(Tag::Item) => {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str(&"  ".repeat(lists.len().saturating_sub(1)));
                    match lists.last_mut() {
                        Some(Some(n)) => {
                            out.push_str(&format!("{n}. "));
                            *n += 1;
                        }
                        _ => out.push_str(BULLET),
                    }
                }
                Event::End(TagEnd::Item) => {
                    if !out.ends_with('\n') {
                        out.push('\n');
                    }
                }

                Event::Start(Tag::Link { dest_url, .. }) => link_url = Some(dest_url.to_string()),
                Event::End(TagEnd::Link) => {
                    if let Some(url) = link_url.take() {
                        out.push_str(&format!(" ({url})"));
                    }
                }

                Event::SoftBreak | Event::HardBreak => out.push('\n'),
                Event::Rule => {
                    out.push_str(RULE);
                    out.push_str("\n\n");
                }
                Event::Html(raw) | Event::InlineHtml(raw) => out.push_str(&raw),
                _ => {}
            }
        }

        out.trim_end().to_string()
    }

    fn paint(&self, text: &str, bold: bool, italic: bool) -> String {
        if !self.color || !(bold || italic) {
            return text.to_string();
        }
        let mut styled = text.to_string().stylize();
        if bold {
            styled = styled.bold();
        }
        if italic {
            styled = styled.italic();
        }
        styled.to_string()
    }

    fn style_prose(&self, text: &str) -> String {
        let bolded = bold_pattern().replace_all(text, |caps: &regex::Captures| {
            if self.color {
                caps[1].to_string().bold().to_string()
            } else {
                caps[1].to_string()
            }
        });
        italic_pattern()
            .replace_all(&bolded, |caps: &regex::Captures| {
                if self.color {
                    caps[1].to_string().italic().to_string()
                } else {
                    caps[1].to_string()
                }
            })
            .into_owned()
    }

    fn highlight_code(&self, lang: &str, code: &str) -> String {
        if !self.color {
            return code.to_string();
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let Some(theme) = self.theme_set.themes.get(self.theme().syntect_name()) else {
            return code.to_string();
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut out = String::new();
        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => out.push_str(&as_24_bit_terminal_escaped(&ranges[..], false)),
                Err(e) => {
                    debug!("Highlighting failed, printing plain code: {e}");
                    return code.to_string();
                }
            }
        }
        out.push_str(RESET);
        out
    }
}

impl MessageRenderer for TerminalRenderer {
    fn render_user(&self, text: &str) {
        println!("{}", self.format_message(&ChatMessage::user(text)));
    }

    fn render(&self, text: &str) {
        let header = format!("{}:", Role::Bot);
        let header = if self.color {
            header.bold().to_string()
        } else {
            header
        };
        println!("{header}\n{}\n", self.format_message(&ChatMessage::bot(text)));
    }

    fn render_error(&self, message: &str) {
        println!("{}\n", self.format_error(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> TerminalRenderer {
        TerminalRenderer::new(Theme::Dark, false)
    }

    #[test]
    fn plain_renderer_strips_emphasis_markers() {
        assert_eq!(
            plain().format_reply("This is **bold** and *italic*."),
            "This is bold and italic."
        );
    }

    #[test]
    fn reply_without_fence_keeps_other_markdown() {
        assert_eq!(plain().format_reply("# Title\n`x`"), "# Title\n`x`");
    }

    #[test]
    fn plain_renderer_prints_code_verbatim() {
        let out = plain().format_reply("Try:\n```python\nx = 2 * 3 * 4\n```");
        assert_eq!(out, "Try:\n\nx = 2 * 3 * 4");
    }

    #[test]
    fn spaced_asterisks_beside_a_fence_are_not_emphasis() {
        let out = plain().format_reply("Note: 2 * 3 * 4\n```rust\nfn f(){}\n```");
        assert_eq!(out, "Note: 2 * 3 * 4\n\nfn f(){}");
    }

    #[test]
    fn headings_inline_code_and_links_are_rendered() {
        let reply = "# Title\n\nSee `cargo run` and [docs](https://x.dev).\n\n```\nx\n```";
        assert_eq!(
            plain().format_reply(reply),
            "Title\n\nSee cargo run and docs (https://x.dev).\n\nx"
        );
    }

    #[test]
    fn lists_get_bullets_and_numbers() {
        let reply = "Steps:\n\n- one\n- two\n\n1. build\n2. run\n\n```sh\nls\n```";
        assert_eq!(
            plain().format_reply(reply),
            "Steps:\n\n• one\n• two\n\n1. build\n2. run\n\nls"
        );
    }

    #[test]
    fn unterminated_fence_runs_to_the_end() {
        assert_eq!(plain().format_reply("```\nprint(1)"), "print(1)");
    }

    #[test]
    fn colored_renderer_highlights_code() {
        let renderer = TerminalRenderer::new(Theme::Dark, true);
        let out = renderer.format_reply("```rust\nfn main() {}\n```");
        assert!(out.contains("\x1b[38;2;"), "expected 24-bit escapes in {out:?}");
        assert!(out.contains("main"));
    }

    #[test]
    fn colored_renderer_styles_bold() {
        let renderer = TerminalRenderer::new(Theme::Dark, true);
        for reply in ["**hi**", "**hi**\n```\nx\n```"] {
            let out = renderer.format_reply(reply);
            assert!(out.contains("hi"));
            assert!(!out.contains("**"), "markers left in {out:?}");
        }
    }

    #[test]
    fn toggle_theme_flips_between_dark_and_light() {
        let renderer = plain();
        assert_eq!(renderer.toggle_theme(), Theme::Light);
        assert_eq!(renderer.theme(), Theme::Light);
        assert_eq!(renderer.toggle_theme(), Theme::Dark);
    }

    #[test]
    fn error_lines_are_marked() {
        let renderer = TerminalRenderer::new(Theme::Light, false);
        assert_eq!(renderer.format_error("boom"), "✗ boom");
    }
}
