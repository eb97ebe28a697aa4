//! Markdown rendering with syntax highlighting

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use thiserror::Error;

use crate::config::SiteConfig;

/// Theme used when none is configured or the configured one is unknown
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

lazy_static! {
    /// Pandoc-style attribute right after an inline code span: `code`{.rust}
    static ref INLINE_LANG: Regex = Regex::new(r"^\{\.([A-Za-z0-9_+#.-]+)\}").unwrap();
}

/// Errors raised while rendering a markdown body
#[derive(Error, Debug)]
pub enum MarkdownError {
    #[error("fenced code block starting on line {line} is never closed")]
    UnterminatedFence { line: usize },

    #[error("highlight theme not found: {0}")]
    UnknownTheme(String),

    #[error("highlighting failed: {0}")]
    Highlight(#[from] syntect::Error),
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
    inline_language: Option<String>,
    raw_html: bool,
    smart_punctuation: bool,
}

/// Fenced code block being collected
struct CodeBlock {
    lang: Option<String>,
    text: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: DEFAULT_THEME.to_string(),
            line_numbers: true,
            inline_language: None,
            raw_html: true,
            smart_punctuation: false,
        }
    }

    /// Create from the site's highlight and markdown settings
    pub fn from_config(config: &SiteConfig) -> Self {
        let mut renderer = Self::new();

        if renderer.theme_set.themes.contains_key(&config.highlight.theme) {
            renderer.theme_name = config.highlight.theme.clone();
        } else {
            tracing::warn!(
                "Unknown highlight theme {:?}, falling back to {}",
                config.highlight.theme,
                DEFAULT_THEME
            );
        }

        renderer.line_numbers = config.highlight.line_number;
        renderer.inline_language = config
            .highlight
            .inline_language
            .as_deref()
            .map(sanitize_lang)
            .filter(|lang| !lang.is_empty());
        renderer.raw_html = config.markdown.raw_html;
        renderer.smart_punctuation = config.markdown.smart_punctuation;
        renderer
    }

    fn options(&self) -> Options {
        // YAML metadata blocks stay off: front-matter is split off by FrontMatter::parse()
        let mut options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES;
        if self.smart_punctuation {
            options |= Options::ENABLE_SMART_PUNCTUATION;
        }
        options
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String, MarkdownError> {
        let mut parser = Parser::new_ext(markdown, self.options())
            .into_offset_iter()
            .peekable();

        let mut events: Vec<Event> = Vec::new();
        let mut code_block: Option<CodeBlock> = None;

        while let Some((event, range)) = parser.next() {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            let line_start = markdown[..range.start].rfind('\n').map_or(0, |i| i + 1);
                            let depth = quote_depth(&markdown[line_start..range.start]);
                            if !fence_is_closed(&markdown[range.clone()], depth) {
                                let line = markdown[..range.start].lines().count() + 1;
                                return Err(MarkdownError::UnterminatedFence { line });
                            }
                            Some(fence_lang(&info)).filter(|lang| !lang.is_empty())
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(CodeBlock {
                        lang,
                        text: String::new(),
                    });
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(block) = code_block.take() {
                        let highlighted = self.highlight_block(&block.text, block.lang.as_deref())?;
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some(block) = code_block.as_mut() {
                        block.text.push_str(&text);
                    }
                }
                Event::Code(code) => {
                    let attribute = match parser.peek() {
                        Some((Event::Text(next), _)) => INLINE_LANG
                            .captures(next)
                            .map(|caps| (caps[1].to_string(), caps[0].len())),
                        _ => None,
                    };

                    if let Some((lang, attribute_len)) = attribute {
                        events.push(Event::InlineHtml(CowStr::from(
                            self.highlight_inline(&code, &lang)?,
                        )));
                        if let Some((Event::Text(next), _)) = parser.next() {
                            let rest = &next[attribute_len..];
                            if !rest.is_empty() {
                                events.push(Event::Text(CowStr::from(rest.to_string())));
                            }
                        }
                    } else if let Some(lang) = self.inline_language.as_deref() {
                        events.push(Event::InlineHtml(CowStr::from(
                            self.highlight_inline(&code, lang)?,
                        )));
                    } else {
                        events.push(Event::Code(code));
                    }
                }
                Event::Html(raw) | Event::InlineHtml(raw) if !self.raw_html => {
                    events.push(Event::Text(raw));
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    fn theme(&self) -> Result<&Theme, MarkdownError> {
        self.theme_set
            .themes
            .get(&self.theme_name)
            .ok_or_else(|| MarkdownError::UnknownTheme(self.theme_name.clone()))
    }

    fn find_syntax(&self, lang: &str) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    /// Highlight one line, leaving its line ending out of the markup
    fn highlight_line(
        &self,
        highlighter: &mut HighlightLines,
        line: &str,
    ) -> Result<String, MarkdownError> {
        let regions = highlighter.highlight_line(line, &self.syntax_set)?;
        let regions: Vec<_> = regions
            .into_iter()
            .map(|(style, text)| (style, text.trim_end_matches(['\n', '\r'])))
            .collect();
        Ok(styled_line_to_highlighted_html(
            &regions[..],
            IncludeBackground::No,
        )?)
    }

    /// Highlight a fenced or indented code block
    fn highlight_block(&self, code: &str, lang: Option<&str>) -> Result<String, MarkdownError> {
        let lang = lang.unwrap_or("text");
        let theme = self.theme()?;
        let mut highlighter = HighlightLines::new(self.find_syntax(lang), theme);

        let mut lines = Vec::new();
        for line in LinesWithEndings::from(code) {
            lines.push(format!(
                r#"<span class="line">{}</span>"#,
                self.highlight_line(&mut highlighter, line)?
            ));
        }

        let pre_style = theme
            .settings
            .background
            .map(|c| {
                format!(
                    r#" style="background-color:#{:02x}{:02x}{:02x};""#,
                    c.r, c.g, c.b
                )
            })
            .unwrap_or_default();

        let code_html = format!(
            r#"<pre{}><code class="language-{}">{}</code></pre>"#,
            pre_style,
            lang,
            lines.join("\n")
        );

        if self.line_numbers {
            Ok(add_line_numbers(&code_html, lines.len(), lang))
        } else {
            Ok(code_html)
        }
    }

    /// Highlight an inline code span
    fn highlight_inline(&self, code: &str, lang: &str) -> Result<String, MarkdownError> {
        let mut highlighter = HighlightLines::new(self.find_syntax(lang), self.theme()?);
        let mut html = String::new();
        for line in LinesWithEndings::from(code) {
            html.push_str(&self.highlight_line(&mut highlighter, line)?);
        }
        Ok(format!(r#"<code class="language-{}">{}</code>"#, lang, html))
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap highlighted code in a table with a line-number gutter
fn add_line_numbers(code_html: &str, line_count: usize, lang: &str) -> String {
    let gutter: Vec<String> = (1..=line_count)
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect();

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        lang,
        gutter.join("\n"),
        code_html
    )
}

/// First token of a fence info string, safe to place in an attribute
fn fence_lang(info: &str) -> String {
    let token = info
        .split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .unwrap_or("");
    sanitize_lang(token)
}

fn sanitize_lang(lang: &str) -> String {
    lang.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '#' | '.' | '-'))
        .collect()
}

/// Whether a fenced block's source ends with a matching closing fence
///
/// `depth` is the number of block-quote markers in front of the opening
/// fence; exactly that many are stripped from every line.
fn fence_is_closed(source: &str, depth: usize) -> bool {
    let mut lines = source.lines().map(|line| strip_quotes(line, depth));
    let Some(opening) = lines.next() else {
        return false;
    };
    let Some(fence_char) = opening.chars().next() else {
        return false;
    };
    let fence_len = opening.chars().take_while(|&c| c == fence_char).count();

    match lines.filter(|line| !line.is_empty()).last() {
        Some(last) => {
            last.chars().count() >= fence_len && last.chars().all(|c| c == fence_char)
        }
        None => false,
    }
}

/// Number of block-quote markers at the start of a line
fn quote_depth(prefix: &str) -> usize {
    let mut depth = 0;
    let mut rest = prefix.trim_start();
    while let Some(stripped) = rest.strip_prefix('>') {
        depth += 1;
        rest = stripped.trim_start();
    }
    depth
}

/// Remove up to `depth` block-quote markers and the surrounding whitespace
fn strip_quotes(line: &str, depth: usize) -> &str {
    let mut rest = line.trim_start();
    for _ in 0..depth {
        match rest.strip_prefix('>') {
            Some(stripped) => rest = stripped.trim_start(),
            None => break,
        }
    }
    rest.trim_end()
}
