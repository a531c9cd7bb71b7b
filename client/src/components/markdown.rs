//! Markdown rendering for assistant replies.
//!
//! Raw HTML from the model is dropped, bare `http(s)://` URLs in plain text
//! become links, and links with any other scheme lose their target.

#[cfg(test)]
#[path = "markdown_test.rs"]
mod markdown_test;

use pulldown_cmark::{CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream, html};

const URL_PREFIXES: [&str; 2] = ["https://", "http://"];
const SAFE_SCHEMES: [&str; 3] = ["https://", "http://", "mailto:"];

#[must_use]
pub fn render_markdown_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    // Text inside links and code blocks is left alone.
    let mut opaque_depth = 0usize;
    let parser = TextMergeStream::new(Parser::new_ext(markdown, options)).flat_map(move |event| match event {
        Event::Html(_) | Event::InlineHtml(_) => Vec::new(),
        Event::Start(Tag::Link { link_type, dest_url, title, id }) => {
            opaque_depth += 1;
            let dest_url = if is_safe_url(&dest_url) { dest_url } else { CowStr::from("#") };
            vec![Event::Start(Tag::Link { link_type, dest_url, title, id })]
        }
        Event::Start(tag @ Tag::CodeBlock(_)) => {
            opaque_depth += 1;
            vec![Event::Start(tag)]
        }
        Event::End(end @ (TagEnd::Link | TagEnd::CodeBlock)) => {
            opaque_depth = opaque_depth.saturating_sub(1);
            vec![Event::End(end)]
        }
        Event::Text(text) if opaque_depth == 0 => linkify(&text),
        other => vec![other],
    });

    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

fn is_safe_url(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    SAFE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) || !lower.contains(':')
}

/// Split `text` into plain text and autolink events.
fn linkify<'a>(text: &str) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut rest = text;
    while let Some((start, end)) = find_url(rest) {
        if start > 0 {
            events.push(Event::Text(CowStr::from(rest[..start].to_owned())));
        }
        let url = rest[start..end].to_owned();
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(url.clone()),
            title: CowStr::from(""),
            id: CowStr::from(""),
        }));
        events.push(Event::Text(CowStr::from(url)));
        events.push(Event::End(TagEnd::Link));
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        events.push(Event::Text(CowStr::from(rest.to_owned())));
    }
    events
}

/// Byte range of the first bare URL in `text`, trailing punctuation excluded.
fn find_url(text: &str) -> Option<(usize, usize)> {
    let start = URL_PREFIXES.iter().filter_map(|prefix| text.find(prefix)).min()?;
    let len = text[start..].find(char::is_whitespace).unwrap_or(text.len() - start);
    let mut end = start + len;
    while end > start && text[..end].ends_with(['.', ',', ')', '!', '?', ';', ':', '"', '\'']) {
        end -= 1;
    }
    let scheme_len = URL_PREFIXES.iter().find(|p| text[start..].starts_with(**p)).map_or(0, |p| p.len());
    (end > start + scheme_len).then_some((start, end))
}
