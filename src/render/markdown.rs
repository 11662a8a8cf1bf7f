//! Markdown for `text` columns, with `#hashtag` references expanded

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream};

use crate::core::reference::find_hashtags;
use crate::render::reference::render_reference;
use crate::render::RenderContext;

/// Convert Markdown to HTML
///
/// Hashtags in ordinary text become reference links (or unresolved
/// markers); code spans and code blocks are left untouched.
pub fn render_markdown(ctx: &RenderContext<'_>, source: &str) -> String {
    let parser = TextMergeStream::new(Parser::new_ext(source, Options::ENABLE_TABLES));

    let mut in_code_block = false;
    let mut events: Vec<Event<'_>> = Vec::new();
    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                events.push(event);
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                events.push(event);
            }
            Event::Text(text) if !in_code_block => expand_hashtags(ctx, text, &mut events),
            other => events.push(other),
        }
    }

    let mut out = String::with_capacity(source.len() * 2);
    html::push_html(&mut out, events.into_iter());
    out
}

fn expand_hashtags<'e>(ctx: &RenderContext<'_>, text: CowStr<'e>, events: &mut Vec<Event<'e>>) {
    let tags = find_hashtags(&text);
    if tags.is_empty() {
        events.push(Event::Text(text));
        return;
    }

    let mut last = 0;
    for (range, _) in tags {
        if range.start > last {
            events.push(Event::Text(CowStr::from(text[last..range.start].to_string())));
        }
        let rendered = render_reference(ctx, &text[range.clone()]);
        events.push(Event::InlineHtml(CowStr::from(rendered)));
        last = range.end;
    }
    if last < text.len() {
        events.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}
