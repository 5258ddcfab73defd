//! HTML → tweet text conversion.
//!
//! Produces the lightweight-markup plain text that short-form services
//! accept:
//! - `em`/`i` become `*x*`, `strong`/`b` become `**x**`
//! - `h-card` links become the author handle (`@name` for Twitter profiles)
//! - other links become their text, or their href when the text is empty
//! - images become their `src`
//! - quote attributions (`small`, or `cite` inside a `blockquote`) become `— name`
//! - block elements are separated by blank lines

use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Node};

use crate::author::author_from_uri;

/// Conversion state carried through the recursive walk.
#[derive(Debug, Default)]
struct ConversionContext {
    /// Inside a `<blockquote>` (where `<cite>` is an attribution).
    in_blockquote: bool,
}

/// Convert an HTML fragment into plain text with lightweight markup.
///
/// Plain text without markup passes through with whitespace collapsed.
#[must_use]
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut output = String::new();
    let mut ctx = ConversionContext::default();
    convert_children(&mut output, fragment.root_element(), &mut ctx);
    normalize_text(&output)
}

fn img_tag() -> &'static Regex {
    static IMG: OnceLock<Regex> = OnceLock::new();
    IMG.get_or_init(|| {
        Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*["']([^"']*)["'][^>]*>"#)
            .expect("valid img tag regex")
    })
}

/// Replace every `<img>` tag that has a `src` with the `src` value, leaving
/// all other markup untouched.
#[must_use]
pub fn expand_img(html: &str) -> String {
    img_tag().replace_all(html, "$1").into_owned()
}

fn convert_children(output: &mut String, element: ElementRef<'_>, ctx: &mut ConversionContext) {
    for child in element.children() {
        match child.value() {
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    convert_element(output, el, ctx);
                }
            }
            Node::Text(text) => {
                let collapsed = collapse_inline_whitespace(text);
                if !collapsed.is_empty() {
                    output.push_str(&collapsed);
                }
            }
            _ => {}
        }
    }
}

fn convert_element(output: &mut String, element: ElementRef<'_>, ctx: &mut ConversionContext) {
    match element.value().name() {
        "p" | "div" | "section" | "article" | "main" | "h1" | "h2" | "h3" | "h4" | "h5"
        | "h6" | "figure" => {
            ensure_blank_line(output);
            convert_children(output, element, ctx);
            ensure_blank_line(output);
        }
        "blockquote" => convert_blockquote(output, element, ctx),
        "ul" | "ol" => {
            ensure_blank_line(output);
            for item in element.child_elements() {
                if item.value().name() == "li" {
                    output.push_str("- ");
                    convert_children(output, item, ctx);
                    output.push('\n');
                }
            }
            ensure_blank_line(output);
        }

        "a" => convert_link(output, element, ctx),
        "img" => {
            if let Some(src) = element.value().attr("src").map(str::trim)
                && !src.is_empty()
            {
                output.push_str(src);
            }
        }

        "strong" | "b" => {
            output.push_str("**");
            convert_children(output, element, ctx);
            output.push_str("**");
        }
        "em" | "i" => {
            output.push('*');
            convert_children(output, element, ctx);
            output.push('*');
        }
        "small" => convert_attribution(output, element, ctx),
        "cite" if ctx.in_blockquote => convert_attribution(output, element, ctx),

        "br" => output.push('\n'),

        "script" | "style" | "noscript" | "template" | "head" => {}

        _ => convert_children(output, element, ctx),
    }
}

fn convert_blockquote(output: &mut String, element: ElementRef<'_>, ctx: &mut ConversionContext) {
    ensure_blank_line(output);
    let outer = ctx.in_blockquote;
    ctx.in_blockquote = true;
    convert_children(output, element, ctx);
    ctx.in_blockquote = outer;
    ensure_blank_line(output);
}

fn convert_attribution(output: &mut String, element: ElementRef<'_>, ctx: &mut ConversionContext) {
    let mut name = String::new();
    convert_children(&mut name, element, ctx);
    let name = collapse_whitespace(&name);
    if name.is_empty() {
        return;
    }
    if !output.is_empty() && !output.ends_with(char::is_whitespace) {
        output.push(' ');
    }
    output.push_str("— ");
    output.push_str(&name);
}

fn convert_link(output: &mut String, element: ElementRef<'_>, ctx: &mut ConversionContext) {
    let href = element.value().attr("href").map_or("", str::trim);
    let is_card = element.value().classes().any(|class| class == "h-card");

    if is_card && let Some(handle) = author_from_uri(href) {
        output.push_str(&handle);
        return;
    }

    let mut text = String::new();
    convert_children(&mut text, element, ctx);
    if collapse_whitespace(&text).is_empty() {
        output.push_str(href);
    } else {
        output.push_str(&text);
    }
}

/// Ensure output ends with a blank line (for block elements).
fn ensure_blank_line(output: &mut String) {
    if output.is_empty() {
        return;
    }

    let trailing_newlines = output.chars().rev().take_while(|&c| c == '\n').count();

    if trailing_newlines == 0 {
        output.push_str("\n\n");
    } else if trailing_newlines == 1 {
        output.push('\n');
    }
}

/// Collapse whitespace to single spaces (for inline text).
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse inline whitespace but keep a single leading/trailing space.
fn collapse_inline_whitespace(s: &str) -> String {
    let has_leading = s.chars().next().is_some_and(char::is_whitespace);
    let has_trailing = s.chars().last().is_some_and(char::is_whitespace);

    let collapsed = collapse_whitespace(s);
    if collapsed.is_empty() {
        return if has_leading || has_trailing {
            " ".to_string()
        } else {
            String::new()
        };
    }

    let mut result = String::with_capacity(collapsed.len() + 2);
    if has_leading {
        result.push(' ');
    }
    result.push_str(&collapsed);
    if has_trailing {
        result.push(' ');
    }
    result
}

/// Trim every line, keep at most one blank line between blocks, and drop
/// leading and trailing blank lines.
fn normalize_text(s: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = true;

    for line in s.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !previous_blank {
                lines.push("");
            }
            previous_blank = true;
        } else {
            lines.push(trimmed);
            previous_blank = false;
        }
    }

    while lines.last() == Some(&"") {
        lines.pop();
    }

    lines.join("\n")
}
