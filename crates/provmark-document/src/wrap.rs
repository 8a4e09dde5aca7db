// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content wrapper — embeds header and footer text in a file's own comment
// syntax so the protected copy still parses as the same format.
//
// Output layout for every strategy:
//
//   [BOM] [shebang line "\n"] HEADER_BLOCK "\n\n" BODY "\n\n" FOOTER_BLOCK
//
// The body is copied verbatim. A leading byte order mark always stays in front.
// The shebang line is only split off for formats that run as scripts, so `#!`
// stays at the start of the first line. A `#!` line that is the whole file is
// followed by a blank line, which keeps `#!x` and `#!x\n` apart.

use provmark_core::format::{FormatDescriptor, WrapStrategy};

const BOM: char = '\u{feff}';

/// Wrap `original` with `header` and `footer` according to `descriptor`.
///
/// Pure transformation; writing the result is the caller's job.
pub fn wrap(original: &str, descriptor: &FormatDescriptor, header: &str, footer: &str) -> String {
    let (bom, content) = split_bom(original);
    let (shebang, body) = split_shebang(content, descriptor);
    let head = render_block(descriptor, header);
    let tail = render_block(descriptor, footer);

    let mut out = String::with_capacity(original.len() + head.len() + tail.len() + 8);
    out.push_str(bom);
    if let Some(line) = shebang {
        out.push_str(line);
        if !line.ends_with('\n') {
            out.push_str("\n\n");
        }
    }
    out.push_str(&head);
    out.push_str("\n\n");
    out.push_str(body);
    out.push_str("\n\n");
    out.push_str(&tail);
    out
}

/// Recover the original content from output of [`wrap`] made with the same
/// descriptor, header and footer.
///
/// Returns `None` when `protected` was not produced that way.
pub fn unwrap(
    protected: &str,
    descriptor: &FormatDescriptor,
    header: &str,
    footer: &str,
) -> Option<String> {
    let (bom, protected) = split_bom(protected);
    let head = format!("{}\n\n", render_block(descriptor, header));
    let tail = format!("\n\n{}", render_block(descriptor, footer));
    let inner = protected.strip_suffix(tail.as_str())?;

    if let Some(body) = inner.strip_prefix(head.as_str()) {
        return Some(format!("{bom}{body}"));
    }
    if !descriptor.preserve_shebang {
        return None;
    }
    let (line, rest) = inner.split_once('\n')?;
    if !line.starts_with("#!") {
        return None;
    }
    if let Some(body) = rest.strip_prefix(head.as_str()) {
        return Some(format!("{bom}{line}\n{body}"));
    }
    match rest.strip_prefix('\n')?.strip_prefix(head.as_str())? {
        "" => Some(format!("{bom}{line}")),
        _ => None,
    }
}

/// Render one header or footer block in the descriptor's comment syntax.
pub fn render_block(descriptor: &FormatDescriptor, text: &str) -> String {
    match descriptor.strategy {
        WrapStrategy::Enclosed => {
            format!("{}\n{text}\n{}", descriptor.open, descriptor.close)
        }
        WrapStrategy::PrefixedBlock { line_prefix } => format!(
            "{}\n{}\n{}",
            descriptor.open,
            prefix_lines(text, line_prefix),
            descriptor.close
        ),
        WrapStrategy::LineComment { prefix, framed } => {
            let lines = prefix_lines(text, prefix);
            if framed {
                let marker = prefix.trim_end();
                format!("{marker}\n{lines}\n{marker}")
            } else {
                lines
            }
        }
        WrapStrategy::Plain => text.to_owned(),
    }
}

fn split_bom(content: &str) -> (&str, &str) {
    match content.strip_prefix(BOM) {
        Some(rest) => (&content[..BOM.len_utf8()], rest),
        None => ("", content),
    }
}

/// The shebang comes back with its newline, if it had one.
fn split_shebang<'a>(content: &'a str, descriptor: &FormatDescriptor) -> (Option<&'a str>, &'a str) {
    if !descriptor.preserve_shebang || !content.starts_with("#!") {
        return (None, content);
    }
    match content.find('\n') {
        Some(end) => (Some(&content[..=end]), &content[end + 1..]),
        None => (Some(content), ""),
    }
}

/// Prefix every line; empty lines get the prefix without trailing spaces.
fn prefix_lines(text: &str, prefix: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                prefix.trim_end().to_owned()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
