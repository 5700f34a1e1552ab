// Small Dart source helpers shared by the fixers.
// Pure string inspection, no parsing beyond what a line shows.

use super::text::SourceLines;

/// URI of an `import '...'` / `import "..."` directive
pub fn import_uri(line: &str) -> Option<&str> {
    let rest = line.trim_start().strip_prefix("import ")?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '\'' || *c == '"')?;
    let body = &rest[1..];
    let end = body.find(quote)?;
    Some(&body[..end])
}

pub fn is_import_of(line: &str, uri: &str) -> bool {
    import_uri(line) == Some(uri)
}

/// Last line of the directive starting at `start`: the first line ending in
/// `;`. Stops before the next directive, so an unterminated line stands alone.
pub fn directive_end(lines: &SourceLines, start: usize) -> usize {
    for idx in start..lines.len() {
        let Some(line) = lines.content(idx) else {
            break;
        };
        let trimmed = line.trim();
        if idx > start && (trimmed.starts_with("import ") || trimmed.starts_with("export ")) {
            break;
        }
        if trimmed.ends_with(';') {
            return idx;
        }
    }
    start
}

/// Leading section of a file made of directives, blank lines and comments
fn is_header_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty()
        || trimmed.starts_with("import ")
        || trimmed.starts_with("export ")
        || trimmed.starts_with("library ")
        || trimmed.starts_with("part ")
        || trimmed.starts_with("//")
        || trimmed.starts_with("/*")
        || trimmed.starts_with('*')
}

/// Number of lines in the leading header section
pub fn header_len(lines: &SourceLines) -> usize {
    lines.iter().take_while(|l| is_header_line(l)).count()
}

/// Index right after the last header line matching `pred`
pub fn after_last_header_match<F>(lines: &SourceLines, pred: F) -> Option<usize>
where
    F: Fn(&str) -> bool,
{
    let header = header_len(lines);
    lines
        .iter()
        .take(header)
        .enumerate()
        .filter(|(_, l)| pred(l))
        .map(|(i, _)| i + 1)
        .last()
}

/// Where a new import belongs: after the last leading import, else after a
/// `library` directive, else at the top.
pub fn import_insertion_point(lines: &SourceLines) -> usize {
    after_last_header_match(lines, |l| l.trim_start().starts_with("import "))
        .or_else(|| after_last_header_match(lines, |l| l.trim_start().starts_with("library ")))
        .unwrap_or(0)
}
