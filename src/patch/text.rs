// Line buffer that keeps each line's original terminator, so a file
// round-trips byte for byte when nothing is edited.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLines {
    lines: Vec<String>,
    eol: &'static str,
}

impl SourceLines {
    pub fn parse(text: &str) -> Self {
        let eol = if text.contains("\r\n") { "\r\n" } else { "\n" };
        SourceLines {
            lines: text.split_inclusive('\n').map(str::to_string).collect(),
            eol,
        }
    }

    pub fn to_text(&self) -> String {
        self.lines.concat()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line content without its terminator
    pub fn content(&self, idx: usize) -> Option<&str> {
        self.lines
            .get(idx)
            .map(|l| l.trim_end_matches('\n').trim_end_matches('\r'))
    }

    /// Leading whitespace of a line
    pub fn indent(&self, idx: usize) -> &str {
        match self.content(idx) {
            Some(line) => &line[..line.len() - line.trim_start().len()],
            None => "",
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.lines.len()).filter_map(move |i| self.content(i))
    }

    /// Insert a new line before `idx` (`idx == len` appends)
    pub fn insert(&mut self, idx: usize, content: &str) {
        let idx = idx.min(self.lines.len());
        if idx == self.lines.len() {
            if let Some(last) = self.lines.last_mut() {
                if !last.ends_with('\n') {
                    last.push_str(self.eol);
                }
            }
        }
        self.lines.insert(idx, format!("{}{}", content, self.eol));
    }

    pub fn remove(&mut self, idx: usize) -> Option<String> {
        if idx < self.lines.len() {
            Some(self.lines.remove(idx))
        } else {
            None
        }
    }

    /// Replace a line's content, keeping its terminator
    pub fn replace(&mut self, idx: usize, content: &str) {
        if let Some(line) = self.lines.get_mut(idx) {
            let terminator = if line.ends_with("\r\n") {
                "\r\n"
            } else if line.ends_with('\n') {
                "\n"
            } else {
                ""
            };
            *line = format!("{}{}", content, terminator);
        }
    }
}
