// Minimal HTML scanning for the qualifying list markup.
// The page is flat enough that substring search beats pulling in a DOM.

/// Collapse runs of whitespace into single spaces and trim
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

pub fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Drop every `<...>` tag, keeping the text between them
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    decode_entities(&out)
}

/// Visible text on a single line
pub fn text(s: &str) -> String {
    normalize_ws(&strip_tags(s))
}

/// Visible text keeping line structure: each line trimmed, blank lines dropped
pub fn text_lines(s: &str) -> String {
    strip_tags(s)
        .lines()
        .map(normalize_ws)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Start offsets of every occurrence of `pat`
pub fn find_all(s: &str, pat: &str) -> Vec<usize> {
    s.match_indices(pat).map(|(i, _)| i).collect()
}

/// Raw inner HTML of the first `<tag ...>...</tag>` in `s`
pub fn first_element_inner<'a>(s: &'a str, tag: &str) -> Option<&'a str> {
    let open = find_open_tag(s, tag)?;
    let start = s[open..].find('>')? + open + 1;
    let close = format!("</{}>", tag);
    let end = s[start..].find(&close)? + start;
    Some(&s[start..end])
}

/// Raw inner HTML of the first `<div>` whose opening tag contains `attr`.
///
/// Assumes the cell has no nested `<div>`.
pub fn div_inner_with_attr<'a>(s: &'a str, attr: &str) -> Option<&'a str> {
    let at = s.find(attr)?;
    let open = s[..at].rfind("<div")?;
    let start = s[open..].find('>')? + open + 1;
    let end = s[start..].find("</div>")? + start;
    Some(&s[start..end])
}

// "<h3" must not match "<h30" or similar
fn find_open_tag(s: &str, tag: &str) -> Option<usize> {
    let pat = format!("<{}", tag);
    s.match_indices(&pat)
        .map(|(i, _)| i)
        .find(|&i| {
            s[i + pat.len()..]
                .chars()
                .next()
                .map_or(false, |c| c == '>' || c.is_whitespace())
        })
}
