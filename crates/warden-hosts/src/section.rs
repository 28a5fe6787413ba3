//! Managed-section assembly
//!
//! Pure line manipulation: strip the old managed section, render the
//! new one, splice. Foreign lines keep their relative order and exact
//! bytes. When nothing is blocked no section is written at all, so a
//! fully-unblocked hosts file carries no trace of warden.

/// First line of the managed section
pub const START_MARKER: &str = "## WARDEN START";

/// Last line of the managed section
pub const END_MARKER: &str = "## WARDEN END";

/// Address blocked domains resolve to
pub const BLOCK_ADDR: &str = "0.0.0.0";

/// Remove the managed section, returning only foreign lines and whether
/// a section was present.
///
/// Markers match as exact full lines; a foreign line merely mentioning
/// the marker text is not a delimiter.
pub fn strip_managed(lines: &[String]) -> (Vec<String>, bool) {
    let mut foreign = Vec::with_capacity(lines.len());
    let mut in_section = false;
    let mut had_section = false;

    for line in lines {
        if line == START_MARKER {
            in_section = true;
            had_section = true;
            continue;
        }
        if line == END_MARKER {
            in_section = false;
            continue;
        }
        if !in_section {
            foreign.push(line.clone());
        }
    }

    (foreign, had_section)
}

/// Render the managed section body: two mapping lines per blocked
/// domain, bare and `www.`-prefixed.
pub fn render_entries(blocked: &[String]) -> Vec<String> {
    let mut entries = Vec::with_capacity(blocked.len() * 2);
    for domain in blocked {
        entries.push(format!("{BLOCK_ADDR} {domain}"));
        entries.push(format!("{BLOCK_ADDR} www.{domain}"));
    }
    entries
}

/// Reassemble the full hosts content: foreign lines unchanged, then the
/// managed section appended once, only when `blocked` is non-empty.
///
/// The content is handled as a sequence of `\n`-terminated lines: CRLF
/// endings come out as LF and a missing final newline is restored. Line
/// bytes themselves are never touched.
pub fn splice(content: &str, blocked: &[String]) -> String {
    let lines: Vec<String> = content.lines().map(String::from).collect();
    let (mut out, had_section) = strip_managed(&lines);

    // Undo the separator blank line a previous splice added; foreign
    // blank lines stay untouched.
    if had_section && out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }

    if !blocked.is_empty() {
        out.push(String::new());
        out.push(START_MARKER.to_string());
        out.extend(render_entries(blocked));
        out.push(END_MARKER.to_string());
    }

    let mut result = out.join("\n");
    result.push('\n');
    result
}
