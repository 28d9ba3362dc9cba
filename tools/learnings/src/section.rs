pub const SECTION_MARKER: &str = "## ";

// A section runs from its `## <title>` heading to the next heading of the
// same or higher level, or to end of input. Absence is a silent outcome.
pub fn extract_section(text: &str, title: &str) -> String {
    let mut body = String::new();
    let mut in_section = false;

    for line in text.lines() {
        if let Some(heading) = line.strip_prefix(SECTION_MARKER) {
            if in_section {
                break;
            }
            if heading.trim_end() == title {
                in_section = true;
            }
            continue;
        }
        if in_section && line.starts_with("# ") {
            break;
        }
        if in_section {
            body.push_str(line);
            body.push('\n');
        }
    }

    body.trim().to_string()
}
