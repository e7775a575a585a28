/// Invisible characters OCR engines and copy-paste leave behind.
const INVISIBLE: &[char] = &[
    '\u{200B}', // zero-width space
    '\u{200C}', // zero-width non-joiner
    '\u{200D}', // zero-width joiner
    '\u{2060}', // word joiner
    '\u{FEFF}', // BOM
];

/// Strip control and invisible characters from a single line.
/// Tabs become spaces so "WBC\t7500" keeps its token boundary.
pub fn sanitize_line(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            c if c.is_control() || INVISIBLE.contains(&c) => None,
            c => Some(c),
        })
        .collect()
}
