//! Whitespace normalization analysis.
//!
//! A markup loader collapses runs of whitespace and trims whitespace next to
//! elements that ask for it. Text that would read back differently needs an
//! explicit `xml:space="preserve"` on its element.

/// Whether `text` reads back unchanged under whitespace normalization.
///
/// `allow_leading_space` and `allow_trailing_space` say whether a space at
/// that end survives because a neighboring element keeps it.
///
/// ```
/// use markwright_xml::is_normalization_neutral;
///
/// assert!(is_normalization_neutral("two words", false, false));
/// assert!(!is_normalization_neutral("two  spaces", false, false));
/// assert!(!is_normalization_neutral(" leading", false, false));
/// assert!(is_normalization_neutral(" leading", true, false));
/// ```
#[must_use]
pub fn is_normalization_neutral(text: &str, allow_leading_space: bool, allow_trailing_space: bool) -> bool {
    if !allow_leading_space && text.starts_with(' ') {
        return false;
    }
    if !allow_trailing_space && text.ends_with(' ') {
        return false;
    }
    let mut last_was_space = false;
    for c in text.chars() {
        match c {
            '\t' | '\r' | '\n' | '\u{c}' => return false,
            ' ' if last_was_space => return false,
            ' ' => last_was_space = true,
            _ => last_was_space = false,
        }
    }
    true
}

/// One piece of mixed element content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContentRun<'a> {
    Text(&'a str),
    Element { trims_surrounding_whitespace: bool },
}

/// Whether any text run in `runs` needs whitespace preservation.
///
/// A space next to an element survives unless that element trims the
/// whitespace around it; a space at either edge of the content is lost.
pub(crate) fn needs_preservation(runs: &[ContentRun<'_>]) -> bool {
    let keeps_space = |neighbor: Option<&ContentRun<'_>>| {
        matches!(
            neighbor,
            Some(ContentRun::Element {
                trims_surrounding_whitespace: false
            })
        )
    };

    runs.iter().enumerate().any(|(i, run)| match run {
        ContentRun::Text(text) => {
            let previous = i.checked_sub(1).and_then(|p| runs.get(p));
            let next = runs.get(i + 1);
            !is_normalization_neutral(text, keeps_space(previous), keeps_space(next))
        }
        ContentRun::Element { .. } => false,
    })
}
