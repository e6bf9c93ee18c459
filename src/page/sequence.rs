/// Page sequencing
///
/// Turns the unordered entry list of an archive into the deterministic
/// reading order: image entries only, sorted by the first number embedded
/// in their name, with a natural (digit-aware) name comparison breaking
/// ties. Archive order never influences the result.

use std::cmp::Ordering;

use crate::archive::ArchiveEntry;

/// Image extensions that count as pages
const IMAGE_EXTENSIONS: [&str; 5] = [".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// One entry selected and positioned by the sequencer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    /// Entry name inside the archive, used to read the bytes later
    pub name: String,
    /// Page number extracted from the name (0 when the name has no digits)
    pub number: u64,
}

/// Compute the page sequence for a set of archive entries
///
/// Returns an empty vector when the archive holds no recognized images;
/// the caller must treat that as a hard error, not an empty comic.
pub fn sequence(entries: &[ArchiveEntry]) -> Vec<PageEntry> {
    let mut pages: Vec<PageEntry> = entries
        .iter()
        .filter(|entry| entry.is_file && is_image_file(&entry.name))
        .map(|entry| PageEntry {
            name: entry.name.clone(),
            number: extract_page_number(&entry.name),
        })
        .collect();

    pages.sort_by(|a, b| {
        a.number
            .cmp(&b.number)
            .then_with(|| natural_cmp(&a.name, &b.name))
    });

    pages
}

/// Check whether an entry name carries a recognized image extension
pub fn is_image_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Extract the first contiguous run of decimal digits as the page number
///
/// Names without any digits extract to 0, which sorts covers and other
/// unnumbered pages ahead of every numbered page. Saturates instead of
/// overflowing on absurdly long digit runs.
pub fn extract_page_number(name: &str) -> u64 {
    let mut chars = name.chars().skip_while(|c| !c.is_ascii_digit()).peekable();

    let mut number: u64 = 0;
    while let Some(&c) = chars.peek() {
        if let Some(digit) = c.to_digit(10) {
            number = number.saturating_mul(10).saturating_add(digit as u64);
            chars.next();
        } else {
            break;
        }
    }

    number
}

/// Natural comparison: digit runs compare as integers, letters fold case
///
/// This is the tie-break for entries whose extracted page numbers are
/// equal, so "page2" still sorts before "page10" even when the leading
/// number alone cannot decide.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a_chars = a.chars().peekable();
    let mut b_chars = b.chars().peekable();

    loop {
        match (a_chars.peek(), b_chars.peek()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(a_char), Some(b_char)) => {
                if a_char.is_ascii_digit() && b_char.is_ascii_digit() {
                    let a_num = take_number(&mut a_chars);
                    let b_num = take_number(&mut b_chars);

                    match a_num.cmp(&b_num) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                } else {
                    let a_lower = a_char.to_lowercase().to_string();
                    let b_lower = b_char.to_lowercase().to_string();
                    a_chars.next();
                    b_chars.next();

                    match a_lower.cmp(&b_lower) {
                        Ordering::Equal => continue,
                        other => return other,
                    }
                }
            }
        }
    }
}

/// Consume a digit run from the front of the iterator as one integer
fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> u64 {
    let mut number: u64 = 0;
    while let Some(&c) = chars.peek() {
        if let Some(digit) = c.to_digit(10) {
            number = number.saturating_mul(10).saturating_add(digit as u64);
            chars.next();
        } else {
            break;
        }
    }
    number
}
