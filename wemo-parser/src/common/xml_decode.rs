//! Tag-scoped text extraction and entity decoding.
//!
//! WEMO responses are known-shape, unqualified element names with no
//! attributes on the elements we care about. Scanning for `<Tag>` ... `</Tag>`
//! pairs is enough and keeps the decode path allocation-light.
//!
//! Bridge responses nest a second XML document inside a text node, so the
//! inner tags arrive as `&lt;DeviceID&gt;`. Callers run [`unescape`] once on
//! those bodies before extracting.

use crate::error::{ParseError, ParseResult};

/// Return the inner text of every `<tag>...</tag>` in document order.
///
/// Matching is literal: `<tag attr="x">` and namespaced forms are not
/// matched. Extraction is non-recursive; scanning resumes after each closing
/// tag. An opening tag with no closing tag ends the scan, so a truncated
/// response yields whatever complete elements came before it.
///
/// ```rust
/// use wemo_parser::extract_elements;
///
/// let xml = "<a><id>1</id><id>2</id><id>3";
/// assert_eq!(extract_elements(xml, "id"), vec!["1", "2"]);
/// assert!(extract_elements(xml, "missing").is_empty());
/// ```
pub fn extract_elements(xml: &str, tag: &str) -> Vec<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    let mut elements = Vec::new();
    let mut cursor = 0;

    while let Some(found) = xml[cursor..].find(&open) {
        let content_start = cursor + found + open.len();
        let Some(len) = xml[content_start..].find(&close) else {
            break;
        };
        elements.push(xml[content_start..content_start + len].to_string());
        cursor = content_start + len + close.len();
    }

    elements
}

/// Inner text of the first `<tag>` occurrence, or an empty string.
///
/// Absent and empty are deliberately indistinguishable: both mean "no data".
pub fn first_element(xml: &str, tag: &str) -> String {
    extract_elements(xml, tag).into_iter().next().unwrap_or_default()
}

/// Decode XML character entities (`&lt;`, `&amp;`, `&#34;`, ...) once.
pub fn try_unescape(xml: &str) -> ParseResult<String> {
    quick_xml::escape::unescape(xml)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ParseError::InvalidEscape(e.to_string()))
}

/// Lenient form of [`try_unescape`]: entities are decoded one at a time.
///
/// Named HTML entities (`&eacute;`, `&nbsp;`) resolve as well as the XML
/// ones. An unknown entity or a stray `&` stays in the output as literal
/// text, so one bad character in a user-chosen name never hides the rest of
/// the payload from the scanner.
pub fn unescape(xml: &str) -> String {
    let mut decoded = String::with_capacity(xml.len());
    let mut rest = xml;

    while let Some(amp) = rest.find('&') {
        decoded.push_str(&rest[..amp]);
        let candidate = &rest[amp..];

        // An entity runs to the first `;`, unless another `&` starts first
        let end = candidate[1..]
            .find(|c| c == ';' || c == '&')
            .map(|pos| pos + 1)
            .filter(|&pos| candidate.as_bytes()[pos] == b';');

        match end {
            Some(end) => {
                let entity = &candidate[..=end];
                match quick_xml::escape::unescape(entity) {
                    Ok(text) => decoded.push_str(&text),
                    Err(_) => decoded.push_str(entity),
                }
                rest = &candidate[end + 1..];
            }
            None => {
                decoded.push('&');
                rest = &candidate[1..];
            }
        }
    }

    decoded.push_str(rest);
    decoded
}
