use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use harvest_logging::harvest_warn;

use crate::FetchOutput;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedHtml {
    pub html: String,
    pub encoding_label: String,
    /// Some bytes were invalid and became U+FFFD.
    pub had_errors: bool,
}

/// Decode raw bytes into UTF-8: BOM, then Content-Type charset, then detection.
///
/// Never fails; invalid sequences are replaced like a browser would.
pub fn decode_html(bytes: &[u8], content_type: Option<&str>) -> DecodedHtml {
    let encoding = Encoding::for_bom(bytes)
        .map(|(encoding, _)| encoding)
        .or_else(|| {
            content_type
                .and_then(charset_label)
                .and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or_else(|| {
            let mut detector = EncodingDetector::new();
            detector.feed(bytes, true);
            detector.guess(None, true)
        });

    let (text, _, had_errors) = encoding.decode(bytes);
    DecodedHtml {
        html: text.into_owned(),
        encoding_label: encoding.name().to_string(),
        had_errors,
    }
}

/// Decoded text of a fetched page.
pub(crate) fn page_text(output: &FetchOutput) -> String {
    let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref());
    if decoded.had_errors {
        harvest_warn!(
            "{}: invalid {} bytes replaced",
            output.metadata.original_url,
            decoded.encoding_label
        );
    }
    decoded.html
}

fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches(['"', '\'']).to_string())
    })
}
