//! Text sanitization for the PDF report
//!
//! The report uses the built-in Helvetica fonts, which only render printable
//! ASCII reliably. Common Latin-1 letters and typographic punctuation are
//! transliterated; control characters and everything else are dropped.

/// Reduce `text` to a single line of printable ASCII
pub fn to_report_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\n' || c == '\r' || c == '\t' {
            out.push(' ');
        } else {
            push_char(&mut out, c);
        }
    }
    out
}

/// Like [`to_report_line`] but keeps line breaks (`\r\n` and `\r` become `\n`)
pub fn to_report_text(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut out = String::with_capacity(normalized.len());
    for c in normalized.chars() {
        match c {
            '\n' => out.push('\n'),
            '\t' => out.push(' '),
            _ => push_char(&mut out, c),
        }
    }
    out
}

/// Characters the report can render as-is
pub fn is_report_safe(c: char) -> bool {
    (' '..='~').contains(&c)
}

fn push_char(out: &mut String, c: char) {
    if is_report_safe(c) {
        out.push(c);
    } else if let Some(sub) = transliterate(c) {
        out.push_str(sub);
    }
}

fn transliterate(c: char) -> Option<&'static str> {
    let s = match c {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "A",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'Æ' => "AE",
        'æ' => "ae",
        'Ç' => "C",
        'ç' => "c",
        'È' | 'É' | 'Ê' | 'Ë' => "E",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'Ì' | 'Í' | 'Î' | 'Ï' => "I",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'Ñ' => "N",
        'ñ' => "n",
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "O",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'Ù' | 'Ú' | 'Û' | 'Ü' => "U",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'Ý' => "Y",
        'ý' | 'ÿ' => "y",
        'ß' => "ss",
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2032}' => "'",
        '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{2033}' | '«' | '»' => "\"",
        '\u{2013}' | '\u{2014}' | '\u{2212}' => "-",
        '\u{2026}' => "...",
        '\u{2022}' | '·' => "*",
        '\u{00A0}' | '\u{2009}' | '\u{202F}' => " ",
        '¿' | '¡' => "",
        _ => return None,
    };
    Some(s)
}
