//! Parser for the IEEE MA-L registry in its plain-text layout.
//!
//! Each assignment starts with a header line:
//!
//! ```text
//! 28-6F-B9   (hex)		Nokia Shanghai Bell Co., Ltd.
//! 286FB9     (base 16)		Nokia Shanghai Bell Co., Ltd.
//! 				No.388 Ning Qiao Road,Jin Qiao Pudong Shanghai
//! 				CN
//! ```
//!
//! Only the header line is used; the `(base 16)` line and the postal
//! address lines that follow are skipped.

use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry text is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),
}

/// Parse raw registry bytes into a map of OUI (six uppercase hex digits)
/// to organization name. Later duplicates overwrite earlier ones.
pub fn parse_registry(raw: &[u8]) -> Result<HashMap<String, String>, RegistryError> {
    let text = std::str::from_utf8(raw)?;

    let mut vendors = HashMap::new();
    let mut pending: Option<(String, String)> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            continue;
        };
        let rest: Vec<&str> = tokens.collect();
        if rest.is_empty() || !is_hyphenated_oui(first) {
            continue;
        }

        if let Some((oui, name)) = pending.take() {
            commit(&mut vendors, oui, &name);
        }
        pending = Some((first.replace('-', "").to_uppercase(), rest.join(" ")));
    }

    if let Some((oui, name)) = pending {
        commit(&mut vendors, oui, &name);
    }

    Ok(vendors)
}

fn commit(vendors: &mut HashMap<String, String>, oui: String, raw_name: &str) {
    let name = clean_vendor_name(raw_name, &oui);
    if !name.is_empty() {
        vendors.insert(oui, name);
    }
}

/// Strip registry column markers and the repeated base-16 column from a
/// header's trailing text, collapsing whitespace. `oui` is the header's
/// assignment as six hex digits; the name ends where it shows up again.
pub fn clean_vendor_name(raw: &str, oui: &str) -> String {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let mut kept: Vec<&str> = Vec::with_capacity(tokens.len());

    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        if token.eq_ignore_ascii_case("(hex)") {
            i += 1;
            continue;
        }
        if token.eq_ignore_ascii_case("(base")
            && tokens.get(i + 1).is_some_and(|t| *t == "16)")
        {
            i += 2;
            continue;
        }
        if !kept.is_empty() && token.eq_ignore_ascii_case(oui) {
            break;
        }
        kept.push(token);
        i += 1;
    }

    kept.join(" ")
}

/// `XX-XX-XX`, hex digits in either case
fn is_hyphenated_oui(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() == 8
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'-',
            _ => b.is_ascii_hexdigit(),
        })
}
