use std::collections::HashMap;

use once_cell::sync::Lazy;

pub const UNKNOWN_COUNTRY: &str = "unknown";

const FLAG_CDN: &str = "https://flagcdn.com";

// FBref nationality prefixes (plus a few bare ISO codes seen in the data) to
// flagcdn codes. Home nations use the gb-* subdivision codes.
static COUNTRY_CODES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("eng", "gb-eng"),
        ("sco", "gb-sct"),
        ("wal", "gb-wls"),
        ("nir", "gb-nir"),
        ("esp", "es"),
        ("fra", "fr"),
        ("ger", "de"),
        ("ita", "it"),
        ("por", "pt"),
        ("bra", "br"),
        ("arg", "ar"),
        ("usa", "us"),
        ("ned", "nl"),
        ("bel", "be"),
        ("den", "dk"),
        ("swe", "se"),
        ("nor", "no"),
        ("sui", "ch"),
        ("cro", "hr"),
        ("srb", "rs"),
        ("pol", "pl"),
        ("aut", "at"),
        ("cze", "cz"),
        ("hun", "hu"),
        ("gre", "gr"),
        ("tur", "tr"),
        ("rus", "ru"),
        ("ukr", "ua"),
        ("jap", "jp"),
        ("kor", "kr"),
        ("aus", "au"),
        ("can", "ca"),
        ("mex", "mx"),
        ("egy", "eg"),
        ("sen", "sn"),
        ("nga", "ng"),
        ("mar", "ma"),
        ("gha", "gh"),
        ("civ", "ci"),
        ("cmr", "cm"),
        ("col", "co"),
        ("uru", "uy"),
        ("chi", "cl"),
        ("per", "pe"),
        ("ecu", "ec"),
        ("ven", "ve"),
        ("par", "py"),
        ("bol", "bo"),
        ("dk", "dk"),
        ("de", "de"),
        ("fr", "fr"),
        ("es", "es"),
        ("it", "it"),
        ("pt", "pt"),
    ])
});

/// Flag code for an FBref nationality cell such as `"eng ENG"`.
///
/// Tokens missing from the table come back lower-cased but otherwise as-is,
/// so `"xyz"` resolves to `"xyz"`. Only a blank cell yields [`UNKNOWN_COUNTRY`].
///
/// The first token is taken after skipping any whitespace: a whitespace-only
/// cell is [`UNKNOWN_COUNTRY`] rather than `""`, and a leading space still
/// resolves (`" eng ENG"` is `"gb-eng"`, not `""` as a split on the first
/// space would give).
pub fn resolve_country_code(nationality: &str) -> String {
    let Some(token) = nationality.split_whitespace().next() else {
        return UNKNOWN_COUNTRY.to_string();
    };
    let token = token.to_lowercase();
    match COUNTRY_CODES.get(token.as_str()) {
        Some(code) => (*code).to_string(),
        None => token,
    }
}

pub fn flag_url(code: &str, width: u16) -> String {
    format!("{FLAG_CDN}/w{width}/{}.png", code.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_url_uses_width_and_lowercase() {
        assert_eq!(flag_url("GB-ENG", 80), "https://flagcdn.com/w80/gb-eng.png");
    }

    #[test]
    fn table_is_lowercase_keyed() {
        assert!(COUNTRY_CODES.keys().all(|k| *k == k.to_lowercase()));
    }
}
