//! Compact per-outlet lines for prompts that list every outlet.
//!
//! Lossy: a compressed line keeps a location keyword and the raw text of the
//! last time expression. Nothing that needs an exact answer reads these.

use crate::hours;
use crate::store::Outlet;
use crate::vocabulary::LocationVocabulary;

const ADDRESS_PREFIX_CHARS: usize = 20;
const HOURS_PREFIX_CHARS: usize = 10;
const MISSING: &str = "N/A";

/// An outlet reduced to `name|location|closing`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedOutlet {
    pub name: String,
    pub location: String,
    pub closing: String,
}

impl std::fmt::Display for CompressedOutlet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}|{}", self.name, self.location, self.closing)
    }
}

/// Compress one outlet.
pub fn compress(outlet: &Outlet, vocabulary: &LocationVocabulary) -> CompressedOutlet {
    let location = match outlet.address() {
        Some(address) => match vocabulary.find_in(address) {
            Some(location) => location.name().to_string(),
            None => prefix(address, ADDRESS_PREFIX_CHARS),
        },
        None => MISSING.to_string(),
    };

    let closing = match outlet.hours() {
        Some(text) => closing_token(text),
        None => MISSING.to_string(),
    };

    CompressedOutlet {
        name: outlet.name.trim().to_string(),
        location,
        closing,
    }
}

/// Last time expression in the uppercased hours text, verbatim.
fn closing_token(hours_text: &str) -> String {
    let upper = hours_text.to_uppercase();
    match hours::scan(&upper).last() {
        Some(found) => found.text.to_string(),
        None => prefix(hours_text, HOURS_PREFIX_CHARS),
    }
}

fn prefix(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocabulary() -> LocationVocabulary {
        LocationVocabulary::new(["Bangsar", "KLCC"])
    }

    #[test]
    fn test_compress_with_keyword_and_time() {
        let outlet = Outlet::new(1, "Subway Telawi", "12 Jalan Telawi 3, BANGSAR Baru")
            .with_hours("Mon-Sun: 8am - 10pm");
        let compressed = compress(&outlet, &vocabulary());
        assert_eq!(compressed.to_string(), "Subway Telawi|Bangsar|10PM");
    }

    #[test]
    fn test_closing_token_is_last_match_not_latest() {
        let outlet = Outlet::new(1, "Subway Mid Valley", "Mid Valley Megamall")
            .with_hours("Fri 8:00 AM - 11:30 PM; Sun 9 AM - 9 PM");
        let compressed = compress(&outlet, &vocabulary());
        assert_eq!(compressed.closing, "9 PM");
        assert_eq!(compressed.location, "Mid Valley Megamall");
    }

    #[test]
    fn test_fallbacks_use_prefixes() {
        let outlet = Outlet::new(
            1,
            "Subway Somewhere",
            "Lot G-12, Ground Floor, Menara Somewhere",
        )
        .with_hours("Open daily, except public holidays");
        let compressed = compress(&outlet, &vocabulary());
        assert_eq!(compressed.location, "Lot G-12, Ground Flo");
        assert_eq!(compressed.location.chars().count(), 20);
        assert_eq!(compressed.closing, "Open daily");
    }

    #[test]
    fn test_missing_fields() {
        let mut outlet = Outlet::new(1, "Subway Ghost", "");
        outlet.address = None;
        let compressed = compress(&outlet, &vocabulary());
        assert_eq!(compressed.to_string(), "Subway Ghost|N/A|N/A");
    }
}
