//! Facility labels and the synonym table used to match historical spellings

/// Canonical facility labels in display order
pub const FACILITIES: &[&str] = &[
    "Wi-Fi",
    "Parking",
    "Valet Parking",
    "Wheelchair Accessible",
    "Air Conditioning",
    "Outdoor Seating",
    "Live Music",
    "Pet Friendly",
    "Card Payment",
    "Smoking Area",
    "Kids Play Area",
    "Private Dining",
    "Home Delivery",
    "Takeaway",
    "Bar",
];

/// Variant spellings found in stored rows, keyed by their normalized form
const SYNONYMS: &[(&str, &str)] = &[
    ("wifi", "Wi-Fi"),
    ("freewifi", "Wi-Fi"),
    ("wireless", "Wi-Fi"),
    ("wifiavailable", "Wi-Fi"),
    ("internet", "Wi-Fi"),
    ("parking", "Parking"),
    ("carparking", "Parking"),
    ("freeparking", "Parking"),
    ("parkingavailable", "Parking"),
    ("valet", "Valet Parking"),
    ("valetparking", "Valet Parking"),
    ("wheelchair", "Wheelchair Accessible"),
    ("wheelchairaccessible", "Wheelchair Accessible"),
    ("wheelchairaccess", "Wheelchair Accessible"),
    ("accessible", "Wheelchair Accessible"),
    ("ac", "Air Conditioning"),
    ("aircon", "Air Conditioning"),
    ("airconditioned", "Air Conditioning"),
    ("airconditioning", "Air Conditioning"),
    ("outdoor", "Outdoor Seating"),
    ("outdoorseating", "Outdoor Seating"),
    ("alfresco", "Outdoor Seating"),
    ("livemusic", "Live Music"),
    ("music", "Live Music"),
    ("petfriendly", "Pet Friendly"),
    ("petsallowed", "Pet Friendly"),
    ("cardpayment", "Card Payment"),
    ("cardsaccepted", "Card Payment"),
    ("cardaccepted", "Card Payment"),
    ("creditcard", "Card Payment"),
    ("smokingarea", "Smoking Area"),
    ("smokingzone", "Smoking Area"),
    ("smoking", "Smoking Area"),
    ("kidsplayarea", "Kids Play Area"),
    ("kidsarea", "Kids Play Area"),
    ("playarea", "Kids Play Area"),
    ("privatedining", "Private Dining"),
    ("privateroom", "Private Dining"),
    ("homedelivery", "Home Delivery"),
    ("delivery", "Home Delivery"),
    ("takeaway", "Takeaway"),
    ("takeout", "Takeaway"),
    ("bar", "Bar"),
    ("fullbar", "Bar"),
];

/// Lowercase and keep only alphanumerics, so `"Wi-Fi"`, `"wifi"` and `"WI FI"` agree
#[must_use]
pub fn normalize_key(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Canonical label for any known spelling
#[must_use]
pub fn canonical_label(input: &str) -> Option<&'static str> {
    let key = normalize_key(input);
    if key.is_empty() {
        return None;
    }
    FACILITIES
        .iter()
        .copied()
        .find(|label| normalize_key(label) == key)
        .or_else(|| {
            SYNONYMS
                .iter()
                .find(|(variant, _)| *variant == key)
                .map(|(_, label)| *label)
        })
}

/// Facilities selected on a listing
///
/// Entries that match no known facility are kept verbatim so saving the form
/// never drops data an older client wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacilitySet {
    known: Vec<&'static str>,
    unknown: Vec<String>,
}

impl FacilitySet {
    /// Build from stored free text
    #[must_use]
    pub fn from_stored<S: AsRef<str>>(stored: &[S]) -> Self {
        let mut set = Self::default();
        for entry in stored {
            let entry = entry.as_ref().trim();
            if entry.is_empty() {
                continue;
            }
            match canonical_label(entry) {
                Some(label) if !set.known.contains(&label) => set.known.push(label),
                Some(_) => {}
                None => {
                    let key = normalize_key(entry);
                    if !set.unknown.iter().any(|u| normalize_key(u) == key) {
                        set.unknown.push(entry.to_string());
                    }
                }
            }
        }
        set
    }

    /// Whether the facility (any spelling) is selected
    #[must_use]
    pub fn is_checked(&self, label: &str) -> bool {
        match canonical_label(label) {
            Some(canonical) => self.known.contains(&canonical),
            None => {
                let key = normalize_key(label);
                self.unknown.iter().any(|u| normalize_key(u) == key)
            }
        }
    }

    /// Flip a facility; returns whether it is selected afterwards
    pub fn toggle(&mut self, label: &str) -> bool {
        if let Some(canonical) = canonical_label(label) {
            if let Some(pos) = self.known.iter().position(|l| *l == canonical) {
                self.known.remove(pos);
                false
            } else {
                self.known.push(canonical);
                true
            }
        } else {
            let key = normalize_key(label);
            if key.is_empty() {
                return false;
            }
            let before = self.unknown.len();
            self.unknown.retain(|u| normalize_key(u) != key);
            if self.unknown.len() == before {
                self.unknown.push(label.trim().to_string());
                true
            } else {
                false
            }
        }
    }

    /// Selected labels: canonical ones in display order, then unknown entries
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        FACILITIES
            .iter()
            .filter(|label| self.known.contains(label))
            .map(|label| (*label).to_string())
            .chain(self.unknown.iter().cloned())
            .collect()
    }

    /// Value to write back to storage
    #[must_use]
    pub fn into_storage(self) -> Vec<String> {
        self.labels()
    }

    /// Number of selected facilities
    #[must_use]
    pub fn len(&self) -> usize {
        self.known.len() + self.unknown.len()
    }

    /// Nothing selected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("Wi-Fi", "wifi")]
    #[case("  WI FI!! ", "wifi")]
    #[case("Kids' Play-Area", "kidsplayarea")]
    #[case("", "")]
    fn test_normalize_key(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_key(input), expected);
    }

    #[rstest]
    #[case("wifi", Some("Wi-Fi"))]
    #[case("Free WiFi", Some("Wi-Fi"))]
    #[case("A/C", Some("Air Conditioning"))]
    #[case("air-conditioned", Some("Air Conditioning"))]
    #[case("Take Out", Some("Takeaway"))]
    #[case("Rooftop", None)]
    #[case("---", None)]
    fn test_canonical_label(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(canonical_label(input), expected);
    }

    #[test]
    fn test_every_synonym_maps_to_a_listed_label() {
        for (variant, label) in SYNONYMS {
            assert!(FACILITIES.contains(label), "{label} missing from FACILITIES");
            assert_eq!(normalize_key(variant), *variant, "{variant} is not normalized");
        }
    }

    #[test]
    fn test_historical_data_renders_checked() {
        let set = FacilitySet::from_stored(&["wifi", "Car Parking", "AC", "Rooftop", "WIFI"]);

        assert!(set.is_checked("Wi-Fi"));
        assert!(set.is_checked("Parking"));
        assert!(set.is_checked("Air Conditioning"));
        assert!(set.is_checked("rooftop"));
        assert!(!set.is_checked("Bar"));
        assert_eq!(
            set.labels(),
            vec!["Wi-Fi", "Parking", "Air Conditioning", "Rooftop"]
        );
    }

    #[test]
    fn test_toggle_removes_every_spelling() {
        let mut set = FacilitySet::from_stored(&["Free WiFi"]);
        assert!(!set.toggle("wi-fi"));
        assert!(!set.is_checked("Wi-Fi"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_toggle_unknown_entries() {
        let mut set = FacilitySet::default();
        assert!(set.toggle(" Rooftop "));
        assert!(set.is_checked("ROOFTOP"));
        assert!(!set.toggle("rooftop"));
        assert!(set.is_empty());
        assert!(!set.toggle("  "));
    }

    proptest! {
        #[test]
        fn prop_toggling_any_variant_checks_canonical(index in 0..SYNONYMS.len()) {
            let (variant, label) = SYNONYMS[index];
            let mut set = FacilitySet::default();
            prop_assert!(set.toggle(variant));
            prop_assert!(set.is_checked(label));
            prop_assert_eq!(set.labels(), vec![label.to_string()]);
        }

        #[test]
        fn prop_from_stored_is_idempotent(entries in proptest::collection::vec("[A-Za-z -]{0,12}", 0..8)) {
            let once = FacilitySet::from_stored(&entries);
            let twice = FacilitySet::from_stored(&once.labels());
            prop_assert_eq!(once.labels(), twice.labels());
        }
    }
}
