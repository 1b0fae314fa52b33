// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Label normalization and furniture vocabulary filtering

/// Canonical renames for detector vocabulary aliases.
const SYNONYMS: &[(&str, &str)] = &[
    ("couch", "sofa"),
    ("dining table", "table"),
    ("refrigerator", "fridge"),
    ("stove", "stove/cooktop"),
    ("tvmonitor", "tv"),
];

/// Labels accepted as furniture. Lower-case, sorted for binary search.
const FURNITURE_WHITELIST: &[&str] = &[
    "armchair",
    "bathtub",
    "bed",
    "bench",
    "bookshelf",
    "chair",
    "closet",
    "couch",
    "desk",
    "dining table",
    "dresser",
    "dryer",
    "fridge",
    "island",
    "microwave",
    "nightstand",
    "oven",
    "radiator",
    "refrigerator",
    "rug",
    "shoe rack",
    "shower",
    "side table",
    "sink",
    "sofa",
    "stove",
    "stove/cooktop",
    "table",
    "toilet",
    "tv",
    "tv stand",
    "vanity",
    "wardrobe",
    "washing machine",
];

/// Map a raw class label to its canonical lower-cased form.
///
/// Known aliases collapse to one canonical term; anything else passes through
/// lower-cased unchanged. Empty input normalizes to the empty string.
pub fn normalize_label(raw: &str) -> String {
    let label = raw.trim().to_lowercase();
    match SYNONYMS.iter().find(|(alias, _)| *alias == label) {
        Some((_, canonical)) => (*canonical).to_string(),
        None => label,
    }
}

/// Whether a label names a furniture class.
///
/// A label qualifies if it is whitelisted or if it is a known alias, so
/// aliases are accepted even before [`normalize_label`] has run.
pub fn is_furniture(label: &str) -> bool {
    let label = label.to_lowercase();
    FURNITURE_WHITELIST.binary_search(&label.as_str()).is_ok()
        || SYNONYMS.iter().any(|(alias, _)| *alias == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_is_sorted() {
        // binary_search depends on this
        assert!(FURNITURE_WHITELIST.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn synonyms_normalize_to_canonical_terms() {
        assert_eq!(normalize_label("couch"), "sofa");
        assert_eq!(normalize_label("Refrigerator"), "fridge");
        assert_eq!(normalize_label("  tvmonitor "), "tv");
        assert_eq!(normalize_label("stove"), "stove/cooktop");
    }

    #[test]
    fn unknown_labels_pass_through_lowercased() {
        assert_eq!(normalize_label("Xyz123"), "xyz123");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn aliases_count_as_furniture_before_normalization() {
        assert!(is_furniture("couch"));
        assert!(is_furniture("tvmonitor"));
    }

    #[test]
    fn arbitrary_labels_are_not_furniture() {
        assert!(is_furniture("Sofa"));
        assert!(!is_furniture("xyz123"));
        assert!(!is_furniture(""));
        assert!(!is_furniture("person"));
    }
}
