use ahash::AHashMap;
use once_cell::sync::Lazy;

static PSEUDO_CLASSES: &[(&str, &str)] = &[
    (":active", ":a"),
    (":checked", ":c"),
    (":default", ":d"),
    (":disabled", ":di"),
    (":empty", ":e"),
    (":enabled", ":en"),
    (":first", ":fi"),
    (":first-child", ":fc"),
    (":first-of-type", ":fot"),
    (":fullscreen", ":fs"),
    (":focus", ":f"),
    (":hover", ":h"),
    (":indeterminate", ":ind"),
    (":in-range", ":ir"),
    (":invalid", ":inv"),
    (":last-child", ":lc"),
    (":last-of-type", ":lot"),
    (":left", ":l"),
    (":link", ":li"),
    (":only-child", ":oc"),
    (":only-of-type", ":oot"),
    (":optional", ":o"),
    (":out-of-range", ":oor"),
    (":read-only", ":ro"),
    (":read-write", ":rw"),
    (":required", ":req"),
    (":right", ":r"),
    (":root", ":rt"),
    (":scope", ":s"),
    (":target", ":t"),
    (":valid", ":v"),
    (":visited", ":vi"),
];

// Both spellings map to the full name.
static EXPAND: Lazy<AHashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = AHashMap::with_capacity(PSEUDO_CLASSES.len() * 2);
    for &(full, short) in PSEUDO_CLASSES {
        map.insert(full, full);
        map.insert(short, full);
    }
    map
});

/// Full pseudo-class for either spelling, `:h` -> `:hover`.
pub fn expand(pseudo: &str) -> Option<&'static str> {
    EXPAND.get(pseudo).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_spellings_expand() {
        assert_eq!(expand(":h"), Some(":hover"));
        assert_eq!(expand(":hover"), Some(":hover"));
        assert_eq!(expand(":fc"), Some(":first-child"));
        assert_eq!(expand(":nope"), None);
    }

    #[test]
    fn abbreviations_are_unique() {
        let mut shorts = ahash::AHashSet::new();
        for &(full, short) in PSEUDO_CLASSES {
            assert!(shorts.insert(short), "{short} is listed twice");
            assert_eq!(expand(short), Some(full), "{short} is shadowed");
        }
    }
}
