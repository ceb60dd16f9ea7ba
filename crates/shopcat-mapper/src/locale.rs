//! Picks the record written in the requested language.

use shopcat_core::{Language, Localized};

/// Exact language match, else the only record when there is exactly one.
///
/// When several records share the language the first wins.
#[must_use]
pub fn resolve<'a, T: Localized>(records: &'a [T], language: &Language) -> Option<&'a T> {
    resolve_exact(records, language).or(match records {
        [only] => Some(only),
        _ => None,
    })
}

/// Exact language match only.
#[must_use]
pub fn resolve_exact<'a, T: Localized>(records: &'a [T], language: &Language) -> Option<&'a T> {
    records
        .iter()
        .find(|r| r.language().code.eq_ignore_ascii_case(&language.code))
}

#[cfg(test)]
mod tests {
    use shopcat_core::NamedDescription;

    use super::*;

    fn desc(id: i64, lang: &str, name: &str) -> NamedDescription {
        NamedDescription {
            id,
            language: Language::new(i32::try_from(id).unwrap(), lang),
            name: name.to_string(),
            description: None,
        }
    }

    #[test]
    fn resolve_exact_language() {
        let records = vec![desc(1, "en", "Size"), desc(2, "fr", "Taille")];
        let fr = Language::new(2, "fr");
        assert_eq!(resolve(&records, &fr).unwrap().name, "Taille");
    }

    #[test]
    fn resolve_falls_back_to_single_record() {
        let records = vec![desc(1, "en", "Size")];
        let fr = Language::new(2, "fr");
        assert_eq!(resolve(&records, &fr).unwrap().name, "Size");
    }

    #[test]
    fn resolve_without_match_among_many_is_none() {
        let records = vec![desc(1, "en", "Size"), desc(2, "es", "Talla")];
        let fr = Language::new(3, "fr");
        assert!(resolve(&records, &fr).is_none());
    }

    #[test]
    fn resolve_first_duplicate_wins() {
        let records = vec![desc(1, "en", "First"), desc(2, "en", "Second")];
        let en = Language::new(1, "en");
        assert_eq!(resolve(&records, &en).unwrap().name, "First");
    }

    #[test]
    fn resolve_exact_never_falls_back() {
        let records = vec![desc(1, "en", "Size")];
        let fr = Language::new(2, "fr");
        assert!(resolve_exact(&records, &fr).is_none());
    }

    #[test]
    fn resolve_empty_is_none() {
        let records: Vec<NamedDescription> = vec![];
        assert!(resolve(&records, &Language::new(1, "en")).is_none());
    }
}
