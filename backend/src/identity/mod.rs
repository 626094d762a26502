//! Name splitting and username derivation.
//!
//! ```text
//! "Шевченко Тарас Григорович"  --split-->  (Шевченко, Тарас, Some(Григорович))
//! "Shevchenko Taras Hryhorovych" --derive--> "t.h.shevchenko"
//! ```
//!
//! Both functions are pure: the duplicate tracker relies on identical
//! romanized input always producing the identical username.

use crate::error::NameError;
use crate::models::NameParts;

/// Apostrophe look-alikes folded into a plain `'`.
pub const APOSTROPHE_VARIANTS: [char; 4] = ['`', '\u{02BC}', '\u{2019}', '\u{2018}'];

/// Replace every apostrophe variant with `'`. Idempotent.
pub fn normalize_apostrophes(text: &str) -> String {
    text.chars()
        .map(|c| if APOSTROPHE_VARIANTS.contains(&c) { '\'' } else { c })
        .collect()
}

/// Split "last first [patronymic]" into [`NameParts`].
pub fn split_name(full_name: &str) -> Result<NameParts, NameError> {
    let normalized = normalize_apostrophes(full_name);
    let tokens: Vec<&str> = normalized.split_whitespace().collect();

    match tokens.as_slice() {
        [last, first] => Ok(NameParts {
            last_name: last.to_string(),
            first_name: first.to_string(),
            patronymic: None,
        }),
        [last, first, patronymic] => Ok(NameParts {
            last_name: last.to_string(),
            first_name: first.to_string(),
            patronymic: Some(patronymic.to_string()),
        }),
        [] | [_] => Err(NameError::TooFewParts(full_name.trim().to_string())),
        _ => Err(NameError::TooManyParts(full_name.trim().to_string())),
    }
}

/// Build the login handle from romanized name parts.
///
/// `f.p.lastname` when a patronymic is present, `f.lastname` otherwise,
/// always lowercase.
pub fn derive_username(romanized: &NameParts) -> String {
    let first = initial(&romanized.first_name);
    let last = romanized.last_name.to_lowercase();

    match romanized.patronymic.as_deref() {
        Some(patronymic) => format!("{}.{}.{}", first, initial(patronymic), last),
        None => format!("{}.{}", first, last),
    }
}

fn initial(word: &str) -> String {
    word.chars()
        .next()
        .map(|c| c.to_lowercase().collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(last: &str, first: &str, patronymic: Option<&str>) -> NameParts {
        NameParts {
            last_name: last.into(),
            first_name: first.into(),
            patronymic: patronymic.map(Into::into),
        }
    }

    #[test]
    fn test_split_three_parts() {
        let name = split_name("Шевченко Тарас Григорович").unwrap();
        assert_eq!(name, parts("Шевченко", "Тарас", Some("Григорович")));
    }

    #[test]
    fn test_split_two_parts_and_extra_whitespace() {
        let name = split_name("  Українка \t Леся ").unwrap();
        assert_eq!(name, parts("Українка", "Леся", None));
    }

    #[test]
    fn test_split_rejects_single_word() {
        assert_eq!(
            split_name("Шевченко"),
            Err(NameError::TooFewParts("Шевченко".into()))
        );
        assert!(matches!(split_name("   "), Err(NameError::TooFewParts(_))));
    }

    #[test]
    fn test_split_rejects_four_words() {
        assert!(matches!(
            split_name("Де Ла Круз Марія"),
            Err(NameError::TooManyParts(_))
        ));
    }

    #[test]
    fn test_apostrophe_variants_normalized() {
        for variant in ["Мар`яна", "Марʼяна", "Мар’яна", "Мар‘яна", "Мар'яна"] {
            let name = split_name(&format!("Гайова {}", variant)).unwrap();
            assert_eq!(name.first_name, "Мар'яна");
        }
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let once = normalize_apostrophes("Дем`ян Д’яченко");
        assert_eq!(normalize_apostrophes(&once), once);
        assert_eq!(once, "Дем'ян Д'яченко");
    }

    #[test]
    fn test_username_with_patronymic() {
        let romanized = parts("Shevchenko", "Taras", Some("Hryhorovych"));
        assert_eq!(derive_username(&romanized), "t.h.shevchenko");
    }

    #[test]
    fn test_username_without_patronymic() {
        let romanized = parts("Ukrainka", "Lesia", None);
        assert_eq!(derive_username(&romanized), "l.ukrainka");
    }

    #[test]
    fn test_username_is_lowercase_and_deterministic() {
        let romanized = parts("KOSACH", "Larysa", Some("PETRIVNA"));
        let first = derive_username(&romanized);
        assert_eq!(first, "l.p.kosach");
        for _ in 0..10 {
            assert_eq!(derive_username(&romanized), first);
        }
    }

    #[test]
    fn test_username_keeps_apostrophes_in_last_name() {
        let romanized = split_name("D’iachenko Demian").unwrap();
        assert_eq!(derive_username(&romanized), "d.d'iachenko");
    }
}
