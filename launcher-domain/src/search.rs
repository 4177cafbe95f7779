//! Case-insensitive substring search over the app list.

use crate::shared_types::App;

/// Filters `apps` by `query` and sorts the result by label, ignoring case.
///
/// A blank query returns every app. Otherwise the trimmed, lower-cased query
/// must appear somewhere in the lower-cased label.
pub fn search_apps(apps: &[App], query: &str) -> Vec<App> {
    let needle = query.trim().to_lowercase();
    let mut results: Vec<App> = if needle.is_empty() {
        apps.to_vec()
    } else {
        apps.iter()
            .filter(|app| app.label.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    };
    results.sort_by_cached_key(App::sort_key);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn catalog() -> Vec<App> {
        vec![
            App::new("com.example.maps", "Maps"),
            App::new("com.example.mail", "mail"),
            App::new("com.example.camera", "Camera"),
            App::new("com.example.calc", "Calculator"),
            App::new("com.example.music", "Music"),
        ]
    }

    fn labels(apps: &[App]) -> Vec<String> {
        apps.iter().map(|a| a.label.clone()).collect()
    }

    #[rstest]
    #[case("", &["Calculator", "Camera", "mail", "Maps", "Music"])]
    #[case("   ", &["Calculator", "Camera", "mail", "Maps", "Music"])]
    #[case("ma", &["mail", "Maps"])]
    #[case("  MA ", &["mail", "Maps"])]
    #[case("ca", &["Calculator", "Camera"])]
    #[case("zzz", &[])]
    fn search_cases(#[case] query: &str, #[case] expected: &[&str]) {
        assert_eq!(labels(&search_apps(&catalog(), query)), expected.to_vec());
    }

    #[test]
    fn search_is_deterministic() {
        let apps = catalog();
        assert_eq!(labels(&search_apps(&apps, "m")), labels(&search_apps(&apps, "m")));
    }

    #[test]
    fn matches_inside_label() {
        let apps = vec![App::new("com.example.gmaps", "Google Maps")];
        assert_eq!(search_apps(&apps, "maps").len(), 1);
    }
}
