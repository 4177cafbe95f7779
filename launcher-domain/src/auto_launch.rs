/// Decides whether the sole search result should be launched automatically.
pub fn is_eligible(enabled: bool, search_active: bool, query: &str, result_count: usize) -> bool {
    enabled && search_active && !query.trim().is_empty() && result_count == 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(true, true, "Maps", 1, true)]
    #[case(false, true, "Maps", 1, false)]
    #[case(true, false, "Maps", 1, false)]
    #[case(true, true, "   ", 1, false)]
    #[case(true, true, "Ma", 2, false)]
    #[case(true, true, "Mx", 0, false)]
    fn eligibility(
        #[case] enabled: bool,
        #[case] active: bool,
        #[case] query: &str,
        #[case] count: usize,
        #[case] expected: bool,
    ) {
        assert_eq!(is_eligible(enabled, active, query, count), expected);
    }
}
