//! Properties of generated machine names

use modowners::utils::{generate_machine_readable_name, generate_machine_readable_name_keep_case};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_machine_names_have_no_whitespace(display in "\\PC{0,40}") {
        let name = generate_machine_readable_name(&display);
        prop_assert!(!name.chars().any(char::is_whitespace));
        prop_assert!(!name.starts_with('_'));
        prop_assert!(!name.ends_with('_'));
        prop_assert!(!name.contains("__"));
    }

    #[test]
    fn test_keep_case_differs_only_in_case(display in "[A-Za-z0-9 ()!:.,-]{0,40}") {
        let name = generate_machine_readable_name(&display);
        prop_assert_eq!(name, generate_machine_readable_name_keep_case(&display).to_lowercase());
    }
}
