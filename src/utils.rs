//! Small string helpers shared by the registry and the people directory.

/// Characters that start the informational suffix of a directory real name,
/// e.g. `"Jane Doe (:jd) [team]"`.
const INFO_MARKERS: &[char] = &['(', '[', ':', '|'];

/// Turn a display name into a machine-readable name.
///
/// Words are split on spaces, stripped of everything but alphanumerics, lowercased and
/// joined with underscores: `"User Interface (UI)"` becomes `"user_interface_ui"`.
pub fn generate_machine_readable_name(display_name: &str) -> String {
    machine_readable(display_name, false)
}

/// Like [`generate_machine_readable_name`] but keeps the original case.
pub fn generate_machine_readable_name_keep_case(display_name: &str) -> String {
    machine_readable(display_name, true)
}

fn machine_readable(display_name: &str, keep_case: bool) -> String {
    display_name
        .split(' ')
        .map(|word| {
            let word: String = word.trim().chars().filter(|c| c.is_alphanumeric()).collect();
            if keep_case {
                word
            } else {
                word.to_lowercase()
            }
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// A directory real name split into the human name and trailing info.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedRealName {
    pub name: Option<String>,
    pub info: Option<String>,
}

/// Split a real name such as `"Jane Doe (:jd) [team]"` into `name = "Jane Doe"` and
/// `info = "(:jd) [team]"`. The info part starts at the first marker character.
pub fn parse_real_name(real_name: &str) -> ParsedRealName {
    let (name, info) = match real_name.find(INFO_MARKERS) {
        Some(at) => (&real_name[..at], &real_name[at..]),
        None => (real_name, ""),
    };

    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    ParsedRealName {
        name: non_empty(name),
        info: non_empty(info),
    }
}
