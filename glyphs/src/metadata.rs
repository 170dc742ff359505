//! The textual metadata of an output font, derived from the name the
//! user chose for it.
use serde::Serialize;

/// `"RobotoMono-Regular.ttf"` becomes `"RobotoMono-Regular"`.
#[must_use]
pub fn name_without_file_extension(name: &str) -> &str {
    name.strip_suffix(".ttf")
        .or_else(|| name.strip_suffix(".otf"))
        .unwrap_or(name)
}

/// `"RobotoMono-Regular"` becomes `"RobotoMono"`.
#[must_use]
pub fn name_without_width_variant(name: &str) -> &str {
    let no_variant = name
        .strip_suffix("Regular")
        .or_else(|| name.strip_suffix("Book"))
        .unwrap_or(name);
    no_variant
        .strip_suffix(' ')
        .or_else(|| no_variant.strip_suffix('-'))
        .unwrap_or(no_variant)
}

/// Adds spaces to UpperCamelCase (`"DVCode"` becomes `"DV Code"`)
/// and turns `-`, `_` and `.` into spaces.
#[must_use]
pub fn split_camel_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut acc = String::with_capacity(s.len() + 4);
    for (i, ch) in chars.iter().copied().enumerate() {
        let prev_is_space = acc.ends_with(' ');
        let next_is_lower = chars.get(i + 1).is_some_and(|next| next.is_lowercase());
        let is_last = i + 1 == chars.len();
        if i != 0 && ch.is_uppercase() && (next_is_lower || is_last) && !prev_is_space {
            acc.push(' ');
            acc.push(ch);
        } else if matches!(ch, '-' | '_' | '.') {
            acc.push(' ');
        } else {
            acc.push(ch);
        }
    }
    acc
}

/// The names written into the output font.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontNames {
    /// The PostScript-style name, without spaces.
    pub font_name: String,
    pub full_name: String,
    pub family_name: String,
    pub unique_id: String,
    pub copyright: String,
}

impl FontNames {
    /// Derives the output names from the name the user chose (which
    /// may still carry a file extension or a width variant), the
    /// copyright notice of the font being modified and the notice to
    /// append to it.
    #[must_use]
    pub fn derive(output_name: &str, original_copyright: Option<&str>, addendum: &str) -> FontNames {
        let font_name = name_without_width_variant(name_without_file_extension(output_name));
        let with_spaces = split_camel_case(font_name);
        let mut copyright = original_copyright.unwrap_or_default().to_string();
        if !addendum.is_empty() {
            if !copyright.is_empty() {
                copyright.push('\n');
            }
            copyright.push_str(addendum);
        }
        FontNames {
            font_name: font_name.to_string(),
            full_name: with_spaces.clone(),
            family_name: with_spaces.clone(),
            unique_id: with_spaces,
            copyright,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{name_without_file_extension, name_without_width_variant, split_camel_case, FontNames};
    use test_strategy::proptest;

    #[test]
    fn test_name_without_file_extension() {
        assert_eq!(name_without_file_extension("RobotoMono-Regular.ttf"), "RobotoMono-Regular");
        assert_eq!(name_without_file_extension("LatinModernMath.otf"), "LatinModernMath");
        assert_eq!(name_without_file_extension("Plain"), "Plain");
    }

    #[test]
    fn test_name_without_width_variant() {
        assert_eq!(name_without_width_variant("RobotoMono-Regular"), "RobotoMono");
        assert_eq!(name_without_width_variant("Iosevka Book"), "Iosevka");
        assert_eq!(name_without_width_variant("FiraCodeRegular"), "FiraCode");
        assert_eq!(name_without_width_variant("Hack"), "Hack");
    }

    #[test]
    fn test_split_camel_case() {
        assert_eq!(split_camel_case("DVCode"), "DV Code");
        assert_eq!(split_camel_case("RobotoMono"), "Roboto Mono");
        assert_eq!(split_camel_case("my-font_name.x"), "my font name x");
        assert_eq!(split_camel_case("Test"), "Test");
        assert_eq!(split_camel_case(""), "");
    }

    #[test]
    fn test_derive_names() {
        let names = FontNames::derive(
            "DroidSansMonoTeX-Regular.ttf",
            Some("Copyright 2008 The Android Open Source Project"),
            "Programming ligatures added from FiraCode",
        );
        assert_eq!(names.font_name, "DroidSansMonoTeX");
        assert_eq!(names.family_name, "Droid Sans Mono Te X");
        assert_eq!(names.full_name, names.family_name);
        assert_eq!(names.unique_id, names.family_name);
        assert_eq!(
            names.copyright,
            "Copyright 2008 The Android Open Source Project\nProgramming ligatures added from FiraCode"
        );
    }

    #[test]
    fn test_derive_names_without_original_copyright() {
        let names = FontNames::derive("Test", None, "addendum");
        assert_eq!(names.copyright, "addendum");
        let names = FontNames::derive("Test", Some("original"), "");
        assert_eq!(names.copyright, "original");
    }

    #[proptest]
    fn split_camel_case_of_lowercase_ascii_is_identity(
        #[strategy("[a-z ]{0,24}")] input: String,
    ) {
        assert_eq!(split_camel_case(&input), input);
    }

    #[proptest]
    fn derived_font_name_has_no_extension(#[strategy("[A-Za-z]{1,16}")] stem: String) {
        let names = FontNames::derive(&format!("{stem}.ttf"), None, "");
        assert!(!names.font_name.contains('.'));
        assert!(stem.starts_with(names.font_name.as_str()));
    }
}
