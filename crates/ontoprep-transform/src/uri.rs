//! Percent-encoded space cleanup in generated graph text.

use ontoprep_model::schema::{ENCODED_SPACE, ENCODED_SPACE_REPLACEMENT};

/// Text with every encoded space replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedText {
    pub text: String,
    pub replacements: usize,
}

/// Replaces every `%20` with `_`, anywhere in the text.
///
/// Angle-bracketed IRIs, prefixed names and literals are all rewritten; the
/// mapping engine leaves encoded spaces in every position.
pub fn clean_encoded_spaces(text: &str) -> CleanedText {
    let replacements = text.matches(ENCODED_SPACE).count();
    let text = if replacements == 0 {
        text.to_string()
    } else {
        text.replace(ENCODED_SPACE, ENCODED_SPACE_REPLACEMENT)
    };
    CleanedText { text, replacements }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_in_iris_and_prefixed_names() {
        let input = "<http://ia-das.org/onto#Eating%20disorders> a iadas:Body%20image .\n";
        let cleaned = clean_encoded_spaces(input);
        assert_eq!(
            cleaned.text,
            "<http://ia-das.org/onto#Eating_disorders> a iadas:Body_image .\n"
        );
        assert_eq!(cleaned.replacements, 2);
    }

    #[test]
    fn untouched_text_is_identical() {
        let cleaned = clean_encoded_spaces("iadas:Stress a rdfs:Class .");
        assert_eq!(cleaned.text, "iadas:Stress a rdfs:Class .");
        assert_eq!(cleaned.replacements, 0);
    }

    #[test]
    fn adjacent_sequences() {
        assert_eq!(clean_encoded_spaces("a%20%20b").text, "a__b");
        assert_eq!(clean_encoded_spaces("%2%20").text, "%2_");
    }
}
