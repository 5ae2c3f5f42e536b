//! Marker patterns scanned for in generated graph text.
//!
//! Every pattern is assembled from `ontoprep_model::schema`, the same
//! description the taxonomy serializer writes from.

use regex::Regex;

use ontoprep_model::schema::{
    CLASS_TYPE, CONCEPT_PREFIX, DATA_NS, ONTO_NS, SUBCLASS_OF, TYPE_PREDICATE_TOKENS, onto_iri,
};

use crate::error::Result;

fn type_predicate() -> String {
    let alternatives: Vec<String> = TYPE_PREDICATE_TOKENS
        .iter()
        .map(|token| regex::escape(token))
        .collect();
    format!("(?:{})", alternatives.join("|"))
}

/// Matches `<subject> rdf:type <onto#Class>` for one class.
pub fn type_marker(class: &str) -> Result<Regex> {
    let iri = regex::escape(&format!("<{}>", onto_iri(class)));
    Ok(Regex::new(&format!(r"{}\s+{iri}", type_predicate()))?)
}

/// Captures the literal value of `<onto#property> "value"`.
pub fn property_value(property: &str) -> Result<Regex> {
    let iri = regex::escape(&format!("<{}>", onto_iri(property)));
    Ok(Regex::new(&format!(r#"{iri}\s+"([^"]*)""#))?)
}

/// Captures the ontology class local name of instances whose data IRI
/// starts with `instance_prefix`.
pub fn instance_type(instance_prefix: &str) -> Result<Regex> {
    let subject = regex::escape(&format!("<{DATA_NS}{instance_prefix}"));
    let onto = regex::escape(&format!("<{ONTO_NS}"));
    Ok(Regex::new(&format!(
        r"{subject}[^>]+>\s+{}\s+{onto}([^>]+)>",
        type_predicate()
    ))?)
}

/// Matches the first line of a class declaration in a taxonomy file.
pub fn class_declaration() -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"(?m)^{}:\S+\s+a\s+{}\b",
        regex::escape(CONCEPT_PREFIX),
        regex::escape(CLASS_TYPE)
    ))?)
}

/// Matches a subclass relation line in a taxonomy file.
pub fn subclass_relation() -> Result<Regex> {
    Ok(Regex::new(&format!(
        r"(?m)^[ \t]+{}\s+{}:\S+",
        regex::escape(SUBCLASS_OF),
        regex::escape(CONCEPT_PREFIX)
    ))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIPLES: &str = concat!(
        "<http://ia-das.org/data#Analysis_1> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ia-das.org/onto#Analysis> .\n",
        "<http://ia-das.org/data#Analysis_1.1> <rdf:type> <http://ia-das.org/onto#Analysis> .\n",
        "<http://ia-das.org/data#Analysis_2> rdf:type <http://ia-das.org/onto#AnalysisGroup> .\n",
        "<http://ia-das.org/data#Analysis_1> <http://ia-das.org/onto#gender> \"Mixed\" .\n",
        "<http://ia-das.org/data#Variable_VD_3> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ia-das.org/onto#Anxiety> .\n",
    );

    #[test]
    fn type_marker_matches_all_predicate_spellings() {
        let pattern = type_marker("Analysis").expect("pattern");
        assert_eq!(pattern.find_iter(TRIPLES).count(), 2);
    }

    #[test]
    fn property_value_captures_literal() {
        let pattern = property_value("gender").expect("pattern");
        let values: Vec<&str> = pattern
            .captures_iter(TRIPLES)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();
        assert_eq!(values, vec!["Mixed"]);
    }

    #[test]
    fn instance_type_captures_class() {
        let pattern = instance_type("Variable_VD_").expect("pattern");
        let classes: Vec<&str> = pattern
            .captures_iter(TRIPLES)
            .filter_map(|c| c.get(1).map(|m| m.as_str()))
            .collect();
        assert_eq!(classes, vec!["Anxiety"]);
    }
}
