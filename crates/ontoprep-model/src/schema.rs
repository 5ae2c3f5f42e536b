//! Textual schema of the generated ontology files.
//!
//! The taxonomy serializer writes these tokens and the integrity verifier
//! scans for them. Both sides read from this module so a formatting change
//! lands in one place.

/// Namespace of ontology classes and properties.
pub const ONTO_NS: &str = "http://ia-das.org/onto#";

/// Namespace of data instances produced by the mapping engine.
pub const DATA_NS: &str = "http://ia-das.org/data#";

pub const RDF_TYPE_IRI: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Prefix declarations written once at the top of a taxonomy file.
pub const TAXONOMY_PREFIXES: &[(&str, &str)] = &[
    ("iadas", ONTO_NS),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("owl", "http://www.w3.org/2002/07/owl#"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("skos", "http://www.w3.org/2004/02/skos/core#"),
];

pub const CONCEPT_PREFIX: &str = "iadas";
pub const CLASS_TYPE: &str = "rdfs:Class";
pub const SUBCLASS_OF: &str = "rdfs:subClassOf";
pub const LABEL: &str = "rdfs:label";
pub const COMMENT: &str = "rdfs:comment";
pub const LABEL_LANGUAGE: &str = "en";
pub const ROOT_COMMENT: &str = "Concept racine de la taxonomie IA-DAS";
pub const ROOT_COMMENT_LANGUAGE: &str = "fr";

/// Percent-encoded space left behind by the mapping engine in IRIs.
pub const ENCODED_SPACE: &str = "%20";
pub const ENCODED_SPACE_REPLACEMENT: &str = "_";

pub const ANALYSIS_CLASS: &str = "Analysis";
pub const DEPENDENT_VARIABLE_CLASS: &str = "VariableDependante";
pub const INDEPENDENT_VARIABLE_CLASS: &str = "VariableIndependante";
pub const RELATIONS_CLASS: &str = "Relations";

/// Local-name prefixes of variable instances in [`DATA_NS`].
pub const DEPENDENT_VARIABLE_PREFIX: &str = "Variable_VD_";
pub const INDEPENDENT_VARIABLE_PREFIX: &str = "Variable_VI_";

/// Spellings of the type predicate accepted when scanning generated text.
pub const TYPE_PREDICATE_TOKENS: &[&str] = &[
    "<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>",
    "<rdf:type>",
    "rdf:type",
];

/// Full IRI of an ontology term, without angle brackets.
pub fn onto_iri(local: &str) -> String {
    format!("{ONTO_NS}{local}")
}

/// Full IRI of a data instance, without angle brackets.
pub fn data_iri(local: &str) -> String {
    format!("{DATA_NS}{local}")
}

/// Prefixed name of a taxonomy concept, e.g. `iadas:EatingDisorders`.
pub fn concept_name(identifier: &str) -> String {
    format!("{CONCEPT_PREFIX}:{identifier}")
}

/// Escapes a string for use inside a double-quoted Turtle literal.
pub fn escape_literal(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Language-tagged literal, e.g. `"Anorexia"@en`.
pub fn lang_literal(value: &str, language: &str) -> String {
    format!("\"{}\"@{language}", escape_literal(value))
}
