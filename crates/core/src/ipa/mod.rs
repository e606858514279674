//! IPA data and transforms: dictionaries, accent rules, function-word
//! forms and prosodic symbols.

pub mod dictionary;
pub mod forms;
pub mod rules;
pub mod symbols;
pub mod weak_forms;
