/// Abstract Classification
pub mod abstract_classification;
