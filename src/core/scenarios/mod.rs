// Scenario runners, one module per group
pub mod character_handling;
pub mod determinism;
pub mod functional_accuracy;
pub mod input_validation;
pub mod parameter_behavior;
pub mod response_completeness;
