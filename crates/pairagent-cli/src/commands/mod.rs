pub mod agents;
pub mod plan;
pub mod run;
