mod builder;
mod gather;
mod preflight;

pub use builder::{CommandBuilder, ProjectBuilder};
pub use gather::{gather, plan, GatherPlan, GatherReport, GatherRequest, PublishUnit};
pub use preflight::{check_compiled_files, compiled_files};

#[cfg(test)]
mod tests;
