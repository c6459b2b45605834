pub mod dataset;
pub mod errors;
pub mod indicator;
pub mod io;
pub mod meta;
pub mod pipeline;
pub mod scenario;
pub mod standard_variables;
pub mod timeseries;
