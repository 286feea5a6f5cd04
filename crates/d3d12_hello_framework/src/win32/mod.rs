pub mod dx_sample;
pub mod sample_runner;
