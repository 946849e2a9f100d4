pub mod code_generator;

pub use code_generator::generate_instrument_code;
