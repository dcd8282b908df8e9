// Purpose - external interfaces, format conversions

pub mod converter;

pub use converter::PdmDecimator;
