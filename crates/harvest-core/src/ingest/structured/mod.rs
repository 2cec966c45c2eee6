mod json_ld;
mod meta;
mod microdata;
mod rdfa;

pub use json_ld::JsonLdExtractor;
pub use meta::{split_price, DublinCoreExtractor, OpenGraphExtractor, TwitterCardExtractor};
pub use microdata::MicrodataExtractor;
pub use rdfa::RdfaExtractor;
