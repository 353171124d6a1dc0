// Model output decoding
pub mod intent_parser;

pub use intent_parser::{EnvelopeParser, Intent, IntentParser, ParsedIntent};
