//! Relay: fetch an index snapshot, validate it, and shape the response

mod response;
mod scanner;

pub use response::{
    assessment_body, tagged_body, ScanReport, ScanResponse, SymbolQuote, FETCH_FAILED,
};
pub use scanner::Scanner;
