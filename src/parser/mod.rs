pub mod parse_from_file;

pub use parse_from_file::{DELIMITER, parse_card_line, parse_card_requests, read_card_requests};
