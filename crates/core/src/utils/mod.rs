pub mod orgnr;
pub mod time_utils;
