// Core primitives for text import

pub mod cursor;
pub mod field;
pub mod newlines;
pub mod scanner;

pub use cursor::Cursor;
pub use field::*;
pub use newlines::*;
pub use scanner::*;
