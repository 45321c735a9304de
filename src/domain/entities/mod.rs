pub mod highlight;
pub mod layout;
pub mod options;
pub mod order_line;
pub mod sheet;
