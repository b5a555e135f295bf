pub mod enhance;
pub mod links;
pub mod record;
pub mod text;
