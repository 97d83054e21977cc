pub mod custom;
pub mod logic;
pub mod schema;
pub mod transpiler;
