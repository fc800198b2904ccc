pub mod errors;
pub mod db;
pub mod bus;
pub mod category;
pub mod menu_item;

#[cfg(test)]
mod tests;
