
/// Transaction handling and cascade behaviour
pub mod transaction_tests;
