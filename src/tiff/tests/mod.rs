mod test_utils;
mod byte_order_tests;
mod types_tests;
mod builder_tests;
