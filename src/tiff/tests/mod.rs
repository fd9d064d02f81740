mod test_utils;
mod byte_order_tests;
