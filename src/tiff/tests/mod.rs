#[cfg(test)]
mod test_utils;
#[cfg(test)]
mod byte_order_tests;
#[cfg(test)]
mod types_tests;
#[cfg(test)]
mod compression_tests;
#[cfg(test)]
mod reader_writer_tests;
#[cfg(test)]
mod page_info_tests;
