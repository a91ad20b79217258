#[cfg(test)]
mod file_tests;
